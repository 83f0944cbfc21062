// Audio element enumeration.
//
// The set is rebuilt on every operation instead of cached: the host document
// is dynamic (panes open and close, elements come and go) and recomputing a
// handful of elements is cheaper than change-notification wiring.

use crate::host::{ElementId, Host};

/// Which part of the document an operation considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Only audio inside the currently active view. Falls back to the whole
    /// document when the host cannot resolve an active view.
    ActiveView,
    /// Every audio element in the document.
    Global,
}

pub struct AudioRegistry;

impl AudioRegistry {
    /// Audio elements in document order, filtered to `scope`. No side effects.
    pub fn enumerate(host: &dyn Host, scope: Scope) -> Vec<ElementId> {
        let all = host.audio_elements();
        match scope {
            Scope::Global => all,
            Scope::ActiveView => match host.active_view_root() {
                Some(root) => all
                    .into_iter()
                    .filter(|&el| host.is_within(el, root))
                    .collect(),
                None => all,
            },
        }
    }

    /// Position of `el` in `set`, if present.
    pub fn index_of(set: &[ElementId], el: ElementId) -> Option<usize> {
        set.iter().position(|&e| e == el)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;

    #[test]
    fn global_scope_lists_everything_in_document_order() {
        let host = MemoryHost::new();
        let left = host.add_pane();
        let right = host.add_pane();
        let a = host.add_audio(left);
        let b = host.add_audio(right);
        let c = host.add_audio(left);

        assert_eq!(AudioRegistry::enumerate(&host, Scope::Global), vec![a, b, c]);
    }

    #[test]
    fn active_view_scope_filters_to_the_active_pane() {
        let host = MemoryHost::new();
        let left = host.add_pane();
        let right = host.add_pane();
        let a = host.add_audio(left);
        let _b = host.add_audio(right);
        host.set_active_pane(left);

        assert_eq!(
            AudioRegistry::enumerate(&host, Scope::ActiveView),
            vec![a]
        );
    }

    #[test]
    fn active_view_scope_falls_back_to_global_without_a_resolvable_view() {
        let host = MemoryHost::new();
        let left = host.add_pane();
        let right = host.add_pane();
        let a = host.add_audio(left);
        let b = host.add_audio(right);

        host.set_active_pane(left);
        assert_eq!(AudioRegistry::enumerate(&host, Scope::ActiveView), vec![a]);

        host.clear_active_pane();
        assert_eq!(
            AudioRegistry::enumerate(&host, Scope::ActiveView),
            vec![a, b]
        );
    }

    #[test]
    fn a_detached_active_pane_is_not_a_view_root() {
        let host = MemoryHost::new();
        let left = host.add_pane();
        let right = host.add_pane();
        let _a = host.add_audio(left);
        let b = host.add_audio(right);
        host.set_active_pane(left);

        host.detach(left);
        assert_eq!(AudioRegistry::enumerate(&host, Scope::ActiveView), vec![b]);
    }

    #[test]
    fn index_of_is_a_linear_lookup() {
        let host = MemoryHost::new();
        let pane = host.add_pane();
        let a = host.add_audio(pane);
        let b = host.add_audio(pane);
        let set = vec![a, b];

        assert_eq!(AudioRegistry::index_of(&set, b), Some(1));
        assert_eq!(AudioRegistry::index_of(&set, ElementId(99)), None);
    }
}
