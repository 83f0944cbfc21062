// Reversible keyboard/mouse focus suppression for audio widgets.
//
// Embedded media controls otherwise participate in Tab navigation, which is
// disruptive while editing a document. Suppression must be fully reversible:
// everything installed or overwritten is recorded per element so disabling
// restores the exact prior state.

use std::collections::HashMap;
use std::sync::Arc;

use crate::host::{ElementId, EventHandler, EventKind, Host, ListenTarget, ListenerId};

// Everything suppression changed on one element, kept so removal is precise:
// the installed listener handles and each marked node's prior tab index.
struct SuppressionBundle {
    listeners: Vec<ListenerId>,
    marked: Vec<(ElementId, Option<i32>)>,
}

/// Applies and removes focus suppression on audio elements.
///
/// Owns the per-element handler bundles; nothing is stashed on host nodes, so
/// removal never depends on mutating third-party objects.
#[derive(Default)]
pub struct FocusSuppressor {
    bundles: HashMap<ElementId, SuppressionBundle>,
}

impl FocusSuppressor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_suppressed(&self, el: ElementId) -> bool {
        self.bundles.contains_key(&el)
    }

    /// Idempotent, reversible toggle of suppression on one element.
    ///
    /// Enabling over an existing bundle tears it down and rebuilds, so a
    /// re-render that changed the descendant set is picked up.
    pub fn apply(&mut self, host: &dyn Host, el: ElementId, enabled: bool) {
        self.remove(host, el);
        if enabled && host.contains(el) {
            self.install(host, el);
        }
    }

    /// Applies the current setting to every audio element in the document.
    pub fn apply_all(&mut self, host: &dyn Host, enabled: bool) {
        for el in host.audio_elements() {
            self.apply(host, el, enabled);
        }
    }

    /// Strips suppression from every element ever touched, regardless of the
    /// current setting. Unload path.
    pub fn clear_all(&mut self, host: &dyn Host) {
        let elements: Vec<ElementId> = self.bundles.keys().copied().collect();
        for el in elements {
            self.remove(host, el);
        }
    }

    fn install(&mut self, host: &dyn Host, el: ElementId) {
        let descendants = host.descendants(el);

        // The element and every interactive descendant leave the tab order.
        let mut marked = Vec::new();
        marked.push((el, host.tab_index(el)));
        host.set_tab_index(el, -1);
        for &node in &descendants {
            if Self::is_interactive(host, node) {
                marked.push((node, host.tab_index(node)));
                host.set_tab_index(node, -1);
            }
        }

        let focus_guard: EventHandler = Arc::new(|host, event| {
            event.prevent_default();
            event.stop_propagation();
            if let Some(target) = event.target {
                host.blur(target);
            }
        });

        let mut listeners = Vec::new();
        for kind in [EventKind::Focus, EventKind::FocusIn] {
            listeners.push(host.add_capture_listener(
                ListenTarget::Element(el),
                kind,
                focus_guard.clone(),
            ));
            for &node in &descendants {
                listeners.push(host.add_capture_listener(
                    ListenTarget::Element(node),
                    kind,
                    focus_guard.clone(),
                ));
            }
        }

        // The click itself goes through; focus is dropped once the host's
        // default handling has finished.
        let owner = el;
        let click_guard: EventHandler = Arc::new(move |host, event| {
            let target = event.target;
            host.defer(
                0,
                Box::new(move |host| {
                    if let Some(target) = target {
                        host.blur(target);
                    }
                    host.blur(owner);
                }),
            );
        });
        listeners.push(host.add_capture_listener(
            ListenTarget::Element(el),
            EventKind::Click,
            click_guard,
        ));

        self.bundles.insert(el, SuppressionBundle { listeners, marked });
    }

    fn remove(&mut self, host: &dyn Host, el: ElementId) {
        let Some(bundle) = self.bundles.remove(&el) else {
            return;
        };
        for id in bundle.listeners {
            host.remove_listener(id);
        }
        for (node, prior) in bundle.marked {
            match prior {
                Some(value) => host.set_tab_index(node, value),
                None => host.clear_tab_index(node),
            }
        }
    }

    // Native controls, explicit button roles, and anything already
    // participating in the tab order.
    fn is_interactive(host: &dyn Host, el: ElementId) -> bool {
        host.is_native_control(el) || host.has_button_role(el) || host.tab_index(el).is_some()
    }
}
