// Host application surface: the document, its audio elements, and the
// workspace event/command machinery the extension registers against.
pub mod memory;

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub use memory::MemoryHost;

/// Stable identity of an element inside the host document.
///
/// The crate never owns elements; it observes and mutates them through
/// [`Host`] using these ids. An id can go stale when the host removes the
/// element, so callers re-validate with [`Host::contains`] before acting on a
/// retained id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Event kinds the extension listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// An audio element transitioned to playing.
    Play,
    /// An element is about to gain keyboard focus.
    Focus,
    /// Focus entered an element or one of its descendants.
    FocusIn,
    /// An element was clicked.
    Click,
    /// The workspace layout changed (panes opened, closed, rearranged).
    LayoutChange,
}

/// Where a capturing listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenTarget {
    /// The whole document; sees events for every element.
    Document,
    /// A single element and its subtree.
    Element(ElementId),
}

/// Handle to an installed listener, used for precise removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// An event delivered to a capturing listener.
///
/// `target` is `None` for workspace-level events with no originating element
/// (layout changes); listeners guard on it the way DOM handlers guard on the
/// event target's type.
#[derive(Debug)]
pub struct HostEvent {
    pub kind: EventKind,
    pub target: Option<ElementId>,
    default_prevented: AtomicBool,
    propagation_stopped: AtomicBool,
}

impl HostEvent {
    pub fn new(kind: EventKind, target: Option<ElementId>) -> Self {
        Self {
            kind,
            target,
            default_prevented: AtomicBool::new(false),
            propagation_stopped: AtomicBool::new(false),
        }
    }

    /// Suppress the host's default handling of this event.
    pub fn prevent_default(&self) {
        self.default_prevented.store(true, Ordering::SeqCst);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.load(Ordering::SeqCst)
    }

    /// Stop delivery to listeners later in the capture path.
    pub fn stop_propagation(&self) {
        self.propagation_stopped.store(true, Ordering::SeqCst);
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped.load(Ordering::SeqCst)
    }
}

/// Callback type for capturing event listeners.
///
/// Handlers receive the host by reference rather than capturing it, so
/// host-owned listeners never form a reference cycle with extension state.
pub type EventHandler = Arc<dyn Fn(&dyn Host, &HostEvent) + Send + Sync>;

/// A task scheduled with [`Host::defer`]. Fire-and-forget: there is no
/// cancellation, so tasks must be written to no-op harmlessly if the world
/// changed before they ran.
pub type DeferredTask = Box<dyn FnOnce(&dyn Host) + Send>;

/// Callback invoked when the user runs a registered command.
pub type CommandCallback = Arc<dyn Fn(&dyn Host) + Send + Sync>;

/// A user-invokable operation registered with the host on load.
pub struct Command {
    pub id: &'static str,
    pub name: &'static str,
    pub callback: CommandCallback,
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

/// The hosting application's document and workspace surface.
///
/// Implementations use interior mutability; all methods take `&self` so the
/// trait stays object-safe and handlers can drive the host from inside a
/// delivery.
pub trait Host: Send + Sync {
    // --- document queries ---

    /// All audio elements currently in the document, in document order.
    fn audio_elements(&self) -> Vec<ElementId>;

    /// Whether the element is still attached to the document.
    fn contains(&self, el: ElementId) -> bool;

    /// Root element of the currently active view, if one can be resolved.
    ///
    /// Hosts apply their own fallback chain (active leaf, CSS-matched active
    /// pane, document body) before giving up; `None` means operations should
    /// treat the whole document as the scope.
    fn active_view_root(&self) -> Option<ElementId>;

    /// Whether `el` sits inside the subtree rooted at `root`.
    fn is_within(&self, el: ElementId, root: ElementId) -> bool;

    /// All descendants of `el`, depth-first.
    fn descendants(&self, el: ElementId) -> Vec<ElementId>;

    // --- playback ---

    fn is_paused(&self, el: ElementId) -> bool;

    /// Start playback. On a paused element this later delivers a capturing
    /// document-level [`EventKind::Play`] event (media-element semantics: the
    /// event is queued, not fired inside this call).
    fn play(&self, el: ElementId);

    fn pause(&self, el: ElementId);

    /// Current playback position in seconds.
    fn playback_position(&self, el: ElementId) -> f64;

    fn set_playback_position(&self, el: ElementId, seconds: f64);

    // --- focus ---

    /// Explicit tab index, if the element carries one.
    fn tab_index(&self, el: ElementId) -> Option<i32>;

    fn set_tab_index(&self, el: ElementId, value: i32);

    fn clear_tab_index(&self, el: ElementId);

    /// Natively focusable widget (button, input, the media controls bar).
    fn is_native_control(&self, el: ElementId) -> bool;

    /// Carries an explicit button role for accessibility navigation.
    fn has_button_role(&self, el: ElementId) -> bool;

    /// Drop keyboard focus from the element if it holds it.
    fn blur(&self, el: ElementId);

    // --- events, commands, scheduling ---

    fn add_capture_listener(
        &self,
        target: ListenTarget,
        kind: EventKind,
        handler: EventHandler,
    ) -> ListenerId;

    fn remove_listener(&self, id: ListenerId);

    fn register_command(&self, command: Command);

    /// Schedule `task` to run after roughly `delay_ms`, once the current
    /// delivery and the host's own default handling have finished.
    fn defer(&self, delay_ms: u64, task: DeferredTask);
}
