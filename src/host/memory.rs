// In-memory host implementation.
//
// Backs the test suite and headless use without a live host application,
// modeling the parts of a document workspace the extension touches: a tree of
// panes and audio elements, capture-phase event dispatch, an active pane, a
// command palette, and a deferred-task queue. Queued work (play events,
// deferred tasks) is delivered by `pump()`, mirroring how a real host delivers
// media events and timers in a later turn.

use std::sync::Mutex;

use super::{
    Command, DeferredTask, ElementId, EventHandler, EventKind, Host, HostEvent, ListenTarget,
    ListenerId,
};

// A pump round delivers everything queued so far; handlers may queue more.
const MAX_PUMP_ROUNDS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    Pane,
    Audio,
    Control,
    Generic,
}

struct Node {
    kind: NodeKind,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    attached: bool,
    tab_index: Option<i32>,
    native_control: bool,
    button_role: bool,
    paused: bool,
    position: f64,
}

impl Node {
    fn new(kind: NodeKind, parent: Option<ElementId>, attached: bool) -> Self {
        Self {
            kind,
            parent,
            children: Vec::new(),
            attached,
            tab_index: None,
            native_control: false,
            button_role: false,
            paused: true,
            position: 0.0,
        }
    }
}

struct Registration {
    id: ListenerId,
    target: ListenTarget,
    kind: EventKind,
    handler: EventHandler,
}

#[derive(Default)]
struct Inner {
    nodes: Vec<Node>,
    active_pane: Option<ElementId>,
    listeners: Vec<Registration>,
    commands: Vec<Command>,
    queued_play: Vec<ElementId>,
    deferred: Vec<(u64, DeferredTask)>,
    next_listener_id: u64,
    focused: Option<ElementId>,
}

impl Inner {
    fn node(&self, el: ElementId) -> &Node {
        &self.nodes[el.0 as usize]
    }

    fn node_mut(&mut self, el: ElementId) -> &mut Node {
        &mut self.nodes[el.0 as usize]
    }

    fn add_node(&mut self, kind: NodeKind, parent: Option<ElementId>) -> ElementId {
        let attached = parent.map_or(true, |p| self.node(p).attached);
        let id = ElementId(self.nodes.len() as u64);
        self.nodes.push(Node::new(kind, parent, attached));
        if let Some(parent) = parent {
            self.node_mut(parent).children.push(id);
        }
        id
    }

    // Ancestor chain root-first, ending at `el`.
    fn capture_path(&self, el: ElementId) -> Vec<ElementId> {
        let mut path = vec![el];
        let mut cursor = el;
        while let Some(parent) = self.node(cursor).parent {
            path.push(parent);
            cursor = parent;
        }
        path.reverse();
        path
    }

    fn collect_descendants(&self, el: ElementId, out: &mut Vec<ElementId>) {
        for &child in &self.node(el).children {
            out.push(child);
            self.collect_descendants(child, out);
        }
    }
}

/// In-memory [`Host`] for tests and headless runs.
pub struct MemoryHost {
    inner: Mutex<Inner>,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }

    // --- document construction ---

    /// Adds a top-level pane (a view root).
    pub fn add_pane(&self) -> ElementId {
        self.inner.lock().unwrap().add_node(NodeKind::Pane, None)
    }

    /// Adds an audio element under `parent`.
    pub fn add_audio(&self, parent: ElementId) -> ElementId {
        self.inner
            .lock()
            .unwrap()
            .add_node(NodeKind::Audio, Some(parent))
    }

    /// Adds a natively focusable control (play button, seek bar) under `parent`.
    pub fn add_native_control(&self, parent: ElementId) -> ElementId {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.add_node(NodeKind::Control, Some(parent));
        inner.node_mut(id).native_control = true;
        id
    }

    /// Adds an element carrying an explicit button role under `parent`.
    pub fn add_role_button(&self, parent: ElementId) -> ElementId {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.add_node(NodeKind::Generic, Some(parent));
        inner.node_mut(id).button_role = true;
        id
    }

    /// Adds a plain, non-interactive element under `parent`.
    pub fn add_child(&self, parent: ElementId) -> ElementId {
        self.inner
            .lock()
            .unwrap()
            .add_node(NodeKind::Generic, Some(parent))
    }

    pub fn set_active_pane(&self, pane: ElementId) {
        self.inner.lock().unwrap().active_pane = Some(pane);
    }

    pub fn clear_active_pane(&self) {
        self.inner.lock().unwrap().active_pane = None;
    }

    /// Detaches `el` and its subtree from the document, as when a pane closes.
    pub fn detach(&self, el: ElementId) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(parent) = inner.node(el).parent {
            inner.node_mut(parent).children.retain(|&c| c != el);
        }
        inner.node_mut(el).parent = None;
        let mut subtree = vec![el];
        inner.collect_descendants(el, &mut subtree);
        for node in subtree {
            inner.node_mut(node).attached = false;
        }
    }

    // --- user interaction ---

    /// Simulates keyboard focus landing on `el`.
    pub fn focus(&self, el: ElementId) {
        let event = self.dispatch(EventKind::Focus, Some(el));
        if event.default_prevented() {
            return;
        }
        self.inner.lock().unwrap().focused = Some(el);
        self.dispatch(EventKind::FocusIn, Some(el));
    }

    /// Simulates a mouse click on `el`. The default action (focusing a
    /// focusable target) runs after capture handlers, before any deferred
    /// work those handlers scheduled.
    pub fn click(&self, el: ElementId) {
        let event = self.dispatch(EventKind::Click, Some(el));
        if event.default_prevented() {
            return;
        }
        let mut inner = self.inner.lock().unwrap();
        let node = inner.node(el);
        let focusable = node.tab_index.map_or(node.native_control, |t| t >= 0);
        if focusable {
            inner.focused = Some(el);
        }
    }

    /// Notifies layout-change listeners, as after panes open or close.
    pub fn emit_layout_change(&self) {
        self.dispatch(EventKind::LayoutChange, None);
    }

    /// Runs a registered command by id. Returns false if no such command.
    pub fn run_command(&self, id: &str) -> bool {
        let callback = {
            let inner = self.inner.lock().unwrap();
            inner
                .commands
                .iter()
                .find(|c| c.id == id)
                .map(|c| c.callback.clone())
        };
        match callback {
            Some(callback) => {
                callback(self);
                true
            }
            None => false,
        }
    }

    /// Delivers queued play events and due deferred tasks until the queues
    /// drain. Tasks scheduled with a shorter delay run first.
    pub fn pump(&self) {
        for _ in 0..MAX_PUMP_ROUNDS {
            let (plays, tasks) = {
                let mut inner = self.inner.lock().unwrap();
                let plays: Vec<ElementId> = inner.queued_play.drain(..).collect();
                let mut entries: Vec<(u64, DeferredTask)> = inner.deferred.drain(..).collect();
                entries.sort_by_key(|(delay, _)| *delay);
                (plays, entries)
            };
            if plays.is_empty() && tasks.is_empty() {
                return;
            }
            for el in plays {
                self.dispatch(EventKind::Play, Some(el));
            }
            for (_, task) in tasks {
                task(self);
            }
        }
    }

    // --- inspection ---

    pub fn focused(&self) -> Option<ElementId> {
        self.inner.lock().unwrap().focused
    }

    pub fn is_playing(&self, el: ElementId) -> bool {
        !self.inner.lock().unwrap().node(el).paused
    }

    pub fn listener_count(&self) -> usize {
        self.inner.lock().unwrap().listeners.len()
    }

    pub fn listeners_on(&self, el: ElementId) -> usize {
        self.inner
            .lock()
            .unwrap()
            .listeners
            .iter()
            .filter(|r| r.target == ListenTarget::Element(el))
            .count()
    }

    pub fn command_ids(&self) -> Vec<&'static str> {
        self.inner
            .lock()
            .unwrap()
            .commands
            .iter()
            .map(|c| c.id)
            .collect()
    }

    // Invokes matching listeners in capture order: document listeners first,
    // then listeners on each node from the root down to the target. The lock
    // is released before handlers run so they can drive the host.
    fn dispatch(&self, kind: EventKind, target: Option<ElementId>) -> HostEvent {
        let handlers: Vec<EventHandler> = {
            let inner = self.inner.lock().unwrap();
            let path = target.map(|el| inner.capture_path(el)).unwrap_or_default();
            let mut ordered = Vec::new();
            for reg in &inner.listeners {
                if reg.kind == kind && reg.target == ListenTarget::Document {
                    ordered.push(reg.handler.clone());
                }
            }
            for &node in &path {
                for reg in &inner.listeners {
                    if reg.kind == kind && reg.target == ListenTarget::Element(node) {
                        ordered.push(reg.handler.clone());
                    }
                }
            }
            ordered
        };

        let event = HostEvent::new(kind, target);
        for handler in handlers {
            if event.propagation_stopped() {
                break;
            }
            handler(self, &event);
        }
        event
    }
}

impl Host for MemoryHost {
    fn audio_elements(&self) -> Vec<ElementId> {
        let inner = self.inner.lock().unwrap();
        inner
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.kind == NodeKind::Audio && n.attached)
            .map(|(i, _)| ElementId(i as u64))
            .collect()
    }

    fn contains(&self, el: ElementId) -> bool {
        let inner = self.inner.lock().unwrap();
        (el.0 as usize) < inner.nodes.len() && inner.node(el).attached
    }

    fn active_view_root(&self) -> Option<ElementId> {
        let inner = self.inner.lock().unwrap();
        inner.active_pane.filter(|&pane| inner.node(pane).attached)
    }

    fn is_within(&self, el: ElementId, root: ElementId) -> bool {
        let inner = self.inner.lock().unwrap();
        let mut cursor = Some(el);
        while let Some(node) = cursor {
            if node == root {
                return true;
            }
            cursor = inner.node(node).parent;
        }
        false
    }

    fn descendants(&self, el: ElementId) -> Vec<ElementId> {
        let inner = self.inner.lock().unwrap();
        let mut out = Vec::new();
        inner.collect_descendants(el, &mut out);
        out
    }

    fn is_paused(&self, el: ElementId) -> bool {
        self.inner.lock().unwrap().node(el).paused
    }

    fn play(&self, el: ElementId) {
        let mut inner = self.inner.lock().unwrap();
        if inner.node(el).paused {
            inner.node_mut(el).paused = false;
            inner.queued_play.push(el);
        }
    }

    fn pause(&self, el: ElementId) {
        self.inner.lock().unwrap().node_mut(el).paused = true;
    }

    fn playback_position(&self, el: ElementId) -> f64 {
        self.inner.lock().unwrap().node(el).position
    }

    fn set_playback_position(&self, el: ElementId, seconds: f64) {
        self.inner.lock().unwrap().node_mut(el).position = seconds;
    }

    fn tab_index(&self, el: ElementId) -> Option<i32> {
        self.inner.lock().unwrap().node(el).tab_index
    }

    fn set_tab_index(&self, el: ElementId, value: i32) {
        self.inner.lock().unwrap().node_mut(el).tab_index = Some(value);
    }

    fn clear_tab_index(&self, el: ElementId) {
        self.inner.lock().unwrap().node_mut(el).tab_index = None;
    }

    fn is_native_control(&self, el: ElementId) -> bool {
        self.inner.lock().unwrap().node(el).native_control
    }

    fn has_button_role(&self, el: ElementId) -> bool {
        self.inner.lock().unwrap().node(el).button_role
    }

    fn blur(&self, el: ElementId) {
        let mut inner = self.inner.lock().unwrap();
        if inner.focused == Some(el) {
            inner.focused = None;
        }
    }

    fn add_capture_listener(
        &self,
        target: ListenTarget,
        kind: EventKind,
        handler: EventHandler,
    ) -> ListenerId {
        let mut inner = self.inner.lock().unwrap();
        let id = ListenerId(inner.next_listener_id);
        inner.next_listener_id += 1;
        inner.listeners.push(Registration {
            id,
            target,
            kind,
            handler,
        });
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        self.inner.lock().unwrap().listeners.retain(|r| r.id != id);
    }

    fn register_command(&self, command: Command) {
        self.inner.lock().unwrap().commands.push(command);
    }

    fn defer(&self, delay_ms: u64, task: DeferredTask) {
        self.inner.lock().unwrap().deferred.push((delay_ms, task));
    }
}
