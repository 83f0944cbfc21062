// Extension lifecycle: wiring against the host application.
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::commands;
use crate::error::Result;
use crate::host::{EventHandler, EventKind, Host, ListenTarget, ListenerId};
use crate::settings::{Settings, SettingsStore};
use crate::state::ExtensionState;

// Re-rendered panes need a moment before suppression is worth reapplying.
const LAYOUT_SETTLE_MS: u64 = 100;

/// The loaded extension: owns the wiring between the host and the
/// coordination state.
pub struct Extension {
    host: Arc<dyn Host>,
    store: Arc<dyn SettingsStore>,
    state: Arc<ExtensionState>,
    listeners: Mutex<Vec<ListenerId>>,
}

impl Extension {
    /// Loads settings, registers the play and layout-change listeners and the
    /// three commands, and applies focus suppression per current settings.
    pub fn load(host: Arc<dyn Host>, store: Arc<dyn SettingsStore>) -> Result<Arc<Self>> {
        let settings = store.load()?;
        let state = ExtensionState::new(settings);
        let extension = Arc::new(Self {
            host,
            store,
            state,
            listeners: Mutex::new(Vec::new()),
        });

        extension.register_play_listener();
        extension.register_layout_listener();
        for command in commands::all(&extension.state) {
            extension.host.register_command(command);
        }

        let enabled = extension.settings().prevent_keyboard_focus;
        extension
            .state
            .suppressor
            .lock()
            .unwrap()
            .apply_all(extension.host.as_ref(), enabled);

        debug!("extension loaded");
        Ok(extension)
    }

    /// Removes the listeners registered on load and leaves every touched
    /// audio element in a neutral state, regardless of current settings.
    pub fn unload(&self) {
        for id in self.listeners.lock().unwrap().drain(..) {
            self.host.remove_listener(id);
        }
        self.state
            .suppressor
            .lock()
            .unwrap()
            .clear_all(self.host.as_ref());
        debug!("extension unloaded");
    }

    pub fn settings(&self) -> Settings {
        self.state.settings.lock().unwrap().clone()
    }

    /// Binding point for the host's settings UI toggle.
    pub fn set_reset_to_beginning(&self, value: bool) -> Result<()> {
        self.update_settings(|s| s.reset_to_beginning = value)
    }

    /// Binding point for the host's settings UI toggle.
    pub fn set_prevent_keyboard_focus(&self, value: bool) -> Result<()> {
        self.update_settings(|s| s.prevent_keyboard_focus = value)
    }

    // Every change persists immediately and reapplies suppression to all
    // known audio elements.
    fn update_settings(&self, mutate: impl FnOnce(&mut Settings)) -> Result<()> {
        let updated = {
            let mut settings = self.state.settings.lock().unwrap();
            mutate(&mut settings);
            settings.clone()
        };
        self.store.save(&updated)?;
        self.state
            .suppressor
            .lock()
            .unwrap()
            .apply_all(self.host.as_ref(), updated.prevent_keyboard_focus);
        Ok(())
    }

    // A capturing document-level listener: any audio element starting to
    // play, from any source, pauses the rest and becomes current.
    fn register_play_listener(&self) {
        let state = Arc::clone(&self.state);
        let handler: EventHandler = Arc::new(move |host, event| {
            let Some(target) = event.target else {
                return;
            };
            let settings = state.settings.lock().unwrap().clone();
            state
                .coordinator
                .lock()
                .unwrap()
                .handle_play(host, &settings, target);
            state
                .suppressor
                .lock()
                .unwrap()
                .apply(host, target, settings.prevent_keyboard_focus);
        });
        let id = self
            .host
            .add_capture_listener(ListenTarget::Document, EventKind::Play, handler);
        self.listeners.lock().unwrap().push(id);
    }

    // Layout changes replace view subtrees wholesale; suppression is
    // reapplied shortly after, once the new layout has settled.
    fn register_layout_listener(&self) {
        let state = Arc::clone(&self.state);
        let handler: EventHandler = Arc::new(move |host, _event| {
            if !state.settings.lock().unwrap().prevent_keyboard_focus {
                return;
            }
            let state = Arc::clone(&state);
            host.defer(
                LAYOUT_SETTLE_MS,
                Box::new(move |host| {
                    let enabled = state.settings.lock().unwrap().prevent_keyboard_focus;
                    state.suppressor.lock().unwrap().apply_all(host, enabled);
                }),
            );
        });
        let id =
            self.host
                .add_capture_listener(ListenTarget::Document, EventKind::LayoutChange, handler);
        self.listeners.lock().unwrap().push(id);
    }
}
