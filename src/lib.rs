// Soloplay - single active audio for document-editing workspaces.
// Module declarations
mod commands;
mod coordinator;
mod error;
mod extension;
mod focus;
pub mod host;
mod registry;
mod settings;
mod state;

pub use commands::{NEXT_AUDIO, PREVIOUS_AUDIO, TOGGLE_AUDIO};
pub use coordinator::PlaybackCoordinator;
pub use error::{Error, Result};
pub use extension::Extension;
pub use focus::FocusSuppressor;
pub use host::{
    Command, CommandCallback, DeferredTask, ElementId, EventHandler, EventKind, Host, HostEvent,
    ListenTarget, ListenerId, MemoryHost,
};
pub use registry::{AudioRegistry, Scope};
pub use settings::{FileSettingsStore, MemorySettingsStore, Settings, SettingsStore};
pub use state::ExtensionState;
