// User-invokable commands.
use std::sync::Arc;

use crate::host::{Command, Host};
use crate::state::ExtensionState;

pub const NEXT_AUDIO: &str = "next-audio";
pub const PREVIOUS_AUDIO: &str = "previous-audio";
pub const TOGGLE_AUDIO: &str = "toggle-audio";

pub fn next_audio(state: &ExtensionState, host: &dyn Host) {
    let settings = state.settings.lock().unwrap().clone();
    state.coordinator.lock().unwrap().next(host, &settings);
}

pub fn previous_audio(state: &ExtensionState, host: &dyn Host) {
    let settings = state.settings.lock().unwrap().clone();
    state.coordinator.lock().unwrap().previous(host, &settings);
}

pub fn toggle_audio(state: &ExtensionState, host: &dyn Host) {
    state.coordinator.lock().unwrap().toggle(host);
}

/// The three commands registered with the host on load.
pub fn all(state: &Arc<ExtensionState>) -> Vec<Command> {
    vec![
        command(NEXT_AUDIO, "Play next audio", state, next_audio),
        command(PREVIOUS_AUDIO, "Play previous audio", state, previous_audio),
        command(TOGGLE_AUDIO, "Play/pause audio", state, toggle_audio),
    ]
}

fn command(
    id: &'static str,
    name: &'static str,
    state: &Arc<ExtensionState>,
    action: fn(&ExtensionState, &dyn Host),
) -> Command {
    let state = Arc::clone(state);
    Command {
        id,
        name,
        callback: Arc::new(move |host| action(&state, host)),
    }
}
