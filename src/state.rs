// Extension state shared between event handlers and commands.
use std::sync::{Arc, Mutex};

use crate::coordinator::PlaybackCoordinator;
use crate::focus::FocusSuppressor;
use crate::settings::Settings;

pub struct ExtensionState {
    pub settings: Mutex<Settings>,
    pub coordinator: Mutex<PlaybackCoordinator>,
    pub suppressor: Mutex<FocusSuppressor>,
}

impl ExtensionState {
    pub fn new(settings: Settings) -> Arc<Self> {
        Arc::new(Self {
            settings: Mutex::new(settings),
            coordinator: Mutex::new(PlaybackCoordinator::new()),
            suppressor: Mutex::new(FocusSuppressor::new()),
        })
    }
}
