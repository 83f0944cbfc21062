// Playback coordination: at most one audio element plays at a time.
//
// Selection (which element next/previous cycles to) is scoped to the active
// view; enforcement (pausing competitors) is always a single global pass.

use tracing::debug;

use crate::host::{ElementId, Host};
use crate::registry::{AudioRegistry, Scope};
use crate::settings::Settings;

#[derive(Debug, Clone, Copy)]
enum Direction {
    Forward,
    Backward,
}

/// Tracks which audio element is active and which was paused last.
///
/// One instance lives for the extension's lifetime; every operation
/// re-enumerates the document and re-validates retained state against it
/// before acting, since elements can disappear between operations.
#[derive(Debug, Default)]
pub struct PlaybackCoordinator {
    current_index: Option<usize>,
    last_paused: Option<ElementId>,
}

impl PlaybackCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the active element in the most recently enumerated set, if
    /// one is selected.
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// The element most recently paused by a toggle or cycle operation.
    pub fn last_paused(&self) -> Option<ElementId> {
        self.last_paused
    }

    /// Reacts to an element starting playback anywhere in the document:
    /// pauses every competitor and makes the element current.
    pub fn handle_play(&mut self, host: &dyn Host, settings: &Settings, target: ElementId) {
        let set = AudioRegistry::enumerate(host, Scope::Global);
        for &el in &set {
            if el != target && !host.is_paused(el) {
                Self::pause_element(host, settings, el);
            }
        }
        self.current_index = AudioRegistry::index_of(&set, target);
        self.last_paused = None;
        debug!(%target, index = ?self.current_index, "audio started, competitors paused");
    }

    /// Cycles to the next audio element in the active view.
    pub fn next(&mut self, host: &dyn Host, settings: &Settings) {
        self.advance(host, settings, Direction::Forward);
    }

    /// Cycles to the previous audio element in the active view.
    pub fn previous(&mut self, host: &dyn Host, settings: &Settings) {
        self.advance(host, settings, Direction::Backward);
    }

    /// Pauses the playing element, or resumes the last paused one, or starts
    /// the first audio in the document.
    pub fn toggle(&mut self, host: &dyn Host) {
        let set = AudioRegistry::enumerate(host, Scope::Global);
        self.revalidate(set.len());
        if set.is_empty() {
            return;
        }

        if let Some(&playing) = set.iter().find(|&&el| !host.is_paused(el)) {
            // No rewind here even with reset_to_beginning: toggling back
            // resumes from the same spot.
            host.pause(playing);
            self.last_paused = Some(playing);
            self.current_index = AudioRegistry::index_of(&set, playing);
            return;
        }

        if let Some(last) = self.last_paused {
            if host.contains(last) {
                if let Some(index) = AudioRegistry::index_of(&set, last) {
                    host.play(last);
                    self.current_index = Some(index);
                    return;
                }
            }
        }

        host.play(set[0]);
        self.current_index = Some(0);
        self.last_paused = None;
    }

    fn advance(&mut self, host: &dyn Host, settings: &Settings, direction: Direction) {
        let set = AudioRegistry::enumerate(host, Scope::ActiveView);
        self.revalidate(set.len());
        if set.is_empty() {
            return;
        }

        let playing = set.iter().position(|&el| !host.is_paused(el));
        let start = playing.or(self.current_index);
        let target_index = match direction {
            Direction::Forward => match start {
                Some(i) => (i + 1) % set.len(),
                None => 0,
            },
            Direction::Backward => match start {
                Some(i) if i > 0 => i - 1,
                _ => set.len() - 1,
            },
        };

        self.pause_playing(host, settings);
        self.current_index = Some(target_index);
        host.play(set[target_index]);
    }

    // Pauses every playing element in the document, remembering the first as
    // the resume target.
    fn pause_playing(&mut self, host: &dyn Host, settings: &Settings) {
        let global = AudioRegistry::enumerate(host, Scope::Global);
        if let Some(&playing) = global.iter().find(|&&el| !host.is_paused(el)) {
            self.last_paused = Some(playing);
        }
        for &el in &global {
            if !host.is_paused(el) {
                Self::pause_element(host, settings, el);
            }
        }
    }

    fn pause_element(host: &dyn Host, settings: &Settings, el: ElementId) {
        host.pause(el);
        if settings.reset_to_beginning {
            host.set_playback_position(el, 0.0);
        }
    }

    // A retained index is only meaningful while the set is at least that long.
    fn revalidate(&mut self, len: usize) {
        if self.current_index.is_some_and(|i| i >= len) {
            self.current_index = None;
        }
    }
}
