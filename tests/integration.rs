//! End-to-end tests driving the public API against the in-memory host.

use std::sync::Arc;

use soloplay::{
    Extension, Host, MemoryHost, MemorySettingsStore, Settings, NEXT_AUDIO, PREVIOUS_AUDIO,
    TOGGLE_AUDIO,
};

struct Fixture {
    host: Arc<MemoryHost>,
    store: Arc<MemorySettingsStore>,
}

impl Fixture {
    fn new(settings: Settings) -> Self {
        Self {
            host: Arc::new(MemoryHost::new()),
            store: Arc::new(MemorySettingsStore::with_settings(settings)),
        }
    }

    fn load(&self) -> Arc<Extension> {
        Extension::load(self.host.clone(), self.store.clone()).unwrap()
    }
}

#[test]
fn load_registers_commands_and_listeners() {
    let fx = Fixture::new(Settings::default());
    let _extension = fx.load();

    let ids = fx.host.command_ids();
    assert_eq!(ids, vec![NEXT_AUDIO, PREVIOUS_AUDIO, TOGGLE_AUDIO]);
    // Play and layout-change listeners.
    assert_eq!(fx.host.listener_count(), 2);
}

#[test]
fn starting_one_audio_pauses_the_others() {
    let fx = Fixture::new(Settings::default());
    let pane = fx.host.add_pane();
    let a = fx.host.add_audio(pane);
    let b = fx.host.add_audio(pane);
    let _extension = fx.load();

    fx.host.play(a);
    fx.host.pump();
    assert!(fx.host.is_playing(a));

    fx.host.play(b);
    fx.host.pump();
    assert!(!fx.host.is_playing(a));
    assert!(fx.host.is_playing(b));
}

#[test]
fn reset_to_beginning_rewinds_the_paused_competitor() {
    let settings = Settings {
        reset_to_beginning: true,
        ..Settings::default()
    };
    let fx = Fixture::new(settings);
    let pane = fx.host.add_pane();
    let a = fx.host.add_audio(pane);
    let b = fx.host.add_audio(pane);
    let _extension = fx.load();

    fx.host.play(a);
    fx.host.pump();
    fx.host.set_playback_position(a, 42.0);

    fx.host.play(b);
    fx.host.pump();
    assert!(!fx.host.is_playing(a));
    assert_eq!(fx.host.playback_position(a), 0.0);
}

#[test]
fn commands_cycle_through_the_active_view() {
    let fx = Fixture::new(Settings::default());
    let pane = fx.host.add_pane();
    fx.host.set_active_pane(pane);
    let a = fx.host.add_audio(pane);
    let b = fx.host.add_audio(pane);
    let c = fx.host.add_audio(pane);
    let _extension = fx.load();

    assert!(fx.host.run_command(NEXT_AUDIO));
    fx.host.pump();
    assert!(fx.host.is_playing(a));

    fx.host.run_command(NEXT_AUDIO);
    fx.host.pump();
    assert!(!fx.host.is_playing(a));
    assert!(fx.host.is_playing(b));

    fx.host.run_command(PREVIOUS_AUDIO);
    fx.host.pump();
    assert!(fx.host.is_playing(a));
    assert!(!fx.host.is_playing(b));
    assert!(!fx.host.is_playing(c));
}

#[test]
fn toggle_command_pauses_and_resumes() {
    let fx = Fixture::new(Settings::default());
    let pane = fx.host.add_pane();
    let a = fx.host.add_audio(pane);
    let b = fx.host.add_audio(pane);
    let _extension = fx.load();

    fx.host.play(b);
    fx.host.pump();

    fx.host.run_command(TOGGLE_AUDIO);
    fx.host.pump();
    assert!(!fx.host.is_playing(a));
    assert!(!fx.host.is_playing(b));

    fx.host.run_command(TOGGLE_AUDIO);
    fx.host.pump();
    assert!(fx.host.is_playing(b));
    assert!(!fx.host.is_playing(a));
}

#[test]
fn unknown_command_is_rejected() {
    let fx = Fixture::new(Settings::default());
    let _extension = fx.load();
    assert!(!fx.host.run_command("no-such-command"));
}

#[test]
fn settings_changes_persist_and_reapply_suppression() {
    let fx = Fixture::new(Settings::default());
    let pane = fx.host.add_pane();
    let audio = fx.host.add_audio(pane);
    let extension = fx.load();
    assert_eq!(fx.host.tab_index(audio), None);

    extension.set_prevent_keyboard_focus(true).unwrap();
    assert_eq!(fx.host.tab_index(audio), Some(-1));
    assert_eq!(fx.store.save_count(), 1);
    assert!(fx.store.saved().unwrap().prevent_keyboard_focus);

    extension.set_prevent_keyboard_focus(false).unwrap();
    assert_eq!(fx.host.tab_index(audio), None);
    assert_eq!(fx.store.save_count(), 2);

    extension.set_reset_to_beginning(true).unwrap();
    assert_eq!(fx.store.save_count(), 3);
    assert!(fx.store.saved().unwrap().reset_to_beginning);
}

#[test]
fn suppression_from_stored_settings_applies_on_load() {
    let settings = Settings {
        prevent_keyboard_focus: true,
        ..Settings::default()
    };
    let fx = Fixture::new(settings);
    let pane = fx.host.add_pane();
    let audio = fx.host.add_audio(pane);
    let control = fx.host.add_native_control(audio);
    let _extension = fx.load();

    assert_eq!(fx.host.tab_index(audio), Some(-1));
    assert_eq!(fx.host.tab_index(control), Some(-1));

    fx.host.focus(control);
    assert_eq!(fx.host.focused(), None);
}

#[test]
fn playing_a_new_element_suppresses_it_per_settings() {
    let settings = Settings {
        prevent_keyboard_focus: true,
        ..Settings::default()
    };
    let fx = Fixture::new(settings);
    let pane = fx.host.add_pane();
    let _extension = fx.load();

    // Appears after load, so the initial pass never saw it.
    let late = fx.host.add_audio(pane);
    assert_eq!(fx.host.tab_index(late), None);

    fx.host.play(late);
    fx.host.pump();
    assert_eq!(fx.host.tab_index(late), Some(-1));
}

#[test]
fn layout_change_reapplies_suppression_after_settling() {
    let settings = Settings {
        prevent_keyboard_focus: true,
        ..Settings::default()
    };
    let fx = Fixture::new(settings);
    let pane = fx.host.add_pane();
    let _extension = fx.load();

    let late = fx.host.add_audio(pane);
    fx.host.emit_layout_change();
    assert_eq!(fx.host.tab_index(late), None);

    fx.host.pump();
    assert_eq!(fx.host.tab_index(late), Some(-1));
}

#[test]
fn layout_change_defers_nothing_when_suppression_is_off() {
    let fx = Fixture::new(Settings::default());
    let pane = fx.host.add_pane();
    let audio = fx.host.add_audio(pane);
    let _extension = fx.load();

    fx.host.emit_layout_change();
    fx.host.pump();
    assert_eq!(fx.host.tab_index(audio), None);
}

#[test]
fn unload_leaves_the_document_neutral() {
    let settings = Settings {
        prevent_keyboard_focus: true,
        ..Settings::default()
    };
    let fx = Fixture::new(settings);
    let pane = fx.host.add_pane();
    let audio = fx.host.add_audio(pane);
    let control = fx.host.add_native_control(audio);
    let extension = fx.load();
    assert_eq!(fx.host.tab_index(audio), Some(-1));

    extension.unload();

    assert_eq!(fx.host.tab_index(audio), None);
    assert_eq!(fx.host.tab_index(control), None);
    assert_eq!(fx.host.listener_count(), 0);

    // A play event after unload reaches nothing.
    fx.host.play(audio);
    fx.host.pump();
    assert_eq!(fx.host.tab_index(audio), None);
}
