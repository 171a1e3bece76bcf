//! Command interpreter tests
//!
//! Feed lines through the interpreter and check both the printed output
//! and the session parameters it leaves behind.

mod common;

use common::FakeGenerator;
use robop::input::CommandInterpreter;
use robop::state::{Param, ParamValue, SessionDefaults, SessionState};

fn state() -> SessionState {
    SessionState::new(
        SessionDefaults::default(),
        vec!["human".to_string(), "machine".to_string()],
    )
}

struct Run {
    spoken: Vec<Option<String>>,
    output: String,
    state: SessionState,
}

fn run(lines: &[&str]) -> Run {
    let mut interp = CommandInterpreter::new(Vec::new());
    let mut state = state();
    let mut voices = FakeGenerator::new(Vec::new());

    let spoken = lines
        .iter()
        .map(|line| interp.process(line, &mut state, &mut voices))
        .collect();
    Run {
        spoken,
        output: String::from_utf8(interp.into_output()).unwrap(),
        state,
    }
}

#[test]
fn test_text_is_returned_verbatim() {
    let r = run(&["Hello, I am a robot.", "  spaced  out  ", "sets are fun"]);
    assert_eq!(r.spoken[0].as_deref(), Some("Hello, I am a robot."));
    assert_eq!(r.spoken[1].as_deref(), Some("  spaced  out  "));
    // "set" prefix is a command, even without a separator
    assert_eq!(r.spoken[2], None);
}

#[test]
fn test_commands_return_nothing() {
    let r = run(&["help", "voices", "set pitch=50", "quit"]);
    assert!(r.spoken.iter().all(Option::is_none));
}

#[test]
fn test_assignments_apply_left_to_right() {
    let r = run(&["set pitch=80 pitch=60 amp=100"]);
    assert_eq!(r.output, "Set pitch=80\nSet pitch=60\nSet amp=100\n");
    assert_eq!(r.state.pitch(), 60);
    assert_eq!(r.state.amp(), 100);
}

#[test]
fn test_bogus_parameter_does_not_block_others() {
    let r = run(&["set pitch=80 amp=100 bogus=1"]);
    assert_eq!(r.spoken[0], None);
    assert!(r.output.starts_with("Set pitch=80\nSet amp=100\n"));
    assert!(r.output.contains("Error: Unknown parameter 'bogus'"));
    assert_eq!(r.state.pitch(), 80);
    assert_eq!(r.state.amp(), 100);
}

#[test]
fn test_help_does_not_change_state() {
    let r = run(&["help"]);
    let defaults = SessionDefaults::default();
    for param in Param::ALL {
        assert_eq!(r.state.value_of(param), defaults.value_of(param));
    }
    assert_eq!(r.state.file_sequence(), 0);
}

#[test]
fn test_unknown_parameter_is_named() {
    let r = run(&["set loudness=11 gap=3"]);
    assert!(r.output.contains("Unknown parameter 'loudness'"));
    assert!(r.output.contains("Set gap=3"));
    assert_eq!(r.state.gap(), 3);
}

#[test]
fn test_invalid_values_leave_parameters_unchanged() {
    let r = run(&[
        "set pitch=100",
        "set amp=201",
        "set speed=0",
        "set playraw=maybe",
        "set model=robot",
    ]);
    assert_eq!(r.output.matches("Error: Invalid value").count(), 5);

    let defaults = SessionDefaults::default();
    for param in [Param::Pitch, Param::Amp, Param::Speed, Param::PlayRaw, Param::Model] {
        assert_eq!(r.state.value_of(param), defaults.value_of(param));
    }
}

#[test]
fn test_boolean_spellings() {
    let r = run(&["set playraw=yes playrave=OFF"]);
    assert_eq!(r.output, "Set playraw=true\nSet playrave=false\n");
    assert_eq!(r.state.value_of(Param::PlayRave), ParamValue::Flag(false));
}

#[test]
fn test_model_switch() {
    let r = run(&["set model=machine"]);
    assert_eq!(r.state.model(), "machine");
}

#[test]
fn test_voices_usage() {
    let r = run(&["voices", "voices=en", "voices en"]);
    assert!(r.output.contains("(all)"));
    assert!(r.output.contains("(en)"));
    assert!(r.output.contains("Error: usage: voices"));
}

#[test]
fn test_help_shows_defaults() {
    let r = run(&["help"]);
    assert!(r.output.contains("speed=100"));
    assert!(r.output.contains("voice=us-mbrola-1"));
    assert!(r.output.contains("playrave=true"));
    assert!(r.output.contains("Loaded models: human, machine"));
}

#[test]
fn test_malformed_tokens_are_reported() {
    let r = run(&["set pitch=80 loud"]);
    assert!(r.output.contains("'loud' is not a parameter assignment"));
    assert!(r.output.contains("Set pitch=80"));
}
