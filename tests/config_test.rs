//! Configuration loading tests
//!
//! Tests that configuration files load correctly and feed the model
//! registry and session defaults

use robop::models::{ModelFormat, ModelRegistry, UnavailableLoader};
use robop::state::config::Config;
use robop::RobopError;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const CONFIG: &str = "\
[audio]
sample_rate = 44100
player = none

[paths]
scratch_dir = /tmp/robop-test
model_root = /srv/models

[session]
pitch = 40
voice = mb/mb-us1
model = machine
playraw = yes
playrave = off

[models]
machine = machine01rt/2M81.ts, 44100, 0.5
human = human01rt/2M83.ckpt, 48000, 0
";

#[test]
fn test_config_file_loads() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("robop.cfg");
    fs::write(&path, CONFIG).unwrap();

    let config = Config::load(Some(&path)).expect("Failed to load config");
    assert_eq!(config.path(), Some(path.as_path()));
    assert_eq!(config.sample_rate().unwrap(), 44100);
    assert_eq!(config.player(), "none");
    assert_eq!(config.scratch_dir(), Path::new("/tmp/robop-test"));
    assert_eq!(config.model_root(), Path::new("/srv/models"));

    let defaults = config.session_defaults().unwrap();
    assert_eq!(defaults.pitch, 40);
    assert_eq!(defaults.speed, 100);
    assert_eq!(defaults.voice, "mb/mb-us1");
    assert_eq!(defaults.model, "machine");
    assert!(defaults.play_raw);
    assert!(!defaults.play_rave);
}

#[test]
fn test_missing_explicit_config_is_error() {
    let dir = tempdir().unwrap();
    let err = Config::load(Some(&dir.path().join("nope.cfg")))
        .err()
        .expect("missing file should fail");
    assert!(matches!(err, RobopError::Config(_)));
}

#[test]
fn test_model_table_keeps_file_order() {
    let config = Config::parse(CONFIG).unwrap();
    let entries = config.model_entries().unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].name, "machine");
    assert_eq!(entries[0].sample_rate, 44100);
    assert_eq!(entries[0].latency_seconds, 0.5);
    assert_eq!(entries[1].name, "human");
    assert_eq!(
        ModelFormat::from_path(&entries[0].relative_path),
        ModelFormat::Realtime
    );
    assert_eq!(
        ModelFormat::from_path(&entries[1].relative_path),
        ModelFormat::Checkpoint
    );
}

#[test]
fn test_bad_model_entry() {
    let config = Config::parse("[models]\nhuman = human.ts, fast, 0\n").unwrap();
    let err = config.model_entries().unwrap_err();
    assert!(err.to_string().contains("human"));
}

#[test]
fn test_missing_model_file_fails_load() {
    let dir = tempdir().unwrap();
    let config = Config::parse("[models]\nhuman = human.ts, 48000, 0\n").unwrap();
    let entries = config.model_entries().unwrap();

    let mut registry = ModelRegistry::new();
    let err = registry
        .load(&entries, dir.path(), &UnavailableLoader)
        .unwrap_err();
    assert!(matches!(err, RobopError::ModelLoad { ref name, .. } if name == "human"));
    assert!(registry.is_empty());
}

#[test]
fn test_model_file_without_backend_fails_load() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("human.ts"), b"not really a model").unwrap();
    let config = Config::parse("[models]\nhuman = human.ts, 48000, 0\n").unwrap();

    let mut registry = ModelRegistry::new();
    let err = registry
        .load(&config.model_entries().unwrap(), dir.path(), &UnavailableLoader)
        .unwrap_err();
    assert!(err.to_string().contains("model backend"));
}
