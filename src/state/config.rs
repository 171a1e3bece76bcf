//! Configuration management
//!
//! Settings live in an INI file. The file is only read; session changes made
//! with `set` are never written back.

use crate::models::ModelEntry;
use crate::state::{parse_bool, SessionDefaults};
use crate::{Result, RobopError};
use ini::Ini;
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Application configuration
pub struct Config {
    /// INI configuration storage
    ini: Ini,

    /// File the configuration was read from, if any
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration
    ///
    /// An explicit path must exist. Without one, the per-user file
    /// (`~/.config/robop/robop.cfg` on Linux) is used when present, and the
    /// built-in defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(RobopError::Config(format!(
                        "config file {} does not exist",
                        path.display()
                    )));
                }
                Some(path.to_path_buf())
            }
            None => Self::user_config_path().filter(|p| p.exists()),
        };

        let Some(path) = path else {
            info!("No config file found, using built-in defaults");
            return Ok(Self::defaults());
        };

        debug!("Loading config from {:?}", path);
        let ini = Ini::load_from_file(&path).map_err(|e| {
            RobopError::IniParse(format!("Failed to load {}: {}", path.display(), e))
        })?;

        Ok(Self {
            ini,
            path: Some(path),
        })
    }

    /// Parse configuration from INI text
    pub fn parse(text: &str) -> Result<Self> {
        let ini = Ini::load_from_str(text).map_err(|e| RobopError::IniParse(e.to_string()))?;
        Ok(Self { ini, path: None })
    }

    /// Built-in configuration
    pub fn defaults() -> Self {
        Self {
            ini: Self::default_config(),
            path: None,
        }
    }

    /// Per-user config file location
    fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("robop").join("robop.cfg"))
    }

    /// File the configuration came from
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Create default configuration
    fn default_config() -> Ini {
        let mut ini = Ini::new();

        ini.with_section(Some("audio"))
            .set("sample_rate", "48000")
            .set("player", "auto");

        ini.with_section(Some("paths"))
            .set("scratch_dir", "tmp/wav")
            .set("model_root", "../models");

        ini.with_section(Some("tts"))
            .set("command", "auto")
            .set("output_timeout_ms", "2000")
            .set("poll_interval_ms", "20");

        let defaults = SessionDefaults::default();
        ini.with_section(Some("session"))
            .set("speed", defaults.speed.to_string())
            .set("gap", defaults.gap.to_string())
            .set("pitch", defaults.pitch.to_string())
            .set("amp", defaults.amp.to_string())
            .set("voice", defaults.voice)
            .set("model", defaults.model)
            .set("playraw", defaults.play_raw.to_string())
            .set("playrave", defaults.play_rave.to_string())
            .set("debug", defaults.debug.to_string())
            .set("prompt", crate::session::PROMPT);

        ini.with_section(Some("models"))
            .set("human", "human01rt/2M83.onnx, 48000, 0")
            .set("machine", "machine01rt/2M81.onnx, 48000, 0")
            .set("humanmachine", "humanmachine01rt/4M1.onnx, 48000, 0")
            .set("humanmachine_noft", "humanmachine01rt/3M_nofinetuning.onnx, 48000, 0");

        ini
    }

    /// Get a string value from config
    pub fn get_string(&self, section: &str, key: &str, default: &str) -> String {
        self.ini
            .get_from(Some(section), key)
            .unwrap_or(default)
            .to_string()
    }

    /// Get a parsed value, failing if the stored text does not parse
    fn get_parsed<T: FromStr>(&self, section: &str, key: &str, default: T) -> Result<T> {
        match self.ini.get_from(Some(section), key) {
            Some(raw) => raw.trim().parse().map_err(|_| {
                RobopError::Config(format!("[{}] {} has invalid value '{}'", section, key, raw))
            }),
            None => Ok(default),
        }
    }

    /// Get a boolean value, accepting the same tokens as `set`
    fn get_bool(&self, section: &str, key: &str, default: bool) -> Result<bool> {
        match self.ini.get_from(Some(section), key) {
            Some(raw) => parse_bool(raw.trim()).ok_or_else(|| {
                RobopError::Config(format!("[{}] {} has invalid value '{}'", section, key, raw))
            }),
            None => Ok(default),
        }
    }

    /// Playback and TTS input sample rate
    pub fn sample_rate(&self) -> Result<u32> {
        let rate = self.get_parsed("audio", "sample_rate", 48000u32)?;
        if rate == 0 {
            return Err(RobopError::Config("[audio] sample_rate must be > 0".to_string()));
        }
        Ok(rate)
    }

    /// Playback backend: auto, aplay, paplay or none
    pub fn player(&self) -> String {
        self.get_string("audio", "player", "auto")
    }

    /// Directory for raw and resynthesized audio files
    pub fn scratch_dir(&self) -> PathBuf {
        PathBuf::from(self.get_string("paths", "scratch_dir", "tmp/wav"))
    }

    /// Directory model paths are relative to
    pub fn model_root(&self) -> PathBuf {
        PathBuf::from(self.get_string("paths", "model_root", "../models"))
    }

    /// Explicit TTS executable, `None` for auto-detection
    pub fn tts_command(&self) -> Option<String> {
        let command = self.get_string("tts", "command", "auto");
        if command.is_empty() || command == "auto" {
            None
        } else {
            Some(command)
        }
    }

    /// How long to wait for the TTS output file to appear
    pub fn output_timeout(&self) -> Result<Duration> {
        self.get_parsed("tts", "output_timeout_ms", 2000u64)
            .map(Duration::from_millis)
    }

    /// Interval between output file checks
    pub fn poll_interval(&self) -> Result<Duration> {
        self.get_parsed("tts", "poll_interval_ms", 20u64)
            .map(Duration::from_millis)
    }

    /// Prompt shown before each input line
    pub fn prompt(&self) -> String {
        self.get_string("session", "prompt", crate::session::PROMPT)
    }

    /// Starting values for session parameters
    pub fn session_defaults(&self) -> Result<SessionDefaults> {
        let fallback = SessionDefaults::default();
        let defaults = SessionDefaults {
            speed: self.get_parsed("session", "speed", fallback.speed)?,
            gap: self.get_parsed("session", "gap", fallback.gap)?,
            pitch: self.get_parsed("session", "pitch", fallback.pitch)?,
            amp: self.get_parsed("session", "amp", fallback.amp)?,
            voice: self.get_string("session", "voice", &fallback.voice),
            model: self.get_string("session", "model", &fallback.model),
            play_raw: self.get_bool("session", "playraw", fallback.play_raw)?,
            play_rave: self.get_bool("session", "playrave", fallback.play_rave)?,
            debug: self.get_bool("session", "debug", fallback.debug)?,
        };

        if defaults.speed == 0 || defaults.pitch > 99 || defaults.amp > 200 {
            return Err(RobopError::Config(
                "[session] speed must be > 0, pitch 0-99 and amp 0-200".to_string(),
            ));
        }
        Ok(defaults)
    }

    /// Model table in file order
    ///
    /// Each entry reads `name = relative/path, sample_rate, latency_seconds`.
    pub fn model_entries(&self) -> Result<Vec<ModelEntry>> {
        let Some(section) = self.ini.section(Some("models")) else {
            return Ok(Vec::new());
        };

        let entries = section
            .iter()
            .map(|(name, value)| ModelEntry::parse(name, value))
            .collect::<Result<Vec<_>>>()?;
        debug!("Loaded {} model entries", entries.len());
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_session_defaults() {
        let config = Config::defaults();
        assert_eq!(config.session_defaults().unwrap(), SessionDefaults::default());
        assert_eq!(config.sample_rate().unwrap(), 48000);
        assert_eq!(config.prompt(), "👄");
        assert!(config.tts_command().is_none());
    }

    #[test]
    fn test_default_model_table_order() {
        let names: Vec<String> = Config::defaults()
            .model_entries()
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, ["human", "machine", "humanmachine", "humanmachine_noft"]);
    }

    #[test]
    fn test_default_models_are_onnx_exports() {
        for entry in Config::defaults().model_entries().unwrap() {
            assert_eq!(
                entry.relative_path.extension().and_then(|e| e.to_str()),
                Some("onnx"),
                "{}",
                entry.name
            );
        }
    }

    #[test]
    fn test_invalid_number_is_reported() {
        let config = Config::parse("[session]\npitch = high\n").unwrap();
        let err = config.session_defaults().unwrap_err();
        assert!(err.to_string().contains("pitch"));
    }

    #[test]
    fn test_out_of_range_default_is_rejected() {
        let config = Config::parse("[session]\namp = 250\n").unwrap();
        assert!(config.session_defaults().is_err());
    }

    #[test]
    fn test_timeouts() {
        let config = Config::parse("[tts]\noutput_timeout_ms = 500\n").unwrap();
        assert_eq!(config.output_timeout().unwrap(), Duration::from_millis(500));
        assert_eq!(config.poll_interval().unwrap(), Duration::from_millis(20));
    }
}
