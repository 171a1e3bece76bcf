//! Session state management
//!
//! The SessionState struct holds every parameter the user can change with
//! `set`, plus the counter used to name raw TTS output files. It is owned by
//! the session loop and handed to the interpreter and the render pipeline by
//! reference.

pub mod config;

use crate::logging;
use crate::{Result, RobopError};
use log::debug;
use std::fmt;
use std::str::FromStr;

/// A settable session parameter
///
/// The set is closed: anything typed after `set` that is not one of these
/// names is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    Speed,
    Gap,
    Pitch,
    Amp,
    Voice,
    Model,
    PlayRaw,
    PlayRave,
    Debug,
}

impl Param {
    /// Every parameter, in help text order
    pub const ALL: [Param; 9] = [
        Param::Speed,
        Param::Gap,
        Param::Pitch,
        Param::Amp,
        Param::Voice,
        Param::Model,
        Param::PlayRaw,
        Param::PlayRave,
        Param::Debug,
    ];

    /// Name used on the command line
    pub fn name(self) -> &'static str {
        match self {
            Param::Speed => "speed",
            Param::Gap => "gap",
            Param::Pitch => "pitch",
            Param::Amp => "amp",
            Param::Voice => "voice",
            Param::Model => "model",
            Param::PlayRaw => "playraw",
            Param::PlayRave => "playrave",
            Param::Debug => "debug",
        }
    }

    /// Human readable description of accepted values
    pub fn accepted(self) -> &'static str {
        match self {
            Param::Speed => "integer > 0, words per minute",
            Param::Gap => "integer >= 0, word gap in units of 10ms",
            Param::Pitch => "integer 0-99",
            Param::Amp => "integer 0-200",
            Param::Voice => "an espeak voice name (see 'voices')",
            Param::Model => "name of a loaded resynthesis model",
            Param::PlayRaw => "true or false, play raw TTS audio",
            Param::PlayRave => "true or false, play resynthesized audio",
            Param::Debug => "true or false, print debugging messages",
        }
    }

    /// Inclusive bounds for integer parameters
    fn bounds(self) -> Option<(u32, u32)> {
        match self {
            Param::Speed => Some((1, u32::MAX)),
            Param::Gap => Some((0, u32::MAX)),
            Param::Pitch => Some((0, 99)),
            Param::Amp => Some((0, 200)),
            _ => None,
        }
    }
}

impl FromStr for Param {
    type Err = RobopError;

    fn from_str(s: &str) -> Result<Self> {
        Param::ALL
            .iter()
            .copied()
            .find(|p| p.name() == s)
            .ok_or_else(|| RobopError::UnknownParameter(s.to_string()))
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Typed value of a parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Int(u32),
    Text(String),
    Flag(bool),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(v) => write!(f, "{}", v),
            ParamValue::Text(v) => f.write_str(v),
            ParamValue::Flag(v) => write!(f, "{}", v),
        }
    }
}

/// Parse a boolean token, case-insensitively
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Starting values for a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDefaults {
    pub speed: u32,
    pub gap: u32,
    pub pitch: u32,
    pub amp: u32,
    pub voice: String,
    pub model: String,
    pub play_raw: bool,
    pub play_rave: bool,
    pub debug: bool,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            speed: 100,
            gap: 1,
            pitch: 70,
            amp: 200,
            voice: "us-mbrola-1".to_string(),
            model: "humanmachine".to_string(),
            play_raw: false,
            play_rave: true,
            debug: false,
        }
    }
}

impl SessionDefaults {
    /// Default value of a parameter, formatted for help text
    pub fn value_of(&self, param: Param) -> ParamValue {
        match param {
            Param::Speed => ParamValue::Int(self.speed),
            Param::Gap => ParamValue::Int(self.gap),
            Param::Pitch => ParamValue::Int(self.pitch),
            Param::Amp => ParamValue::Int(self.amp),
            Param::Voice => ParamValue::Text(self.voice.clone()),
            Param::Model => ParamValue::Text(self.model.clone()),
            Param::PlayRaw => ParamValue::Flag(self.play_raw),
            Param::PlayRave => ParamValue::Flag(self.play_rave),
            Param::Debug => ParamValue::Flag(self.debug),
        }
    }
}

/// Mutable parameters of one interactive session
#[derive(Debug, Clone)]
pub struct SessionState {
    speed: u32,
    gap: u32,
    pitch: u32,
    amp: u32,
    voice: String,
    model: String,
    play_raw: bool,
    play_rave: bool,
    debug: bool,

    /// Next sequence number for raw TTS file names
    file_sequence: u64,

    /// Names accepted by `set model=`
    available_models: Vec<String>,

    defaults: SessionDefaults,
}

impl SessionState {
    /// Create a session from its defaults and the names of loaded models
    pub fn new(defaults: SessionDefaults, available_models: Vec<String>) -> Self {
        Self {
            speed: defaults.speed,
            gap: defaults.gap,
            pitch: defaults.pitch,
            amp: defaults.amp,
            voice: defaults.voice.clone(),
            model: defaults.model.clone(),
            play_raw: defaults.play_raw,
            play_rave: defaults.play_rave,
            debug: defaults.debug,
            file_sequence: 0,
            available_models,
            defaults,
        }
    }

    /// Read a parameter by name
    pub fn get(&self, field: &str) -> Result<ParamValue> {
        Ok(self.value_of(field.parse()?))
    }

    /// Read a parameter
    pub fn value_of(&self, param: Param) -> ParamValue {
        match param {
            Param::Speed => ParamValue::Int(self.speed),
            Param::Gap => ParamValue::Int(self.gap),
            Param::Pitch => ParamValue::Int(self.pitch),
            Param::Amp => ParamValue::Int(self.amp),
            Param::Voice => ParamValue::Text(self.voice.clone()),
            Param::Model => ParamValue::Text(self.model.clone()),
            Param::PlayRaw => ParamValue::Flag(self.play_raw),
            Param::PlayRave => ParamValue::Flag(self.play_rave),
            Param::Debug => ParamValue::Flag(self.debug),
        }
    }

    /// Assign a parameter from its raw textual value
    ///
    /// Returns the confirmation to show the user, e.g. `Set pitch=80`.
    /// On error the parameter keeps its previous value.
    pub fn set(&mut self, field: &str, raw: &str) -> Result<String> {
        let param: Param = field.parse()?;

        let value = match param {
            Param::Speed | Param::Gap | Param::Pitch | Param::Amp => {
                let v = Self::parse_int(param, raw)?;
                match param {
                    Param::Speed => self.speed = v,
                    Param::Gap => self.gap = v,
                    Param::Pitch => self.pitch = v,
                    _ => self.amp = v,
                }
                ParamValue::Int(v)
            }
            Param::Voice => {
                if raw.is_empty() {
                    return Err(Self::invalid(param, raw));
                }
                self.voice = raw.to_string();
                ParamValue::Text(raw.to_string())
            }
            Param::Model => {
                self.check_model(raw)?;
                self.model = raw.to_string();
                ParamValue::Text(raw.to_string())
            }
            Param::PlayRaw | Param::PlayRave | Param::Debug => {
                let v = parse_bool(raw).ok_or_else(|| Self::invalid(param, raw))?;
                match param {
                    Param::PlayRaw => self.play_raw = v,
                    Param::PlayRave => self.play_rave = v,
                    _ => {
                        self.debug = v;
                        logging::set_debug(v);
                    }
                }
                ParamValue::Flag(v)
            }
        };

        debug!("Set {} to {}", param, value);
        Ok(format!("Set {}={}", param, value))
    }

    fn invalid(param: Param, raw: &str) -> RobopError {
        RobopError::InvalidValue {
            param: param.name().to_string(),
            value: raw.to_string(),
            expected: param.accepted().to_string(),
        }
    }

    /// Parse an integer parameter and check its bounds
    fn parse_int(param: Param, raw: &str) -> Result<u32> {
        let (min, max) = param.bounds().unwrap_or((0, u32::MAX));
        match raw.parse::<u32>() {
            Ok(v) if v >= min && v <= max => Ok(v),
            _ => Err(Self::invalid(param, raw)),
        }
    }

    fn check_model(&self, name: &str) -> Result<()> {
        if self.available_models.iter().any(|m| m == name) {
            return Ok(());
        }
        let expected = if self.available_models.is_empty() {
            "a loaded model, but no models are loaded".to_string()
        } else {
            format!("one of: {}", self.available_models.join(", "))
        };
        Err(RobopError::InvalidValue {
            param: Param::Model.name().to_string(),
            value: name.to_string(),
            expected,
        })
    }

    /// Take the next file sequence number
    ///
    /// The counter only moves forward, one step per call.
    pub fn next_file_sequence(&mut self) -> u64 {
        let seq = self.file_sequence;
        self.file_sequence += 1;
        seq
    }

    /// Number of sequence numbers handed out so far
    pub fn file_sequence(&self) -> u64 {
        self.file_sequence
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn gap(&self) -> u32 {
        self.gap
    }

    pub fn pitch(&self) -> u32 {
        self.pitch
    }

    pub fn amp(&self) -> u32 {
        self.amp
    }

    pub fn voice(&self) -> &str {
        &self.voice
    }

    /// Name of the model used for resynthesis
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn play_raw(&self) -> bool {
        self.play_raw
    }

    pub fn play_rave(&self) -> bool {
        self.play_rave
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn available_models(&self) -> &[String] {
        &self.available_models
    }

    /// Values the session started with
    pub fn defaults(&self) -> &SessionDefaults {
        &self.defaults
    }
}
