use std::fmt;

use serde::{Deserialize, Serialize};

/// Control value sent from the UI to the granulator. The visualiser passes
/// these through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "target", content = "value", rename_all = "snake_case")]
pub enum ParameterSignal {
    Density(f32),
    Volume(f32),
    Position(f32),
    Duration(f32),
    Pitch(f32),
    Feedback(f32),
    WetDry(f32),
}

impl ParameterSignal {
    /// Builds a signal from a control name such as `"wet_dry"`.
    pub fn from_name(name: &str, value: f32) -> Option<Self> {
        let signal = match name {
            "density" => Self::Density(value),
            "volume" => Self::Volume(value),
            "position" => Self::Position(value),
            "duration" => Self::Duration(value),
            "pitch" => Self::Pitch(value),
            "feedback" => Self::Feedback(value),
            "wet_dry" => Self::WetDry(value),
            _ => return None,
        };
        Some(signal)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Density(_) => "density",
            Self::Volume(_) => "volume",
            Self::Position(_) => "position",
            Self::Duration(_) => "duration",
            Self::Pitch(_) => "pitch",
            Self::Feedback(_) => "feedback",
            Self::WetDry(_) => "wet_dry",
        }
    }

    pub fn value(&self) -> f32 {
        match *self {
            Self::Density(v)
            | Self::Volume(v)
            | Self::Position(v)
            | Self::Duration(v)
            | Self::Pitch(v)
            | Self::Feedback(v)
            | Self::WetDry(v) => v,
        }
    }
}

impl fmt::Display for ParameterSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name(), self.value())
    }
}

/// Anything that accepts granulator control signals.
pub trait GranulatorControl {
    fn apply(&mut self, signal: ParameterSignal);
}

/// Forwards each signal, in order, to `control`.
pub fn forward<C, I>(control: &mut C, signals: I)
where
    C: GranulatorControl + ?Sized,
    I: IntoIterator<Item = ParameterSignal>,
{
    for signal in signals {
        tracing::debug!(%signal, "forwarding parameter");
        control.apply(signal);
    }
}
