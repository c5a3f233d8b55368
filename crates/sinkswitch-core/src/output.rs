//! Output targets and switch outcomes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SwitchError;

/// An audio output the player can route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OutputTarget {
    /// Wired or onboard output
    #[default]
    Local,
    /// Bluetooth output device
    Bluetooth,
}

impl OutputTarget {
    /// Both valid targets.
    pub const ALL: [Self; 2] = [Self::Local, Self::Bluetooth];

    /// Name as stored in the session and accepted on the command line.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "Local",
            Self::Bluetooth => "Bluetooth",
        }
    }
}

impl FromStr for OutputTarget {
    type Err = SwitchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Local" => Ok(Self::Local),
            "Bluetooth" => Ok(Self::Bluetooth),
            other => Err(SwitchError::InvalidTarget(other.to_string())),
        }
    }
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a successful switch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum SwitchOutcome {
    /// The requested output was already active; nothing was done
    AlreadySet { target: OutputTarget },
    /// The stored output was rewritten.
    ///
    /// `from` is `Local` when the stored value was missing or not a known
    /// target, so a request for `Local` over an unrecognised value reports
    /// `Switched { from: Local, to: Local }`.
    Switched { from: OutputTarget, to: OutputTarget },
}

impl SwitchOutcome {
    /// The output active after the request.
    #[must_use]
    pub fn target(&self) -> OutputTarget {
        match self {
            Self::AlreadySet { target } => *target,
            Self::Switched { to, .. } => *to,
        }
    }
}
