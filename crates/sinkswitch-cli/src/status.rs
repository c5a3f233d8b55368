//! Machine-readable status lines printed on stdout.
//!
//! The player UI matches on the bracketed tag at the start of the line, so
//! tag names are part of the external interface.

use std::fmt;
use std::process::ExitCode;

use serde::Serialize;
use sinkswitch_core::{RendererError, RendererOutcome, SwitchError, SwitchOutcome};

/// Status tag reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusTag {
    AudiooutChanged,
    AudiooutAlreadySet,
    AudiooutNoBt,
    AudiooutInvalid,
    AudiooutUsage,
    AudiooutError,
    RendererOn,
    RendererOff,
    RendererInvalid,
    RendererUsage,
    RendererError,
}

impl StatusTag {
    /// Tag text without brackets.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AudiooutChanged => "AUDIOOUT_CHANGED",
            Self::AudiooutAlreadySet => "AUDIOOUT_ALREADY_SET",
            Self::AudiooutNoBt => "AUDIOOUT_NO_BT",
            Self::AudiooutInvalid => "AUDIOOUT_INVALID",
            Self::AudiooutUsage => "AUDIOOUT_USAGE",
            Self::AudiooutError => "AUDIOOUT_ERROR",
            Self::RendererOn => "RENDERER_ON",
            Self::RendererOff => "RENDERER_OFF",
            Self::RendererInvalid => "RENDERER_INVALID",
            Self::RendererUsage => "RENDERER_USAGE",
            Self::RendererError => "RENDERER_ERROR",
        }
    }

    /// Whether the tag reports success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            Self::AudiooutChanged | Self::AudiooutAlreadySet | Self::RendererOn | Self::RendererOff
        )
    }
}

/// One status line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub status: StatusTag,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Report {
    /// A report with no detail.
    #[must_use]
    pub fn new(status: StatusTag) -> Self {
        Self { status, detail: None }
    }

    /// A report with a detail string.
    #[must_use]
    pub fn with_detail(status: StatusTag, detail: impl Into<String>) -> Self {
        Self { status, detail: Some(detail.into()) }
    }

    /// Process exit code: 0 on success, 1 otherwise.
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        if self.status.is_success() { ExitCode::SUCCESS } else { ExitCode::FAILURE }
    }

    /// JSON form of the report.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| format!("{{\"status\":\"{}\"}}", self.status.as_str()))
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.status.as_str())?;
        if let Some(detail) = &self.detail {
            write!(f, " {detail}")?;
        }
        Ok(())
    }
}

impl From<SwitchOutcome> for Report {
    fn from(outcome: SwitchOutcome) -> Self {
        match outcome {
            SwitchOutcome::AlreadySet { target } => {
                Self::with_detail(StatusTag::AudiooutAlreadySet, target.as_str())
            }
            SwitchOutcome::Switched { to, .. } => {
                Self::with_detail(StatusTag::AudiooutChanged, to.as_str())
            }
        }
    }
}

impl From<&SwitchError> for Report {
    fn from(err: &SwitchError) -> Self {
        match err {
            SwitchError::InvalidTarget(_) => Self::new(StatusTag::AudiooutInvalid),
            SwitchError::NoBluetoothDeviceAvailable => Self::new(StatusTag::AudiooutNoBt),
            other => Self::with_detail(StatusTag::AudiooutError, other.to_string()),
        }
    }
}

impl From<RendererOutcome> for Report {
    fn from(outcome: RendererOutcome) -> Self {
        let tag = if outcome.enabled { StatusTag::RendererOn } else { StatusTag::RendererOff };
        Self::with_detail(tag, outcome.service.as_str())
    }
}

impl From<&RendererError> for Report {
    fn from(err: &RendererError) -> Self {
        match err {
            RendererError::InvalidRendererRequest(_) => Self::new(StatusTag::RendererInvalid),
            other => Self::with_detail(StatusTag::RendererError, other.to_string()),
        }
    }
}
