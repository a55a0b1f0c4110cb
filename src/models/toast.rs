//! Toast notification data types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Notification class controlling toast appearance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    #[default]
    Info,
    Warning,
}

/// Colours and glyph for one [`Severity`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Treatment {
    pub background: &'static str,
    pub color: &'static str,
    pub glyph: &'static str,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Success,
        Severity::Error,
        Severity::Info,
        Severity::Warning,
    ];

    /// Parse a severity name; anything unrecognised is [`Severity::Info`].
    ///
    /// Names are matched exactly: `"Success"` or `" error "` are not known
    /// names and fall back like any other.
    pub fn from_name(name: &str) -> Self {
        match name {
            "success" => Self::Success,
            "error" => Self::Error,
            "warning" => Self::Warning,
            _ => Self::Info,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
            Self::Warning => "warning",
        }
    }

    pub const fn treatment(self) -> Treatment {
        match self {
            Self::Success => Treatment {
                background: "#d1fae5",
                color: "#065f46",
                glyph: "✓",
            },
            Self::Error => Treatment {
                background: "#fee2e2",
                color: "#991b1b",
                glyph: "✕",
            },
            Self::Info => Treatment {
                background: "#dbeafe",
                color: "#1e3a8a",
                glyph: "ℹ",
            },
            Self::Warning => Treatment {
                background: "#fef3c7",
                color: "#92400e",
                glyph: "⚠",
            },
        }
    }
}

impl FromStr for Severity {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a single toast.
///
/// `Entering -> Visible -> Exiting -> Removed`. `Entering` may go straight to
/// `Exiting` when the display duration is shorter than the entrance animation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToastPhase {
    #[default]
    Entering,
    Visible,
    Exiting,
    Removed,
}

impl ToastPhase {
    /// Entrance animation finished.
    pub fn settle(self) -> Self {
        match self {
            Self::Entering => Self::Visible,
            other => other,
        }
    }

    /// Display duration elapsed.
    pub fn begin_exit(self) -> Self {
        match self {
            Self::Entering | Self::Visible => Self::Exiting,
            other => other,
        }
    }

    /// Exit animation finished.
    pub fn finish(self) -> Self {
        match self {
            Self::Exiting => Self::Removed,
            other => other,
        }
    }

    pub fn is_attached(self) -> bool {
        self != Self::Removed
    }
}

/// Everything a host needs to render one toast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToastSpec {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
    pub duration_ms: u32,
}

impl ToastSpec {
    pub fn treatment(&self) -> Treatment {
        self.severity.treatment()
    }
}
