use std::fmt;

use serde::Serialize;

use crate::errors::ProbeError;

pub const EXIT_NOT_DETECTED: i32 = 0;
pub const EXIT_DETECTED: i32 = 10;
pub const EXIT_UNAVAILABLE: i32 = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// The interception scope caught a fault raised by the call.
    Detected { exception_code: u32 },
    /// The call returned `status` without raising.
    NotDetected { status: u32 },
    Unavailable { reason: ProbeError },
}

impl ProbeOutcome {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Detected { .. } => "detected",
            Self::NotDetected { .. } => "not_detected",
            Self::Unavailable { .. } => "unavailable",
        }
    }

    pub fn detected(&self) -> bool {
        matches!(self, Self::Detected { .. })
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, Self::Unavailable { .. })
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Detected { .. } => EXIT_DETECTED,
            Self::NotDetected { .. } => EXIT_NOT_DETECTED,
            Self::Unavailable { .. } => EXIT_UNAVAILABLE,
        }
    }

    /// Outcome code for a smoke-binary exit status.
    pub fn code_for_exit(code: i32) -> Option<&'static str> {
        match code {
            EXIT_DETECTED => Some("detected"),
            EXIT_NOT_DETECTED => Some("not_detected"),
            EXIT_UNAVAILABLE => Some("unavailable"),
            _ => None,
        }
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Detected { exception_code } => {
                write!(f, "fault intercepted (code=0x{:08X})", exception_code)
            }
            Self::NotDetected { status } => {
                write!(f, "call returned without fault (status=0x{:08X})", status)
            }
            Self::Unavailable { reason } => write!(f, "probe unavailable: {}", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_map_back_to_outcome_codes() {
        let outcomes = [
            ProbeOutcome::Detected {
                exception_code: 0xC000_0008,
            },
            ProbeOutcome::NotDetected {
                status: 0xC000_0008,
            },
            ProbeOutcome::Unavailable {
                reason: ProbeError::UnsupportedPlatform,
            },
        ];
        for outcome in outcomes {
            assert_eq!(
                ProbeOutcome::code_for_exit(outcome.exit_code()),
                Some(outcome.code())
            );
        }
        assert_eq!(ProbeOutcome::code_for_exit(101), None);
    }
}
