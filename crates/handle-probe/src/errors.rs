use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProbeError {
    LibraryLoad {
        library: &'static str,
        detail: String,
    },
    SymbolResolve {
        library: &'static str,
        symbol: &'static str,
        detail: String,
    },
    InterceptionUnavailable {
        detail: String,
    },
    UnsupportedPlatform,
}

impl ProbeError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::LibraryLoad { .. } => "library_load",
            Self::SymbolResolve { .. } => "symbol_resolve",
            Self::InterceptionUnavailable { .. } => "interception_unavailable",
            Self::UnsupportedPlatform => "unsupported_platform",
        }
    }
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LibraryLoad { library, detail } => {
                write!(f, "failed to load {}: {}", library, detail)
            }
            Self::SymbolResolve {
                library,
                symbol,
                detail,
            } => write!(f, "failed to resolve {}!{}: {}", library, symbol, detail),
            Self::InterceptionUnavailable { detail } => {
                write!(f, "fault interception unavailable: {}", detail)
            }
            Self::UnsupportedPlatform => write!(f, "probe requires a windows host"),
        }
    }
}

impl std::error::Error for ProbeError {}

pub type ProbeResult<T> = std::result::Result<T, ProbeError>;
