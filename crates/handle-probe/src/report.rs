use serde::Serialize;

use crate::backend::SENTINEL_HANDLE;
use crate::outcome::ProbeOutcome;

const PROBE_NAME: &str = "invalid_handle";
const PROBE_TITLE: &str = "Debugged invalid handle";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeReport {
    pub probe: &'static str,
    pub sentinel_handle: String,
    #[serde(flatten)]
    pub outcome: ProbeOutcome,
}

impl ProbeReport {
    pub fn new(outcome: ProbeOutcome) -> Self {
        Self {
            probe: PROBE_NAME,
            sentinel_handle: format!("{:#x}", SENTINEL_HANDLE),
            outcome,
        }
    }

    pub fn summary(&self) -> String {
        let verdict = match &self.outcome {
            ProbeOutcome::Detected { .. } => "Detected".to_string(),
            ProbeOutcome::NotDetected { .. } => "Not detected".to_string(),
            ProbeOutcome::Unavailable { reason } => format!("Oops: {}", reason),
        };
        format!("Testing: <{:^30}> {:>40}", PROBE_TITLE, verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ProbeError;

    #[test]
    fn summary_renders_verdict_per_outcome() {
        let detected = ProbeReport::new(ProbeOutcome::Detected {
            exception_code: 0xC000_0008,
        });
        assert!(detected.summary().contains("Debugged invalid handle"));
        assert!(detected.summary().trim_end().ends_with("Detected"));

        let clean = ProbeReport::new(ProbeOutcome::NotDetected { status: 0 });
        assert!(clean.summary().trim_end().ends_with("Not detected"));

        let unavailable = ProbeReport::new(ProbeOutcome::Unavailable {
            reason: ProbeError::UnsupportedPlatform,
        });
        assert!(unavailable.summary().contains("Oops: probe requires a windows host"));
    }

    #[test]
    fn report_serializes_flat_outcome_fields() {
        let report = ProbeReport::new(ProbeOutcome::Detected {
            exception_code: 0xC000_0008,
        });
        let value = serde_json::to_value(&report).expect("serialize report");
        assert_eq!(value["probe"], "invalid_handle");
        assert_eq!(value["sentinel_handle"], "0xcafebabe");
        assert_eq!(value["outcome"], "detected");
        assert_eq!(value["exception_code"], 0xC000_0008u32);
    }
}
