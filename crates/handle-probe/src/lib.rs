//! Invalid-handle debugger probe.
//!
//! Calls `ntdll!NtClose` with a handle the process cannot own and watches for
//! the handle fault a debug port makes the kernel raise.

mod backend;
mod errors;
mod outcome;
mod probe;
mod report;
#[cfg(target_os = "windows")]
pub mod native;

pub use backend::{
    CallObservation, NativeBackend, ProbeBackend, ResolvedEntry, SENTINEL_HANDLE,
};
pub use errors::{ProbeError, ProbeResult};
pub use outcome::{ProbeOutcome, EXIT_DETECTED, EXIT_NOT_DETECTED, EXIT_UNAVAILABLE};
pub use probe::{probe, probe_outcome, probe_with, resolve_nt_close};
pub use report::ProbeReport;
