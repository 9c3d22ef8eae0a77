use crate::backend::{
    CallObservation, NativeBackend, ProbeBackend, ResolvedEntry, SENTINEL_HANDLE,
};
use crate::errors::{ProbeError, ProbeResult};
use crate::outcome::ProbeOutcome;

/// Closes an invalid handle through `ntdll!NtClose` and reports whether a
/// fault was raised and intercepted. An unavailable probe reports `false`.
pub fn probe() -> bool {
    probe_outcome().detected()
}

pub fn probe_outcome() -> ProbeOutcome {
    probe_with(&NativeBackend)
}

/// Resolves the native entry point without invoking it.
pub fn resolve_nt_close() -> ProbeResult<ResolvedEntry> {
    NativeBackend.resolve()
}

pub fn probe_with<B>(backend: &B) -> ProbeOutcome
where
    B: ProbeBackend + ?Sized,
{
    let entry = match backend.resolve() {
        Ok(entry) => entry,
        Err(reason) => return unavailable(reason),
    };
    tracing::debug!(
        library = entry.library,
        symbol = entry.symbol,
        handle = %format_args!("{:#x}", SENTINEL_HANDLE),
        "invoking close entry point with invalid handle"
    );

    match backend.invoke_guarded() {
        Ok(CallObservation::Faulted { exception_code }) => {
            tracing::debug!(
                exception_code = %format_args!("{:#010x}", exception_code),
                "invalid handle fault intercepted"
            );
            ProbeOutcome::Detected { exception_code }
        }
        Ok(CallObservation::Returned { status }) => {
            tracing::debug!(
                status = %format_args!("{:#010x}", status),
                "close returned without fault"
            );
            ProbeOutcome::NotDetected { status }
        }
        Err(reason) => unavailable(reason),
    }
}

fn unavailable(reason: ProbeError) -> ProbeOutcome {
    tracing::warn!(reason = %reason, code = reason.code(), "invalid handle probe unavailable");
    ProbeOutcome::Unavailable { reason }
}
