use std::num::NonZeroUsize;

use crate::errors::ProbeResult;

/// Handle value passed to `NtClose`. Far above any index a process handle
/// table grows to, so the kernel always rejects it.
pub const SENTINEL_HANDLE: usize = 0xCAFE_BABE;

/// Where the close entry point was found. Address is non-null by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedEntry {
    pub library: &'static str,
    pub symbol: &'static str,
    pub address: NonZeroUsize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallObservation {
    Faulted { exception_code: u32 },
    Returned { status: u32 },
}

pub trait ProbeBackend {
    fn resolve(&self) -> ProbeResult<ResolvedEntry>;

    /// Calls the resolved entry point with [`SENTINEL_HANDLE`] inside a fault
    /// interception scope.
    fn invoke_guarded(&self) -> ProbeResult<CallObservation>;
}

/// Backend bound to the host's `ntdll.dll`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeBackend;

#[cfg(target_os = "windows")]
impl ProbeBackend for NativeBackend {
    fn resolve(&self) -> ProbeResult<ResolvedEntry> {
        crate::native::ntdll::nt_close().map(|nt_close| nt_close.entry())
    }

    fn invoke_guarded(&self) -> ProbeResult<CallObservation> {
        let nt_close = crate::native::ntdll::nt_close()?;
        // SAFETY: the sentinel is never a live handle of this process.
        crate::native::guard::intercept(|| unsafe { nt_close.call(SENTINEL_HANDLE) })
    }
}

#[cfg(not(target_os = "windows"))]
impl ProbeBackend for NativeBackend {
    fn resolve(&self) -> ProbeResult<ResolvedEntry> {
        Err(crate::errors::ProbeError::UnsupportedPlatform)
    }

    fn invoke_guarded(&self) -> ProbeResult<CallObservation> {
        Err(crate::errors::ProbeError::UnsupportedPlatform)
    }
}
