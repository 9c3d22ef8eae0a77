//! Resolution of `ntdll.dll!NtClose`.
//!
//! The library is loaded once and never freed: the resolved pointer is cached
//! for the process lifetime and `ntdll` cannot be unloaded anyway.

use std::ffi::c_void;
use std::num::NonZeroUsize;
use std::sync::OnceLock;

use windows::core::s;
use windows::Win32::System::LibraryLoader::{GetProcAddress, LoadLibraryA};

use crate::backend::ResolvedEntry;
use crate::errors::{ProbeError, ProbeResult};

pub const NTDLL: &str = "ntdll.dll";
pub const NT_CLOSE: &str = "NtClose";

type NtCloseFn = unsafe extern "system" fn(handle: *mut c_void) -> i32;

pub struct NtClose {
    entry: ResolvedEntry,
    func: NtCloseFn,
}

impl NtClose {
    pub fn entry(&self) -> ResolvedEntry {
        self.entry
    }

    /// Returns the raw NTSTATUS.
    ///
    /// # Safety
    ///
    /// `handle` must not be a live handle of this process: a live handle would
    /// be closed out from under its owner.
    pub(crate) unsafe fn call(&self, handle: usize) -> u32 {
        // SAFETY: `func` was resolved from ntdll's export table and matches the
        // NtClose ABI; the caller guarantees `handle` is not live.
        unsafe { (self.func)(handle as *mut c_void) as u32 }
    }
}

static RESOLVED: OnceLock<ProbeResult<NtClose>> = OnceLock::new();

pub fn nt_close() -> ProbeResult<&'static NtClose> {
    RESOLVED.get_or_init(resolve).as_ref().map_err(Clone::clone)
}

fn resolve() -> ProbeResult<NtClose> {
    // SAFETY: the library name is a static NUL-terminated string.
    let module = unsafe { LoadLibraryA(s!("ntdll.dll")) }.map_err(|err| {
        ProbeError::LibraryLoad {
            library: NTDLL,
            detail: err.to_string(),
        }
    })?;

    // SAFETY: `module` is a loaded module handle and the name is NUL-terminated.
    let proc = unsafe { GetProcAddress(module, s!("NtClose")) }.ok_or_else(|| {
        ProbeError::SymbolResolve {
            library: NTDLL,
            symbol: NT_CLOSE,
            detail: windows::core::Error::from_win32().to_string(),
        }
    })?;

    let address = NonZeroUsize::new(proc as usize).ok_or_else(|| ProbeError::SymbolResolve {
        library: NTDLL,
        symbol: NT_CLOSE,
        detail: "resolved address is null".to_string(),
    })?;

    // SAFETY: NtClose takes one handle-sized argument and returns NTSTATUS.
    let func =
        unsafe { std::mem::transmute::<unsafe extern "system" fn() -> isize, NtCloseFn>(proc) };

    tracing::debug!(
        library = NTDLL,
        symbol = NT_CLOSE,
        address = %format_args!("{:#x}", address),
        "resolved close entry point"
    );

    Ok(NtClose {
        entry: ResolvedEntry {
            library: NTDLL,
            symbol: NT_CLOSE,
            address,
        },
        func,
    })
}
