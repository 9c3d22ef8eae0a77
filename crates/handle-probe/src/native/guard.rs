//! Guarded native calls.
//!
//! Rust has no `__try`/`__except`, so the interception scope is a vectored
//! exception handler installed for the duration of one call. The handler only
//! claims faults raised on the thread that armed it, and only the handle
//! status codes `NtClose` raises. Those are raised from
//! `KiRaiseUserExceptionDispatcher` and are continuable: resuming execution
//! returns the status to the caller as an ordinary NTSTATUS.

use std::cell::Cell;
use std::ffi::c_void;

use windows::Win32::System::Diagnostics::Debug::{
    AddVectoredExceptionHandler, RemoveVectoredExceptionHandler, EXCEPTION_POINTERS,
};

use super::{STATUS_HANDLE_NOT_CLOSABLE, STATUS_INVALID_HANDLE};
use crate::backend::CallObservation;
use crate::errors::{ProbeError, ProbeResult};

const EXCEPTION_CONTINUE_EXECUTION: i32 = -1;
const EXCEPTION_CONTINUE_SEARCH: i32 = 0;

const INTERCEPTED_CODES: [u32; 2] = [STATUS_INVALID_HANDLE, STATUS_HANDLE_NOT_CLOSABLE];

thread_local! {
    static ARMED: Cell<bool> = const { Cell::new(false) };
    static CAUGHT: Cell<Option<u32>> = const { Cell::new(None) };
}

/// Runs `call` with handle faults intercepted on the current thread.
///
/// `call` returns the NTSTATUS of the native call. A fault observed during
/// the call wins over the returned status.
pub fn intercept<F>(call: F) -> ProbeResult<CallObservation>
where
    F: FnOnce() -> u32,
{
    let _registration = HandlerRegistration::install()?;
    let scope = ArmedScope::arm();
    let status = call();
    let caught = scope.disarm();

    Ok(match caught {
        Some(exception_code) => CallObservation::Faulted { exception_code },
        None => CallObservation::Returned { status },
    })
}

struct HandlerRegistration {
    handle: *mut c_void,
}

impl HandlerRegistration {
    fn install() -> ProbeResult<Self> {
        // SAFETY: `on_exception` is a plain function with the handler ABI and
        // stays valid for the life of the process.
        let handle = unsafe { AddVectoredExceptionHandler(1, Some(on_exception)) };
        if handle.is_null() {
            return Err(ProbeError::InterceptionUnavailable {
                detail: "AddVectoredExceptionHandler returned null".to_string(),
            });
        }
        Ok(Self { handle })
    }
}

impl Drop for HandlerRegistration {
    fn drop(&mut self) {
        // SAFETY: `handle` came from AddVectoredExceptionHandler and is removed once.
        let removed = unsafe { RemoveVectoredExceptionHandler(self.handle) };
        if removed == 0 {
            tracing::warn!("failed to remove vectored exception handler");
        }
    }
}

struct ArmedScope;

impl ArmedScope {
    fn arm() -> Self {
        CAUGHT.with(|caught| caught.set(None));
        ARMED.with(|armed| armed.set(true));
        Self
    }

    fn disarm(self) -> Option<u32> {
        ARMED.with(|armed| armed.set(false));
        CAUGHT.with(|caught| caught.take())
    }
}

impl Drop for ArmedScope {
    fn drop(&mut self) {
        ARMED.with(|armed| armed.set(false));
    }
}

unsafe extern "system" fn on_exception(info: *mut EXCEPTION_POINTERS) -> i32 {
    // Never panic across the FFI boundary: a torn-down TLS slot means unarmed.
    if !ARMED.try_with(Cell::get).unwrap_or(false) {
        return EXCEPTION_CONTINUE_SEARCH;
    }
    if info.is_null() {
        return EXCEPTION_CONTINUE_SEARCH;
    }

    // SAFETY: the dispatcher hands us valid exception pointers for this fault.
    let record = unsafe { (*info).ExceptionRecord };
    if record.is_null() {
        return EXCEPTION_CONTINUE_SEARCH;
    }
    // SAFETY: checked non-null above.
    let code = unsafe { (*record).ExceptionCode.0 as u32 };
    if !INTERCEPTED_CODES.contains(&code) {
        return EXCEPTION_CONTINUE_SEARCH;
    }

    let _ = CAUGHT.try_with(|caught| caught.set(Some(code)));
    EXCEPTION_CONTINUE_EXECUTION
}
