//! Windows native layer: `ntdll` resolution and the guarded call scope.

pub mod guard;
pub mod ntdll;

pub const STATUS_INVALID_HANDLE: u32 = 0xC000_0008;
pub const STATUS_HANDLE_NOT_CLOSABLE: u32 = 0xC000_0235;
