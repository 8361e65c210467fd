//! Base types and error handling.
//!
//! - [`NetError`]: error codes for the rewriting layer, numbered after
//!   Chromium's `net_error_list.h` where a matching code exists
//! - [`UrlResultExt`]: attaches the offending URL text to parse failures

pub mod context;
pub mod neterror;

pub use context::UrlResultExt;
pub use neterror::NetError;
