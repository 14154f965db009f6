//! Diagnostic system for the interop preparation pass.
//!
//! Every user-facing problem is a [`Diagnostic`]:
//! - An error code for searchability
//! - A message (what went wrong)
//! - A primary span (where it went wrong)
//! - Optional notes (how to fix it)
//!
//! # Error Guarantees
//!
//! [`ErrorGuaranteed`] is type-level proof that at least one error was
//! reported. The only way to obtain one is through [`DiagnosticSink::error`]
//! or by asking a sink that already holds errors.
//!
//! ```text
//! let guarantee = sink.error(span, ErrorCode::E7002, "Anonymous classes may not extend js.Any");
//! ```

mod diagnostic;
mod error_code;
mod guarantee;
pub mod sink;
pub mod span_utils;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
pub use guarantee::ErrorGuaranteed;
pub use sink::DiagnosticSink;
