//! Diagnostics recorded while parsing Tern sources.
//!
//! Syntax errors never abort a parse: the parser emits a [`Diagnostic`] into
//! a [`DiagnosticSink`] and keeps building a best-effort tree. The collected
//! diagnostics travel with the cached parse result and are rendered against
//! whatever [`PositionSpace`](tern_source::PositionSpace) the file is later
//! handed out in.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod label;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use label::{Label, LabelStyle};
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
