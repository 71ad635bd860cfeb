//! Core business logic - framework-agnostic validation, summaries, exports
//! and report layout used by the shell.

/// Chart descriptions and renderers
pub mod charts;
/// Page-drawing seam and the text document backend
pub mod document;
/// Delimited export of every stored expense
pub mod export;
/// Printable report layout
pub mod report;
/// Totals and groupings over a view
pub mod summary;
/// Validation of user-entered expenses
pub mod validation;
