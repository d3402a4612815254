//! Utility functions and helpers.
//!
//! - [`paths`]: Lexical path resolution for link text and arguments
//! - [`permissions`]: Execute-bit checks and permission preserving copies

/// Path manipulation and resolution utilities
pub mod paths;
/// Unix permission handling
pub mod permissions;
