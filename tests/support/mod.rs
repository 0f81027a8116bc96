//! Shared helpers for the behaviour suites.
//!
//! `locale` parses step parameters that may be quoted to preserve
//! whitespace.
pub mod locale;
