//! Binary-side operations.
//!
//! - [`fetch`]: Load one merge request through the configured gateway
//! - [`output`]: JSON rendering of reports and errors

pub mod fetch;
pub mod output;
