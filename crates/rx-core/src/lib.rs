//! rx-core: shared foundation for reactorflow.
//!
//! Contains:
//! - numeric (Real, range checks and saturating float helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;

pub use error::{CoreError, CoreResult};
pub use numeric::*;
