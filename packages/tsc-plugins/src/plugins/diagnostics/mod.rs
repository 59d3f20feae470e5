//! Plugin Diagnostics
//!
//! Plugin errors and the merge of plugin-reported diagnostics into emit results.

pub mod src {
    pub mod error;
    pub mod merger;
}

pub use src::error::*;
pub use src::merger::*;
