//! Program Transforms
//!
//! Applies whole-program plugins exactly once per Program lineage.

pub mod src {
    pub mod applier;
    pub mod context;
    pub mod record;
}

pub use src::applier::*;
pub use src::context::*;
pub use src::record::*;
