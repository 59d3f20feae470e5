//! Transformer Merger

pub mod src {
    pub mod merger;
}

pub use src::merger::*;
