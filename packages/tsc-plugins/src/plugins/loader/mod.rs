//! Transform Module Loader
//!
//! Resolves plugin descriptors to callable transform exports.

pub mod src {
    pub mod loader;
    pub mod module;
}

pub use src::loader::*;
pub use src::module::*;
