//! Plugin Configuration
//!
//! Turns compiler-option plugin entries into [`PluginDescriptor`]s.

pub mod src {
    pub mod descriptor;
    pub mod normalizer;
}

pub use src::descriptor::*;
pub use src::normalizer::*;

#[cfg(test)]
mod test;
