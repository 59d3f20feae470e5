//! Patched Compiler
//!
//! The host compiler's entry points with transformer plugins wired in.

pub mod src {
    pub mod compiler;
}

pub use src::compiler::*;
