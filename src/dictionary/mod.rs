//! Dictionary editing module
//!
//! Key-based reading and in-place patching of the plain-text dictionaries
//! (`fvOptions`, `controlDict`, `blockMeshDict`, ...) that configure the
//! external solver toolchain.

mod editor;

pub use editor::*;
