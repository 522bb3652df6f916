//! Helpers for `build.rs` scripts of the cube binaries.
//! These print cargo directives and report problems as `cargo:warning` lines.

pub mod build_hacks;
pub mod resource_bundle;
pub mod shader_compilation;
pub mod tools;
