//! mibsim-std: Filesystem loader and shared-registry plumbing
//!
//! This crate holds everything that touches the host environment: directory
//! scanning and per-file compilation into a [`mibsim_core::registry::Registry`],
//! the swap-on-reload shared handle, and override-file IO.

pub mod loader;
pub mod overrides;
pub mod shared;

pub use mibsim_core;
