//! High-level operations.
//!
//! This module contains the implementation of clit commands.

pub mod clit_build;

pub use clit_build::{compile, compile_and_run, Compilation};
