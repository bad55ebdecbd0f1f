#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Shared utilities for previewer.
//!
//! This crate provides pure helper functions with no logging/tracing dependencies.

pub mod hash;

pub use hash::{blake3_bytes, ContentHasher};
