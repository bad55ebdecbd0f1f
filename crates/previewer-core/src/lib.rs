#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]

//! Multi-file component compiler.
//!
//! Turns an ordered list of component source files into one self-contained
//! HTML preview document: the files are bundled into a single script with
//! the framework runtime read from globals, and a utility stylesheet is
//! generated from the class names the bundle mentions.

pub mod bundler;
pub mod codes;
pub mod compiler;
pub mod config;
pub mod css;
pub mod document;
pub mod entry;
pub mod error;
pub mod files;
pub mod pipeline;
pub mod resolver;
pub mod text;
pub mod toolchain;
pub mod vfs;

pub use bundler::{Bundle, BundleOptions, Bundler};
pub use compiler::{CompilerBackend, EsTarget, SwcBackend};
pub use config::{PreviewConfig, StyleOptions};
pub use css::{StyleGenerator, StyleSheet, Theme};
pub use document::assemble_document;
pub use entry::{synthesize_entry, EntryModule};
pub use error::{Error, Result};
pub use files::{fingerprint, parse_component_files, parse_component_files_str, ComponentFile};
pub use pipeline::{compile_preview, Compiler, PreviewDocument};
pub use resolver::{ModuleResolver, ModuleSpecifier};
pub use toolchain::{Toolchain, ToolchainCell};
pub use vfs::VirtualFileSystem;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
