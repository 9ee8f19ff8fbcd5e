//! # Glossa Loader
//!
//! Translation file discovery and format parsing for the Glossa engine.
//!
//! This crate turns translation sources into a loaded catalog: it
//! discovers files, determines each file's language from its path,
//! parses file contents by extension and feeds the resulting documents
//! into `glossa-core`.
//!
//! ## Loaders
//!
//! - [`Glob`]: files on disk matched by a glob pattern (the usual
//!   `./locales/*/*` layout)
//! - [`Assets`]: a virtual file list plus a reader function, for
//!   embedded assets
//! - [`Kv`]: already-parsed documents keyed by language code
//!
//! ## Formats
//!
//! `.json`, `.yml`/`.yaml`, `.toml`/`.tml` and `.ini` out of the box;
//! custom extensions register on [`FormatTable`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use glossa_core::I18n;
//! use glossa_loader::Glob;
//!
//! let loader = Glob::new("./locales/*/*");
//! let i18n = I18n::new(&loader, &["en-US", "el-GR"]).unwrap();
//! assert_eq!(i18n.tr("en", "hi", &[]), "hello");
//! ```

pub mod formats;
pub mod loader;

pub use formats::{FormatTable, ParseFn};
pub use loader::{Assets, DEFAULT_GLOB_PATTERN, Glob, Kv};
