//! # Glossa
//!
//! Localization catalogs, plural-aware message resolution and
//! translation file loading.
//!
//! Glossa resolves message keys against per-language catalogs: plural
//! branches are selected by CLDR-style form tokens (`one`, `other`,
//! `=3`, `>10`, ...), `${Name}` variables carry their own per-form
//! cases, templated messages run against structured data, and language
//! negotiation follows BCP-47 matching with graded confidence.
//!
//! ## Feature Flags
//!
//! - `loader` (default) - translation file discovery and parsing via
//!   [`loader`] (`glossa-loader`): glob patterns, embedded assets and
//!   in-memory documents, with JSON/YAML/TOML/INI support
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use glossa::I18n;
//! use glossa::loader::Glob;
//!
//! // ./locales/en-US/home.yml, ./locales/el-GR/home.yml, ...
//! let i18n = I18n::new(&Glob::default(), &["en-US", "el-GR"]).unwrap();
//!
//! println!("{}", i18n.tr("el", "home.title", &[]));
//! println!("{}", i18n.tr("en-GB", "cart.items", &[3.into()]));
//! ```

pub use glossa_core::*;

#[cfg(feature = "loader")]
pub use glossa_loader as loader;
