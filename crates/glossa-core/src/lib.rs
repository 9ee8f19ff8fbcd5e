//! # Glossa Core
//!
//! Localization catalog and message-resolution engine.
//!
//! This crate holds the language-independent half of Glossa: plural
//! forms, variables, message and template rendering, locales, the
//! BCP-47 language matcher and the catalog. File discovery and format
//! parsing live in `glossa-loader`.
//!
//! ## Features
//!
//! - **Pluralization**: CLDR-style keywords (`zero`/`one`/`two`/`other`)
//!   plus numeric comparison rules (`=N`, `<N`, `>N`)
//! - **Variables**: `${Name}` placeholders with per-plural-form cases
//! - **Templates**: delimiter-based message bodies with field access and
//!   user functions
//! - **Language matching**: graded BCP-47 matching with optional
//!   auto-discovery of unregistered languages
//! - **Fallback policy**: per-key fallback to the default locale, with
//!   an optional strict mode and a programmable miss hook
//!
//! ## Quick Start
//!
//! ```rust
//! use glossa_core::{Catalog, I18n, LoaderConfig, Localizer, Matcher, doc};
//! use glossa_core::error::Error;
//!
//! let loader = |matcher: &mut Matcher| -> Result<Box<dyn Localizer>, Error> {
//! 	let mut catalog = Catalog::new(matcher.languages(), &LoaderConfig::default());
//! 	catalog.store(0, doc([("hello", "Hello, %s!")]))?;
//! 	Ok(Box::new(catalog))
//! };
//!
//! let i18n = I18n::new(&loader, &["en-US"]).unwrap();
//! assert_eq!(i18n.tr("en", "hello", &["world".into()]), "Hello, world!");
//! ```
//!
//! ## Module Organization
//!
//! - [`plural`]: plural form tokens, ordering and count matching
//! - [`variable`]: `${Name}` declarations and argument positions
//! - [`message`]: plain and pluralized message rendering
//! - [`template`]: the delimiter-based template engine
//! - [`locale`]: per-language message sets and document flattening
//! - [`matcher`]: BCP-47 language tags and matching
//! - [`catalog`]: the locale container and shared message table
//! - [`i18n`]: the engine front with lookup and fallback policy

pub mod catalog;
pub mod document;
pub mod error;
pub mod fmt;
pub mod i18n;
pub mod locale;
pub mod matcher;
pub mod message;
pub mod options;
pub mod plural;
pub mod template;
pub mod value;
pub mod variable;

pub use catalog::{Catalog, Localizer};
pub use document::{DocValue, Document, doc};
pub use error::{Error, RenderError, TemplateError};
pub use i18n::{I18n, Loader, MessageFn};
pub use locale::{Locale, Renderer, SelectorMessage, TableEntry};
pub use matcher::{Confidence, LanguageTag, Matcher, parse_accept_language, parse_language};
pub use message::{Message, MessageLookup};
pub use options::{FuncMap, LoaderConfig, TemplateFunc};
pub use plural::PluralForm;
pub use template::Template;
pub use value::{PluralCounter, Value, ValueMap, value_map};
pub use variable::Var;
