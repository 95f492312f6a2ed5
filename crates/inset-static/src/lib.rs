//! Static site generator for annotated script portfolios.
//!
//! Builds one page per `scripts/<id>/config.json` with the screenshot
//! overlay baked in, plus an index page listing every script.

pub mod assets;
pub mod builder;
pub mod store;
pub mod templates;

pub use builder::{BuildConfig, BuildError, BuildResult, SiteBuilder};
pub use store::{FsDocumentStore, FsImageProbe};
