//! Markdown rendering for hotspot descriptions.
//!
//! Descriptions are GitHub-flavored markdown. Raw HTML in the source is
//! escaped rather than passed through.

pub mod cache;
pub mod render;

pub use cache::MarkdownCache;
pub use render::render_markdown;
