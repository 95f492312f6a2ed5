//! Headless editor for hotspot overlay documents.
//!
//! [`BuilderSession`] holds the editing state for one screenshot. The host
//! forwards pointer and form events in display pixels and renders the
//! previews it exposes.

pub mod debounce;
pub mod error;
pub mod form;
pub mod hit_test;
pub mod session;

pub use debounce::{Debouncer, InputCategory};
pub use error::SessionError;
pub use form::{Field, FormInput};
pub use hit_test::{Hit, HitPart, HitTestRegistry};
pub use session::{BuilderSession, ImageState, Mode, Preview, RenderStats};
