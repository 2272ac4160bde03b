//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the yoshiki crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use yoshiki::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let view = View::from_json(&std::fs::read_to_string("path/to/view.json")?)?;
//! let values = extract_initial_values(&view);
//! let document = ReferenceTranslator::default().to_nested_document(&values)?;
//! println!("{}", document);
//! # Ok(())
//! # }
//! ```

// Layout model
pub use crate::model::{Field, Group, Layout, RepeatKind, ValidationErrors, View};

// Path translation
pub use crate::reference::{EditState, ReferenceTranslator, extract_initial_values, flatten_document};

// Actions and rendering
pub use crate::actions::{ActionResolver, ComposedHandler, HandlerStep, ScriptRegistry};
pub use crate::interpreter::{DisplayNode, LayoutInterpreter, RenderContext, RenderNode};

// Form controller
pub use crate::controller::{
    CaseTransport, FieldInput, FormController, FormSource, HostEnvironment, Notification,
    RefreshOutcome, RepeatOperation, SessionContext, SubmitOutcome,
};

// Configuration and errors
pub use crate::config::FormConfig;
pub use crate::error::{ActionError, FormError, ReferenceError, TransportError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
