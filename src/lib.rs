//! # Yoshiki - Dynamic Case-Management Form Engine
//!
//! **Yoshiki** renders case-management forms from the JSON layout documents a
//! case-management API returns, and translates user edits back into the nested
//! document shape that API accepts.
//!
//! ## Core Workflow
//!
//! 1.  **Load a View**: Parse a view or page document into the [`model`] types.
//! 2.  **Seed the Edit State**: The flat edit state (`reference -> value`) is extracted
//!     from the server-echoed field values.
//! 3.  **Render**: The [`interpreter::LayoutInterpreter`] walks the view and produces a
//!     [`interpreter::RenderNode`] tree. Each field carries the handler composed from its
//!     declarative actions by the [`actions::ActionResolver`].
//! 4.  **Edit and Submit**: A [`controller::FormController`] owns the edit state, runs
//!     handlers and performs refresh, submit and save round trips through a
//!     [`controller::CaseTransport`]. The [`reference::ReferenceTranslator`] converts the
//!     flat state into the nested submission document.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use yoshiki::prelude::*;
//! use ahash::AHashSet;
//! use std::result::Result;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let view = View::from_json(&std::fs::read_to_string("path/to/view.json")?)?;
//!
//!     let interpreter = LayoutInterpreter::builder()
//!         .with_config(FormConfig::default())
//!         .build();
//!
//!     // Seed the edit state and render the form.
//!     let mut values = interpreter.initial_values(&view);
//!     let errors = ValidationErrors::new();
//!     let loading = AHashSet::new();
//!     let ctx = RenderContext::new(&values, &errors, &loading);
//!
//!     if let Some(tree) = interpreter.render(&view, &ctx) {
//!         println!("{}", DisplayNode::new(&tree));
//!     }
//!
//!     // Edit a value inside a PageGroup and build the submission document.
//!     values.insert("Accounts(Primary).Balance".to_string(), serde_json::json!(100));
//!     let translator = ReferenceTranslator::default();
//!     let document = translator.to_nested_document(&values)?;
//!     println!("{}", serde_json::to_string_pretty(&document)?);
//!
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod config;
pub mod controller;
pub mod error;
pub mod interpreter;
pub mod model;
pub mod prelude;
pub mod reference;
