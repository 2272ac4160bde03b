//! Composition of declarative field actions into executable handlers.
//!
//! [`ActionResolver`] turns a field's `actionSets` into a [`ComposedHandler`]; the form
//! controller runs the handler's steps against its own state. `runScript` actions can
//! only reach functions registered in a [`ScriptRegistry`].

mod property;
mod resolver;
mod script;

pub use property::{resolve_property, resolve_text, value_to_text};
pub use resolver::{ActionResolver, ComposedHandler, HandlerStep};
pub use script::{ScriptFn, ScriptRegistry};
