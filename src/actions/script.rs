use crate::error::ActionError;
use ahash::AHashMap;
use itertools::Itertools;
use serde_json::Value;
use std::fmt;

/// A host-supplied function that `runScript` actions may call by name.
pub type ScriptFn = Box<dyn Fn(&[Value]) -> Result<(), String> + Send + Sync>;

/// Name to function table for `runScript` actions.
///
/// Scripts are never built from text; an action can only reach functions the host
/// registered up front.
#[derive(Default)]
pub struct ScriptRegistry {
    scripts: AHashMap<String, ScriptFn>,
}

impl ScriptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `script` under `name`, replacing any earlier registration.
    pub fn register<F>(&mut self, name: impl Into<String>, script: F)
    where
        F: Fn(&[Value]) -> Result<(), String> + Send + Sync + 'static,
    {
        self.scripts.insert(name.into(), Box::new(script));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.scripts.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scripts.keys().map(String::as_str).sorted()
    }

    /// Calls the script registered under `name` with already-resolved arguments.
    pub fn invoke(&self, name: &str, arguments: &[Value]) -> Result<(), ActionError> {
        let script = self
            .scripts
            .get(name)
            .ok_or_else(|| ActionError::UnregisteredScript(name.to_string()))?;
        script(arguments).map_err(|message| ActionError::ScriptFailed {
            name: name.to_string(),
            message,
        })
    }
}

impl fmt::Debug for ScriptRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptRegistry")
            .field("scripts", &self.names().collect::<Vec<_>>())
            .finish()
    }
}
