use std::collections::HashMap;

use crate::value::Value;

/// Variables of a program run.  There is a single, flat scope.
#[derive(Debug, Default, Clone)]
pub struct Env {
    bindings: HashMap<String, Value>,
}

impl Env {
    pub fn new() -> Env {
        Env::default()
    }

    /// Insert or overwrite a binding.  Returns the previous value if any.
    pub fn set(&mut self, name: &str, val: Value) -> Option<Value> {
        self.bindings.insert(name.to_owned(), val)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Bindings sorted by name.
    pub fn sorted(&self) -> Vec<(&str, &Value)> {
        let mut vars = self
            .bindings
            .iter()
            .map(|(name, val)| (name.as_str(), val))
            .collect::<Vec<_>>();
        vars.sort_by(|(l, _), (r, _)| l.cmp(r));
        vars
    }
}
