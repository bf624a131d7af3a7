//! Live parameters supplied by the enclosing scene.
//!
//! Rules and effects never read global state. Once per generation they are
//! handed an [`EvalContext`] and pull the handful of values they need
//! (slider positions, elapsed time) by name. Missing names fall back to the
//! caller's default.

use serde_json::Value;

/// Read-only view of the scene's live parameters.
pub trait EvalContext {
    /// Current value of a named parameter, if the scene defines it.
    fn param(&self, name: &str) -> Option<f64>;

    /// Seconds of scene time.
    fn time(&self) -> f64 {
        0.0
    }

    /// Named parameter or `default`.
    fn param_or(&self, name: &str, default: f64) -> f64 {
        self.param(name).unwrap_or(default)
    }

    /// Named parameter read as a flag: non-zero is true.
    fn flag_or(&self, name: &str, default: bool) -> bool {
        self.param(name).map_or(default, |v| v != 0.0)
    }
}

/// A context with no parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullContext;

impl EvalContext for NullContext {
    fn param(&self, _name: &str) -> Option<f64> {
        None
    }
}

/// Parameters held in a JSON object.
///
/// Numbers are read as-is and booleans as `0.0`/`1.0`; any other JSON type
/// counts as missing.
#[derive(Debug, Clone, Default)]
pub struct JsonContext {
    values: Value,
    time: f64,
}

impl JsonContext {
    pub fn new(values: Value) -> Self {
        Self { values, time: 0.0 }
    }

    pub fn with_time(mut self, time: f64) -> Self {
        self.time = time;
        self
    }

    pub fn set_time(&mut self, time: f64) {
        self.time = time;
    }

    /// Sets (or adds) a numeric parameter. A non-object backing value is
    /// replaced by an empty object first.
    pub fn set(&mut self, name: &str, value: f64) {
        if !self.values.is_object() {
            self.values = Value::Object(serde_json::Map::new());
        }
        if let Some(map) = self.values.as_object_mut() {
            map.insert(name.to_owned(), Value::from(value));
        }
    }

    pub fn values(&self) -> &Value {
        &self.values
    }
}

impl EvalContext for JsonContext {
    fn param(&self, name: &str) -> Option<f64> {
        match self.values.get(name)? {
            Value::Number(n) => n.as_f64(),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    fn time(&self) -> f64 {
        self.time
    }
}
