use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

/// Trait for reading process environment variables to enable testing with mocks
pub trait Environment: Send + Sync {
    /// Get an environment variable, None if unset or not valid UTF-8
    fn get(&self, key: &str) -> Option<String>;
}

/// Real environment implementation backed by std::env
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Mock environment for testing (in-memory, records lookups)
#[allow(dead_code)]
pub struct MockEnvironment {
    vars: RwLock<HashMap<String, String>>,
    lookups: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl MockEnvironment {
    /// Create new empty mock environment
    pub fn new() -> Self {
        Self {
            vars: RwLock::new(HashMap::new()),
            lookups: Mutex::new(Vec::new()),
        }
    }

    /// Set a variable, builder-style
    pub fn with_var(self, key: &str, value: &str) -> Self {
        self.vars
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        self
    }

    /// Set a variable on an existing mock
    pub fn set(&self, key: &str, value: &str) {
        self.vars
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    /// Keys that were looked up, in order
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

impl Default for MockEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for MockEnvironment {
    fn get(&self, key: &str) -> Option<String> {
        self.lookups.lock().unwrap().push(key.to_string());
        self.vars.read().unwrap().get(key).cloned()
    }
}
