use crate::traits::{
    Clock, Environment, FileSystem, Output, ProcessEnvironment, RealFileSystem, SystemClock,
    TerminalOutput,
};
#[cfg(test)]
use crate::traits::{MockClock, MockEnvironment, MockFileSystem, MockOutput};
use std::sync::Arc;

/// Application context that holds all dependencies for dependency injection
pub struct Context {
    pub fs: Arc<dyn FileSystem>,
    pub env: Arc<dyn Environment>,
    pub output: Arc<dyn Output>,
    pub clock: Arc<dyn Clock>,
}

impl Context {
    /// Create a new context with real implementations (for production use)
    pub fn new() -> Self {
        Self {
            fs: Arc::new(RealFileSystem),
            env: Arc::new(ProcessEnvironment),
            output: Arc::new(TerminalOutput),
            clock: Arc::new(SystemClock),
        }
    }

    /// Create a new context with mock implementations (for testing)
    #[cfg(test)]
    #[allow(dead_code)]
    pub fn test() -> Self {
        Self {
            fs: Arc::new(MockFileSystem::new()),
            env: Arc::new(MockEnvironment::new()),
            output: Arc::new(MockOutput::new()),
            clock: Arc::new(MockClock::new()),
        }
    }

    /// Create a test context with specific mock implementations
    #[cfg(test)]
    #[allow(dead_code)]
    pub fn test_with(
        fs: Arc<dyn FileSystem>,
        env: Arc<dyn Environment>,
        output: Arc<dyn Output>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            fs,
            env,
            output,
            clock,
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Context {
    fn clone(&self) -> Self {
        Self {
            fs: Arc::clone(&self.fs),
            env: Arc::clone(&self.env),
            output: Arc::clone(&self.output),
            clock: Arc::clone(&self.clock),
        }
    }
}
