pub mod clock;
pub mod environment;
pub mod filesystem;
pub mod output;

pub use clock::{Clock, SystemClock};
pub use environment::{Environment, ProcessEnvironment};
pub use filesystem::{FileSystem, RealFileSystem};
pub use output::{Output, TerminalOutput};

#[cfg(test)]
pub use clock::MockClock;
#[cfg(test)]
pub use environment::MockEnvironment;
#[cfg(test)]
pub use filesystem::MockFileSystem;
#[cfg(test)]
pub use output::MockOutput;
