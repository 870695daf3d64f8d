pub mod config;
pub mod connection;
pub mod helpers;
pub mod migrate;
pub mod quality;
pub mod secrets;
pub mod services;
pub mod status;

pub use config::ConfigCommand;
pub use connection::ConnectionStringCommand;
pub use migrate::MigrateCommand;
pub use quality::QualityCommand;
pub use secrets::SecretsCommand;
pub use services::ServicesCommand;
pub use status::StatusCommand;
