pub mod command;
pub mod config;
pub mod driver;
pub mod store;
pub mod terminal;

pub use command::{Command, ParseCommandError};
pub use config::{Config, ConfigError, ValidatedConfig};
pub use driver::{play, simulate, Summary};
pub use store::FileStore;
pub use terminal::Terminal;
