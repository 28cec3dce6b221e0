pub mod config;
pub mod menu;
pub mod shell;

pub use config::Config;
pub use shell::Shell;
