pub mod cli;
pub mod config;

pub use cli::{build_cli_command, Cli, Commands, DataFormat, SchemaKind};
pub use config::{load_config, NetflowConfig};
