//! Config module.
//! Provides copy options, logging settings, the optional XML config file, and validation.

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{ConfigLocation, config_location, default_config_path, path_has_symlink_ancestor};
pub use types::{Config, LogLevel, Options};
pub use validate::validate_buffer_size;
pub use xml::{FileConfig, load_config, load_config_from_xml_path};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "ZCP_CONFIG";

/// Default copy chunk size: 1 MiB.
pub const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024;
