use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::keyfile::KeyFileError;

/// Conditions that stop the greeter from starting
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Could not load configuration file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not parse configuration file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: KeyFileError,
    },

    #[error("Configuration contains empty key for '{key}'")]
    EmptyHotkey { key: &'static str },

    #[error("Invalid mod-key configuration value: '{value}'")]
    InvalidModKey { value: String },
}
