//! Configuration for FlightPanel.
//!
//! Read once at startup and treated as immutable afterwards: components
//! receive the settings they need at construction instead of consulting
//! global state. The INI file holds tunables; the JSON credentials file
//! holds provider secrets; both are fatal to get wrong.

mod credentials;
mod defaults;
mod file;
mod parser;
mod settings;

pub use credentials::{Credentials, CredentialsError};
pub use defaults::*;
pub use file::{config_directory, config_file_path, credentials_file_path, ConfigFileError};
pub use settings::{
    BudgetSettings, ConfigFile, DataSettings, DisplaySettings, FlightSettings, PollSettings,
    ProviderSettings, WindowSettings,
};
