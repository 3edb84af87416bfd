use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
#[cfg(feature = "clap")]
pub mod cli;
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
#[cfg(feature = "clap")]
pub use cli::AnalyticsOverrides;
pub use settings::{CleaningConfig, Config, DataConfig, LoggingConfig, SourceKind};

/// The file read by `load_config`, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Prefix of the environment variables that override the file,
/// e.g. `QUANTDASH__ANALYTICS__RISK_FREE_RATE=0.02`.
pub const ENV_PREFIX: &str = "QUANTDASH";

/// Loads the application configuration from the `config.toml` file.
///
/// This function is the primary entry point for this crate. The file is
/// optional; environment variables are layered on top, and the result is
/// validated before it is returned.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(Path::new(DEFAULT_CONFIG_FILE))
}

/// Same as `load_config`, reading `path` instead of `config.toml`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        // A missing file simply means "use the defaults".
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(path = %path.display(), ?config, "Loaded configuration");
    Ok(config)
}
