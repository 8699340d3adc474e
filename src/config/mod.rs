mod settings;

use config::{Config, ConfigError, Environment, File};

use settings::PartialSettings;

pub use settings::{LoggingSettings, Settings, StorageSettings};

/// Environment variable prefix, e.g. `WISHLIST_STORAGE_PATH`.
pub const ENV_PREFIX: &str = "WISHLIST";

/// Loads the configuration from `config/default` and the environment.
pub fn load_config() -> Result<Settings, ConfigError> {
    load_config_from("config/default")
}

/// Loads the configuration from the file at `base` (extension optional, file
/// optional) overlaid with `WISHLIST_*` environment variables, then fills in
/// defaults for anything still missing.
pub fn load_config_from(base: &str) -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name(base).required(false))
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("_"));

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;

    Ok(partial.merge_with_defaults())
}
