use serde::Deserialize;

use crate::selection::DEFAULT_KEY;

/// Top-level configuration settings for the application.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
}

/// Where the selection is kept.
///
/// `path` is the sled database directory, `key` the entry holding the JSON array.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    pub path: String,
    pub key: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Missing values are filled from `Settings::default()`.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub storage: Option<PartialStorageSettings>,
    pub logging: Option<PartialLoggingSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialStorageSettings {
    pub path: Option<String>,
    pub key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLoggingSettings {
    pub level: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage: StorageSettings {
                path: "wishlist_db".to_string(),
                key: DEFAULT_KEY.to_string(),
            },
            logging: LoggingSettings {
                level: "info".to_string(),
            },
        }
    }
}

impl PartialSettings {
    /// Overlay the values that were provided on top of the defaults.
    pub fn merge_with_defaults(self) -> Settings {
        let default = Settings::default();
        let storage = self.storage;
        let logging = self.logging;

        Settings {
            storage: StorageSettings {
                path: storage
                    .as_ref()
                    .and_then(|s| s.path.clone())
                    .unwrap_or(default.storage.path),
                key: storage
                    .as_ref()
                    .and_then(|s| s.key.clone())
                    .unwrap_or(default.storage.key),
            },
            logging: LoggingSettings {
                level: logging
                    .and_then(|l| l.level)
                    .unwrap_or(default.logging.level),
            },
        }
    }
}
