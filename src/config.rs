use rocket::{
    fairing::{Fairing, Info, Kind},
    Build, Rocket,
};
use serde::Deserialize;

use crate::model::storage::{MongoBackend, Store};

/// Application configuration, derived from `Rocket.toml` and `ROCKET_*`
/// environment variables. This struct becomes managed state and can be
/// inspected by any endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    hostname: String,
}

impl Config {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
        }
    }

    /// The public address of the site, used to build voting links.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// The link members follow to vote in a commission.
    pub fn commission_link(&self, link_code: &str) -> String {
        format!("{}/vote/commission/{link_code}", self.base())
    }

    /// The link members follow to answer a survey.
    pub fn survey_link(&self, link_code: &str) -> String {
        format!("{}/vote/survey/{link_code}", self.base())
    }

    fn base(&self) -> &str {
        self.hostname.trim_end_matches('/')
    }
}

/// A fairing that loads the application config and puts it in managed state.
pub struct ConfigFairing;

#[rocket::async_trait]
impl Fairing for ConfigFairing {
    fn info(&self) -> Info {
        Info {
            name: "Config",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<Config>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load application config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };

        // Manage the state.
        rocket = rocket.manage(config);
        Ok(rocket)
    }
}

/// Which storage backend to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Memory,
    Mongodb,
}

/// Configuration for storage.
#[derive(Debug, Deserialize)]
struct StorageConfig {
    storage: StorageKind,
    // secrets
    db_uri: Option<String>,
    db_name: Option<String>,
}

/// A fairing that loads the storage config, builds the configured backend,
/// performs any setup necessary, and places a `Store` into managed state.
pub struct StorageFairing;

#[rocket::async_trait]
impl Fairing for StorageFairing {
    fn info(&self) -> Info {
        Info {
            name: "Storage",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<StorageConfig>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load storage config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };

        let store = match config.storage {
            StorageKind::Memory => {
                warn!("Using in-memory storage, nothing will survive a restart");
                Store::memory()
            }
            StorageKind::Mongodb => {
                let (Some(db_uri), Some(db_name)) = (config.db_uri, config.db_name) else {
                    error!("`db_uri` and `db_name` are required for MongoDB storage");
                    return Err(rocket);
                };
                info!("Loaded database config, connecting...");
                let backend = match MongoBackend::connect(&db_uri, &db_name).await {
                    Ok(backend) => backend,
                    Err(e) => {
                        error!("Failed to connect to database: {e}");
                        return Err(rocket);
                    }
                };

                // Ensure the required indexes exist.
                if let Err(e) = backend.ensure_indexes().await {
                    error!("Failed to prepare database: {e}");
                    return Err(rocket);
                }
                info!("...database connection online!");
                Store::new(backend)
            }
        };

        // Manage the state.
        Ok(rocket.manage(store))
    }
}
