#[macro_use]
extern crate rocket;

#[cfg(test)]
#[macro_use]
extern crate backend_test;

use rocket::{Build, Rocket};

use config::{Config, ConfigFairing, StorageFairing};
use logging::LoggerFairing;
use model::storage::Store;

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod model;

/// Assemble the server: configuration, storage, logging and routes.
pub fn build() -> Rocket<Build> {
    rocket::build()
        .attach(ConfigFairing)
        .attach(StorageFairing)
        .attach(LoggerFairing)
        .mount("/", api::routes())
}

/// A server over an existing store, skipping storage configuration.
pub fn rocket_for_store(store: Store, config: Config) -> Rocket<Build> {
    rocket::build()
        .manage(store)
        .manage(config)
        .attach(LoggerFairing)
        .mount("/", api::routes())
}
