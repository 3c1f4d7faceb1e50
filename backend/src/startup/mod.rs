//! Startup wiring: settings and catalogue seeding.

mod catalogue;
mod config;

pub use catalogue::{CatalogueStartupError, load_catalogue, seed_catalogue_on_startup};
pub use config::{AppSettings, SettingsError};
