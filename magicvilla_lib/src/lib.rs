//! Library layer for MagicVilla: the SQLite villa repository, the
//! `/api/villa` HTTP server, and the typed villa service that calls it.

pub mod config;
pub mod db;
pub mod error;
pub mod patch;
pub mod server;
pub mod service;

pub use magicvilla_api;
pub use magicvilla_api::types;
pub use magicvilla_api::{ApiRequest, ApiType, Client, ContentType};

pub use config::Config;
pub use db::{Db, DbError, Villa, VillaFilter};
pub use error::VillaError;
pub use patch::{apply_patch, PatchError};
pub use server::{build_app, serve, serve_on, AppState};
pub use service::VillaService;
