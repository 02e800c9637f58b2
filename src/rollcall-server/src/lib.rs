//! rollcall - person search over a fixed dataset
//!
//! This crate provides both a library and binary for running the rollcall server.
//!
//! # Embedded Usage
//!
//! ```rust,no_run
//! use actix_web::{web, App, HttpServer};
//! use rollcall_core::{Config, RecordStore};
//! use rollcall_server::api::{self, AppState};
//! use std::sync::Arc;
//!
//! #[actix_web::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = RecordStore::load("./dataset.json")?;
//!     let state = web::Data::new(AppState::new(Arc::new(store), Arc::new(Config::default())));
//!     HttpServer::new(move || App::new().app_data(state.clone()).configure(api::configure))
//!         .bind("127.0.0.1:8080")?
//!         .run()
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! # Server Usage
//!
//! Run the binary to start the REST API server:
//! ```bash
//! ROLLCALL_CONFIG=config.json rollcall-server
//! ```

pub use rollcall_core;

pub mod api;
pub mod error;
pub mod telemetry;
