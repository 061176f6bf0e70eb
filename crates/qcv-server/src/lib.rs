//! QCV server - HTTP API for quantum circuit diagrams and qubit dynamics plots.
//!
//! Routes:
//!
//! - `GET /` - fixed greeting
//! - `GET /health` - liveness and version
//! - `POST /circuit` - translate a gate list and render the circuit to PNG
//! - `POST /dynamics` - solve a driven, dephasing qubit and plot ⟨σz⟩
//! - `GET /download/{file_name}` - fetch an artifact as an attachment
//! - `GET /static/{file_name}` - fetch an artifact inline
//!
//! Every image is written once under a fresh `<prefix>_<uuid>.png` name in a
//! flat artifact directory and returned as
//! `<public_base_url>/static/<file_name>`.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use qcv_server::{AppState, Config, create_router};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::default();
//!     let addr = config.bind_address().unwrap();
//!     let state = Arc::new(AppState::with_config(config));
//!     state.store.ensure_root().unwrap();
//!
//!     let app = create_router(state);
//!     let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

pub mod api;
pub mod config;
pub mod dto;
pub mod error;
pub mod server;
pub mod state;
pub mod storage;
pub mod telemetry;
pub mod translate;

pub use config::{Config, ConfigError};
pub use dto::{CircuitRequest, ErrorResponse, Gate, HealthResponse, ImageResponse};
pub use error::ApiError;
pub use server::create_router;
pub use state::AppState;
pub use storage::{Artifact, ArtifactKind, ArtifactStore, StorageError};
pub use translate::{TranslateError, parse_dynamics, translate_circuit};
