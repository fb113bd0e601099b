//! # API Module
//!
//! HTTP endpoints of the trigger server, built on [Axum](https://docs.rs/axum).
//!
//! ## Endpoints
//!
//! - [`collect_data`] - `POST /collect-data`. Authenticates the caller's
//!   Spotify bearer token, hands a collection run to the blocking pool and
//!   replies `202 Accepted` right away. The caller never sees the outcome of
//!   the run.
//! - [`health`] - `GET /health`. Service name, status and version.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Extension, Router, routing::{get, post}};
//! use spotcollect::api::{AppState, collect_data, health};
//!
//! let app = Router::new()
//!     .route("/collect-data", post(collect_data))
//!     .route("/health", get(health))
//!     .layer(Extension(Arc::new(state)));
//! ```

mod collect;
mod health;

pub use collect::{AppState, CollectRequest, collect_data, user_mismatch};
pub use health::health;
