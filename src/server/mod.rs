//! HTTP service mode.
//!
//! This module provides:
//! - Configuration types and loading (`config`)
//! - The axum front end that bridges HTTP requests to the
//!   [`RequestRouter`](crate::RequestRouter) (`http`)

pub mod config;
pub mod http;

pub use config::Config;
pub use http::{AppState, build_router, into_axum_response};
