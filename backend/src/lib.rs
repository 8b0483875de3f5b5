//! Read-only backend for browsing earnings-call transcript analyses.
//!
//! A single search endpoint resolves the latest analysis of a ticker, or of its
//! alphabetical neighbour, and reports where that ticker sits among all known
//! symbols. The [`client`] module is a typed consumer of that endpoint.

pub mod app;
pub mod client;
pub mod config;
pub mod db;
pub mod errors;
pub mod logging;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
