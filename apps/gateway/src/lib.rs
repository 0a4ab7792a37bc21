//! Resume ingestion and analysis gateway.
//!
//! The `gateway` binary serves `/health`, `/upload` and `/analyze`; the
//! `analyze` binary is the client that drives both calls from one action.

pub mod analysis;
pub mod client;
pub mod config;
pub mod errors;
pub mod extraction;
pub mod ingest;
pub mod routes;
pub mod state;
