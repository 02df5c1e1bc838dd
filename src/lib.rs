//! HTTP front of the deterministic mock forecast generator.

pub mod cli;
pub mod config;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod schemas;

mod openapi_tests;
