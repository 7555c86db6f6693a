//! linktally - short link allocation, redirect and click analytics
//!
//! # Architecture
//! - `storage`: `LinkStore` contract with in-memory and SeaORM backends
//! - `services`: alias allocation, redirect resolution, analytics queries
//! - `analytics`: agent classification and single-pass click aggregation
//! - `api`: actix-web HTTP adapter
//! - `config`: static configuration (file + `LT__*` environment)
//! - `system`: logging and server startup

pub mod analytics;
pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
