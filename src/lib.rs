//! Movie recommendation service.
//!
//! Ranks titles against a precomputed similarity matrix and decorates the
//! results with poster images from TMDB.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
