//! Monocle API server
//!
//! JSON API (health, status and engagement endpoints) behind permissive CORS,
//! with the prebuilt web frontend served for every other path.

pub mod api;
pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
