//! Warden - minimal static file server
//!
//! Serves files beneath a single document root over a one-request-per-connection
//! HTTP/1.1 subset.

pub mod config;
pub mod http;
pub mod server;
pub mod static_files;
