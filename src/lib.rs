//! httpgod - a tiny HTTP/1.0 server
//!
//! Serves folder listings and files from a root directory and runs a single
//! CGI script for one configured path.

pub mod config;
pub mod handler;
pub mod http;
pub mod server;
