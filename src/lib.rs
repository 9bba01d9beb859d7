//! Spool - HTTP/1.1 file transfer over raw sockets
//!
//! Core library: buffered stream adapter, HTTP codec, static file handlers
//! and the connection dispatch loop.

pub mod config;
pub mod http;
pub mod io;
pub mod server;
pub mod static_files;
