//! HTTP server for browser media playback.
//!
//! Serves a fixed set of media files with single-range `Range` support so
//! players can seek: every satisfiable request is answered with
//! `206 Partial Content` and the requested span is streamed from disk.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod media;
pub mod server;

pub use error::MediaError;
pub use media::MediaTarget;
