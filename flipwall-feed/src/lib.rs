//! A barebones client for an Invidious-compatible video metadata API.
//!
//! Serves playlist listings, per-video metadata, and raw thumbnail images;
//! flipwall uses it as the backend for the wall's thumbnail feed and
//! playback cueing.
#![deny(missing_docs)]

mod client;
pub use client::*;

mod playlist;
pub use playlist::*;

mod video;
pub use video::*;

mod request;
