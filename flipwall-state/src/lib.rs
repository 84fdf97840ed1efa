//! Representations of flipwall's domain state, shared between the feed
//! client, the wall core, and the frontend.
//!
//! Separated out to allow for use in other utilities.
#![deny(missing_docs)]

pub use flipwall_feed as ff;

mod video;
pub use video::{PlaylistVideo, VideoId};

mod playlist;
pub use playlist::{PlaylistEntry, PlaylistId};

mod thumbnail;
pub use thumbnail::Thumbnail;
