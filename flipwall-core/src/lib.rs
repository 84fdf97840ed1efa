pub mod animation;
pub mod config;
pub mod feed;
pub mod grid;
pub mod player;
pub mod ticker;
pub mod tokio_thread;

mod wall;
pub use wall::{Wall, WallEvent, WallPhase};

pub use flipwall_feed as ff;
pub use flipwall_state;
