use serde::{Deserialize, Serialize};

use crate::fc;
use fc::flipwall_state::{PlaylistEntry, PlaylistId};

#[derive(Debug, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    #[serde(default)]
    pub general: General,
    #[serde(default)]
    pub server: Server,
    #[serde(default)]
    pub wall: fc::config::WallConfig,
    /// Playlists offered by the picker.
    #[serde(default)]
    pub playlists: Vec<PlaylistEntry>,
    #[serde(default)]
    pub session: Session,
}
impl Config {
    pub const FILENAME: &str = "config.toml";

    pub fn load() -> Self {
        match std::fs::read_to_string(Self::FILENAME) {
            Ok(contents) => {
                // Config exists, try to parse it
                match toml::from_str(&contents) {
                    Ok(config) => config,
                    Err(e) => panic!("Failed to parse {}: {e}", Self::FILENAME),
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // No config exists, create default
                tracing::info!("no config file found, creating default config");
                Config::default()
            }
            Err(e) => {
                // Some other IO error occurred while reading
                panic!("Failed to read {}: {e}", Self::FILENAME)
            }
        }
    }

    pub fn save(&self) {
        std::fs::write(Self::FILENAME, toml::to_string(self).unwrap()).unwrap();
        tracing::info!("saved config to {}", Self::FILENAME);
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct General {
    pub window_width: u32,
    pub window_height: u32,
    pub fullscreen: bool,
    /// Repaint cadence while nothing is animating.
    pub repaint_secs: f32,
}
impl Default for General {
    fn default() -> Self {
        Self {
            window_width: 1920,
            window_height: 1080,
            fullscreen: true,
            repaint_secs: 0.25,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Server {
    /// Base URL of the Invidious-compatible instance.
    pub base_url: String,
}
impl Default for Server {
    fn default() -> Self {
        Self {
            base_url: "https://invidious.example.org".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Session {
    /// The playlist shown when the app starts.
    pub last_playlist_id: Option<PlaylistId>,
    /// Cleared once the user has opened the playlist picker.
    pub first_run: bool,
}
impl Default for Session {
    fn default() -> Self {
        Self {
            last_playlist_id: None,
            first_run: true,
        }
    }
}
