use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// A playlist ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlaylistId(pub SmolStr);
impl PlaylistId {
    /// Create a playlist ID from anything string-like.
    pub fn new(id: impl Into<SmolStr>) -> Self {
        PlaylistId(id.into())
    }
}
impl std::fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A selectable playlist, loaded once from configuration at selection time
/// and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    /// The playlist ID
    pub id: PlaylistId,
    /// The human-readable playlist name
    pub name: String,
}
