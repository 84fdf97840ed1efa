use std::sync::{
    Arc, RwLock,
    atomic::{AtomicBool, Ordering},
    mpsc::Sender,
};

use flipwall_state::{PlaylistId, PlaylistVideo, Thumbnail};

use crate::{ff, tokio_thread::TokioHandle, wall::WallEvent};

/// Supplies thumbnails to the wall, one at a time.
///
/// All methods are non-blocking; results arrive later as
/// [`WallEvent::ThumbnailReady`] or [`WallEvent::ThumbnailError`]. At most one
/// retrieval is outstanding at a time by contract with the coordinator, which
/// never requests another thumbnail while one is pending.
pub trait ThumbnailSource {
    /// Whether another thumbnail follows the most recently requested one.
    /// Optimistically true while the backing feed is still unknown.
    fn has_next(&self) -> bool;
    /// Request the thumbnail after the current one.
    fn next(&mut self);
    /// Request the first thumbnail again, restarting the sequence.
    fn first(&mut self);
    /// Stop delivering results. Completions that race with release are
    /// dropped rather than delivered.
    fn release(&mut self);
}

#[derive(Default)]
struct FeedCursor {
    /// The playlist's videos, fetched lazily on the first retrieval.
    entries: Option<Arc<Vec<PlaylistVideo>>>,
    /// Index of the most recently requested entry.
    index: Option<usize>,
}

struct Shared {
    released: AtomicBool,
    cursor: RwLock<FeedCursor>,
}

/// [`ThumbnailSource`] backed by a playlist on an Invidious-compatible server.
pub struct HttpThumbnailSource {
    client: Arc<ff::Client>,
    playlist_id: PlaylistId,
    tokio: TokioHandle,
    event_tx: Sender<WallEvent>,
    shared: Arc<Shared>,
}

impl HttpThumbnailSource {
    pub fn new(
        client: Arc<ff::Client>,
        playlist_id: PlaylistId,
        tokio: TokioHandle,
        event_tx: Sender<WallEvent>,
    ) -> Self {
        Self {
            client,
            playlist_id,
            tokio,
            event_tx,
            shared: Arc::new(Shared {
                released: AtomicBool::new(false),
                cursor: RwLock::new(FeedCursor::default()),
            }),
        }
    }

    /// Kick off a retrieval. With `restart`, the cursor returns to the first
    /// entry; otherwise it advances, wrapping at the end of the playlist.
    fn retrieve(&self, restart: bool) {
        if self.shared.released.load(Ordering::Relaxed) {
            return;
        }

        let client = self.client.clone();
        let playlist_id = self.playlist_id.clone();
        let event_tx = self.event_tx.clone();
        let shared = self.shared.clone();

        self.tokio.spawn(async move {
            let entries = {
                let cached = shared.cursor.read().unwrap().entries.clone();
                match cached {
                    Some(entries) => entries,
                    None => match fetch_entries(&client, &playlist_id).await {
                        Ok(entries) => {
                            shared.cursor.write().unwrap().entries = Some(entries.clone());
                            entries
                        }
                        Err(message) => {
                            deliver(&shared, &event_tx, WallEvent::ThumbnailError(message));
                            return;
                        }
                    },
                }
            };

            let video = {
                let mut cursor = shared.cursor.write().unwrap();
                let index = if restart {
                    0
                } else {
                    cursor.index.map(|i| (i + 1) % entries.len()).unwrap_or(0)
                };
                cursor.index = Some(index);
                entries[index].clone()
            };

            match fetch_thumbnail(&client, &video).await {
                Ok(thumbnail) => {
                    deliver(&shared, &event_tx, WallEvent::ThumbnailReady(thumbnail));
                }
                Err(message) => {
                    deliver(&shared, &event_tx, WallEvent::ThumbnailError(message));
                }
            }
        });
    }
}

impl ThumbnailSource for HttpThumbnailSource {
    fn has_next(&self) -> bool {
        let cursor = self.shared.cursor.read().unwrap();
        match (&cursor.entries, cursor.index) {
            (Some(entries), Some(index)) => index + 1 < entries.len(),
            // Unknown playlist or untouched cursor: assume more is available.
            _ => true,
        }
    }

    fn next(&mut self) {
        self.retrieve(false);
    }

    fn first(&mut self) {
        self.retrieve(true);
    }

    fn release(&mut self) {
        self.shared.released.store(true, Ordering::Relaxed);
        tracing::debug!(playlist_id = %self.playlist_id.0, "thumbnail source released");
    }
}

fn deliver(shared: &Shared, event_tx: &Sender<WallEvent>, event: WallEvent) {
    if shared.released.load(Ordering::Relaxed) {
        tracing::debug!("dropping feed result after release");
        return;
    }
    let _ = event_tx.send(event);
}

async fn fetch_entries(
    client: &ff::Client,
    playlist_id: &PlaylistId,
) -> Result<Arc<Vec<PlaylistVideo>>, String> {
    let playlist = client
        .get_playlist(&playlist_id.0)
        .await
        .map_err(|e| format!("failed to fetch playlist {}: {e}", playlist_id.0))?;
    let entries: Vec<PlaylistVideo> = playlist
        .videos
        .into_iter()
        .map(PlaylistVideo::from)
        .collect();
    if entries.is_empty() {
        return Err(format!("playlist {} has no videos", playlist_id.0));
    }
    tracing::info!(
        playlist_id = %playlist_id.0,
        videos = entries.len(),
        "loaded playlist feed"
    );
    Ok(Arc::new(entries))
}

async fn fetch_thumbnail(client: &ff::Client, video: &PlaylistVideo) -> Result<Thumbnail, String> {
    let url = video
        .thumbnail_url
        .as_ref()
        .ok_or_else(|| format!("video {} has no thumbnail", video.id))?;
    let bytes = client
        .get_thumbnail(url)
        .await
        .map_err(|e| format!("failed to fetch thumbnail for {}: {e}", video.id))?;
    Ok(Thumbnail::new(video.id.clone(), bytes))
}
