use std::{
    borrow::Cow,
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

/// Thumbnails left unpainted for this long lose their texture.
const ENTRY_TIMEOUT: Duration = Duration::from_secs(10);

/// Hands thumbnail bytes to egui's image loader under stable URIs and evicts
/// textures for thumbnails that have been flipped away.
///
/// The URI is derived from the shared allocation's address: the same bytes
/// always map to the same texture, and a replaced tile image naturally gets a
/// fresh URI.
#[derive(Default)]
pub struct ThumbnailTextures {
    last_used: HashMap<String, Instant>,
}

impl ThumbnailTextures {
    pub fn source(&mut self, image: &Arc<[u8]>) -> egui::ImageSource<'static> {
        let uri = format!(
            "bytes://flipwall/thumb-{:x}",
            Arc::as_ptr(image) as *const u8 as usize
        );
        self.last_used.insert(uri.clone(), Instant::now());
        egui::ImageSource::Bytes {
            uri: Cow::Owned(uri),
            bytes: egui::load::Bytes::Shared(image.clone()),
        }
    }

    /// Forget textures that have not been painted recently.
    pub fn prune(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        self.last_used.retain(|uri, last_used| {
            let keep = now.duration_since(*last_used) < ENTRY_TIMEOUT;
            if !keep {
                ctx.forget_image(uri);
            }
            keep
        });
    }

    /// Forget everything; used when the wall is rebuilt.
    pub fn clear(&mut self, ctx: &egui::Context) {
        for uri in self.last_used.keys() {
            ctx.forget_image(uri);
        }
        self.last_used.clear();
    }
}
