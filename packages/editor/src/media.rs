//! # Media Library
//!
//! Uploaded and external media the image/video components point at. Nodes
//! reference items by URL only; the library owns the items and any
//! transient object URLs behind them.
//!
//! Metadata probes (dimensions, duration) finish asynchronously and in any
//! order. Each completion patches only its own item, and the patch is
//! applied against the collection as it is at completion time, so
//! concurrent probes never overwrite each other.

use crate::{Change, ChangeEvent, DocumentObserver};
use pagecraft_model::ComponentTree;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MediaError {
    #[error("Media item not found: {0}")]
    NotFound(String),

    #[error("Media item already exists: {0}")]
    Duplicate(String),

    #[error("Metadata probe failed for {id}: {reason}")]
    Probe { id: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default)]
    pub is_external: bool,
}

impl MediaItem {
    /// Transient URL owned by this session
    pub fn is_object_url(&self) -> bool {
        !self.is_external && self.url.starts_with("blob:")
    }
}

/// Probe result. Only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaMetadata {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub duration: Option<f64>,
    pub thumbnail: Option<String>,
    pub size: Option<u64>,
    pub mime_type: Option<String>,
}

impl MediaMetadata {
    fn apply_to(&self, item: &mut MediaItem) {
        if let Some(width) = self.width {
            item.width = Some(width);
        }
        if let Some(height) = self.height {
            item.height = Some(height);
        }
        if let Some(duration) = self.duration {
            item.duration = Some(duration);
        }
        if let Some(thumbnail) = &self.thumbnail {
            item.thumbnail = Some(thumbnail.clone());
        }
        if let Some(size) = self.size {
            item.size = Some(size);
        }
        if let Some(mime_type) = &self.mime_type {
            item.mime_type = Some(mime_type.clone());
        }
    }
}

/// Frees transient object URLs (the host's `URL.revokeObjectURL`)
pub trait ObjectUrlReleaser: Send + Sync {
    fn release(&self, url: &str);
}

/// Shared handle to the item collection. Clones see the same items.
#[derive(Clone, Default)]
pub struct MediaLibrary {
    items: Arc<RwLock<BTreeMap<String, MediaItem>>>,
    next_id: Arc<AtomicU64>,
}

impl fmt::Debug for MediaLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaLibrary").field("items", &self.len()).finish()
    }
}

impl MediaLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an upload; metadata arrives later via a probe
    pub fn add_upload(
        &self,
        media_type: MediaType,
        name: impl Into<String>,
        url: impl Into<String>,
    ) -> MediaItem {
        self.add(media_type, name.into(), url.into(), false)
    }

    /// Register a remote URL the library does not own
    pub fn add_external(
        &self,
        media_type: MediaType,
        name: impl Into<String>,
        url: impl Into<String>,
    ) -> MediaItem {
        self.add(media_type, name.into(), url.into(), true)
    }

    fn add(&self, media_type: MediaType, name: String, url: String, is_external: bool) -> MediaItem {
        let id = format!("media-{}", self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let item = MediaItem {
            id: id.clone(),
            media_type,
            name,
            url,
            thumbnail: None,
            size: None,
            mime_type: None,
            width: None,
            height: None,
            duration: None,
            is_external,
        };
        debug!(media = %id, url = %item.url, is_external, "added media");
        self.write().insert(id, item.clone());
        item
    }

    /// Insert a previously saved item as-is
    pub fn restore(&self, item: MediaItem) -> Result<(), MediaError> {
        let mut items = self.write();
        if items.contains_key(&item.id) {
            return Err(MediaError::Duplicate(item.id));
        }
        if let Some(n) = item
            .id
            .strip_prefix("media-")
            .and_then(|n| n.parse::<u64>().ok())
        {
            self.next_id.fetch_max(n, Ordering::Relaxed);
        }
        items.insert(item.id.clone(), item);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<MediaItem> {
        self.read().get(id).cloned()
    }

    pub fn find_by_url(&self, url: &str) -> Option<MediaItem> {
        self.read().values().find(|item| item.url == url).cloned()
    }

    pub fn items(&self) -> Vec<MediaItem> {
        self.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Patch one item against the latest collection state
    pub fn apply_metadata(&self, id: &str, metadata: &MediaMetadata) -> Result<MediaItem, MediaError> {
        let mut items = self.write();
        let item = items
            .get_mut(id)
            .ok_or_else(|| MediaError::NotFound(id.to_string()))?;
        metadata.apply_to(item);
        Ok(item.clone())
    }

    /// Await `probe`, then patch `id` with its result. No lock is held
    /// while the probe runs.
    pub async fn apply_when_ready<F>(&self, id: &str, probe: F) -> Result<MediaItem, MediaError>
    where
        F: Future<Output = Result<MediaMetadata, MediaError>>,
    {
        let metadata = probe.await.map_err(|err| {
            warn!(media = %id, error = %err, "metadata probe failed");
            err
        })?;
        let item = self.apply_metadata(id, &metadata)?;
        info!(media = %id, "metadata applied");
        Ok(item)
    }

    /// Drop an item, releasing its object URLs first
    pub fn remove(&self, id: &str, releaser: &dyn ObjectUrlReleaser) -> Result<MediaItem, MediaError> {
        let item = self
            .write()
            .remove(id)
            .ok_or_else(|| MediaError::NotFound(id.to_string()))?;
        release_item(&item, releaser);
        Ok(item)
    }

    /// Release object URLs for owned items matching `urls`. The items stay
    /// listed; their URLs are no longer valid afterwards. Returns how many
    /// URLs were released.
    pub fn release_urls(&self, urls: &[String], releaser: &dyn ObjectUrlReleaser) -> usize {
        let items = self.read();
        let mut released = 0;
        for item in items.values().filter(|item| urls.contains(&item.url)) {
            released += release_item(item, releaser);
        }
        released
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<String, MediaItem>> {
        self.items.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<String, MediaItem>> {
        self.items.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn release_item(item: &MediaItem, releaser: &dyn ObjectUrlReleaser) -> usize {
    if item.is_external {
        return 0;
    }
    let mut released = 0;
    for url in std::iter::once(&item.url).chain(item.thumbnail.as_ref()) {
        if url.starts_with("blob:") {
            debug!(media = %item.id, url = %url, "releasing object url");
            releaser.release(url);
            released += 1;
        }
    }
    released
}

/// Document observer that hands media of removed nodes back to the library
pub struct ReleaseRemovedMedia {
    library: MediaLibrary,
    releaser: Arc<dyn ObjectUrlReleaser>,
}

impl ReleaseRemovedMedia {
    pub fn new(library: MediaLibrary, releaser: Arc<dyn ObjectUrlReleaser>) -> Self {
        Self { library, releaser }
    }
}

impl fmt::Debug for ReleaseRemovedMedia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReleaseRemovedMedia")
            .field("library", &self.library)
            .finish()
    }
}

impl DocumentObserver for ReleaseRemovedMedia {
    fn on_change(&mut self, event: &ChangeEvent, tree: &ComponentTree) {
        let Change::Removed(removal) = &event.change else {
            return;
        };
        // still shown by another node
        let in_use: Vec<String> = tree
            .iter()
            .flat_map(|node| node.media_urls())
            .map(str::to_string)
            .collect();
        let orphaned: Vec<String> = removal
            .media_urls
            .iter()
            .filter(|url| !in_use.contains(url))
            .cloned()
            .collect();
        if !orphaned.is_empty() {
            self.library.release_urls(&orphaned, self.releaser.as_ref());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Released(Mutex<Vec<String>>);

    impl ObjectUrlReleaser for Released {
        fn release(&self, url: &str) {
            self.0.lock().unwrap().push(url.to_string());
        }
    }

    #[test]
    fn test_ids_are_generated() {
        let library = MediaLibrary::new();
        let a = library.add_upload(MediaType::Image, "a.png", "blob:a");
        let b = library.add_external(MediaType::Video, "clip", "https://vimeo.com/1");
        assert_eq!(a.id, "media-1");
        assert_eq!(b.id, "media-2");
        assert!(b.is_external);
        assert_eq!(library.len(), 2);
    }

    #[test]
    fn test_metadata_patch_keeps_other_fields() {
        let library = MediaLibrary::new();
        let item = library.add_upload(MediaType::Video, "intro.mp4", "blob:intro");
        library
            .apply_metadata(&item.id, &MediaMetadata { duration: Some(12.5), ..Default::default() })
            .unwrap();
        let updated = library
            .apply_metadata(&item.id, &MediaMetadata { width: Some(1280), ..Default::default() })
            .unwrap();
        assert_eq!(updated.duration, Some(12.5));
        assert_eq!(updated.width, Some(1280));
        assert_eq!(updated.name, "intro.mp4");
    }

    #[test]
    fn test_remove_releases_owned_urls_only() {
        let library = MediaLibrary::new();
        let releaser = Released::default();
        let upload = library.add_upload(MediaType::Image, "a.png", "blob:a");
        let remote = library.add_external(MediaType::Image, "b", "https://cdn.example.com/b.png");

        library.remove(&upload.id, &releaser).unwrap();
        library.remove(&remote.id, &releaser).unwrap();
        assert_eq!(*releaser.0.lock().unwrap(), vec!["blob:a".to_string()]);
        assert_eq!(
            library.remove(&upload.id, &releaser).unwrap_err(),
            MediaError::NotFound(upload.id)
        );
    }

    #[test]
    fn test_restore_rejects_duplicates() {
        let library = MediaLibrary::new();
        let item = library.add_upload(MediaType::Image, "a.png", "blob:a");
        assert_eq!(library.restore(item.clone()), Err(MediaError::Duplicate(item.id)));
    }
}
