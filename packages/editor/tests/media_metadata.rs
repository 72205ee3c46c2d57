//! Deferred metadata for uploads completing out of order

use pagecraft_editor::{
    Document, MediaError, MediaLibrary, MediaMetadata, MediaType, ObjectUrlReleaser,
    ReleaseRemovedMedia,
};
use pagecraft_model::{ComponentKind, ComponentTemplate};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

#[derive(Default)]
struct Revoked(Mutex<Vec<String>>);

impl ObjectUrlReleaser for Revoked {
    fn release(&self, url: &str) {
        self.0.lock().unwrap().push(url.to_string());
    }
}

#[tokio::test]
async fn test_concurrent_probes_do_not_clobber() {
    let library = MediaLibrary::new();
    let image = library.add_upload(MediaType::Image, "hero.png", "blob:hero");
    let video = library.add_upload(MediaType::Video, "intro.mp4", "blob:intro");

    let (image_tx, image_rx) = oneshot::channel::<MediaMetadata>();
    let (video_tx, video_rx) = oneshot::channel::<MediaMetadata>();

    let image_task = {
        let library = library.clone();
        let id = image.id.clone();
        tokio::spawn(async move {
            library
                .apply_when_ready(&id, async move {
                    image_rx.await.map_err(|e| MediaError::Probe {
                        id: "image".into(),
                        reason: e.to_string(),
                    })
                })
                .await
        })
    };
    let video_task = {
        let library = library.clone();
        let id = video.id.clone();
        tokio::spawn(async move {
            library
                .apply_when_ready(&id, async move {
                    video_rx.await.map_err(|e| MediaError::Probe {
                        id: "video".into(),
                        reason: e.to_string(),
                    })
                })
                .await
        })
    };

    // the later upload finishes first
    video_tx
        .send(MediaMetadata {
            width: Some(1920),
            height: Some(1080),
            duration: Some(42.0),
            ..Default::default()
        })
        .unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    image_tx
        .send(MediaMetadata {
            width: Some(800),
            height: Some(600),
            ..Default::default()
        })
        .unwrap();

    image_task.await.unwrap().unwrap();
    video_task.await.unwrap().unwrap();

    let image = library.get(&image.id).unwrap();
    let video = library.get(&video.id).unwrap();
    assert_eq!((image.width, image.height, image.duration), (Some(800), Some(600), None));
    assert_eq!((video.width, video.height, video.duration), (Some(1920), Some(1080), Some(42.0)));
    assert_eq!(image.name, "hero.png");
    assert_eq!(video.url, "blob:intro");
}

#[tokio::test]
async fn test_failed_probe_leaves_item_alone() {
    let library = MediaLibrary::new();
    let item = library.add_upload(MediaType::Video, "broken.mp4", "blob:broken");

    let err = library
        .apply_when_ready(&item.id, async {
            Err(MediaError::Probe {
                id: "broken".into(),
                reason: "unsupported codec".into(),
            })
        })
        .await
        .unwrap_err();
    assert!(matches!(err, MediaError::Probe { .. }));
    assert_eq!(library.get(&item.id), Some(item));
}

#[tokio::test]
async fn test_probe_for_removed_item() {
    let library = MediaLibrary::new();
    let item = library.add_upload(MediaType::Image, "gone.png", "blob:gone");
    library.remove(&item.id, &Revoked::default()).unwrap();

    let err = library
        .apply_when_ready(&item.id, async { Ok(MediaMetadata::default()) })
        .await
        .unwrap_err();
    assert_eq!(err, MediaError::NotFound(item.id));
}

#[test]
fn test_removed_nodes_release_unshared_media() {
    let library = MediaLibrary::new();
    let revoked = Arc::new(Revoked::default());
    let hero = library.add_upload(MediaType::Image, "hero.png", "blob:hero");
    let logo = library.add_upload(MediaType::Image, "logo.png", "blob:logo");

    let mut doc = Document::new("media");
    doc.subscribe(ReleaseRemovedMedia::new(library.clone(), revoked.clone()));

    let image = |url: &str| ComponentTemplate::new(ComponentKind::Image).with_specific("src", url);
    let row = doc
        .insert_template(
            ComponentTemplate::new(ComponentKind::Row)
                .with_child(image(&hero.url))
                .with_child(image(&logo.url)),
            None,
            0,
        )
        .unwrap();
    // the logo is also used outside the row
    doc.insert_template(image(&logo.url), None, 1).unwrap();

    doc.remove(&row).unwrap();
    assert_eq!(*revoked.0.lock().unwrap(), vec!["blob:hero".to_string()]);
}
