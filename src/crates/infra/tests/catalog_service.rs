use application::command::album::{CreateAlbumCmd, UpdateAlbumCmd};
use application::command::asset::{AssetError, AssetHost, MediaKind, MediaPayload};
use application::command::catalog::{CatalogPolicy, CatalogService};
use application::command::song::{CreateSongCmd, UpdateSongCmd};
use application::context::AppContext;
use application::error::AppError;
use async_trait::async_trait;
use domain::album::{Album, AlbumDetails, AlbumError, AlbumRepository};
use domain::song::{SongDetails, SongRepository};
use domain::value::{AlbumId, SongId};
use infra::{InMemoryAlbumRepository, InMemorySongRepository, SnowflakeIdGenerator};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Hands out `https://cdn.test/<n>/<file>` URLs and counts every call.
#[derive(Default)]
struct RecordingAssetHost {
    calls: AtomicUsize,
    fail_kind: Option<MediaKind>,
}

impl RecordingAssetHost {
    fn failing(kind: MediaKind) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_kind: Some(kind),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssetHost for RecordingAssetHost {
    async fn upload(&self, payload: &MediaPayload) -> Result<String, AssetError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_kind == Some(payload.kind) {
            return Err(AssetError::Rejected {
                status: 500,
                message: "boom".to_string(),
            });
        }
        Ok(format!("https://cdn.test/{}/{}", n, payload.file_name))
    }
}

/// Album store whose array pushes always fail.
struct BrokenPushAlbumRepository {
    inner: InMemoryAlbumRepository,
}

#[async_trait]
impl AlbumRepository for BrokenPushAlbumRepository {
    async fn by_id(&self, id: AlbumId) -> Result<Option<Album>, AlbumError> {
        self.inner.by_id(id).await
    }

    async fn save(&self, album: &Album) -> Result<(), AlbumError> {
        self.inner.save(album).await
    }

    async fn delete(&self, id: AlbumId) -> Result<(), AlbumError> {
        self.inner.delete(id).await
    }

    async fn push_song(&self, _: AlbumId, _: SongId) -> Result<bool, AlbumError> {
        Err(AlbumError::DbErr("connection reset".to_string()))
    }

    async fn pull_song(&self, album_id: AlbumId, song_id: SongId) -> Result<bool, AlbumError> {
        self.inner.pull_song(album_id, song_id).await
    }

    async fn list(&self) -> Result<Vec<Album>, AlbumError> {
        self.inner.list().await
    }
}

struct Fixture {
    service: CatalogService,
    songs: InMemorySongRepository,
    albums: InMemoryAlbumRepository,
    assets: Arc<RecordingAssetHost>,
    ctx: AppContext,
}

fn fixture_with(assets: RecordingAssetHost, policy: CatalogPolicy) -> Fixture {
    let songs = InMemorySongRepository::new();
    let albums = InMemoryAlbumRepository::new();
    let assets = Arc::new(assets);
    let service = CatalogService::new(
        Arc::new(SnowflakeIdGenerator::new(1).unwrap()),
        Arc::new(songs.clone()),
        Arc::new(albums.clone()),
        assets.clone(),
        policy,
    );
    Fixture {
        service,
        songs,
        albums,
        assets,
        ctx: AppContext::new("admin"),
    }
}

fn fixture() -> Fixture {
    fixture_with(RecordingAssetHost::default(), CatalogPolicy::default())
}

fn audio() -> Option<MediaPayload> {
    Some(MediaPayload::new(
        MediaKind::Audio,
        "beat-it.mp3",
        Some("audio/mpeg".to_string()),
        vec![1u8; 64],
    ))
}

fn image() -> Option<MediaPayload> {
    Some(MediaPayload::new(
        MediaKind::Image,
        "cover.jpg",
        Some("image/jpeg".to_string()),
        vec![2u8; 32],
    ))
}

fn song_details(title: &str, album_id: Option<AlbumId>) -> SongDetails {
    SongDetails {
        title: title.to_string(),
        artist: "Michael Jackson".to_string(),
        duration: 258,
        album_id,
    }
}

fn thriller() -> AlbumDetails {
    AlbumDetails {
        title: "Thriller".to_string(),
        artist: "Michael Jackson".to_string(),
        release_year: 1982,
    }
}

impl Fixture {
    async fn album(&self) -> Album {
        self.service
            .create_album(
                &self.ctx,
                CreateAlbumCmd {
                    details: thriller(),
                    image: image(),
                },
            )
            .await
            .unwrap()
    }

    async fn song(&self, title: &str, album_id: Option<AlbumId>) -> domain::song::Song {
        self.service
            .create_song(
                &self.ctx,
                CreateSongCmd {
                    details: song_details(title, album_id),
                    audio: audio(),
                    image: image(),
                },
            )
            .await
            .unwrap()
    }

    async fn album_songs(&self, id: &AlbumId) -> Vec<SongId> {
        self.albums.by_id(id.clone()).await.unwrap().unwrap().songs
    }
}

#[tokio::test]
async fn thriller_beat_it_scenario() {
    let f = fixture();
    let album = f.album().await;
    assert!(album.songs.is_empty());

    let song = f.song("Beat It", Some(album.id.clone())).await;
    assert_eq!(song.duration, 258);
    assert_eq!(song.album_id, Some(album.id.clone()));
    assert!(f.songs.by_id(song.id.clone()).await.unwrap().is_some());
    assert_eq!(f.album_songs(&album.id).await, vec![song.id.clone()]);

    f.service.delete_song(&f.ctx, song.id.clone()).await.unwrap();
    assert!(f.album_songs(&album.id).await.is_empty());
    assert!(f.songs.by_id(song.id).await.unwrap().is_none());
}

#[tokio::test]
async fn created_song_is_referenced_exactly_once() {
    let f = fixture();
    let album = f.album().await;
    let first = f.song("Wanna Be Startin' Somethin'", Some(album.id.clone())).await;
    let second = f.song("Thriller", Some(album.id.clone())).await;

    let songs = f.album_songs(&album.id).await;
    assert_eq!(songs, vec![first.id.clone(), second.id.clone()]);
    assert_eq!(songs.iter().filter(|id| **id == first.id).count(), 1);
}

#[tokio::test]
async fn concurrent_creates_on_one_album_keep_every_reference() {
    let f = fixture();
    let album = f.album().await;

    let mut handles = Vec::new();
    for i in 0..16 {
        let service = f.service.clone();
        let ctx = f.ctx.clone();
        let album_id = album.id.clone();
        handles.push(tokio::spawn(async move {
            service
                .create_song(
                    &ctx,
                    CreateSongCmd {
                        details: song_details(&format!("track {}", i), Some(album_id)),
                        audio: audio(),
                        image: image(),
                    },
                )
                .await
        }));
    }
    for h in handles {
        h.await.unwrap().unwrap();
    }
    assert_eq!(f.album_songs(&album.id).await.len(), 16);
}

#[tokio::test]
async fn deleting_a_single_leaves_albums_unchanged() {
    let f = fixture();
    let album = f.album().await;
    let on_album = f.song("Beat It", Some(album.id.clone())).await;
    let single = f.song("Smooth Criminal", None).await;
    assert!(single.is_single());

    let before = f.albums.by_id(album.id.clone()).await.unwrap().unwrap();
    f.service.delete_song(&f.ctx, single.id).await.unwrap();
    let after = f.albums.by_id(album.id.clone()).await.unwrap().unwrap();
    assert_eq!(before, after);
    assert_eq!(after.songs, vec![on_album.id]);
}

#[tokio::test]
async fn delete_missing_song_is_not_found() {
    let f = fixture();
    let err = f
        .service
        .delete_song(&f.ctx, SongId::from(42))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AggregateNotFound(kind, _) if kind == "Song"));
}

#[tokio::test]
async fn deleting_album_removes_only_its_songs() {
    let f = fixture();
    let thriller = f.album().await;
    let bad = f.album().await;
    f.song("Beat It", Some(thriller.id.clone())).await;
    f.song("Billie Jean", Some(thriller.id.clone())).await;
    let other = f.song("Bad", Some(bad.id.clone())).await;
    let single = f.song("Earth Song", None).await;

    f.service
        .delete_album(&f.ctx, thriller.id.clone())
        .await
        .unwrap();

    assert!(f.albums.by_id(thriller.id).await.unwrap().is_none());
    let left: Vec<SongId> = f.songs.list().await.unwrap().into_iter().map(|s| s.id).collect();
    assert_eq!(left.len(), 2);
    assert!(left.contains(&other.id));
    assert!(left.contains(&single.id));
    assert_eq!(f.album_songs(&bad.id).await, vec![other.id]);
}

#[tokio::test]
async fn delete_missing_album_is_not_found() {
    let f = fixture();
    let err = f
        .service
        .delete_album(&f.ctx, AlbumId::from(9))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AggregateNotFound(kind, _) if kind == "Album"));
}

#[tokio::test]
async fn update_without_media_keeps_urls() {
    let f = fixture();
    let song = f.song("Beat It", None).await;
    let uploads = f.assets.calls();

    let updated = f
        .service
        .update_song(
            &f.ctx,
            UpdateSongCmd {
                id: song.id.clone(),
                details: SongDetails {
                    title: "Beat It (Single Version)".to_string(),
                    artist: "MJ".to_string(),
                    duration: 250,
                    album_id: None,
                },
                audio: None,
                image: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(f.assets.calls(), uploads);
    assert_eq!(updated.audio_url, song.audio_url);
    assert_eq!(updated.image_url, song.image_url);
    assert_eq!(updated.title, "Beat It (Single Version)");
    assert_eq!(updated.artist, "MJ");
    assert_eq!(updated.duration, 250);
}

#[tokio::test]
async fn update_with_one_payload_replaces_only_that_url() {
    let f = fixture();
    let song = f.song("Beat It", None).await;

    let updated = f
        .service
        .update_song(
            &f.ctx,
            UpdateSongCmd {
                id: song.id.clone(),
                details: song_details("Beat It", None),
                audio: None,
                image: Some(MediaPayload::new(
                    MediaKind::Image,
                    "new-cover.png",
                    None,
                    vec![3u8; 8],
                )),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.audio_url, song.audio_url);
    assert_ne!(updated.image_url, song.image_url);
    assert!(updated.image_url.ends_with("new-cover.png"));
    let stored = f.songs.by_id(song.id).await.unwrap().unwrap();
    assert_eq!(stored.image_url, updated.image_url);
}

#[tokio::test]
async fn update_missing_song_is_not_found() {
    let f = fixture();
    let err = f
        .service
        .update_song(
            &f.ctx,
            UpdateSongCmd {
                id: SongId::from(5),
                details: song_details("Beat It", None),
                audio: audio(),
                image: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AggregateNotFound(_, _)));
    assert_eq!(f.assets.calls(), 0);
}

#[tokio::test]
async fn update_moves_song_between_albums() {
    let f = fixture();
    let from = f.album().await;
    let to = f.album().await;
    let song = f.song("Beat It", Some(from.id.clone())).await;

    f.service
        .update_song(
            &f.ctx,
            UpdateSongCmd {
                id: song.id.clone(),
                details: song_details("Beat It", Some(to.id.clone())),
                audio: None,
                image: None,
            },
        )
        .await
        .unwrap();
    assert!(f.album_songs(&from.id).await.is_empty());
    assert_eq!(f.album_songs(&to.id).await, vec![song.id.clone()]);

    // clearing the album turns it into a single
    let single = f
        .service
        .update_song(
            &f.ctx,
            UpdateSongCmd {
                id: song.id.clone(),
                details: song_details("Beat It", None),
                audio: None,
                image: None,
            },
        )
        .await
        .unwrap();
    assert!(single.is_single());
    assert!(f.album_songs(&to.id).await.is_empty());
}

#[tokio::test]
async fn create_song_without_files_has_no_side_effects() {
    let f = fixture();
    for (audio, image) in [(None, image()), (audio(), None), (None, None)] {
        let err = f
            .service
            .create_song(
                &f.ctx,
                CreateSongCmd {
                    details: song_details("Beat It", None),
                    audio,
                    image,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref msg) if msg == "Please upload all files"));
    }
    let empty = MediaPayload::new(MediaKind::Audio, "empty.mp3", None, Vec::new());
    let err = f
        .service
        .create_song(
            &f.ctx,
            CreateSongCmd {
                details: song_details("Beat It", None),
                audio: Some(empty),
                image: image(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    assert_eq!(f.assets.calls(), 0);
    assert!(f.songs.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_album_without_image_has_no_side_effects() {
    let f = fixture();
    let err = f
        .service
        .create_album(
            &f.ctx,
            CreateAlbumCmd {
                details: thriller(),
                image: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(f.assets.calls(), 0);
    assert!(f.albums.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn blank_title_is_rejected_before_upload() {
    let f = fixture();
    let err = f
        .service
        .create_song(
            &f.ctx,
            CreateSongCmd {
                details: song_details("   ", None),
                audio: audio(),
                image: image(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Missing field: title");
    assert_eq!(f.assets.calls(), 0);
}

#[tokio::test]
async fn failed_upload_persists_nothing() {
    let f = fixture_with(
        RecordingAssetHost::failing(MediaKind::Image),
        CatalogPolicy::default(),
    );
    let err = f
        .service
        .create_song(
            &f.ctx,
            CreateSongCmd {
                details: song_details("Beat It", None),
                audio: audio(),
                image: image(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::UploadFailed(_)));
    assert!(f.songs.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn dangling_album_reference_is_accepted_by_default() {
    let f = fixture();
    let song = f.song("Beat It", Some(AlbumId::from(777))).await;
    assert_eq!(song.album_id, Some(AlbumId::from(777)));
    assert!(f.songs.by_id(song.id).await.unwrap().is_some());
}

#[tokio::test]
async fn strict_policy_rejects_unknown_album() {
    let f = fixture_with(
        RecordingAssetHost::default(),
        CatalogPolicy {
            strict_album_refs: true,
        },
    );
    let err = f
        .service
        .create_song(
            &f.ctx,
            CreateSongCmd {
                details: song_details("Beat It", Some(AlbumId::from(777))),
                audio: audio(),
                image: image(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(f.assets.calls(), 0);

    let album = f.album().await;
    f.song("Beat It", Some(album.id.clone())).await;
    assert_eq!(f.album_songs(&album.id).await.len(), 1);
}

#[tokio::test]
async fn failed_album_push_rolls_back_song() {
    let songs = InMemorySongRepository::new();
    let inner = InMemoryAlbumRepository::new();
    let assets = Arc::new(RecordingAssetHost::default());
    let service = CatalogService::new(
        Arc::new(SnowflakeIdGenerator::new(2).unwrap()),
        Arc::new(songs.clone()),
        Arc::new(BrokenPushAlbumRepository {
            inner: inner.clone(),
        }),
        assets,
        CatalogPolicy::default(),
    );
    let ctx = AppContext::new("admin");
    let album = service
        .create_album(
            &ctx,
            CreateAlbumCmd {
                details: thriller(),
                image: image(),
            },
        )
        .await
        .unwrap();

    let err = service
        .create_song(
            &ctx,
            CreateSongCmd {
                details: song_details("Beat It", Some(album.id.clone())),
                audio: audio(),
                image: image(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AlbumError(_)));
    assert!(songs.list().await.unwrap().is_empty());
    assert!(inner.by_id(album.id).await.unwrap().unwrap().songs.is_empty());
}

#[tokio::test]
async fn update_album_keeps_cover_and_songs() {
    let f = fixture();
    let album = f.album().await;
    let song = f.song("Beat It", Some(album.id.clone())).await;

    let updated = f
        .service
        .update_album(
            &f.ctx,
            UpdateAlbumCmd {
                id: album.id.clone(),
                details: AlbumDetails {
                    title: "Thriller 25".to_string(),
                    artist: "Michael Jackson".to_string(),
                    release_year: 2008,
                },
                image: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.image_url, album.image_url);
    assert_eq!(updated.release_year, 2008);

    let stored = f.albums.by_id(album.id.clone()).await.unwrap().unwrap();
    assert_eq!(stored.title, "Thriller 25");
    assert_eq!(stored.songs, vec![song.id]);
}

#[tokio::test]
async fn update_missing_album_is_not_found() {
    let f = fixture();
    let err = f
        .service
        .update_album(
            &f.ctx,
            UpdateAlbumCmd {
                id: AlbumId::from(3),
                details: thriller(),
                image: image(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AggregateNotFound(kind, _) if kind == "Album"));
    assert_eq!(f.assets.calls(), 0);
}
