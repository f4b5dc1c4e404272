use async_trait::async_trait;
use dashmap::DashMap;
use domain::album::{Album, AlbumError, AlbumRepository};
use domain::value::{AlbumId, SongId};
use std::sync::Arc;

/// DashMap entry locks make push/pull atomic per album, matching the
/// single-statement array updates of the postgres store.
#[derive(Clone, Default)]
pub struct InMemoryAlbumRepository {
    store: Arc<DashMap<i64, Album>>,
}

impl InMemoryAlbumRepository {
    pub fn new() -> Self {
        Self {
            store: Arc::new(DashMap::new()),
        }
    }
}

#[async_trait]
impl AlbumRepository for InMemoryAlbumRepository {
    async fn by_id(&self, id: AlbumId) -> Result<Option<Album>, AlbumError> {
        Ok(self.store.get(&id.as_i64()).map(|v| v.clone()))
    }

    async fn save(&self, album: &Album) -> Result<(), AlbumError> {
        match self.store.get_mut(&album.id.as_i64()) {
            Some(mut existing) => {
                let songs = std::mem::take(&mut existing.songs);
                let created_at = existing.created_at;
                *existing = album.clone();
                existing.songs = songs;
                existing.created_at = created_at;
            }
            None => {
                self.store.insert(album.id.as_i64(), album.clone());
            }
        }
        Ok(())
    }

    async fn delete(&self, id: AlbumId) -> Result<(), AlbumError> {
        match self.store.remove(&id.as_i64()) {
            Some(_) => Ok(()),
            None => Err(AlbumError::NotFound(id)),
        }
    }

    async fn push_song(&self, album_id: AlbumId, song_id: SongId) -> Result<bool, AlbumError> {
        Ok(match self.store.get_mut(&album_id.as_i64()) {
            Some(mut album) => album.add_song(&song_id),
            None => false,
        })
    }

    async fn pull_song(&self, album_id: AlbumId, song_id: SongId) -> Result<bool, AlbumError> {
        Ok(match self.store.get_mut(&album_id.as_i64()) {
            Some(mut album) => album.remove_song(&song_id),
            None => false,
        })
    }

    async fn list(&self) -> Result<Vec<Album>, AlbumError> {
        let mut albums: Vec<Album> = self.store.iter().map(|e| e.value().clone()).collect();
        albums.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.id.as_i64().cmp(&a.id.as_i64()))
        });
        Ok(albums)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::album::AlbumDetails;

    fn album(id: i64) -> Album {
        Album::new(
            AlbumId::from(id),
            AlbumDetails {
                title: "Thriller".to_string(),
                artist: "Michael Jackson".to_string(),
                release_year: 1982,
            },
            "cover.jpg".to_string(),
        )
    }

    #[tokio::test]
    async fn test_push_is_idempotent() {
        let repo = InMemoryAlbumRepository::new();
        repo.save(&album(1)).await.unwrap();

        assert!(repo.push_song(AlbumId::from(1), SongId::from(7)).await.unwrap());
        assert!(!repo.push_song(AlbumId::from(1), SongId::from(7)).await.unwrap());
        assert!(!repo.push_song(AlbumId::from(2), SongId::from(7)).await.unwrap());

        let stored = repo.by_id(AlbumId::from(1)).await.unwrap().unwrap();
        assert_eq!(stored.songs, vec![SongId::from(7)]);
    }

    #[tokio::test]
    async fn test_pull_missing_song_is_noop() {
        let repo = InMemoryAlbumRepository::new();
        repo.save(&album(1)).await.unwrap();
        repo.push_song(AlbumId::from(1), SongId::from(7)).await.unwrap();

        assert!(!repo.pull_song(AlbumId::from(1), SongId::from(8)).await.unwrap());
        assert!(repo.pull_song(AlbumId::from(1), SongId::from(7)).await.unwrap());
        assert!(repo
            .by_id(AlbumId::from(1))
            .await
            .unwrap()
            .unwrap()
            .songs
            .is_empty());
    }

    #[tokio::test]
    async fn test_save_keeps_stored_songs() {
        let repo = InMemoryAlbumRepository::new();
        let original = album(1);
        repo.save(&original).await.unwrap();
        repo.push_song(AlbumId::from(1), SongId::from(7)).await.unwrap();

        let mut edited = original.clone();
        edited.title = "Bad".to_string();
        repo.save(&edited).await.unwrap();

        let stored = repo.by_id(AlbumId::from(1)).await.unwrap().unwrap();
        assert_eq!(stored.title, "Bad");
        assert_eq!(stored.songs, vec![SongId::from(7)]);
    }

    #[tokio::test]
    async fn test_concurrent_pushes_are_not_lost() {
        let repo = InMemoryAlbumRepository::new();
        repo.save(&album(1)).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..32 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                repo.push_song(AlbumId::from(1), SongId::from(i)).await
            }));
        }
        for h in handles {
            assert!(h.await.unwrap().unwrap());
        }
        let stored = repo.by_id(AlbumId::from(1)).await.unwrap().unwrap();
        assert_eq!(stored.songs.len(), 32);
    }
}
