use async_trait::async_trait;
use dashmap::DashMap;
use domain::song::{Song, SongError, SongRepository};
use domain::value::{AlbumId, SongId};
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct InMemorySongRepository {
    store: Arc<DashMap<i64, Song>>,
}

impl InMemorySongRepository {
    pub fn new() -> Self {
        Self {
            store: Arc::new(DashMap::new()),
        }
    }
}

#[async_trait]
impl SongRepository for InMemorySongRepository {
    async fn by_id(&self, id: SongId) -> Result<Option<Song>, SongError> {
        Ok(self.store.get(&id.as_i64()).map(|v| v.clone()))
    }

    async fn save(&self, song: &Song) -> Result<(), SongError> {
        let mut song = song.clone();
        if let Some(existing) = self.store.get(&song.id.as_i64()) {
            song.created_at = existing.created_at;
        }
        self.store.insert(song.id.as_i64(), song);
        Ok(())
    }

    async fn delete(&self, id: SongId) -> Result<(), SongError> {
        match self.store.remove(&id.as_i64()) {
            Some(_) => Ok(()),
            None => Err(SongError::NotFound(id)),
        }
    }

    async fn delete_by_album(&self, album_id: AlbumId) -> Result<u64, SongError> {
        let before = self.store.len();
        self.store
            .retain(|_, song| song.album_id.as_ref() != Some(&album_id));
        Ok(before.saturating_sub(self.store.len()) as u64)
    }

    async fn list(&self) -> Result<Vec<Song>, SongError> {
        let mut songs: Vec<Song> = self.store.iter().map(|e| e.value().clone()).collect();
        songs.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.id.as_i64().cmp(&a.id.as_i64()))
        });
        Ok(songs)
    }
}
