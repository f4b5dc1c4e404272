use crate::command::asset::MediaPayload;
use crate::command::catalog::{present, required_text, CatalogService};
use crate::context::AppContext;
use crate::error::AppError;
use domain::song::{AlbumChange, Song, SongDetails};
use domain::value::{AlbumId, SongId};
use log::{error, info, warn};

#[derive(Debug)]
pub struct CreateSongCmd {
    pub details: SongDetails,
    pub audio: Option<MediaPayload>,
    pub image: Option<MediaPayload>,
}

#[derive(Debug)]
pub struct UpdateSongCmd {
    pub id: SongId,
    pub details: SongDetails,
    /// Replaces the audio URL when present
    pub audio: Option<MediaPayload>,
    /// Replaces the image URL when present
    pub image: Option<MediaPayload>,
}

fn validate_details(details: SongDetails) -> Result<SongDetails, AppError> {
    Ok(SongDetails {
        title: required_text("title", details.title)?,
        artist: required_text("artist", details.artist)?,
        duration: details.duration,
        album_id: details.album_id,
    })
}

impl CatalogService {
    pub async fn create_song(
        &self,
        context: &AppContext,
        cmd: CreateSongCmd,
    ) -> Result<Song, AppError> {
        let (Some(audio), Some(image)) = (present(cmd.audio), present(cmd.image)) else {
            return Err(AppError::Validation("Please upload all files".to_string()));
        };
        let details = validate_details(cmd.details)?;
        self.check_album_ref(details.album_id.as_ref()).await?;

        let (audio_url, image_url) =
            futures::try_join!(self.upload(context, &audio), self.upload(context, &image))?;

        let song_id = SongId::from(self.id_generator.next_id().await?);
        let song = Song::new(song_id, details, audio_url, image_url);
        self.song_repository.save(&song).await?;

        if let Some(album_id) = song.album_id.clone() {
            self.attach_new_song(context, &song, album_id).await?;
        }

        info!(
            "[{}] {} created song {} '{}'",
            context.correlation_id, context.actor, song.id, song.title
        );
        Ok(song)
    }

    /// Second write of song creation. If the album cannot be updated the song
    /// document is removed again so no half-created song is left behind.
    async fn attach_new_song(
        &self,
        context: &AppContext,
        song: &Song,
        album_id: AlbumId,
    ) -> Result<(), AppError> {
        match self
            .album_repository
            .push_song(album_id.clone(), song.id.clone())
            .await
        {
            Ok(true) => Ok(()),
            Ok(false) => {
                warn!(
                    "[{}] album {} unchanged by song {}, reference is dangling or duplicate",
                    context.correlation_id, album_id, song.id
                );
                Ok(())
            }
            Err(e) => {
                warn!(
                    "[{}] attaching song {} to album {} failed, rolling back: {}",
                    context.correlation_id, song.id, album_id, e
                );
                if let Err(undo) = self.song_repository.delete(song.id.clone()).await {
                    error!(
                        "[{}] rollback of song {} failed: {}",
                        context.correlation_id, song.id, undo
                    );
                }
                Err(e.into())
            }
        }
    }

    pub async fn update_song(
        &self,
        context: &AppContext,
        cmd: UpdateSongCmd,
    ) -> Result<Song, AppError> {
        let mut song = self
            .song_repository
            .by_id(cmd.id.clone())
            .await?
            .ok_or_else(|| AppError::not_found("Song", &cmd.id))?;
        let details = validate_details(cmd.details)?;
        if details.album_id != song.album_id {
            self.check_album_ref(details.album_id.as_ref()).await?;
        }

        let (audio_url, image_url) = futures::try_join!(
            self.upload_optional(context, cmd.audio.as_ref()),
            self.upload_optional(context, cmd.image.as_ref())
        )?;
        if let Some(url) = audio_url {
            song.replace_audio(url);
        }
        if let Some(url) = image_url {
            song.replace_image(url);
        }
        let change = song.apply_details(details);
        self.song_repository.save(&song).await?;

        if let AlbumChange::Moved { from, to } = change {
            self.move_song(context, &song.id, from, to).await?;
        }

        info!(
            "[{}] {} updated song {}",
            context.correlation_id, context.actor, song.id
        );
        Ok(song)
    }

    /// Pulls the song from its previous album and pushes it onto the new one.
    async fn move_song(
        &self,
        context: &AppContext,
        song_id: &SongId,
        from: Option<AlbumId>,
        to: Option<AlbumId>,
    ) -> Result<(), AppError> {
        if let Some(old) = from {
            self.album_repository
                .pull_song(old.clone(), song_id.clone())
                .await?;
            info!(
                "[{}] song {} left album {}",
                context.correlation_id, song_id, old
            );
        }
        if let Some(new) = to {
            self.album_repository
                .push_song(new.clone(), song_id.clone())
                .await?;
            info!(
                "[{}] song {} joined album {}",
                context.correlation_id, song_id, new
            );
        }
        Ok(())
    }

    pub async fn delete_song(&self, context: &AppContext, id: SongId) -> Result<(), AppError> {
        let song = self
            .song_repository
            .by_id(id.clone())
            .await?
            .ok_or_else(|| AppError::not_found("Song", &id))?;

        if let Some(album_id) = song.album_id {
            self.album_repository.pull_song(album_id, id.clone()).await?;
        }
        self.song_repository.delete(id.clone()).await?;

        info!(
            "[{}] {} deleted song {}",
            context.correlation_id, context.actor, id
        );
        Ok(())
    }
}
