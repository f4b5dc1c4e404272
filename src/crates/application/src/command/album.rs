use crate::command::asset::MediaPayload;
use crate::command::catalog::{present, required_text, CatalogService};
use crate::context::AppContext;
use crate::error::AppError;
use domain::album::{Album, AlbumDetails};
use domain::value::AlbumId;
use log::info;

#[derive(Debug)]
pub struct CreateAlbumCmd {
    pub details: AlbumDetails,
    pub image: Option<MediaPayload>,
}

#[derive(Debug)]
pub struct UpdateAlbumCmd {
    pub id: AlbumId,
    pub details: AlbumDetails,
    /// Replaces the cover URL when present
    pub image: Option<MediaPayload>,
}

fn validate_details(details: AlbumDetails) -> Result<AlbumDetails, AppError> {
    Ok(AlbumDetails {
        title: required_text("title", details.title)?,
        artist: required_text("artist", details.artist)?,
        release_year: details.release_year,
    })
}

impl CatalogService {
    pub async fn create_album(
        &self,
        context: &AppContext,
        cmd: CreateAlbumCmd,
    ) -> Result<Album, AppError> {
        let Some(image) = present(cmd.image) else {
            return Err(AppError::Validation("Please upload an image file".to_string()));
        };
        let details = validate_details(cmd.details)?;

        let image_url = self.upload(context, &image).await?;
        let album_id = AlbumId::from(self.id_generator.next_id().await?);
        let album = Album::new(album_id, details, image_url);
        self.album_repository.save(&album).await?;

        info!(
            "[{}] {} created album {} '{}'",
            context.correlation_id, context.actor, album.id, album.title
        );
        Ok(album)
    }

    pub async fn update_album(
        &self,
        context: &AppContext,
        cmd: UpdateAlbumCmd,
    ) -> Result<Album, AppError> {
        let mut album = self
            .album_repository
            .by_id(cmd.id.clone())
            .await?
            .ok_or_else(|| AppError::not_found("Album", &cmd.id))?;
        let details = validate_details(cmd.details)?;

        if let Some(url) = self.upload_optional(context, cmd.image.as_ref()).await? {
            album.replace_image(url);
        }
        album.apply_details(details);
        self.album_repository.save(&album).await?;

        info!(
            "[{}] {} updated album {}",
            context.correlation_id, context.actor, album.id
        );
        Ok(album)
    }

    /// Removes the album's songs first, then the album itself, so a song never
    /// outlives the album it points at.
    pub async fn delete_album(&self, context: &AppContext, id: AlbumId) -> Result<(), AppError> {
        if self.album_repository.by_id(id.clone()).await?.is_none() {
            return Err(AppError::not_found("Album", &id));
        }
        let removed = self.song_repository.delete_by_album(id.clone()).await?;
        self.album_repository.delete(id.clone()).await?;

        info!(
            "[{}] {} deleted album {} with {} songs",
            context.correlation_id, context.actor, id, removed
        );
        Ok(())
    }
}
