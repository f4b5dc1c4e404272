use super::consts;
use super::AppState;
use crate::dto::{AlbumDto, MessageDto, SongDto};
use crate::error::ApiError;
use crate::form::{AlbumForm, MultipartForm, SongForm};
use crate::middleware::admin_gate::AdminGuard;
use actix_multipart::Multipart;
use actix_web::{web, web::Json, web::Path, web::ReqData, HttpResponse, Responder};
use application::auth::UserClaims;
use application::context::AppContext;
use domain::value::{AlbumId, SongId};
use serde_json::json;

fn context(claims: &UserClaims) -> AppContext {
    AppContext::new(&claims.user_name)
}

// Ids that do not parse can never resolve to a document.
fn song_id(raw: &str) -> Result<SongId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::NotFound("Song not found".to_string()))
}

fn album_id(raw: &str) -> Result<AlbumId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::NotFound("Album not found".to_string()))
}

async fn check_admin() -> impl Responder {
    Json(json!({ "admin": true }))
}

async fn list_songs(state: web::Data<AppState>) -> Result<Json<Vec<SongDto>>, ApiError> {
    let songs = state.query.list_songs().await?;
    Ok(Json(songs.into_iter().map(SongDto::from).collect()))
}

async fn create_song(
    state: web::Data<AppState>,
    claims: ReqData<UserClaims>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let form = MultipartForm::read(payload, state.max_upload_bytes).await?;
    // missing files are reported ahead of any field error
    if !form.has_file(consts::FIELD_AUDIO_FILE) || !form.has_file(consts::FIELD_IMAGE_FILE) {
        return Err(ApiError::BadRequest("Please upload all files".to_string()));
    }
    let cmd = SongForm::parse(form)?.into_create();
    let song = state.catalog.create_song(&context(&claims), cmd).await?;
    Ok(HttpResponse::Created().json(SongDto::from(song)))
}

async fn update_song(
    state: web::Data<AppState>,
    claims: ReqData<UserClaims>,
    path: Path<String>,
    payload: Multipart,
) -> Result<Json<SongDto>, ApiError> {
    let id = song_id(&path.into_inner())?;
    let form = MultipartForm::read(payload, state.max_upload_bytes).await?;
    let cmd = SongForm::parse(form)?.into_update(id);
    let song = state.catalog.update_song(&context(&claims), cmd).await?;
    Ok(Json(SongDto::from(song)))
}

async fn delete_song(
    state: web::Data<AppState>,
    claims: ReqData<UserClaims>,
    path: Path<String>,
) -> Result<Json<MessageDto>, ApiError> {
    let id = song_id(&path.into_inner())?;
    state.catalog.delete_song(&context(&claims), id).await?;
    Ok(Json(MessageDto::new("Song deleted successfully")))
}

async fn list_albums(state: web::Data<AppState>) -> Result<Json<Vec<AlbumDto>>, ApiError> {
    let albums = state.query.list_albums().await?;
    Ok(Json(albums.into_iter().map(AlbumDto::from).collect()))
}

async fn get_album(
    state: web::Data<AppState>,
    path: Path<String>,
) -> Result<Json<AlbumDto>, ApiError> {
    let id = album_id(&path.into_inner())?;
    let album = state.query.get_album(id).await?;
    Ok(Json(AlbumDto::from(album)))
}

async fn create_album(
    state: web::Data<AppState>,
    claims: ReqData<UserClaims>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let form = MultipartForm::read(payload, state.max_upload_bytes).await?;
    if !form.has_file(consts::FIELD_IMAGE_FILE) {
        return Err(ApiError::BadRequest("Please upload an image file".to_string()));
    }
    let cmd = AlbumForm::parse(form)?.into_create();
    let album = state.catalog.create_album(&context(&claims), cmd).await?;
    Ok(HttpResponse::Created().json(AlbumDto::from(album)))
}

async fn update_album(
    state: web::Data<AppState>,
    claims: ReqData<UserClaims>,
    path: Path<String>,
    payload: Multipart,
) -> Result<Json<AlbumDto>, ApiError> {
    let id = album_id(&path.into_inner())?;
    let form = MultipartForm::read(payload, state.max_upload_bytes).await?;
    let cmd = AlbumForm::parse(form)?.into_update(id);
    let album = state.catalog.update_album(&context(&claims), cmd).await?;
    Ok(Json(AlbumDto::from(album)))
}

async fn delete_album(
    state: web::Data<AppState>,
    claims: ReqData<UserClaims>,
    path: Path<String>,
) -> Result<Json<MessageDto>, ApiError> {
    let id = album_id(&path.into_inner())?;
    state.catalog.delete_album(&context(&claims), id).await?;
    Ok(Json(MessageDto::new("Album deleted successfully")))
}

async fn health() -> impl Responder {
    Json(json!({ "status": "ok" }))
}

pub fn configure_health(svc: &mut web::ServiceConfig) {
    svc.route(consts::URL_PATH_HEALTH, web::get().to(health));
}

pub fn configure_service(svc: &mut web::ServiceConfig) {
    svc.service(
        web::scope(consts::URL_PATH_ADMIN_API)
            .wrap(AdminGuard)
            .route("/check", web::get().to(check_admin))
            .service(
                web::resource("/songs")
                    .route(web::get().to(list_songs))
                    .route(web::post().to(create_song)),
            )
            .service(
                web::resource("/songs/{id}")
                    .route(web::put().to(update_song))
                    .route(web::delete().to(delete_song)),
            )
            .service(
                web::resource("/albums")
                    .route(web::get().to(list_albums))
                    .route(web::post().to(create_album)),
            )
            .service(
                web::resource("/albums/{id}")
                    .route(web::get().to(get_album))
                    .route(web::put().to(update_album))
                    .route(web::delete().to(delete_album)),
            ),
    );
}
