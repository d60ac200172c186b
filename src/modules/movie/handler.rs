use super::dto::{accepted_video_extension, ListParams, MovieForm, VideoField};
use super::model::Movie;
use super::repository::MovieRepository;
use super::service::MovieService;
use crate::common::error::ApiError;
use crate::common::upload::stream_to_storage;
use crate::state::AppState;
use anyhow::anyhow;
use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::info;
use uuid::Uuid;

/// List movies with pagination and keyword search
#[utoipa::path(
    get,
    path = "/api/v1/movies",
    params(ListParams),
    responses(
        (status = 200, description = "Page of movies, empty array when none match", body = Vec<Movie>)
    ),
    tag = "Movies"
)]
pub async fn list_movies(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Movie>>, ApiError> {
    let movies = MovieService::list(state, &params).await?;

    Ok(Json(movies))
}

/// Fetch a movie and count the view
#[utoipa::path(
    get,
    path = "/api/v1/movies/{id}",
    params(("id" = Uuid, Path, description = "Movie ID")),
    responses(
        (status = 200, description = "Movie with its updated view count", body = Movie),
        (status = 404, description = "No such movie")
    ),
    tag = "Movies"
)]
pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Movie>, ApiError> {
    let movie = MovieService::get(state, id).await?;

    Ok(Json(movie))
}

/// Movie with the highest view count
#[utoipa::path(
    get,
    path = "/api/v1/movies/most-viewed",
    responses(
        (status = 200, description = "Most viewed movie", body = Movie),
        (status = 404, description = "Catalog is empty")
    ),
    tag = "Movies"
)]
pub async fn most_viewed(State(state): State<AppState>) -> Result<Json<Movie>, ApiError> {
    let movie = MovieService::most_viewed(state).await?;

    Ok(Json(movie))
}

/// Create a movie with its video file
#[utoipa::path(
    post,
    path = "/api/v1/movies",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Movie created", body = Movie),
        (status = 400, description = "Validation failed, body is a field-message map"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Movies"
)]
pub async fn create_movie(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = collect_movie_form(&state, multipart).await?;

    let fields = match form.validate(true) {
        Ok(fields) => fields,
        Err(errors) => {
            // The video streams to storage while the form is still being
            // read, so a blob may exist for a form that fails validation.
            if let Some(key) = form.stored_video_key() {
                MovieService::discard_video(&state, key).await;
            }
            return Err(ApiError::Validation(errors));
        }
    };

    let video_key = form
        .stored_video_key()
        .ok_or_else(|| ApiError::field("video", "The video field is required."))?
        .to_string();

    let movie = MovieService::create(state, fields, video_key).await?;

    Ok((StatusCode::CREATED, Json(movie)))
}

/// Update a movie, optionally replacing its video file
#[utoipa::path(
    put,
    path = "/api/v1/movies/{id}",
    params(("id" = Uuid, Path, description = "Movie ID")),
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Movie updated", body = Movie),
        (status = 400, description = "Validation failed, body is a field-message map"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No such movie")
    ),
    security(("bearer_auth" = [])),
    tag = "Movies"
)]
pub async fn update_movie(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<Movie>, ApiError> {
    let existing = MovieRepository::find_by_id(&state.db, id)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound("Movie not found".to_string()))?;

    let form = collect_movie_form(&state, multipart).await?;

    let fields = match form.validate(false) {
        Ok(fields) => fields,
        Err(errors) => {
            if let Some(key) = form.stored_video_key() {
                MovieService::discard_video(&state, key).await;
            }
            return Err(ApiError::Validation(errors));
        }
    };

    let new_video_key = form.stored_video_key().map(str::to_string);

    let movie = MovieService::update(state, id, fields, new_video_key, existing.url).await?;

    Ok(Json(movie))
}

/// Delete a movie
#[utoipa::path(
    delete,
    path = "/api/v1/movies/{id}",
    params(("id" = Uuid, Path, description = "Movie ID")),
    responses(
        (status = 501, description = "Deletion is not part of the implemented contract"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Movies"
)]
pub async fn delete_movie(Path(_id): Path<Uuid>) -> ApiError {
    ApiError::NotImplemented("Movie deletion is not implemented".to_string())
}

/// Walks the multipart form, collecting text fields and streaming an
/// accepted video file straight into the blob store.
async fn collect_movie_form(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<MovieForm, ApiError> {
    let mut form = MovieForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Internal(anyhow!("Multipart error: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "title" | "description" | "duration" | "artists" | "genres" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::Internal(anyhow!("Multipart error: {}", e)))?;
                match name.as_str() {
                    "title" => form.title = Some(value),
                    "description" => form.description = Some(value),
                    "duration" => form.duration = Some(value),
                    "artists" => form.artists = Some(value),
                    _ => form.genres = Some(value),
                }
            }
            "video" => {
                let file_name = field.file_name().unwrap_or("").to_string();

                match accepted_video_extension(&file_name) {
                    Some(ext) => {
                        let key = format!("videos/{}.{}", Uuid::new_v4(), ext);
                        info!("Storing video {} as {}", file_name, key);

                        let stored = stream_to_storage(&state.storage, field, key).await?;
                        form.video = VideoField::Stored(stored);
                    }
                    None => {
                        // Unaccepted format: record the failure, drop the body.
                        form.video = VideoField::Rejected;
                    }
                }
            }
            _ => {}
        }
    }

    Ok(form)
}
