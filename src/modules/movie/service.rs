use super::dto::{ListParams, MovieFields};
use super::model::Movie;
use super::repository::MovieRepository;
use crate::common::error::ApiError;
use crate::state::AppState;
use tracing::warn;
use uuid::Uuid;

pub struct MovieService;

impl MovieService {
    pub async fn list(state: AppState, params: &ListParams) -> Result<Vec<Movie>, ApiError> {
        let movies = MovieRepository::list(
            &state.db,
            params.keywords(),
            params.perpage(),
            params.offset(),
        )
        .await
        .map_err(ApiError::Internal)?;

        Ok(movies)
    }

    /// Every successful fetch counts as a view; the increment happens in the
    /// same statement that reads the row.
    pub async fn get(state: AppState, id: Uuid) -> Result<Movie, ApiError> {
        MovieRepository::increment_watched(&state.db, id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Movie not found".to_string()))
    }

    pub async fn most_viewed(state: AppState) -> Result<Movie, ApiError> {
        MovieRepository::most_viewed(&state.db)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Movie not found".to_string()))
    }

    pub async fn create(
        state: AppState,
        fields: MovieFields,
        video_key: String,
    ) -> Result<Movie, ApiError> {
        let movie = MovieRepository::create(&state.db, &fields, &video_key)
            .await
            .map_err(ApiError::Internal)?;

        Ok(movie)
    }

    /// Replacement ordering: the new blob is already stored when we get here,
    /// the row is updated next, and only then is the old blob removed. A
    /// failed removal leaks a blob but never leaves the record dangling.
    pub async fn update(
        state: AppState,
        id: Uuid,
        fields: MovieFields,
        new_video_key: Option<String>,
        previous_url: String,
    ) -> Result<Movie, ApiError> {
        let movie = MovieRepository::update(&state.db, id, &fields, new_video_key.as_deref())
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Movie not found".to_string()))?;

        if let Some(new_key) = new_video_key {
            if new_key != previous_url {
                if let Err(e) = state.storage.delete_object(&previous_url).await {
                    warn!("Failed to delete replaced video {}: {}", previous_url, e);
                }
            }
        }

        Ok(movie)
    }

    /// Cleanup for a blob stored before form validation failed.
    pub async fn discard_video(state: &AppState, key: &str) {
        if let Err(e) = state.storage.delete_object(key).await {
            warn!("Failed to discard uploaded video {}: {}", key, e);
        }
    }
}
