use super::dto::MovieFields;
use super::model::Movie;
use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

pub struct MovieRepository;

impl MovieRepository {
    /// Keyword search is one OR group over the four text columns, so it
    /// composes correctly with the pagination window.
    pub async fn list(
        pool: &PgPool,
        keywords: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Movie>> {
        let movies = match keywords {
            Some(keywords) => {
                let pattern = format!("%{}%", keywords);
                sqlx::query_as::<_, Movie>(
                    r#"
                    SELECT * FROM movies
                    WHERE (title LIKE $1 OR description LIKE $1 OR artists LIKE $1 OR genres LIKE $1)
                    ORDER BY created_at
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(pattern)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Movie>(
                    "SELECT * FROM movies ORDER BY created_at LIMIT $1 OFFSET $2",
                )
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?
            }
        };

        Ok(movies)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Movie>> {
        let movie = sqlx::query_as::<_, Movie>("SELECT * FROM movies WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(movie)
    }

    /// Bumps the view counter in a single UPDATE so concurrent fetches of the
    /// same movie cannot lose increments. Returns `None` for an unknown id.
    pub async fn increment_watched(pool: &PgPool, id: Uuid) -> Result<Option<Movie>> {
        let movie = sqlx::query_as::<_, Movie>(
            r#"
            UPDATE movies
            SET total_watched = total_watched + 1, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(movie)
    }

    /// Ties on `total_watched` resolve in implementation order.
    pub async fn most_viewed(pool: &PgPool) -> Result<Option<Movie>> {
        let movie = sqlx::query_as::<_, Movie>(
            "SELECT * FROM movies ORDER BY total_watched DESC LIMIT 1",
        )
        .fetch_optional(pool)
        .await?;

        Ok(movie)
    }

    pub async fn create(pool: &PgPool, fields: &MovieFields, url: &str) -> Result<Movie> {
        let movie = sqlx::query_as::<_, Movie>(
            r#"
            INSERT INTO movies (title, description, duration, artists, genres, url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(fields.duration)
        .bind(&fields.artists)
        .bind(&fields.genres)
        .bind(url)
        .fetch_one(pool)
        .await?;

        Ok(movie)
    }

    /// `url` stays untouched when no replacement video was uploaded.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        fields: &MovieFields,
        url: Option<&str>,
    ) -> Result<Option<Movie>> {
        let movie = sqlx::query_as::<_, Movie>(
            r#"
            UPDATE movies
            SET title = $1,
                description = $2,
                duration = $3,
                artists = $4,
                genres = $5,
                url = COALESCE($6, url),
                updated_at = NOW()
            WHERE id = $7
            RETURNING *
            "#,
        )
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(fields.duration)
        .bind(&fields.artists)
        .bind(&fields.genres)
        .bind(url)
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(movie)
    }
}
