use crate::common::error::FieldErrors;
use serde::Deserialize;
use utoipa::IntoParams;

pub const ALLOWED_VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "wmv"];

const DEFAULT_PER_PAGE: i64 = 10;
const DEFAULT_PAGE: i64 = 1;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    pub perpage: Option<i64>,
    pub page: Option<i64>,
    pub keywords: Option<String>,
}

impl ListParams {
    pub fn perpage(&self) -> i64 {
        self.perpage.filter(|p| *p > 0).unwrap_or(DEFAULT_PER_PAGE)
    }

    pub fn page(&self) -> i64 {
        self.page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.perpage()
    }

    pub fn keywords(&self) -> Option<&str> {
        self.keywords.as_deref().filter(|k| !k.is_empty())
    }
}

/// Returns the lowercased extension when the file name carries one of the
/// accepted video formats.
pub fn accepted_video_extension(file_name: &str) -> Option<String> {
    let ext = std::path::Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())?
        .to_ascii_lowercase();

    ALLOWED_VIDEO_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// State of the `video` part while walking the multipart form.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum VideoField {
    /// No `video` part was present.
    #[default]
    Missing,
    /// A `video` part arrived but its extension is not an accepted format;
    /// nothing was stored.
    Rejected,
    /// Streamed into the blob store under this key.
    Stored(String),
}

/// Fields collected from the multipart create/update form. Mirrors the
/// declared request schema; `validate` runs before any database mutation.
#[derive(Debug, Default)]
pub struct MovieForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub artists: Option<String>,
    pub genres: Option<String>,
    pub video: VideoField,
}

/// The validated form, ready to persist.
#[derive(Debug)]
pub struct MovieFields {
    pub title: String,
    pub description: String,
    pub duration: i32,
    pub artists: String,
    pub genres: String,
}

impl MovieForm {
    pub fn stored_video_key(&self) -> Option<&str> {
        match &self.video {
            VideoField::Stored(key) => Some(key),
            _ => None,
        }
    }

    pub fn validate(&self, video_required: bool) -> Result<MovieFields, FieldErrors> {
        let mut errors = FieldErrors::new();

        let title = require_text(&mut errors, "title", &self.title);
        let description = require_text(&mut errors, "description", &self.description);
        let artists = require_text(&mut errors, "artists", &self.artists);
        let genres = require_text(&mut errors, "genres", &self.genres);

        let duration = match self.duration.as_deref().filter(|d| !d.trim().is_empty()) {
            None => {
                add(&mut errors, "duration", "The duration field is required.");
                0
            }
            Some(raw) => match raw.trim().parse::<i32>() {
                Ok(d) => d,
                Err(_) => {
                    add(&mut errors, "duration", "The duration must be an integer.");
                    0
                }
            },
        };

        match &self.video {
            VideoField::Missing if video_required => {
                add(&mut errors, "video", "The video field is required.");
            }
            VideoField::Rejected => {
                add(
                    &mut errors,
                    "video",
                    "The video must be a file of type: mp4, avi, wmv.",
                );
            }
            _ => {}
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(MovieFields {
            title,
            description,
            duration,
            artists,
            genres,
        })
    }
}

fn require_text(errors: &mut FieldErrors, field: &str, value: &Option<String>) -> String {
    match value.as_deref().filter(|v| !v.trim().is_empty()) {
        Some(v) => v.to_string(),
        None => {
            add(errors, field, &format!("The {} field is required.", field));
            String::new()
        }
    }
}

fn add(errors: &mut FieldErrors, field: &str, message: &str) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_form() -> MovieForm {
        MovieForm {
            title: Some("Inception".into()),
            description: Some("A mind-bending heist".into()),
            duration: Some("148".into()),
            artists: Some("Leonardo DiCaprio".into()),
            genres: Some("sci-fi, thriller".into()),
            video: VideoField::Stored("videos/abc.mp4".into()),
        }
    }

    #[test]
    fn pagination_defaults_and_offset() {
        let params = ListParams::default();
        assert_eq!(params.perpage(), 10);
        assert_eq!(params.page(), 1);
        assert_eq!(params.offset(), 0);

        let params = ListParams {
            perpage: Some(5),
            page: Some(3),
            keywords: None,
        };
        assert_eq!(params.offset(), 10);
    }

    #[test]
    fn blank_keywords_count_as_absent() {
        let params = ListParams {
            keywords: Some("".into()),
            ..Default::default()
        };
        assert_eq!(params.keywords(), None);
    }

    #[test]
    fn accepted_extensions_are_case_insensitive() {
        assert_eq!(accepted_video_extension("movie.mp4").as_deref(), Some("mp4"));
        assert_eq!(accepted_video_extension("MOVIE.AVI").as_deref(), Some("avi"));
        assert_eq!(accepted_video_extension("clip.wmv").as_deref(), Some("wmv"));
        assert_eq!(accepted_video_extension("clip.mkv"), None);
        assert_eq!(accepted_video_extension("no-extension"), None);
    }

    #[test]
    fn complete_form_validates() {
        let fields = complete_form().validate(true).unwrap();
        assert_eq!(fields.title, "Inception");
        assert_eq!(fields.duration, 148);
    }

    #[test]
    fn missing_fields_are_all_reported() {
        let errors = MovieForm::default().validate(true).unwrap_err();
        for field in ["title", "description", "duration", "artists", "genres", "video"] {
            assert!(errors.contains_key(field), "expected error for {}", field);
        }
    }

    #[test]
    fn non_numeric_duration_is_rejected() {
        let form = MovieForm {
            duration: Some("two hours".into()),
            ..complete_form()
        };
        let errors = form.validate(true).unwrap_err();
        assert_eq!(errors["duration"], vec!["The duration must be an integer."]);
    }

    #[test]
    fn video_is_optional_on_update_only() {
        let form = MovieForm {
            video: VideoField::Missing,
            ..complete_form()
        };
        assert!(form.validate(false).is_ok());
        assert!(form.validate(true).is_err());
    }

    #[test]
    fn rejected_video_fails_even_when_optional() {
        let form = MovieForm {
            video: VideoField::Rejected,
            ..complete_form()
        };
        let errors = form.validate(false).unwrap_err();
        assert_eq!(
            errors["video"],
            vec!["The video must be a file of type: mp4, avi, wmv."]
        );
    }
}
