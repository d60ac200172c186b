use crate::common::response::MessageResponse;
use crate::modules::auth::dto::{LoginRequest, RegisterRequest, TokenResponse};
use crate::modules::auth::model::{User, UserRole};
use crate::modules::movie::model::Movie;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::handler::register,
        crate::modules::auth::handler::login,
        crate::modules::auth::handler::me,
        crate::modules::auth::handler::logout,
        crate::modules::auth::handler::refresh,
        crate::modules::movie::handler::list_movies,
        crate::modules::movie::handler::get_movie,
        crate::modules::movie::handler::most_viewed,
        crate::modules::movie::handler::create_movie,
        crate::modules::movie::handler::update_movie,
        crate::modules::movie::handler::delete_movie,
    ),
    components(
        schemas(
            RegisterRequest, LoginRequest, TokenResponse, MessageResponse,
            User, UserRole, Movie,
        )
    ),
    tags(
        (name = "Auth", description = "Registration and token authentication"),
        (name = "Movies", description = "Movie catalog")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::Modify;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
