use utoipa::OpenApi;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "GiftLink Auth API",
        version = "1.0.0",
        description = "User registration, login and profile update.\n\n**Tokens:** successful calls return a signed bearer token embedding the user id. Tokens do not expire.\n\n**Update identity:** `PUT /api/auth/update` addresses the user through the `email` header. A bearer token is only checked when the server runs with `UPDATE_REQUIRES_TOKEN=true`."
    ),
    paths(
        // Auth endpoints
        crate::api::auth::register,
        crate::api::auth::login,
        crate::api::auth::update_profile,

        // Health
        crate::api::health::health_check,
    ),
    components(
        schemas(
            // Auth
            crate::services::auth_service::RegisterRequest,
            crate::services::auth_service::RegisterResponse,
            crate::services::auth_service::LoginRequest,
            crate::services::auth_service::LoginResponse,
            crate::services::auth_service::UpdateProfileRequest,
            crate::services::auth_service::UpdateProfileResponse,
            crate::utils::error::FieldViolation,

            // Health
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Registration, login and profile update."),
        (name = "Health", description = "Liveness and user store connectivity."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token returned by register, login or update"))
                        .build()
                ),
            );
        }
    }
}
