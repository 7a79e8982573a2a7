use actix_web::{error::JsonPayloadError, web, HttpRequest, HttpResponse, ResponseError};
use crate::services::auth_service::{
    CredentialService, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse,
    UpdateProfileRequest, UpdateProfileResponse,
};
use crate::utils::{AuthError, FieldViolation};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .app_data(web::JsonConfig::default().error_handler(json_error))
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/update", web::put().to(update_profile)),
    );
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registration successful", body = RegisterResponse),
        (status = 422, description = "User already exists or invalid input"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn register(
    service: web::Data<CredentialService>,
    request: web::Json<RegisterRequest>,
) -> HttpResponse {
    log::info!("📝 POST /auth/register - email: {}", request.email);

    match service.register(&request).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            log_failure("Registration", &request.email, &e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 404, description = "User not found"),
        (status = 422, description = "Password is incorrect or invalid input"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login(
    service: web::Data<CredentialService>,
    request: web::Json<LoginRequest>,
) -> HttpResponse {
    log::info!("🔐 POST /auth/login - email: {}", request.email);

    match service.login(&request).await {
        Ok(response) => {
            log::info!("✅ Login successful: {}", request.email);
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log_failure("Login", &request.email, &e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    put,
    path = "/api/auth/update",
    tag = "Auth",
    request_body = UpdateProfileRequest,
    params(
        ("email" = String, Header, description = "Email of the profile to update")
    ),
    responses(
        (status = 200, description = "Profile updated", body = UpdateProfileResponse),
        (status = 400, description = "Email header missing"),
        (status = 401, description = "Bearer token missing or not owned by the user (token policy only)"),
        (status = 404, description = "User not found"),
        (status = 422, description = "Validation errors"),
        (status = 500, description = "Internal server error")
    ),
    security(
        (),
        ("bearer_auth" = [])
    )
)]
pub async fn update_profile(
    service: web::Data<CredentialService>,
    req: HttpRequest,
    request: web::Json<UpdateProfileRequest>,
) -> HttpResponse {
    let email = header_str(&req, "email");
    log::info!("✏️ PUT /auth/update - email: {}", email.unwrap_or("N/A"));

    let bearer = header_str(&req, "Authorization").and_then(|v| v.strip_prefix("Bearer "));

    match service.update_profile(email, bearer, &request).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            log_failure("Profile update", email.unwrap_or("N/A"), &e);
            e.error_response()
        }
    }
}

/// Body rejections go through `AuthError` so they share the JSON error format.
fn json_error(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    let auth_error = match err {
        JsonPayloadError::Deserialize(e) => {
            let detail = e.to_string();
            let violation = match missing_field(&detail) {
                Some(field) => FieldViolation {
                    message: format!("{} is required", field),
                    field: field.to_string(),
                },
                None => FieldViolation {
                    field: "body".to_string(),
                    message: detail,
                },
            };
            AuthError::Validation(vec![violation])
        }
        other => AuthError::BadRequest(format!("Invalid JSON body: {}", other)),
    };

    log::warn!("❌ {} {} - rejected body: {}", req.method(), req.path(), auth_error);
    auth_error.into()
}

/// serde_json reports absent fields as "missing field `name` at line 1 column 2"
fn missing_field(detail: &str) -> Option<&str> {
    detail
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split('`').next())
}

fn header_str<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

fn log_failure(action: &str, email: &str, err: &AuthError) {
    match err {
        AuthError::Internal(detail) => log::error!("❌ {} failed: {} - {}", action, email, detail),
        AuthError::Validation(violations) => {
            log::warn!("❌ {} rejected: {} - {:?}", action, email, violations)
        }
        other => log::warn!("❌ {} failed: {} - {}", action, email, other),
    }
}
