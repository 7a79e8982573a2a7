use actix_web::http::header;
use actix_web::middleware::DefaultHeaders;

/// Responses carry bearer tokens: never cache, never sniff
pub fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add((header::CACHE_CONTROL, "no-store"))
        .add((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
}
