use actix_web::HttpResponse;

/// Liveness probe
/// GET /health
pub async fn health_handler() -> HttpResponse {
  HttpResponse::Ok().content_type("text/plain").body("OK")
}
