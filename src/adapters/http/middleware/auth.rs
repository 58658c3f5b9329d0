use actix_web::{
  Error, HttpMessage, ResponseError,
  body::EitherBody,
  dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::{
  future::{Ready, ready},
  rc::Rc,
  sync::Arc,
};

use crate::{
  adapters::http::errors::ApiError, application::auth::GetCurrentUserUseCase,
  domain::auth::User,
};

/// Resolves the bearer token to a [`User`] and attaches it to the request
///
/// Requests without a valid session get a 401 error envelope and never reach the handler.
///
/// ```no_run
/// use actix_web::{App, web};
/// use std::sync::Arc;
/// # use invoiceu::application::auth::GetCurrentUserUseCase;
/// # use invoiceu::adapters::http::middleware::AuthMiddleware;
///
/// # async fn example(get_user_use_case: Arc<GetCurrentUserUseCase>) {
/// let app = App::new().service(
///   web::scope("/api/v1")
///     .wrap(AuthMiddleware::new(get_user_use_case))
///     .route("/ping", web::get().to(|| async { "pong" })),
/// );
/// # }
/// ```
pub struct AuthMiddleware {
  get_user_use_case: Arc<GetCurrentUserUseCase>,
}

impl AuthMiddleware {
  pub fn new(get_user_use_case: Arc<GetCurrentUserUseCase>) -> Self {
    Self { get_user_use_case }
  }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Transform = AuthMiddlewareService<S>;
  type InitError = ();
  type Future = Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(AuthMiddlewareService {
      service: Rc::new(service),
      get_user_use_case: self.get_user_use_case.clone(),
    }))
  }
}

pub struct AuthMiddlewareService<S> {
  service: Rc<S>,
  get_user_use_case: Arc<GetCurrentUserUseCase>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  forward_ready!(service);

  fn call(&self, req: ServiceRequest) -> Self::Future {
    let service = Rc::clone(&self.service);
    let get_user_use_case = self.get_user_use_case.clone();

    Box::pin(async move {
      let user = match extract_session_token(&req) {
        Ok(token) => get_user_use_case.execute(token).await.map_err(ApiError::from),
        Err(e) => Err(e),
      };

      let user = match user {
        Ok(user) => user,
        Err(e) => {
          tracing::debug!(path = %req.path(), "Rejected unauthenticated request");
          let (request, _) = req.into_parts();
          let response = e.error_response().map_into_right_body();
          return Ok(ServiceResponse::new(request, response));
        }
      };

      req.extensions_mut().insert(user);

      let res = service.call(req).await?;
      Ok(res.map_into_left_body())
    })
  }
}

fn extract_session_token(req: &ServiceRequest) -> Result<String, ApiError> {
  req
    .headers()
    .get("Authorization")
    .and_then(|h| h.to_str().ok())
    .and_then(|s| s.strip_prefix("Bearer "))
    .map(|s| s.trim().to_string())
    .filter(|s| !s.is_empty())
    .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))
}

/// Access to the caller attached by [`AuthMiddleware`]
pub trait AuthUser {
  /// Fails with 401 when the route is not behind the middleware
  fn authenticated_user(&self) -> Result<User, ApiError>;
}

impl AuthUser for actix_web::HttpRequest {
  fn authenticated_user(&self) -> Result<User, ApiError> {
    self
      .extensions()
      .get::<User>()
      .cloned()
      .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::test::TestRequest;

  #[test]
  fn test_extract_session_token_valid() {
    let req = TestRequest::default()
      .insert_header(("Authorization", "Bearer test_token_123"))
      .to_srv_request();

    assert_eq!(extract_session_token(&req).unwrap(), "test_token_123");
  }

  #[test]
  fn test_extract_session_token_missing() {
    let req = TestRequest::default().to_srv_request();
    assert!(extract_session_token(&req).is_err());
  }

  #[test]
  fn test_extract_session_token_rejects_other_schemes() {
    let req = TestRequest::default()
      .insert_header(("Authorization", "Basic dXNlcjpwYXNz"))
      .to_srv_request();
    assert!(extract_session_token(&req).is_err());

    let req = TestRequest::default()
      .insert_header(("Authorization", "Bearer   "))
      .to_srv_request();
    assert!(extract_session_token(&req).is_err());
  }

  #[test]
  fn test_authenticated_user_without_middleware() {
    let req = TestRequest::default().to_http_request();
    assert!(matches!(
      req.authenticated_user(),
      Err(ApiError::Unauthorized(_))
    ));
  }
}
