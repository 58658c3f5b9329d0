use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
  adapters::http::{
    dtos::{
      AddClientRequest, ApiResponse, ClientFilterQuery, PageQuery, SearchQuery,
      UpdateClientRequest,
    },
    errors::ApiError,
    middleware::AuthUser,
  },
  application::client::{
    AddClientCommand, AddClientUseCase, DeleteClientUseCase, GetClientUseCase,
    ListClientsCommand, ListClientsUseCase, SearchClientsUseCase, UpdateClientCommand,
    UpdateClientUseCase,
  },
};

/// Add client
/// POST /api/v1/clients/addclient
pub async fn add_client_handler(
  request: web::Json<AddClientRequest>,
  use_case: web::Data<Arc<AddClientUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user()?;
  let request = request.into_inner();
  request.validate()?;

  let client = use_case
    .execute(AddClientCommand {
      user_id: user.id,
      client: request.into(),
    })
    .await?;

  Ok(HttpResponse::Created().json(ApiResponse::success("Client added successfully", client)))
}

/// List clients, paginated
/// GET /api/v1/clients/getclients
pub async fn list_clients_handler(
  query: web::Query<PageQuery>,
  use_case: web::Data<Arc<ListClientsUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user()?;
  let query = query.into_inner();
  let response = use_case
    .execute(ListClientsCommand {
      user_id: user.id,
      page: query.page,
      limit: query.limit,
    })
    .await?;

  let message = if response.clients.is_empty() {
    "No clients found"
  } else {
    "Clients retrieved successfully"
  };
  Ok(HttpResponse::Ok().json(ApiResponse::success(message, response)))
}

/// GET /api/v1/clients/getclient/{id}
pub async fn get_client_handler(
  client_id: web::Path<Uuid>,
  use_case: web::Data<Arc<GetClientUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user()?;
  let client = use_case.execute(user.id, client_id.into_inner()).await?;
  Ok(HttpResponse::Ok().json(ApiResponse::success("Client retrieved successfully", client)))
}

/// Update client
/// PUT /api/v1/clients/updateclient/{id}
pub async fn update_client_handler(
  client_id: web::Path<Uuid>,
  request: web::Json<UpdateClientRequest>,
  use_case: web::Data<Arc<UpdateClientUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user()?;
  let request = request.into_inner();
  request.validate()?;

  let client = use_case
    .execute(UpdateClientCommand {
      user_id: user.id,
      client_id: client_id.into_inner(),
      update: request.into(),
    })
    .await?;

  Ok(HttpResponse::Ok().json(ApiResponse::success("Client updated successfully", client)))
}

/// Business-name search
/// GET /api/v1/clients/search?search=
pub async fn search_clients_handler(
  query: web::Query<SearchQuery>,
  use_case: web::Data<Arc<SearchClientsUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user()?;
  let response = use_case.search(user.id, query.into_inner().search).await?;

  let message = if response.clients.is_empty() {
    "No clients found"
  } else {
    "Clients retrieved successfully"
  };
  Ok(HttpResponse::Ok().json(ApiResponse::success(message, response)))
}

/// Combined search, industry and city filter
/// GET /api/v1/clients/filter
pub async fn filter_clients_handler(
  query: web::Query<ClientFilterQuery>,
  use_case: web::Data<Arc<SearchClientsUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user()?;
  let response = use_case.filter(user.id, query.into_inner().into()).await?;

  let message = if response.clients.is_empty() {
    "No clients found"
  } else {
    "Clients retrieved successfully"
  };
  Ok(HttpResponse::Ok().json(ApiResponse::success(message, response)))
}

/// Delete client
/// DELETE /api/v1/clients/deleteclient/{id}
pub async fn delete_client_handler(
  client_id: web::Path<Uuid>,
  use_case: web::Data<Arc<DeleteClientUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user()?;
  use_case.execute(user.id, client_id.into_inner()).await?;
  Ok(HttpResponse::Ok().json(ApiResponse::message("Client deleted successfully")))
}

/// GET /api/v1/clients/count
pub async fn count_clients_handler(
  use_case: web::Data<Arc<ListClientsUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user()?;
  let response = use_case.count(user.id).await?;
  Ok(HttpResponse::Ok().json(ApiResponse::success("Clients counted successfully", response)))
}
