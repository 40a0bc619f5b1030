use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, ResponseError, get, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::charts::ChartOptions;
use crate::dashboard::Dashboard;
use crate::dataset::Dataset;
use crate::error::StatsError;
use crate::positions::Page;

const INDEX_HTML: &str = include_str!("../static/index.html");

/// Shared by every worker; the dataset is loaded once and never mutated.
#[derive(Debug, Clone, Copy)]
pub struct ServerState {
    pub data: &'static Dataset,
    pub opts: ChartOptions,
}

impl ServerState {
    fn dashboard(&self) -> Dashboard<'static> {
        Dashboard::new(self.data, self.opts)
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unknown page `{0}`")]
    UnknownPage(String),
    #[error(transparent)]
    Stats(#[from] StatsError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::UnknownPage(_) => StatusCode::NOT_FOUND,
            ApiError::Stats(StatsError::NotAPlayer(_) | StatsError::UnknownPlayerId(_)) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Stats(StatsError::UnknownCategory { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Stats(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}

fn api_page(slug: &str) -> Result<Page, ApiError> {
    Page::from_slug(slug).ok_or_else(|| ApiError::UnknownPage(slug.to_string()))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: i64,
    version: &'static str,
    players: usize,
    tables: Vec<String>,
}

#[get("/health")]
async fn health_handler(state: web::Data<ServerState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().timestamp(),
        version: env!("CARGO_PKG_VERSION"),
        players: state.data.players().len(),
        tables: state
            .data
            .table_names()
            .into_iter()
            .map(str::to_string)
            .collect(),
    })
}

#[get("/")]
async fn index_handler() -> impl Responder {
    page_shell(Page::Home)
}

/// Any single-segment path serves the shell; unknown ones render the home page.
#[get("/{page}")]
async fn page_handler(path: web::Path<String>) -> impl Responder {
    page_shell(Page::from_path(&path.into_inner()))
}

fn page_shell(page: Page) -> HttpResponse {
    let body = INDEX_HTML
        .replace("{{PAGE}}", page.slug())
        .replace("{{TITLE}}", page.label());
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

#[get("/pages/{page}/positions")]
async fn positions_handler(
    state: web::Data<ServerState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let page = api_page(&path)?;
    Ok(HttpResponse::Ok().json(state.dashboard().positions(page)))
}

#[derive(Debug, Deserialize)]
struct PlayersQuery {
    position: Option<String>,
}

#[get("/pages/{page}/players")]
async fn players_handler(
    state: web::Data<ServerState>,
    path: web::Path<String>,
    query: web::Query<PlayersQuery>,
) -> Result<HttpResponse, ApiError> {
    let page = api_page(&path)?;
    let position = query
        .position
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty());
    Ok(HttpResponse::Ok().json(state.dashboard().players(page, position)))
}

#[get("/pages/{page}/players/{name}")]
async fn player_view_handler(
    state: web::Data<ServerState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (slug, name) = path.into_inner();
    let page = api_page(&slug)?;
    let view = state.dashboard().player_view(page, &name)?;
    Ok(HttpResponse::Ok().json(view))
}

#[get("/players/{name}/keeper/{category}")]
async fn keeper_figure_handler(
    state: web::Data<ServerState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (name, category) = path.into_inner();
    let figure = state.dashboard().keeper_figure(&name, &category)?;
    Ok(HttpResponse::Ok().json(figure))
}

/// Registers every route. The API scope goes first so `/{page}` never shadows it.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_handler)
        .service(
            web::scope("/api")
                .service(positions_handler)
                .service(players_handler)
                .service(player_view_handler)
                .service(keeper_figure_handler),
        )
        .service(index_handler)
        .service(page_handler);
}
