use actix_web::{get, http::StatusCode, web, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};

use crate::{domain::SearchQuery, services::TitleSearch};

#[derive(Deserialize)]
pub struct SearchParams {
    query: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

#[derive(thiserror::Error)]
pub enum SearchError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("search failed: {0:#}")]
    CollaboratorFailure(#[from] anyhow::Error),
}

impl std::fmt::Debug for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::InvalidInput(reason) => write!(f, "InvalidInput({})", reason),
            SearchError::CollaboratorFailure(e) => write!(f, "CollaboratorFailure({:?})", e),
        }
    }
}

impl ResponseError for SearchError {
    fn status_code(&self) -> StatusCode {
        match self {
            SearchError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            SearchError::CollaboratorFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            detail: self.to_string(),
        })
    }
}

/// Turns malformed query strings into the same JSON 400 body as a blank query.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|e, _req| SearchError::InvalidInput(e.to_string()).into())
}

#[get("/search")]
pub async fn search(
    params: web::Query<SearchParams>,
    title_search: web::Data<TitleSearch>,
) -> Result<HttpResponse, SearchError> {
    let query = SearchQuery::parse(params.into_inner().query.unwrap_or_default())
        .map_err(SearchError::InvalidInput)?;

    let result = title_search.search(&query).await?;

    Ok(HttpResponse::Ok().json(result))
}
