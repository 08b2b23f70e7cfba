use actix_web::{get, HttpResponse, Responder};
use serde_json::json;

#[get("/")]
pub async fn default() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "message": "Paper title search service is running, query /search?query=xxx to find the closest title"
    }))
}
