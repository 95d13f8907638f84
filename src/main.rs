//! Demo server with documentation capture enabled.
//!
//! Serves a tiny pet store and writes `apidoc.html` / `apidoc.html.json`
//! as requests come in.
//!
//! ```text
//! apidoc-server --config apidoc.toml
//! curl -X POST localhost:8080/login -H 'Content-Type: application/json' -d '{"u":"a"}'
//! open apidoc.html
//! ```

use std::path::PathBuf;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Form, Json, Router,
};
use clap::Parser;
use serde::Deserialize;
use serde_json::json;

use apidoc_recorder::config::{load_config, AppConfig};
use apidoc_recorder::lifecycle::startup;
use apidoc_recorder::observability::logging;

#[derive(Parser)]
#[command(name = "apidoc-server")]
#[command(about = "Demo API server that documents itself", long_about = None)]
struct Cli {
    /// TOML configuration file. Without it the demo runs with recording on.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => {
            let mut config = AppConfig::default();
            config.doc.on = true;
            config.doc.doc_title = "Pet Store API".to_string();
            config
                .doc
                .base_urls
                .insert("local".to_string(), format!("http://{}", config.server.bind_address));
            config
        }
    };

    logging::init_tracing(&config.observability.log_level);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.server.bind_address,
        documenting = config.doc.on,
        doc_path = %config.doc.doc_path(),
        "apidoc-server starting"
    );

    startup::run(config, demo_app()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn demo_app() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/login", post(login))
        .route("/pets", get(list_pets).post(create_pet))
        .route("/pets/{id}", get(get_pet))
        .route("/favicon.ico", get(|| async { StatusCode::NO_CONTENT }))
}

#[derive(Deserialize)]
struct Login {
    u: String,
}

async fn login(Json(login): Json<Login>) -> impl IntoResponse {
    if login.u.is_empty() {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "ok": false })));
    }
    (StatusCode::OK, Json(json!({ "ok": true })))
}

#[derive(Deserialize)]
struct PetQuery {
    species: Option<String>,
}

async fn list_pets(Query(query): Query<PetQuery>) -> Json<serde_json::Value> {
    let pets = [("rex", "dog"), ("tom", "cat")]
        .into_iter()
        .filter(|(_, species)| query.species.as_deref().map_or(true, |s| s == *species))
        .map(|(name, species)| json!({ "name": name, "species": species }))
        .collect::<Vec<_>>();
    Json(json!(pets))
}

#[derive(Deserialize)]
struct NewPet {
    name: String,
}

async fn create_pet(Form(pet): Form<NewPet>) -> impl IntoResponse {
    (StatusCode::CREATED, Json(json!({ "name": pet.name })))
}

async fn get_pet(Path(id): Path<u32>) -> impl IntoResponse {
    match id {
        1 => (StatusCode::OK, Json(json!({ "id": 1, "name": "rex" }))),
        _ => (StatusCode::NOT_FOUND, Json(json!({ "error": "no such pet" }))),
    }
}
