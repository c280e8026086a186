mod config;
mod roster;
mod routes;
mod store;

use std::path::Path;
use std::sync::Arc;

use axum::http::Method;
use axum::routing::get;
use axum::Router;
use globe::{AirportTable, Person, PersonRecord};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::{ServerConfig, SourceConfig};
use crate::roster::RosterCache;
use crate::store::{PersonSource, StaticSource, TabularStore};

#[derive(Clone)]
struct AppState {
    people: Arc<dyn PersonSource>,
    airports: Arc<AirportTable>,
    roster: Arc<RosterCache>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(err) = run().await {
        error!("{err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = ServerConfig::from_env()?;
    let airports = load_airports(&cfg.airports_path).await?;
    info!(
        path = %cfg.airports_path.display(),
        records = airports.len(),
        "airport table loaded"
    );

    let people: Arc<dyn PersonSource> = match &cfg.source {
        SourceConfig::Store(store) => {
            Arc::new(TabularStore::new(store.clone(), reqwest::Client::new()))
        }
        SourceConfig::File(path) => {
            let people = load_people(path).await?;
            info!(path = %path.display(), people = people.len(), "serving people from file");
            Arc::new(StaticSource::new(people))
        }
    };

    let state = AppState {
        people,
        airports: Arc::new(airports),
        roster: Arc::new(RosterCache::new(cfg.roster_ttl)),
    };

    let listener = tokio::net::TcpListener::bind(cfg.addr).await?;
    info!("neighborhood server listening on http://{}", cfg.addr);
    axum::serve(listener, app(state)).await?;
    Ok(())
}

async fn load_airports(path: &Path) -> Result<AirportTable, String> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| format!("read {}: {e}", path.display()))?;
    AirportTable::from_json(&text).map_err(|e| format!("parse {}: {e}", path.display()))
}

async fn load_people(path: &Path) -> Result<Vec<Person>, String> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| format!("read {}: {e}", path.display()))?;
    let records: Vec<PersonRecord> =
        serde_json::from_str(&text).map_err(|e| format!("parse {}: {e}", path.display()))?;
    Ok(records.into_iter().map(PersonRecord::into_person).collect())
}

fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods([Method::GET, Method::OPTIONS]);

    Router::new()
        .route("/healthz", get(routes::healthz))
        .route("/api/neighbors", get(routes::list_neighbors))
        .route("/api/neighbors/:id", get(routes::get_neighbor))
        .route("/api/globe", get(routes::get_globe))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
