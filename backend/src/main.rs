use std::sync::Arc;
use std::thread;
use std::time::Duration;

use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use backend::config::ServerConfig;
use backend::gateway::provider::GeminiClient;
use backend::gateway::EvaluationGateway;
use backend::ingest;
use backend::services;
use backend::state::AppState;
use backend::store::RecordStore;
use clap::Parser;
use env_logger::Env;
use include_dir::{include_dir, Dir};
use log::{error, info, warn};
use mime_guess::from_path;

static STATIC_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/static/dist");

async fn serve_embedded(req: HttpRequest) -> HttpResponse {
    let path = req.path().trim_start_matches('/');
    let file_path = if path.is_empty() { "index.html" } else { path };

    match STATIC_DIR.get_file(file_path) {
        Some(file) => {
            let mime = from_path(file_path).first_or_octet_stream();
            HttpResponse::Ok()
                .content_type(mime.as_ref())
                .body(file.contents().to_vec())
        }
        None => match STATIC_DIR.get_file("index.html") {
            Some(index) => HttpResponse::Ok()
                .content_type("text/html; charset=utf-8")
                .body(index.contents().to_vec()),
            None => HttpResponse::NotFound().body("Not Found"),
        },
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let config = ServerConfig::parse();
    let url = config.url();

    let mut records = RecordStore::new();
    if let Err(e) = ingest::load_file(&config.data_file, &mut records) {
        error!(
            "Could not load solutions from {}: {}",
            config.data_file.display(),
            e
        );
    }
    let store = records.shared();

    let gateway = match GeminiClient::new(config.gemini_api_key.clone(), &config.gemini_base_url) {
        Ok(client) => Some(EvaluationGateway::new(
            Arc::new(client),
            store.clone(),
            config.gateway(),
        )),
        Err(e) => {
            warn!("Evaluation disabled: {}", e);
            None
        }
    };
    let state = AppState::new(store, gateway);

    if config.open_browser {
        let url = url.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(500));
            let _ = webbrowser::open(&url);
        });
    }

    info!("Server running at {}", url);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(services::configure)
            .default_service(web::route().to(serve_embedded))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
