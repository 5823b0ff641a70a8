mod config;
mod document;
mod errors;
mod models;
mod render;
mod resume;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::document::source::{load_document, DocumentSource, FileSource, HttpSource};
use crate::render::controller::DisplayController;
use crate::render::template::Template;
use crate::resume::parser::{parse_document, ParseOptions};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume view v{}", env!("CARGO_PKG_VERSION"));

    // Load and parse the resume document once; the model is read-only afterwards
    let source: Box<dyn DocumentSource> = match &config.resume_url {
        Some(url) => Box::new(HttpSource::new(url.clone())?),
        None => Box::new(FileSource::new(&config.resume_path)),
    };
    let entries = load_document(source.as_ref())
        .await
        .with_context(|| format!("failed to load resume from {}", source.describe()))?;

    let options = ParseOptions {
        linked_meta_fields: config.linked_meta_fields.clone(),
    };
    let document = parse_document(entries, &options);
    if !document.diagnostics.is_empty() {
        warn!(
            count = document.diagnostics.len(),
            "resume parsed with skipped entries"
        );
    }

    // Compile the pristine template
    let template_source = tokio::fs::read_to_string(&config.template_path)
        .await
        .with_context(|| format!("failed to read template {}", config.template_path))?;
    let template = Template::from_yaml(&template_source)
        .with_context(|| format!("invalid template {}", config.template_path))?;
    info!(markers = template.bindings().len(), "template compiled");

    let controller = DisplayController::new(document, template, config.linked_meta_fields.clone());
    let state = AppState::new(controller, config.clone());

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
