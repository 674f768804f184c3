//! Dialogue engine server binary.
//!
//! Loads configuration, wires the OpenAI adapters and the in-memory session
//! store into the turn pipeline, and serves the conversation API.

use std::sync::Arc;

use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dialogue_engine::adapters::ai::{OpenAiConfig, OpenAiReplyGenerator, OpenAiSlotClassifier};
use dialogue_engine::adapters::http::{conversation_router, AppState};
use dialogue_engine::adapters::store::{InMemorySessionStore, RetryingSessionStore};
use dialogue_engine::application::{DialogueStart, TurnProcessor};
use dialogue_engine::config::{AppConfig, ValidationError};
use dialogue_engine::domain::catalog::DialogueCatalog;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.server.log_level)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Load and validate the dialogue catalog
    let catalog = match &config.bot.data_dir {
        Some(dir) => DialogueCatalog::from_dir(dir)?,
        None => DialogueCatalog::builtin()?,
    };
    let catalog = Arc::new(catalog);
    tracing::info!(
        "Dialogue catalog loaded, entry state {}",
        catalog.initial_state()
    );

    // OpenAI adapters
    let api_key = config
        .ai
        .openai_api_key
        .clone()
        .ok_or(ValidationError::MissingRequired("OPENAI_API_KEY"))?;
    let ai_config = OpenAiConfig::new(api_key)
        .with_classifier_model(config.ai.classifier_model.clone())
        .with_generator_model(config.ai.generator_model.clone())
        .with_base_url(config.ai.base_url.clone())
        .with_timeout(config.ai.timeout());
    let classifier = Arc::new(OpenAiSlotClassifier::new(ai_config.clone()));
    let generator = Arc::new(OpenAiReplyGenerator::new(ai_config));

    // Application state
    let start = Arc::new(DialogueStart::new(
        catalog.clone(),
        config.bot.treatment_fallback,
    ));
    let processor = Arc::new(TurnProcessor::new(&catalog, classifier, generator));
    let store = Arc::new(RetryingSessionStore::new(InMemorySessionStore::new()));
    let state = AppState::new(catalog, start, processor, store);

    let cors = match config.server.cors_origins_list() {
        origins if origins.is_empty() => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        origins => CorsLayer::new()
            .allow_origin(AllowOrigin::list(
                origins.iter().filter_map(|o| o.parse().ok()),
            ))
            .allow_methods(Any)
            .allow_headers(Any),
    };

    let app = conversation_router()
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(config.server.request_timeout()))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(cors),
        )
        .with_state(state);

    let addr = config.server.socket_addr();
    tracing::info!("Dialogue engine listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
