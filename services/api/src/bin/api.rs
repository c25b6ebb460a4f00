//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{
        tts::voice_from_name, FileAudioStore, MemoryStore, OpenAiContentAdapter,
        OpenAiTtsAdapter, SendGridEmailAdapter, TwilioSmsAdapter,
    },
    config::Config,
    error::ApiError,
    web::{
        contact_methods_handler, generate_content_handler, health_handler,
        process_voice_handler, rest::ApiDoc, share_results_handler, state::AppState,
        submit_answers_handler,
    },
};
use async_openai::{config::OpenAIConfig, types::SpeechModel, Client};
use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use lingualisten_core::ports::DeliveryChannel;
use lingualisten_core::sharing::ShareDispatcher;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Initialize the Store and Audio Cache ---
    let store = Arc::new(MemoryStore::new());
    let audio = Arc::new(FileAudioStore::new(config.audio_dir.clone()));
    audio.ensure_dir().await?;

    // --- 3. Initialize Service Adapters ---
    let openai_config = OpenAIConfig::new().with_api_key(
        config
            .openai_api_key
            .as_ref()
            .ok_or_else(|| ApiError::Internal("OPENAI_API_KEY is required".to_string()))?,
    );
    let openai_client = Client::with_config(openai_config);

    let content_adapter = Arc::new(OpenAiContentAdapter::new(
        openai_client.clone(),
        config.content_model.clone(),
    ));

    let tts_voice = voice_from_name(&config.tts_voice).ok_or_else(|| {
        ApiError::Internal(format!(
            "Invalid TTS voice specified in config: '{}'",
            config.tts_voice
        ))
    })?;
    let tts_adapter = Arc::new(OpenAiTtsAdapter::new(
        openai_client.clone(),
        SpeechModel::Tts1Hd,
        tts_voice,
    ));

    let http_client = reqwest::Client::new();
    let email_channel: Arc<dyn DeliveryChannel> = Arc::new(SendGridEmailAdapter::new(
        http_client.clone(),
        config.email.clone(),
    ));
    let sms_channel: Arc<dyn DeliveryChannel> =
        Arc::new(TwilioSmsAdapter::new(http_client, config.sms.clone()));
    let sharing = Arc::new(ShareDispatcher::new(vec![email_channel, sms_channel]));

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        store,
        content: content_adapter,
        tts: tts_adapter,
        audio,
        sharing,
        config: config.clone(),
    });

    let cors = CorsLayer::new()
        .allow_origin(
            config
                .allowed_origin
                .parse::<HeaderValue>()
                .map_err(|e| ApiError::Internal(format!("Invalid ALLOWED_ORIGIN: {}", e)))?,
        )
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 5. Create the Web Router ---
    let api_router = Router::new()
        .route("/health", get(health_handler))
        .route("/contact-methods", get(contact_methods_handler))
        .route("/generate-content", post(generate_content_handler))
        .route("/process-voice", post(process_voice_handler))
        .route("/submit-answers", post(submit_answers_handler))
        .route("/share-results", post(share_results_handler))
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the static audio files and the Swagger UI.
    let app = Router::new()
        .merge(api_router)
        .nest_service("/audio", ServeDir::new(&config.audio_dir))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
