//! Dining Concierge API server.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dining_concierge::adapters::ai::{
    AnthropicConfig, AnthropicProvider, MockAIProvider, OpenAIConfig, OpenAIProvider,
};
use dining_concierge::adapters::http::{
    api_router, with_middleware, ApiState, HealthState, ReservationHandlers, SearchHandlers,
};
use dining_concierge::adapters::nlu::LlmInterpreter;
use dining_concierge::adapters::places::{GooglePlacesConfig, GooglePlacesProvider, MockPlacesProvider};
use dining_concierge::adapters::storage::InMemorySessionStore;
use dining_concierge::application::{
    ConditionExtractor, PlaceSearchAdapter, PlaceSearchSettings, RunSearchHandler,
};
use dining_concierge::config::{AiConfig, AiProvider, AppConfig, PlacesConfig};
use dining_concierge::ports::{AIProvider, LanguageInterpreter, PlacesProvider, ReservationSessionStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    tracing::info!(environment = ?config.server.environment, "starting Dining Concierge");

    // Adapters
    let ai = build_ai_provider(&config.ai)?;
    let interpreter: Arc<dyn LanguageInterpreter> = Arc::new(LlmInterpreter::new(ai));
    let places = build_places_provider(&config.places)?;
    let places_is_mock = places.is_mock();
    let store = Arc::new(InMemorySessionStore::new(config.reservation.session_ttl()));

    // Application
    let settings = PlaceSearchSettings {
        default_location: config.places.default_location.clone(),
        page_size: config.places.page_size,
        max_provider_pages: config.places.max_provider_pages,
        cache_ttl: config.places.cache_ttl(),
        ..PlaceSearchSettings::default()
    };
    let run_search = RunSearchHandler::new(
        ConditionExtractor::new(interpreter.clone()),
        Arc::new(PlaceSearchAdapter::new(places, settings)),
    );

    let state = ApiState {
        search: SearchHandlers::new(Arc::new(run_search)),
        reservation: ReservationHandlers::new(
            store.clone(),
            interpreter.clone(),
            config.reservation.max_failed_attempts,
        ),
        health: HealthState {
            nlu: interpreter.name().to_string(),
            places_is_mock,
        },
    };

    spawn_session_sweeper(store, config.reservation.sweep_interval());

    let app = with_middleware(api_router(state), &config.server);
    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, nlu = %interpreter.name(), places_is_mock, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone()));
    let registry = tracing_subscriber::registry().with(filter);

    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().pretty()).init();
    }
}

fn build_ai_provider(config: &AiConfig) -> Result<Arc<dyn AIProvider>, Box<dyn std::error::Error>> {
    let provider: Arc<dyn AIProvider> = match config.selected_provider() {
        Some(AiProvider::OpenAI) => {
            let key = config.openai_key().ok_or("OpenAI key vanished")?;
            let mut openai = OpenAIConfig::new(key)
                .with_timeout(config.timeout())
                .with_max_retries(config.max_retries);
            if let Some(model) = &config.model {
                openai = openai.with_model(model.trim());
            }
            Arc::new(OpenAIProvider::new(openai)?)
        }
        Some(AiProvider::Anthropic) => {
            let key = config.anthropic_key().ok_or("Anthropic key vanished")?;
            let mut anthropic = AnthropicConfig::new(key)
                .with_timeout(config.timeout())
                .with_max_retries(config.max_retries);
            if let Some(model) = &config.model {
                anthropic = anthropic.with_model(model.trim());
            }
            Arc::new(AnthropicProvider::new(anthropic)?)
        }
        None => {
            tracing::warn!("no AI API key configured; language understanding is disabled");
            Arc::new(MockAIProvider::new())
        }
    };
    Ok(provider)
}

fn build_places_provider(
    config: &PlacesConfig,
) -> Result<Arc<dyn PlacesProvider>, Box<dyn std::error::Error>> {
    match config.google_key() {
        Some(key) => {
            let google = GooglePlacesConfig::new(key)
                .with_base_url(config.base_url.clone())
                .with_language(config.language.clone())
                .with_region(config.region.clone())
                .with_timeout(config.timeout());
            Ok(Arc::new(GooglePlacesProvider::new(google)?))
        }
        None => {
            tracing::warn!("Google Places API key not configured; using mock venues");
            Ok(Arc::new(MockPlacesProvider::new()))
        }
    }
}

fn spawn_session_sweeper(store: Arc<InMemorySessionStore>, every: std::time::Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let purged = store.purge_expired().await;
            if purged > 0 {
                tracing::debug!(purged, "expired reservation sessions purged");
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
