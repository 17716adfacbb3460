//! Exchange server binary

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use api_gateway::config::AppConfig;
use api_gateway::AppState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use clap::Parser;
use common::model::order::{OrderKind, OrderRequest, Side};
use dotenv::dotenv;
use matching_engine::MatchingEngine;
use tokio::signal;
use tokio::sync::RwLock;
use tracing::{debug, info, Level};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter, FmtSubscriber};

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Seed the book with demo orders
    #[clap(short, long)]
    demo: bool,

    /// Instrument to serve (overrides the MARKET environment variable)
    #[clap(short, long)]
    market: Option<String>,
}

// Static variable to track service start time
static START_TIME: AtomicU64 = AtomicU64::new(0);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv().ok();

    // Parse command line arguments
    let args = Args::parse();
    let config = AppConfig::new();

    // Initialize tracing with debug level if DEBUG=1 in .env
    let env_debug = std::env::var("DEBUG").unwrap_or_else(|_| "0".to_string());
    let log_level = if env_debug == "1" { Level::DEBUG } else { Level::INFO };

    // Create an environment filter
    let env_filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .parse("tower_http=debug,api_gateway=debug,matching_engine=debug")
        .unwrap();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
        .finish();

    // Only set the global subscriber if it hasn't been set already
    if tracing::subscriber::set_global_default(subscriber).is_ok() {
        info!("Tracing initialized");
        if env_debug == "1" {
            debug!("Debug logging enabled");
        }
    }

    info!("Starting Meridian Exchange...");

    // Initialize service start time for uptime tracking
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    START_TIME.store(now, Ordering::Relaxed);

    // Build the matching engine for the configured instrument
    let market = args.market.unwrap_or(config.market);
    let mut engine = MatchingEngine::new(market.clone());
    info!("Serving instrument {}", market);

    // Seed demo orders if requested
    if args.demo {
        seed_demo_book(&mut engine)?;
    }

    // Create app state
    let state = Arc::new(AppState {
        engine: RwLock::new(engine),
    });

    // Set up CORS
    let cors = tower_http::cors::CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    // Combine the API routes with the health check
    let app = api_gateway::router(state.clone())
        .merge(
            Router::new()
                .route("/health", get(health_check))
                .with_state(state),
        )
        .layer(cors)
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(tower_http::trace::DefaultMakeSpan::new().level(log_level))
                .on_request(tower_http::trace::DefaultOnRequest::new().level(log_level))
                .on_response(tower_http::trace::DefaultOnResponse::new().level(log_level)),
        );

    // Start the server
    info!("Starting API server on 0.0.0.0:{}", config.port);
    let addr: std::net::SocketAddr = ([0, 0, 0, 0], config.port).into();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down");
    Ok(())
}

// Health check endpoint
async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let engine = state.engine.read().await;
    let book = engine.book();

    let health_info = serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": get_uptime_seconds(),
        "market": book.market,
        "book": {
            "bids": book.bid_count(),
            "asks": book.ask_count(),
            "bestBid": book.best_bid(),
            "bestAsk": book.best_ask(),
        }
    });

    (axum::http::StatusCode::OK, Json(health_info))
}

// Helper function to get uptime in seconds
fn get_uptime_seconds() -> u64 {
    let start = START_TIME.load(Ordering::Relaxed);
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    now.saturating_sub(start)
}

/// Seed the book with a small demo ladder plus one crossing order
fn seed_demo_book(engine: &mut MatchingEngine) -> common::error::Result<()> {
    info!("Seeding demo book...");

    let orders = vec![
        OrderRequest { id: 1, side: Side::Buy, kind: OrderKind::Limit, price: 20000, quantity: 10 },
        OrderRequest { id: 2, side: Side::Buy, kind: OrderKind::Limit, price: 19500, quantity: 10 },
        OrderRequest { id: 3, side: Side::Buy, kind: OrderKind::Limit, price: 19000, quantity: 10 },
        OrderRequest { id: 4, side: Side::Sell, kind: OrderKind::Limit, price: 21000, quantity: 10 },
        OrderRequest { id: 5, side: Side::Sell, kind: OrderKind::Limit, price: 21500, quantity: 10 },
        OrderRequest { id: 6, side: Side::Sell, kind: OrderKind::Limit, price: 22000, quantity: 10 },
        // Crosses the best ask and generates a trade
        OrderRequest { id: 7, side: Side::Buy, kind: OrderKind::Limit, price: 21000, quantity: 5 },
    ];

    for request in orders {
        let result = engine.place(&request)?;
        if !result.trades.is_empty() {
            info!(
                "Demo order {} generated {} trades",
                request.id,
                result.trades.len()
            );
        }
        if result.taker_order.is_filled() {
            debug!("Demo order {} fully filled", request.id);
        }
    }

    if let Some(spread) = engine.book().spread() {
        info!("Demo book seeded, spread {}", spread);
    }
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
