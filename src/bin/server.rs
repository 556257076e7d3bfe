use std::{
    error::Error,
    fs::OpenOptions,
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use housing_expenses::{
    AppState, DEFAULT_CASHBOX_USER_ID, build_cors_layer, build_router, graceful_shutdown,
    logging_middleware,
};

/// The JSON API server for housing expenses.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, env = "HOUSING_EXPENSES_DB_PATH")]
    db_path: String,

    /// The address to serve the API from.
    #[arg(long, env = "HOUSING_EXPENSES_HOST", default_value = "127.0.0.1")]
    host: IpAddr,

    /// The port to serve the API from.
    #[arg(short, long, env = "HOUSING_EXPENSES_PORT", default_value_t = 3000)]
    port: u16,

    /// The origin allowed to make cross-origin requests, or `*` for any origin.
    #[arg(long, env = "HOUSING_EXPENSES_ORIGIN", default_value = "*")]
    allowed_origin: String,

    /// The user whose deposits fill the cash box.
    #[arg(long, env = "HOUSING_EXPENSES_CASHBOX_USER_ID", default_value_t = DEFAULT_CASHBOX_USER_ID)]
    cashbox_user_id: i64,

    /// File path to append debug logs to.
    #[arg(long, env = "HOUSING_EXPENSES_LOG_FILE", default_value = "debug.log")]
    log_file: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    setup_logging(&args.log_file)?;

    let addr = SocketAddr::new(args.host, args.port);

    let connection = Connection::open(&args.db_path)?;
    let state = AppState::new(connection, args.cashbox_user_id)?;
    let cors_layer = build_cors_layer(&args.allowed_origin)?;

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = build_router(state).layer(middleware::from_fn(logging_middleware));
    let router = add_tracing_layer(router).layer(cors_layer);

    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await?;

    Ok(())
}

fn setup_logging(log_file_path: &str) -> Result<(), std::io::Error> {
    let stdout_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(stdout_filter);

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_ansi(false)
        .with_writer(Arc::new(log_file))
        .with_filter(filter::LevelFilter::DEBUG);

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(debug_log)
        .init();

    Ok(())
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // Errors are logged where they are converted into responses.
        .on_failure(());

    router.layer(tracing_layer)
}
