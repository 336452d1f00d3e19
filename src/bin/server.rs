use std::{
    env,
    error::Error,
    fs::OpenOptions,
    net::{IpAddr, SocketAddr},
    path::PathBuf,
    process::ExitCode,
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

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use finboard::{
    AppState, PaginationConfig, build_router, get_local_offset, graceful_shutdown,
    logging_middleware,
};

/// Every log line at debug level and above is appended here.
const DEBUG_LOG_FILE: &str = "debug.log";

/// Serve the finboard web app. The cookie secret is read from the `SECRET`
/// environment variable.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database. Created if missing.
    #[arg(long)]
    db_path: PathBuf,

    /// The port to listen on.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The IP address to listen on.
    #[arg(short, long, default_value = "127.0.0.1")]
    address: IpAddr,

    /// Canonical name of the local timezone, e.g. "Pacific/Auckland".
    #[arg(short, long, default_value = "Etc/UTC")]
    timezone: String,

    /// Transactions per page when a request does not say.
    #[arg(long, default_value_t = 10)]
    page_size: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(error) = setup_logging() {
        eprintln!("could not set up logging: {error}");
        return ExitCode::FAILURE;
    }

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("{error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), Box<dyn Error>> {
    if get_local_offset(&args.timezone).is_none() {
        return Err(format!(
            "invalid timezone \"{}\", use a canonical name such as \"Pacific/Auckland\"",
            args.timezone
        )
        .into());
    }

    let secret = env::var("SECRET").map_err(|_| "the environment variable SECRET must be set")?;

    let connection = Connection::open(&args.db_path)?;
    let pagination_config = PaginationConfig {
        default_page_size: args.page_size,
        ..PaginationConfig::default()
    };
    let state = AppState::new(connection, &secret, &args.timezone, pagination_config)?;

    let router = build_router(state).layer(middleware::from_fn(logging_middleware));
    let router = with_request_spans(router);
    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let address = SocketAddr::from((args.address, args.port));
    tracing::info!("listening on http://{address}");

    axum_server::bind(address)
        .handle(handle)
        .serve(router.into_make_service())
        .await?;

    Ok(())
}

/// Log to stdout at `RUST_LOG` level (default info) and everything from
/// debug up to [DEBUG_LOG_FILE].
fn setup_logging() -> Result<(), Box<dyn Error>> {
    let stdout_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(stdout_filter);

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(DEBUG_LOG_FILE)?;
    let file_log = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(log_file))
        .with_filter(filter::LevelFilter::DEBUG);

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(file_log)
        .try_init()?;

    Ok(())
}

/// Wrap each request in a span named after its matched route.
fn with_request_spans(router: Router) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request| {
            let route = request
                .extensions()
                .get::<MatchedPath>()
                .map(MatchedPath::as_str);

            tracing::debug_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                route
            )
        })
        // Handlers log their own errors.
        .on_failure(());

    router.layer(trace_layer)
}
