use std::{
    env::{self},
    fs::OpenOptions,
    net::SocketAddr,
    path::PathBuf,
    process::exit,
    sync::Arc,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{
    EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt,
};

use budget_dash::{
    AccountRegistry, AppState, BenchmarkTables, DashboardConfig, build_router, graceful_shutdown,
    load_transaction_table,
};

/// The web server for the bank and ESG dashboards.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory containing a `<bank>_transactions.csv` file for each bank.
    #[arg(long, env = "DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// The port to serve the dashboards from.
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// The account balance before the first transaction.
    #[arg(long, env = "INITIAL_BALANCE", default_value_t = 1000.0)]
    initial_balance: f64,

    /// The default weekly budget for each expense category.
    #[arg(long, env = "WEEKLY_BUDGET", default_value_t = 50.0)]
    weekly_budget: f64,

    /// Seed for the ESG benchmarks. The same seed gives the same benchmarks.
    #[arg(long, env = "BENCHMARK_SEED", default_value_t = 42)]
    benchmark_seed: u64,

    /// The name shown in the dashboard greeting.
    #[arg(long, env = "OWNER_NAME", default_value = "Zeno")]
    owner_name: String,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let secret = env::var("SECRET").ok();
    if secret.is_none() {
        tracing::warn!(
            "The environment variable 'SECRET' is not set, budgets will not survive a restart"
        );
    }

    let registry = AccountRegistry::default();
    let transactions = match load_transaction_table(&args.data_dir, &registry) {
        Ok(transactions) => transactions,
        Err(error) => {
            tracing::error!("Could not load transactions: {error}");
            exit(1);
        }
    };

    tracing::info!("Generating ESG benchmarks with seed {}", args.benchmark_seed);
    let benchmarks = BenchmarkTables::generate(args.benchmark_seed);

    let config = DashboardConfig {
        initial_balance: args.initial_balance,
        default_weekly_budget: args.weekly_budget,
        owner_name: args.owner_name,
        ..Default::default()
    };

    let state = AppState::new(secret.as_deref(), transactions, benchmarks, config);

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(state));

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    tracing::info!("HTTP server listening on {}", addr);
    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("Server error: {error}");
        exit(1);
    }
}

/// Log to stdout at the level set by `RUST_LOG` (INFO by default) and to
/// `debug.log` at DEBUG.
fn setup_logging() {
    let stdout_filter = EnvFilter::builder()
        .with_default_directive(filter::LevelFilter::INFO.into())
        .from_env_lossy();
    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(stdout_filter);

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(log_file))
        .with_filter(filter::LevelFilter::DEBUG);

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(debug_log)
        .init();
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
        // Errors are logged where they are handled.
        .on_failure(());

    router.layer(tracing_layer)
}
