use anyhow::Result;
use axum::Router;
use clap::Parser;
use search_core::persist::{load_corpus, DataPaths};
use search_server::build_app;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "search-server")]
#[command(about = "Serve BM25 keyword search over a pre-built corpus")]
struct Args {
    /// Directory holding inverted_index.json, doc_meta.csv and corpus_clean_v2.csv
    #[arg(long, default_value = "./data")]
    data_dir: String,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let service = load_corpus(&DataPaths::new(&args.data_dir));
    if let Some(err) = service.init_error() {
        // keep serving so every request reports the failure
        tracing::error!(error = err, "corpus failed to load");
    }
    let app: Router = build_app(service);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
