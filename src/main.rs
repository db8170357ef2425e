use axum::extract::{Extension, Query};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Router, routing::get};
use clap::Parser;
use peercache::config::NodeConfig;
use peercache::group::{Group, GroupRegistry};
use peercache::peers::HttpPool;
use peercache::peers::protocol::CONTENT_TYPE_OCTET_STREAM;
use serde::Deserialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

const STATS_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Parser)]
#[command(name = "peercache", about = "Distributed read-through cache node")]
struct Args {
    /// This node's address as other peers reach it
    #[arg(long, default_value = "http://127.0.0.1:8001")]
    addr: String,

    /// Comma-separated peer list (this node is added if missing)
    #[arg(long, value_delimiter = ',')]
    peers: Vec<String>,

    /// Bind address for the frontend API (e.g. 127.0.0.1:9999)
    #[arg(long)]
    api: Option<SocketAddr>,

    /// Main cache budget per group in bytes (0 = unbounded)
    #[arg(long, default_value_t = 2 << 10)]
    cache_bytes: usize,

    /// Observations needed before a key enters the main cache
    #[arg(long, default_value_t = 1)]
    admission_k: usize,

    /// Deadline for one remote fetch in milliseconds
    #[arg(long, default_value_t = 3_000)]
    fetch_timeout_ms: u64,

    #[arg(long)]
    verbose: bool,
}

#[derive(Deserialize)]
struct ApiParams {
    key: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let config = NodeConfig {
        addr: args.addr.clone(),
        peers: args.peers.clone(),
        cache_bytes: args.cache_bytes,
        admission_k: args.admission_k,
        fetch_timeout_ms: args.fetch_timeout_ms,
        ..Default::default()
    };

    tracing::info!("Starting node {}", config.addr);

    // 1. Groups:
    let groups = GroupRegistry::new();
    let scores = create_scores_group(&groups, &config);

    // 2. Peer pool:
    let pool = Arc::new(HttpPool::with_options(config.addr.clone(), config.pool_options()));
    let peers = config.peer_set();
    pool.set(&peers);
    scores.register_peers(pool.clone())?;
    tracing::info!("Peers: {:?}", peers);

    // 3. Frontend API:
    if let Some(api_addr) = args.api {
        let api = Router::new()
            .route("/api", get(handle_api))
            .layer(Extension(scores.clone()));
        let listener = tokio::net::TcpListener::bind(api_addr).await?;
        tracing::info!("Frontend API listening on {}", api_addr);
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, api).await {
                tracing::error!("Frontend API stopped: {}", e);
            }
        });
    }

    // 4. Stats reporter:
    let stats_groups = groups.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(STATS_INTERVAL);

        loop {
            interval.tick().await;
            for name in stats_groups.group_names() {
                if let Some(group) = stats_groups.get_group(&name) {
                    tracing::info!("Group stats [{}]: {:?}", name, group.stats());
                }
            }
        }
    });

    // 5. Peer server:
    let bind_addr = bind_addr_of(&config.addr)?;
    let app = pool.clone().router(groups.clone());

    tracing::info!("Peer server listening on {}{}", bind_addr, pool.base_path());
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(bind_addr.as_str()).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Demo group backed by a slow in-memory "database".
fn create_scores_group(groups: &GroupRegistry, config: &NodeConfig) -> Arc<Group> {
    let db: Arc<HashMap<&'static str, &'static str>> = Arc::new(HashMap::from([
        ("Tom", "630"),
        ("Jack", "589"),
        ("Sam", "567"),
    ]));

    let getter = move |key: String| {
        let db = db.clone();
        async move {
            tracing::info!("[SlowDB] search key {}", key);
            tokio::time::sleep(Duration::from_millis(100)).await;
            match db.get(key.as_str()) {
                Some(value) => Ok(value.as_bytes().to_vec()),
                None => Err(anyhow::anyhow!("{} not exist", key)),
            }
        }
    };

    groups.new_group_with_cache("scores", config.cache_shard(), getter)
}

async fn handle_api(
    Extension(group): Extension<Arc<Group>>,
    Query(params): Query<ApiParams>,
) -> Response {
    match group.get(&params.key).await {
        Ok(view) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, CONTENT_TYPE_OCTET_STREAM)],
            view.to_bytes(),
        )
            .into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// `http://host:port` -> `host:port`.
fn bind_addr_of(addr: &str) -> anyhow::Result<String> {
    let url = reqwest::Url::parse(addr)?;
    let host = url
        .host_str()
        .ok_or_else(|| anyhow::anyhow!("address {} has no host", addr))?;
    let port = url
        .port_or_known_default()
        .ok_or_else(|| anyhow::anyhow!("address {} has no port", addr))?;
    Ok(format!("{}:{}", host, port))
}
