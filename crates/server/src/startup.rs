use common::env::ensure_env;
use configs::{AppConfig, ServerConfig};
use dotenvy::dotenv;
use proto::{CatalogServer, FILE_DESCRIPTOR_SET};
use service::seed::seed_if_empty;
use service::Catalog;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tower::limit::GlobalConcurrencyLimitLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::rpc::CatalogRpc;

/// Public entry: load config, prepare storage and serve gRPC until the
/// listener fails.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();

    let cfg = AppConfig::load_and_validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    ensure_env(&cfg.database.url)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;

    let db = models::db::connect_and_migrate(&cfg.database).await?;
    let catalog = Catalog::from_connection(db);
    if cfg.seed.enabled {
        seed_if_empty(&catalog).await?;
    }

    let addr = cfg.server.bind_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!(service = "catalog", event = "listening", %addr, "catalog gRPC server listening");
    serve(listener, catalog, cfg.server).await
}

/// Serve the catalog on an already bound listener.
pub async fn serve(listener: TcpListener, catalog: Catalog, cfg: ServerConfig) -> anyhow::Result<()> {
    let (reflection_v1, reflection_v1alpha) = if cfg.reflection {
        let v1 = tonic_reflection::server::Builder::configure()
            .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
            .build_v1()?;
        let v1alpha = tonic_reflection::server::Builder::configure()
            .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
            .build_v1alpha()?;
        (Some(v1), Some(v1alpha))
    } else {
        (None, None)
    };

    info!(
        service = "catalog",
        event = "serve",
        concurrency_limit = cfg.concurrency_limit,
        reflection = cfg.reflection,
        "starting catalog service"
    );

    let mut server = Server::builder().layer(GlobalConcurrencyLimitLayer::new(cfg.concurrency_limit));
    server
        .add_service(CatalogServer::new(CatalogRpc::new(catalog)))
        .add_optional_service(reflection_v1)
        .add_optional_service(reflection_v1alpha)
        .serve_with_incoming(TcpListenerStream::new(listener))
        .await?;
    Ok(())
}
