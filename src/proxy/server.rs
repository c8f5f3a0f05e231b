use crate::error::{AppError, AppResult};
use crate::models::{AppConfig, BugReportConfig};
use crate::modules::db::ShareStore;
use crate::proxy::handlers;
use crate::proxy::middleware::{handle_preflight, with_cors_headers};
use crate::proxy::upstream::{IdentityClient, UpstreamClient};
use axum::{
    extract::DefaultBodyLimit,
    response::{IntoResponse, Json, Response},
    routing::{get, post, MethodRouter},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

/// Axum application state
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<UpstreamClient>,
    pub share_store: Arc<ShareStore>,
    pub identity: Option<Arc<IdentityClient>>,
    pub bug_report: Arc<BugReportConfig>,
    pub public_base_url: Option<String>,
    pub api_key: Option<String>,
}

impl AppState {
    pub fn from_config(config: &AppConfig, share_store: Arc<ShareStore>) -> AppResult<Self> {
        let upstream = Arc::new(UpstreamClient::new(&config.proxy)?);

        let identity = config.identity.url.as_deref().map(|url| {
            Arc::new(IdentityClient::new(
                upstream.http_client().clone(),
                url,
                config.identity.api_key.clone(),
            ))
        });

        Ok(Self {
            upstream,
            share_store,
            identity,
            bug_report: Arc::new(config.bug_report.clone()),
            public_base_url: config.proxy.public_base_url.clone(),
            api_key: config.proxy.api_key.clone(),
        })
    }
}

fn forward_methods() -> MethodRouter<AppState> {
    get(handlers::forward::handle_forward)
        .post(handlers::forward::handle_forward)
        .put(handlers::forward::handle_forward)
        .delete(handlers::forward::handle_forward)
        .options(handle_preflight)
}

/// Full gateway router. Static `/api/...` routes take precedence over the
/// forwarding wildcard.
pub fn build_router(state: AppState) -> Router {
    let forward_routes = Router::new()
        .route("/api", forward_methods())
        .route("/api/*path", forward_methods())
        .layer(axum::middleware::map_response(with_cors_headers));

    Router::new()
        .route(
            "/api/share",
            post(handlers::share::handle_create_share).get(handlers::share::handle_get_share),
        )
        .route(
            "/api/report-bug",
            post(handlers::bug_report::handle_report_bug),
        )
        .route(
            "/api/test-auth",
            get(handlers::auth_check::handle_test_auth),
        )
        .route("/healthz", get(health_check_handler))
        .merge(forward_routes)
        .layer(DefaultBodyLimit::max(handlers::forward::MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Axum server instance
pub struct AxumServer {
    shutdown_tx: Option<oneshot::Sender<()>>,
    local_addr: SocketAddr,
}

impl AxumServer {
    /// Bind and start serving in a background task
    pub async fn start(
        host: &str,
        port: u16,
        state: AppState,
    ) -> AppResult<(Self, tokio::task::JoinHandle<()>)> {
        let app = build_router(state);

        // Bind address
        let addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| AppError::Config(format!("Failed to bind address {}: {}", addr, e)))?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Gateway server started at http://{}", local_addr);

        // Create shutdown channel
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let server_instance = Self {
            shutdown_tx: Some(shutdown_tx),
            local_addr,
        };

        // One task per connection; dropping a connection drops its in-flight handler
        let handle = tokio::spawn(async move {
            use hyper::server::conn::http1;
            use hyper_util::rt::TokioIo;
            use hyper_util::service::TowerToHyperService;

            loop {
                tokio::select! {
                    res = listener.accept() => {
                        match res {
                            Ok((stream, _)) => {
                                let io = TokioIo::new(stream);
                                let service = TowerToHyperService::new(app.clone());

                                tokio::task::spawn(async move {
                                    if let Err(err) = http1::Builder::new()
                                        .serve_connection(io, service)
                                        .await
                                    {
                                        debug!("Connection handling finished or errored: {:?}", err);
                                    }
                                });
                            }
                            Err(e) => {
                                error!("Failed to accept connection: {:?}", e);
                            }
                        }
                    }
                    _ = &mut shutdown_rx => {
                        tracing::info!("Gateway server stopped listening");
                        break;
                    }
                }
            }
        });

        Ok((server_instance, handle))
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop server
    pub fn stop(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Health check handler
async fn health_check_handler() -> Response {
    Json(serde_json::json!({
        "status": "ok"
    }))
    .into_response()
}
