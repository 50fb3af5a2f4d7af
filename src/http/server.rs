//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router routing every path to the proxy handler
//! - Wire up middleware (tracing)
//! - Convert axum requests into `InboundRequest` and back
//! - Serve with graceful shutdown

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::ProxyConfig;
use crate::http::client::UpstreamClient;
use crate::http::handler::RequestForwarder;
use crate::http::request::InboundRequest;
use crate::lifecycle::shutdown;

/// Application state injected into handlers.
pub type AppState = Arc<RequestForwarder<UpstreamClient>>;

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, native_tls::Error> {
        let client = UpstreamClient::new(&config.upstream)?;
        let state: AppState = Arc::new(RequestForwarder::new(client, config.upstream.clone()));

        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// The router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown_rx` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            timeout_secs = self.config.upstream.timeout_secs,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Hands every request, whatever its method or path, to the forwarder.
async fn proxy_handler(State(forwarder): State<AppState>, request: Request<Body>) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let (parts, _body) = request.into_parts();
    let inbound = InboundRequest::from_parts(&parts, peer);

    let span = tracing::info_span!("request", request_id = %Uuid::new_v4());
    forwarder.handle(inbound).instrument(span).await.into_response()
}
