//! Crate for Stripboard, a tiny status page server with an upstream JSON relay.

#[cfg(feature = "rustls-tls")]
#[cfg(feature = "native-tls")]
compile_error!("You can only enable one TLS backend");

pub extern crate url;

mod http_client;
mod middleware;
mod routes;

use crate::http_client::{BuildHttpClientArgs, build_http_client};
use anyhow::Result;
use axum::{Router, middleware as axum_middleware, routing::get};
use http_client::HttpClient;
use routes::{API_ENDPOINT, INDEX_ENDPOINT};
use std::{net::SocketAddr, path::PathBuf, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    catch_panic::CatchPanicLayer,
    normalize_path::NormalizePathLayer,
    timeout::TimeoutLayer,
    trace::{self, TraceLayer},
};
use tracing::{Level, info};
use url::Url;

/// The upstream endpoint that is relayed by default: the latest xkcd comic's metadata.
pub const DEFAULT_UPSTREAM_URL: &str = "https://xkcd.com/info.0.json";

/// # Example
/// ```rust,no_run
/// use std::net::{SocketAddr, IpAddr, Ipv4Addr};
/// use stripboard::{Server, Settings};
///
/// # #[tokio::main]
/// # async fn main() {
/// let server = Server::new(Settings::default()).unwrap();
/// server.start(&SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 2578)).await.unwrap();
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Server {
    router_inner: Router,
}

/// Settings to run the Stripboard server with.
#[derive(Debug, Clone)]
pub struct Settings {
    /// How long (in seconds) to allow a request to be processed before it is abandoned
    /// and an error is sent to the client.
    pub request_timeout: u64,
    /// Path of the HTML page served on the index route.
    ///
    /// The file is read from disk on every request so edits show up without a restart.
    pub page_path: PathBuf,
    /// The upstream endpoint whose response body is relayed verbatim on the api route.
    pub upstream_url: Url,
    /// See [`UpstreamSettings`].
    pub upstream_settings: UpstreamSettings,
}

/// Configuration options used when making any call to the upstream service.
#[derive(Debug, Clone)]
pub struct UpstreamSettings {
    /// Whether or not to allow invalid/expired/forged TLS certificates when making upstream requests.
    ///
    /// Enabling this is dangerous and is usually not necessary.
    pub allow_invalid_certs: bool,
    /// How long (in seconds) to wait for a request to the upstream server to complete before it's abandoned
    /// and an error is sent back to the requester.
    pub request_timeout: u64,
    /// The maximum amount of redirects to follow when making a request to the upstream server before stopping.
    pub max_redirects: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            request_timeout: 30,
            page_path: PathBuf::from("index.html"),
            upstream_url: Url::parse(DEFAULT_UPSTREAM_URL).expect("default upstream URL is valid"),
            upstream_settings: UpstreamSettings::default(),
        }
    }
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            allow_invalid_certs: false,
            max_redirects: 10,
            request_timeout: 10,
        }
    }
}

#[derive(Debug, Clone)]
struct AppState {
    client: HttpClient,
    settings: Settings,
}

impl Server {
    /// Create a new [`Server`] using the provided [`Settings`].
    pub fn new(settings: Settings) -> Result<Self> {
        let router = Router::new()
            .route(INDEX_ENDPOINT, get(routes::index_handler))
            .route(API_ENDPOINT, get(routes::api_handler))
            .fallback(routes::not_found_handler)
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                    .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
            )
            .layer(TimeoutLayer::new(Duration::from_secs(
                settings.request_timeout,
            )))
            .layer(NormalizePathLayer::trim_trailing_slash())
            .layer(CatchPanicLayer::new())
            .layer(axum_middleware::from_fn(middleware::header_middleware))
            .with_state(AppState {
                client: build_http_client(BuildHttpClientArgs {
                    allow_invalid_certs: settings.upstream_settings.allow_invalid_certs,
                    max_redirects: settings.upstream_settings.max_redirects,
                    request_timeout: Duration::from_secs(
                        settings.upstream_settings.request_timeout,
                    ),
                })?,
                settings,
            });

        Ok(Self {
            router_inner: router,
        })
    }

    /// Start the server and expose it on the provided [`SocketAddr`].
    pub async fn start(self, address: &SocketAddr) -> Result<()> {
        let tcp_listener = TcpListener::bind(&address).await?;
        self.serve(tcp_listener).await
    }

    /// Serve requests on an already-bound [`TcpListener`] until interrupted.
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        info!("Listening on http://{}", listener.local_addr()?);
        axum::serve(listener, self.router_inner)
            .with_graceful_shutdown(async {
                tokio::signal::ctrl_c()
                    .await
                    .expect("failed to listen for ctrl-c");
            })
            .await?;

        Ok(())
    }
}
