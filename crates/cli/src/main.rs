use anyhow::Result;
use clap::{
    Parser,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use dotenvy::dotenv;
use std::{net::SocketAddr, path::PathBuf};
use stripboard::{DEFAULT_UPSTREAM_URL, Server, Settings, UpstreamSettings, url::Url};
use tracing_subscriber::EnvFilter;

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::BrightMagenta.on_default() | Effects::BOLD)
        .usage(AnsiColor::BrightMagenta.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightGreen.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default())
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about, styles = styles())]
struct AppOptions {
    /// The socket address that the local server should be hosted on.
    #[arg(
        long = "address",
        env = "STRIPBOARD_ADDRESS",
        default_value = "127.0.0.1:2578"
    )]
    address: SocketAddr,

    /// Path of the HTML page served on the index route.
    /// The file is read on every request, not preloaded at startup.
    #[arg(long = "page", env = "STRIPBOARD_PAGE", default_value = "index.html")]
    page: PathBuf,

    /// The upstream endpoint whose response body is relayed on the api route.
    #[arg(
        long = "upstream-url",
        env = "STRIPBOARD_UPSTREAM_URL",
        default_value = DEFAULT_UPSTREAM_URL
    )]
    upstream_url: Url,

    /// The maximum lifetime of an incoming request before it is forcefully terminated (in seconds).
    #[arg(
        long = "request-timeout",
        env = "STRIPBOARD_REQUEST_TIMEOUT",
        default_value_t = 30
    )]
    request_timeout: u64,

    /// The maximum lifetime of an upstream request before it is forcefully terminated (in seconds).
    #[arg(
        long = "upstream-request-timeout",
        env = "STRIPBOARD_UPSTREAM_REQUEST_TIMEOUT",
        default_value_t = 10
    )]
    upstream_request_timeout: u64,

    /// The maximum amount of redirects to follow when making upstream requests.
    #[arg(
        long = "upstream-max-redirects",
        env = "STRIPBOARD_UPSTREAM_MAX_REDIRECTS",
        default_value_t = 10
    )]
    upstream_max_redirects: usize,

    /// DANGEROUS: Allow self-signed/invalid/forged TLS certificates when making upstream requests.
    #[arg(
        long = "upstream-allow-invalid-certs",
        env = "STRIPBOARD_UPSTREAM_ALLOW_INVALID_CERTS",
        default_value_t = false
    )]
    upstream_allow_invalid_certs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new("info")))
        .with_thread_ids(true)
        .init();
    let args = AppOptions::parse();

    Server::new(Settings {
        request_timeout: args.request_timeout,
        page_path: args.page,
        upstream_url: args.upstream_url,
        upstream_settings: UpstreamSettings {
            allow_invalid_certs: args.upstream_allow_invalid_certs,
            max_redirects: args.upstream_max_redirects,
            request_timeout: args.upstream_request_timeout,
        },
    })?
    .start(&args.address)
    .await
}
