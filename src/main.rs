mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::{AuthMode, Config};
use crate::core::middleware;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::features::auth::clients::GoogleOAuthClient;
use crate::features::auth::routes as auth_routes;
use crate::features::auth::services::{
    AccessTokenProvider, AuthService, RefreshTokenProvider, ServiceAccountProvider,
    SessionTokenProvider,
};
use crate::features::auth::SessionStore;
use crate::features::repair::routes as repair_routes;
use crate::features::repair::services::FolderStore;
use crate::features::repair::{FolderService, RecorderService, SaveService};
use crate::modules::google::{DriveClient, SheetsClient};
use axum::{middleware::from_fn, Router};
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    let available_cpus = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);
    tracing::info!(
        "System info: available_cpus={}, tokio_worker_threads={}, pid={}",
        available_cpus,
        worker_threads,
        std::process::id()
    );

    tracing::info!("Configuration loaded successfully");

    // Session store (only populated in the session auth variant, but
    // cheap to construct unconditionally)
    let session_store = Arc::new(SessionStore::new());

    // OAuth client, when client credentials are configured
    let oauth_client = config.google_auth.oauth.clone().map(|oauth| {
        Arc::new(GoogleOAuthClient::new(
            oauth.client_id.clone(),
            oauth.client_secret.clone(),
            oauth.redirect_uri(),
            config.google_auth.token_url.clone(),
        ))
    });

    // Select the access-token provider once at startup
    let provider: Arc<dyn AccessTokenProvider> = match config.google_auth.mode {
        AuthMode::ServiceAccount => {
            let sa = config
                .google_auth
                .service_account
                .clone()
                .ok_or_else(|| anyhow::anyhow!("Service account credentials missing"))?;
            tracing::info!("Using service account credentials ({})", sa.client_email);
            Arc::new(ServiceAccountProvider::new(
                sa,
                config.google_auth.token_url.clone(),
            ))
        }
        AuthMode::RefreshToken => {
            let rt = config
                .google_auth
                .refresh_token
                .clone()
                .ok_or_else(|| anyhow::anyhow!("Refresh token credentials missing"))?;
            tracing::info!("Using long-lived refresh token credentials");
            Arc::new(RefreshTokenProvider::new(
                rt,
                config.google_auth.token_url.clone(),
            ))
        }
        AuthMode::OauthSession => {
            let oauth = oauth_client
                .clone()
                .ok_or_else(|| anyhow::anyhow!("OAuth client credentials missing"))?;
            tracing::info!("Using session-scoped OAuth credentials");
            Arc::new(SessionTokenProvider::new(
                Arc::clone(&session_store),
                oauth,
            ))
        }
    };

    // Google API clients
    let drive_client = Arc::new(DriveClient::new());
    let sheets_client = Arc::new(SheetsClient::new());
    tracing::info!(
        "Google clients initialized (sheet: {}, root folder: {})",
        config.sheets.spreadsheet_id,
        config.drive.root_folder_id
    );

    // Save pipeline services
    let folder_service = Arc::new(FolderService::new(
        Arc::clone(&drive_client) as Arc<dyn FolderStore>,
        config.drive.root_folder_id.clone(),
    ));
    let recorder_service = Arc::new(RecorderService::new(
        Arc::clone(&sheets_client),
        config.sheets.spreadsheet_id.clone(),
        config.sheets.timezone,
    ));
    let save_service = Arc::new(SaveService::new(
        Arc::clone(&provider),
        folder_service,
        Arc::clone(&drive_client),
        recorder_service,
    ));
    tracing::info!("Save pipeline initialized");

    // Auth endpoints (session flow + manual token minting)
    let auth_service = Arc::new(AuthService::new(
        config.google_auth.mode,
        oauth_client,
        Arc::clone(&session_store),
    ));
    tracing::info!("Auth service initialized");

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    // Simple health check endpoint
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    let app = Router::new()
        .merge(swagger)
        .merge(repair_routes::routes(
            save_service,
            config.app.max_request_body_size,
        ))
        .merge(auth_routes::routes(auth_service))
        .merge(health_route)
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    socket.set_recv_buffer_size(256 * 1024)?;
    socket.set_send_buffer_size(256 * 1024)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(65535)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on {}", format!("http://{}", addr));
    tracing::info!(
        "Swagger UI available at {}",
        format!("http://{}/swagger-ui/", addr)
    );

    axum::serve(listener, app).await?;

    Ok(())
}
