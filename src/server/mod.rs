//! HTTP server for the temp page routes

mod error;

pub use error::ServerError;

use anyhow::Result;
use axum::{
    body::Body,
    extract::{Path, State},
    handler::Handler,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use futures_util::stream::{self, StreamExt};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::{SiteConfig, TempConfig};
use crate::content::{html_escape, ContentIndex, ContentRegistry};
use crate::resolver::{self, Navigation, PendingLoad};
use crate::templates::TemplateRenderer;
use crate::Folio;

/// Server state
pub struct ServerState {
    registry: ContentRegistry,
    templates: TemplateRenderer,
    temp: TempConfig,
    static_dir: PathBuf,
}

impl ServerState {
    /// Discover the temp pages of a site and prepare the templates
    pub fn new(folio: &Folio) -> Result<Self> {
        let registry = folio.discover()?;
        Self::with_registry(&folio.config, registry, folio.static_dir.clone())
    }

    /// Build state around an existing registry
    pub fn with_registry(
        config: &SiteConfig,
        registry: ContentRegistry,
        static_dir: PathBuf,
    ) -> Result<Self> {
        Ok(Self {
            registry,
            templates: TemplateRenderer::new(config)?,
            temp: config.temp.clone(),
            static_dir,
        })
    }

    fn fallback_delay(&self) -> Duration {
        Duration::from_millis(self.temp.fallback_delay_ms)
    }

    /// Render the error boundary page for a failed request
    fn error_response(&self, err: ServerError) -> Response {
        tracing::error!("{}", err);
        match self.templates.render_error(&err.to_string()) {
            Ok(html) => (err.status(), Html(html)).into_response(),
            Err(e) => {
                tracing::error!("Error page failed to render: {}", e);
                err.into_response()
            }
        }
    }
}

/// Build the router for the temp page routes
pub fn router(state: Arc<ServerState>) -> Router {
    let index = state.temp.index_route();
    let not_found = state.temp.not_found.clone();
    let page_route = format!("{}/:slug", index.trim_end_matches('/'));
    let nested_route = format!("{}/*rest", page_route);

    let mut router = Router::new()
        .route(&index, get(index_handler))
        .route(&page_route, get(page_handler))
        .route(&nested_route, get(nested_page_handler))
        .route(&not_found, get(not_found_handler));

    if index != "/" {
        router = router
            .route(&format!("{}/", index), get(empty_slug_handler))
            .route("/", get(empty_slug_handler));
    }

    let static_files = ServeDir::new(&state.static_dir)
        .not_found_service(not_found_handler.with_state(Arc::clone(&state)));

    router
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(folio: &Folio, ip: &str, port: u16, open: bool) -> Result<()> {
    let state = Arc::new(ServerState::new(folio)?);
    let index = state.temp.index_route();
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}{}", ip, port, index);
    println!("Server running at {}", url);
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// GET <route>: the discovery index
async fn index_handler(State(state): State<Arc<ServerState>>) -> Response {
    let index = ContentIndex::build(&state.registry, &state.temp.index_route());
    tracing::debug!("Listing {} temp page(s)", index.len());
    match state.templates.render_index(&index) {
        Ok(html) => Html(html).into_response(),
        Err(e) => state.error_response(ServerError::Template(e)),
    }
}

/// GET <route>/ and GET /: no slug given
async fn empty_slug_handler(State(state): State<Arc<ServerState>>) -> Response {
    navigate(state, None).await
}

/// GET <route>/:slug
async fn page_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Response {
    navigate(state, Some(&slug)).await
}

/// GET <route>/:slug/*rest: slugs never contain a separator, so this
/// resolves to the not-found redirect
async fn nested_page_handler(
    State(state): State<Arc<ServerState>>,
    Path((slug, rest)): Path<(String, String)>,
) -> Response {
    navigate(state, Some(&format!("{}/{}", slug, rest))).await
}

/// Generic not-found page
async fn not_found_handler(State(state): State<Arc<ServerState>>) -> Response {
    match state.templates.render_not_found() {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(e) => state.error_response(ServerError::Template(e)),
    }
}

/// Resolve a slug and answer with a redirect, the page, or a streamed page
async fn navigate(state: Arc<ServerState>, slug: Option<&str>) -> Response {
    let mut pending = match resolver::navigate(&state.registry, &state.temp, slug) {
        Navigation::Redirect(redirect) => return Redirect::to(redirect.target()).into_response(),
        Navigation::Pending(pending) => pending,
    };

    match tokio::time::timeout(state.fallback_delay(), &mut pending).await {
        Ok(Ok(doc)) => match state.templates.render_page(&doc) {
            Ok(html) => Html(html).into_response(),
            Err(e) => state.error_response(ServerError::Template(e)),
        },
        Ok(Err(e)) => state.error_response(ServerError::Load(e)),
        Err(_) => {
            tracing::debug!(slug = %pending.slug(), "Load still pending, streaming fallback");
            stream_page(state, pending)
        }
    }
}

/// Send the shell with its fallback now and the document once it loads.
///
/// The pending load lives inside the body stream, so a client that goes
/// away drops it and the load is abandoned.
fn stream_page(state: Arc<ServerState>, pending: PendingLoad) -> Response {
    let (head, tail) = match state.templates.render_shell(pending.slug()) {
        Ok(parts) => parts,
        Err(e) => return state.error_response(ServerError::Template(e)),
    };

    let rest = async move {
        let slug = pending.slug().to_string();
        let fragment = match pending.await {
            Ok(doc) => state.templates.render_resolved(&doc),
            Err(e) => {
                tracing::error!(slug = %slug, "Temp page failed to load: {}", e);
                state.templates.render_error_fragment(&e.to_string())
            }
        };
        let fragment = fragment.unwrap_or_else(|e| {
            tracing::error!(slug = %slug, "Template error: {}", e);
            format!("<p>{}</p>", html_escape(&e.to_string()))
        });
        format!("{}{}", fragment, tail)
    };

    let body = stream::once(async move { head })
        .chain(stream::once(rest))
        .map(Ok::<_, Infallible>);

    (
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        Body::from_stream(body),
    )
        .into_response()
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}
