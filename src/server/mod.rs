//! Development server
//!
//! Serves the public directory. Post pages that were not generated yet are
//! rendered on their first request, written next to the others and served
//! from disk afterwards.

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::generator::{is_not_found, is_safe_uid, Generator};
use crate::Spacetraveling;

/// Server state
struct ServerState {
    generator: Generator,
    post_dir: PathBuf,
}

/// Start the development server
pub async fn start(app: &Spacetraveling, ip: &str, port: u16, open: bool) -> Result<()> {
    let generator = Generator::new(app, app.source()?)?;
    let router = router(app, generator);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

/// Build the router: on-demand post pages, everything else from disk
fn router(app: &Spacetraveling, generator: Generator) -> Router {
    let state = Arc::new(ServerState {
        generator,
        post_dir: app.public_dir.join(&app.config.post_dir),
    });

    let post_route = format!("/{}/:uid", app.config.post_dir);
    let static_files = ServeDir::new(&app.public_dir)
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new(app.public_dir.join("404.html")));

    Router::new()
        .route(&post_route, get(post_handler))
        .route(&format!("{}/", post_route), get(post_handler))
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve a post page, generating it first if needed
async fn post_handler(State(state): State<Arc<ServerState>>, Path(uid): Path<String>) -> Response {
    if !is_safe_uid(&uid) {
        return not_found_response(&state, &uid);
    }

    let file_path = state.post_dir.join(&uid).join("index.html");
    if let Ok(html) = tokio::fs::read_to_string(&file_path).await {
        return Html(html).into_response();
    }

    tracing::info!("Generating post {} on first request", uid);
    match state.generator.generate_post(&uid).await {
        Ok(path) => match tokio::fs::read_to_string(&path).await {
            Ok(html) => Html(html).into_response(),
            Err(e) => {
                tracing::error!("Failed to read {:?}: {}", path, e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
            }
        },
        Err(e) if is_not_found(&e) => not_found_response(&state, &uid),
        Err(e) => {
            tracing::error!("Failed to generate post {}: {:#}", uid, e);
            (StatusCode::BAD_GATEWAY, "Failed to load post").into_response()
        }
    }
}

fn not_found_response(state: &ServerState, uid: &str) -> Response {
    match state.generator.render_not_found(Some(uid)) {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
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
