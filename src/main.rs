use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;

use aira_backend::core::config::AppPaths;
use aira_backend::core::logging;
use aira_backend::server::router;
use aira_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_file(&PathBuf::from(".env"));

    let paths = Arc::new(AppPaths::new());
    logging::init(&paths);

    let state = AppState::initialize(paths)
        .context("Failed to initialize application state; check environment variables")?;

    let port = env::var("PORT")
        .ok()
        .and_then(|val| val.parse::<u16>().ok())
        .unwrap_or(0);
    let bind_addr = format!("127.0.0.1:{}", port);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    let addr = listener.local_addr()?;

    println!("AIRA_PORT={}", addr.port());
    tracing::info!("Listening on {}", addr);
    if state.settings.slack_webhook_url.is_none() {
        tracing::info!("SLACK_WEBHOOK_URL not set; notification action disabled");
    }

    let app: Router = router::router(state);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn load_dotenv_file(path: &std::path::Path) {
    match dotenvy::from_path(path) {
        Ok(()) => {}
        Err(dotenvy::Error::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => eprintln!("warning: failed to load {}: {}", path.display(), err),
    }
}
