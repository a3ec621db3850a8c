//! `sweepctl serve` – run the replay engine on a Unix socket so the
//! front-end can be exercised without the real engine.

use bridge::daemon;
use bridge::replay::{read_fixture, ReplayEngine};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::net::UnixListener;

pub async fn run_daemon(socket_path: PathBuf, fixture_path: &Path) -> i32 {
    let fixture = match read_fixture(fixture_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("error: {}: {}", fixture_path.display(), e);
            return 2;
        }
    };
    let engine = ReplayEngine::from_fixture(fixture);

    // Remove stale socket if it exists
    let _ = std::fs::remove_file(&socket_path);

    let listener = match UnixListener::bind(&socket_path) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("error: cannot bind socket {}: {}", socket_path.display(), e);
            return 2;
        }
    };

    tracing::info!(
        socket = %socket_path.display(),
        fixture = engine.name().unwrap_or("<unnamed>"),
        commands = engine.commands().len(),
        "replay engine listening"
    );
    eprintln!("sweepctl replay engine listening on {}", socket_path.display());

    tokio::select! {
        _ = daemon::serve(listener, Arc::new(engine)) => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupted, shutting down");
        }
    }

    let _ = std::fs::remove_file(&socket_path);
    0
}
