use std::{
    net::{IpAddr, SocketAddr},
    str::FromStr,
    sync::Arc,
};

use anyhow::anyhow;
use clap::Parser;
use deadpool_sqlite::Pool;
use server::{
    cli::Cli,
    db,
    store::{MemoryStore, SqliteStore, Store},
};
use shared::{configure_tracing, load_dotenv};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    load_dotenv()?;
    configure_tracing();

    let args = Cli::parse();
    debug!(?args);

    let (store, pool): (Arc<dyn Store>, Option<Pool>) = if args.in_memory {
        info!("Using the in-memory store");
        (Arc::new(MemoryStore::default()), None)
    } else {
        // Run the migrations synchronously before creating the pool or launching the server
        let ran = db::run_migrations(&args.sqlite_connection_string)?;
        info!("Ran {ran} db migrations");

        let pool = db::create_pool(&args.sqlite_connection_string)?;
        (
            Arc::new(SqliteStore::new(pool.clone(), args.database_timeout())),
            Some(pool),
        )
    };

    let app = server::app(store, &args)?;

    let socket = SocketAddr::new(IpAddr::from_str(&args.bind_addr)?, args.port);
    let listener = TcpListener::bind(socket).await?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pool) = pool {
        let conn = pool.get().await?;
        let took = conn
            .interact(|conn| db::optimize_database(conn))
            .await
            .map_err(|e| anyhow!("optimize_database: {e}"))??;
        info!("Optimize db took: {:.3}", took.as_secs_f32());
        pool.close();
    }

    info!("Shut down");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(?e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(?e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    info!("Shutdown signal received");
}
