use std::{
    ffi::c_int,
    sync::Once,
    time::{Duration, Instant},
};

use anyhow::anyhow;
use deadpool_sqlite::{Config, Hook, HookError, Pool, Runtime};
use include_dir::{include_dir, Dir};
use rusqlite::{Connection, OpenFlags, TransactionBehavior};
use rusqlite_migration::{Migrations, SchemaVersion};
use tracing::{debug, error, info, instrument, span, trace, warn, Level};

static MIGRATIONS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/migrations");

fn sqlite_connection_profiling_callback(query: &str, duration: Duration) {
    trace!(target: "sqlite_profiling", ?duration, query);
}

fn sqlite_connection_trace_callback(query: &str) {
    trace!(target: "sqlite_tracing", query);
}

fn sqlite_log_callback(sqlite_code: c_int, msg: &str) {
    use rusqlite::ffi;
    let err_code = ffi::Error::new(sqlite_code);

    // See https://www.sqlite.org/rescode.html for description of result codes.
    match sqlite_code & 0xff {
        ffi::SQLITE_NOTICE => info!(target: "sqlite", msg, %err_code, "SQLITE NOTICE"),
        ffi::SQLITE_WARNING => warn!(target: "sqlite", msg, %err_code, "SQLITE WARNING"),
        _ => error!(target: "sqlite", msg, %err_code, "SQLITE ERROR"),
    };
}

pub fn get_migrations() -> Result<Migrations<'static>, anyhow::Error> {
    Migrations::from_directory(&MIGRATIONS_DIR)
        .map_err(|e| anyhow!("Migrations::from_directory: {:?}", e))
}

#[instrument(skip(conn))]
pub fn configure_new_connection(conn: &mut Connection) -> Result<(), rusqlite::Error> {
    run_pragmas(conn)?;

    if cfg!(debug_assertions) {
        conn.trace(Some(sqlite_connection_trace_callback));
    } else {
        conn.profile(Some(sqlite_connection_profiling_callback));
    }

    Ok(())
}

#[instrument(skip(conn))]
pub fn run_pragmas(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    Ok(())
}

fn schema_version(migrations: &Migrations, conn: &Connection) -> Result<usize, anyhow::Error> {
    match migrations
        .current_version(conn)
        .map_err(|e| anyhow!("Migrations::current_version: {:?}", e))?
    {
        SchemaVersion::Inside(n) => Ok(n.into()),
        SchemaVersion::Outside(n) => Err(anyhow!(
            "Schema version {n} is outside of known schema migrations. Manual intervention required"
        )),
        SchemaVersion::NoneSet => Ok(0),
    }
}

/// Brings the database at `connection_string` up to the latest schema.
/// Returns the number of migrations applied
#[instrument]
pub fn run_migrations(connection_string: &str) -> Result<usize, anyhow::Error> {
    // Configure the log callback before opening the database
    static CONFIG_LOG: Once = Once::new();
    let mut config_result = Ok(());
    CONFIG_LOG.call_once(|| unsafe {
        config_result = rusqlite::trace::config_log(Some(sqlite_log_callback));
    });
    config_result?;

    let open_flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_NO_MUTEX
        | OpenFlags::SQLITE_OPEN_CREATE;

    let mut conn = Connection::open_with_flags(connection_string, open_flags)?;
    configure_new_connection(&mut conn)?;

    debug!("Checking DB is writable");
    conn.transaction_with_behavior(TransactionBehavior::Exclusive)?;

    let migrations = get_migrations()?;
    let ran = {
        let _span = span!(Level::INFO, "Running migrations").entered();

        let initial_version = schema_version(&migrations, &conn)?;
        migrations
            .to_latest(&mut conn)
            .map_err(|e| anyhow!("Migrations::to_latest: {:?}", e))?;
        let final_version = schema_version(&migrations, &conn)?;

        final_version - initial_version
    };

    close_database(conn)?;

    Ok(ran)
}

/// Creates the connection pool used by the running server. Every new
/// connection gets the same pragmas and tracing hooks as the migration
/// connection
pub fn create_pool(connection_string: &str) -> Result<Pool, anyhow::Error> {
    let pool = Config::new(connection_string)
        .builder(Runtime::Tokio1)?
        .post_create(Hook::async_fn(|object, _| {
            Box::pin(async move {
                object
                    .interact(configure_new_connection)
                    .await
                    .map_err(|e| HookError::Message(format!("configure_new_connection: {e}").into()))?
                    .map_err(HookError::Backend)?;
                Ok(())
            })
        }))
        .build()?;

    Ok(pool)
}

/// Runs an optimize on the database. Should be run periodically to keep the
/// database running optimally. It should be very fast if run regularly
#[instrument(skip(conn))]
pub fn optimize_database(conn: &Connection) -> Result<Duration, rusqlite::Error> {
    let start = Instant::now();
    conn.pragma_update(None, "analysis_limit", "400")?;
    conn.pragma_update(None, "optimize", "")?;

    Ok(start.elapsed())
}

#[instrument(skip(conn))]
pub fn close_database(conn: Connection) -> Result<(), rusqlite::Error> {
    let took = optimize_database(&conn)?;
    info!("Optimize db took: {:.3}", took.as_secs_f32());

    if let Err((_conn, e)) = conn.close() {
        Err(e)?;
    }

    Ok(())
}
