//! # Database Handle
//!
//! Opens the SQLite store behind every ProdTrack request.
//!
//! ```text
//! PRODTRACK_DATABASE_PATH
//!        │
//!        ▼
//!  DbLocation::from_path ──► File("./prodtrack.db")   WAL, up to N connections
//!        │               └─► InMemory                 one pinned connection
//!        ▼
//!  Database::new  ──► SqlitePool ──► migrations ──► products() / productions()
//! ```
//!
//! Every batch mutation is a single-row UPDATE, so the pool only has to
//! serialize writers. WAL lets dashboard reads proceed while a batch is being
//! saved; `busy_timeout` makes a second writer wait instead of failing.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::product::ProductRepository;
use crate::repository::production::ProductionRepository;

/// Path spelling that selects a throwaway in-memory store.
pub const IN_MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Where the store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    File(PathBuf),
    /// Private to one connection; gone when the pool closes.
    InMemory,
}

impl DbLocation {
    /// Maps the configured path, treating `:memory:` as [`DbLocation::InMemory`].
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if path.as_os_str() == IN_MEMORY_PATH {
            DbLocation::InMemory
        } else {
            DbLocation::File(path.to_path_buf())
        }
    }
}

impl fmt::Display for DbLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbLocation::File(path) => write!(f, "{}", path.display()),
            DbLocation::InMemory => f.write_str(IN_MEMORY_PATH),
        }
    }
}

/// Pool settings.
///
/// ```rust
/// use prodtrack_db::{DbConfig, DbLocation};
///
/// let config = DbConfig::from_path("./prodtrack.db").max_connections(8);
/// assert_eq!(config.max_connections, 8);
///
/// let config = DbConfig::from_path(":memory:").max_connections(8);
/// assert_eq!(config.location, DbLocation::InMemory);
/// assert_eq!(config.max_connections, 1);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub location: DbLocation,
    /// Always 1 for [`DbLocation::InMemory`].
    pub max_connections: u32,
    /// How long a request waits for a free connection.
    pub acquire_timeout: Duration,
    /// How long SQLite waits on a locked database before `SQLITE_BUSY`.
    pub busy_timeout: Duration,
}

impl DbConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match DbLocation::from_path(path) {
            DbLocation::InMemory => Self::in_memory(),
            location => DbConfig {
                location,
                max_connections: 5,
                acquire_timeout: Duration::from_secs(30),
                busy_timeout: Duration::from_secs(5),
            },
        }
    }

    /// Throwaway store for tests and demos.
    pub fn in_memory() -> Self {
        DbConfig {
            location: DbLocation::InMemory,
            max_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            busy_timeout: Duration::from_secs(5),
        }
    }

    /// Sets the pool size for file stores. In-memory stores stay at one
    /// connection, since a second connection would see an empty database.
    pub fn max_connections(mut self, max: u32) -> Self {
        if self.location != DbLocation::InMemory {
            self.max_connections = max.max(1);
        }
        self
    }

    fn connect_options(&self) -> SqliteConnectOptions {
        let options = match &self.location {
            DbLocation::InMemory => SqliteConnectOptions::new().in_memory(true),
            DbLocation::File(path) => SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal),
        };

        // productions.product_id references products.id
        options
            .foreign_keys(true)
            .busy_timeout(self.busy_timeout)
    }

    fn pool_options(&self) -> SqlitePoolOptions {
        let options = SqlitePoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(1)
            .acquire_timeout(self.acquire_timeout);

        match self.location {
            // Reaping the only connection would drop every table
            DbLocation::InMemory => options.idle_timeout(None).max_lifetime(None),
            DbLocation::File(_) => options
                .idle_timeout(Duration::from_secs(10 * 60))
                .max_lifetime(Duration::from_secs(30 * 60)),
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Shared pool plus repository accessors. Clones share the pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the store and brings the schema up to date.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            location = %config.location,
            max_connections = config.max_connections,
            "Opening production database"
        );

        let pool = config
            .pool_options()
            .connect_with(config.connect_options())
            .await
            .map_err(|e| DbError::Unavailable(format!("{}: {e}", config.location)))?;
        debug!("Connection pool ready");

        let db = Database { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// Returns `(total, applied)` migration counts.
    pub async fn migration_status(&self) -> DbResult<(usize, usize)> {
        migrations::migration_status(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    pub fn productions(&self) -> ProductionRepository {
        ProductionRepository::new(self.pool.clone())
    }

    /// Waits for in-flight queries, then closes every connection.
    pub async fn close(&self) {
        info!("Closing production database");
        self.pool.close().await;
    }

    /// True when a trivial query round-trips.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}
