//! SQLite persistence layer for the access-gated chat bot.
//!
//! This crate provides async database operations for users, group chats,
//! payments, and per-user conversation history using SQLx with SQLite.
//!
//! # Example
//!
//! ```no_run
//! use database::{Database, Principal, entitlement, user};
//! use chrono::{Duration, Utc};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:magabot.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     user::register_user(db.pool(), 5653464572, "alice").await?;
//!     entitlement::set_entitlement(
//!         db.pool(),
//!         Principal::User(5653464572),
//!         Utc::now() + Duration::days(30),
//!     )
//!     .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod entitlement;
pub mod error;
pub mod history;
pub mod models;
pub mod payment;
pub mod user;

pub use error::{DatabaseError, Result};
pub use models::{GroupChat, HistoryEntry, Payment, PaymentStatus, Principal, User};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    /// Each logical operation checks out its own connection, so this bounds
    /// how many in-flight messages can touch storage at once.
    const DEFAULT_POOL_SIZE: u32 = 20;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `sqlite::memory:` for an in-memory database (tests).
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
