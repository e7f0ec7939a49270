//! Helpers for integration tests.

use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tempfile::TempDir;

use pushkind_common::db::{DbPool, establish_connection_pool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Migrated SQLite database living in its own temporary directory.
pub struct TestDb {
    pool: DbPool,
    dir: TempDir,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        let dir = TempDir::new().expect("Failed to create temporary directory.");
        let path = dir.path().join(filename);
        let path = path.to_str().expect("Temporary path is not valid UTF-8.");

        let pool = establish_connection_pool(path).expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");

        TestDb { pool, dir }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    #[allow(dead_code)]
    pub fn path(&self) -> &std::path::Path {
        self.dir.path()
    }
}
