use std::time::Duration;

use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{Result, schema};

const SCHEMA_LOCK_ID: i64 = 4_187_220;

pub struct Db {
	pub pool: PgPool,
}
impl Db {
	pub async fn connect(cfg: &dossier_config::Postgres) -> Result<Self> {
		let pool = PgPoolOptions::new()
			.max_connections(cfg.pool_max_conns)
			.acquire_timeout(Duration::from_millis(cfg.acquire_timeout_ms))
			.connect(&cfg.dsn)
			.await?;

		Ok(Self { pool })
	}

	pub async fn ensure_schema(&self) -> Result<()> {
		let sql = schema::render_schema()?;
		// The advisory lock is scoped to this transaction, so concurrent starters apply DDL one at
		// a time and the lock is released on commit.
		let mut tx = self.pool.begin().await?;

		sqlx::query("SELECT pg_advisory_xact_lock($1)")
			.bind(SCHEMA_LOCK_ID)
			.execute(&mut *tx)
			.await?;

		let mut applied = 0_usize;

		for statement in schema::statements(&sql) {
			sqlx::query(statement).execute(&mut *tx).await?;

			applied += 1;
		}

		tx.commit().await?;

		tracing::debug!(applied, "Schema is up to date.");

		Ok(())
	}
}
