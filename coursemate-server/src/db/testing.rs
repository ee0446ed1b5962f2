//! Fixtures for database-backed tests
//!
//! Run with: DATABASE_URL=postgres://... cargo test -p coursemate-server -- --ignored

use sqlx::PgPool;
use tokio::sync::OnceCell;
use uuid::Uuid;

use super::{create_pool, migrations};

static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// Connect to `DATABASE_URL` and make sure the schema exists.
pub(crate) async fn test_pool() -> PgPool {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let pool = create_pool(&url).await.expect("pool creation failed");

    // Parallel CREATE TABLE IF NOT EXISTS can still collide on pg_type
    MIGRATED
        .get_or_init(|| async {
            migrations::run(&pool).await.expect("migrations failed");
        })
        .await;

    pool
}

/// A value no other test run will produce.
pub(crate) fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

pub(crate) async fn seed_spot(pool: &PgPool, name: &str, address: &str) -> i64 {
    let row: (i64,) = sqlx::query_as(
        "INSERT INTO tour_spots (name, address) VALUES ($1, $2) RETURNING spot_id",
    )
    .bind(name)
    .bind(address)
    .fetch_one(pool)
    .await
    .expect("seed spot");
    row.0
}

pub(crate) async fn seed_user(pool: &PgPool) -> String {
    let user_id = unique("user");
    sqlx::query("INSERT INTO users (user_id, password, name) VALUES ($1, 'x', 'Tester')")
        .bind(&user_id)
        .execute(pool)
        .await
        .expect("seed user");
    user_id
}
