//! Schema migrations
//!
//! Every statement is idempotent so `run` is safe on each startup.

use sqlx::PgPool;

/// Run all migrations
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running CourseMate migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            user_id TEXT PRIMARY KEY,
            password TEXT NOT NULL,
            name TEXT NOT NULL,
            email TEXT,
            age INT,
            gender TEXT,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            join_date TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tour_spots (
            spot_id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            address TEXT NOT NULL,
            avg_rating DOUBLE PRECISION NOT NULL DEFAULT 0,
            reg_date TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reviews (
            review_id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id TEXT REFERENCES users(user_id) ON DELETE SET NULL,
            spot_id BIGINT NOT NULL REFERENCES tour_spots(spot_id) ON DELETE CASCADE,
            rating SMALLINT NOT NULL CHECK (rating BETWEEN 1 AND 5),
            content TEXT NOT NULL,
            reg_date TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tags (
            tag_id BIGSERIAL PRIMARY KEY,
            tag_name TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Links vanish with either side, so a deleted review never leaves orphans
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS review_tags (
            review_id UUID NOT NULL REFERENCES reviews(review_id) ON DELETE CASCADE,
            tag_id BIGINT NOT NULL REFERENCES tags(tag_id) ON DELETE CASCADE,
            PRIMARY KEY (review_id, tag_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_preferences (
            user_id TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
            tag_id BIGINT NOT NULL REFERENCES tags(tag_id) ON DELETE CASCADE,
            PRIMARY KEY (user_id, tag_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS photos (
            photo_id BIGSERIAL PRIMARY KEY,
            spot_id BIGINT NOT NULL REFERENCES tour_spots(spot_id) ON DELETE CASCADE,
            img_url TEXT NOT NULL,
            reg_date TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS blog_reviews (
            blog_id BIGSERIAL PRIMARY KEY,
            spot_id BIGINT NOT NULL REFERENCES tour_spots(spot_id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            url TEXT NOT NULL,
            blog_name TEXT,
            post_date TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS notices (
            notice_id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            reg_date TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS inquiries (
            inquiry_id BIGSERIAL PRIMARY KEY,
            user_id TEXT REFERENCES users(user_id) ON DELETE SET NULL,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'open',
            reg_date TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    create_indexes(pool).await?;

    tracing::info!("CourseMate migrations complete");
    Ok(())
}

async fn create_indexes(pool: &PgPool) -> Result<(), sqlx::Error> {
    // Review indexes
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_reviews_spot ON reviews(spot_id, reg_date DESC)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_review_tags_tag ON review_tags(tag_id)")
        .execute(pool)
        .await?;

    // Media indexes
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_photos_spot ON photos(spot_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_blog_reviews_spot ON blog_reviews(spot_id)")
        .execute(pool)
        .await?;

    // Admin listings
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_join_date ON users(join_date DESC)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_inquiries_reg_date ON inquiries(reg_date DESC)")
        .execute(pool)
        .await?;

    Ok(())
}
