use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Needed for the uuid equality part of the reservation exclusion constraint
    sqlx::query("CREATE EXTENSION IF NOT EXISTS btree_gist;")
        .execute(pool)
        .await?;

    // Create shops table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS shops (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            timezone VARCHAR(64) NOT NULL DEFAULT 'UTC',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create vehicle_sizes table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS vehicle_sizes (
            shop_id UUID NOT NULL REFERENCES shops(id) ON DELETE CASCADE,
            id VARCHAR(64) NOT NULL,
            name VARCHAR(255) NOT NULL,
            position INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (shop_id, id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create services table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS services (
            shop_id UUID NOT NULL REFERENCES shops(id) ON DELETE CASCADE,
            id VARCHAR(64) NOT NULL,
            name VARCHAR(255) NOT NULL,
            base_price NUMERIC(10, 2) NOT NULL CHECK (base_price >= 0),
            base_duration_minutes INTEGER NOT NULL CHECK (base_duration_minutes >= 0),
            position INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (shop_id, id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create service_size_variations table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS service_size_variations (
            shop_id UUID NOT NULL,
            service_id VARCHAR(64) NOT NULL,
            vehicle_size_id VARCHAR(64) NOT NULL,
            price NUMERIC(10, 2) NOT NULL CHECK (price >= 0),
            duration_minutes INTEGER NOT NULL CHECK (duration_minutes >= 0),
            PRIMARY KEY (shop_id, service_id, vehicle_size_id),
            FOREIGN KEY (shop_id, service_id) REFERENCES services(shop_id, id) ON DELETE CASCADE
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create service_formulas table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS service_formulas (
            shop_id UUID NOT NULL,
            service_id VARCHAR(64) NOT NULL,
            id VARCHAR(64) NOT NULL,
            name VARCHAR(255) NOT NULL,
            additional_price NUMERIC(10, 2) NOT NULL CHECK (additional_price >= 0),
            additional_duration_minutes INTEGER NOT NULL CHECK (additional_duration_minutes >= 0),
            position INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (shop_id, service_id, id),
            FOREIGN KEY (shop_id, service_id) REFERENCES services(shop_id, id) ON DELETE CASCADE
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create service_add_ons table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS service_add_ons (
            shop_id UUID NOT NULL,
            service_id VARCHAR(64) NOT NULL,
            id VARCHAR(64) NOT NULL,
            name VARCHAR(255) NOT NULL,
            price NUMERIC(10, 2) NOT NULL CHECK (price >= 0),
            duration_minutes INTEGER NOT NULL CHECK (duration_minutes >= 0),
            position INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (shop_id, service_id, id),
            FOREIGN KEY (shop_id, service_id) REFERENCES services(shop_id, id) ON DELETE CASCADE
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create opening_hours table, weekday 0 = Monday
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS opening_hours (
            shop_id UUID NOT NULL REFERENCES shops(id) ON DELETE CASCADE,
            weekday SMALLINT NOT NULL CHECK (weekday BETWEEN 0 AND 6),
            is_open BOOLEAN NOT NULL DEFAULT FALSE,
            timeframes JSONB NOT NULL DEFAULT '[]'::jsonb,
            PRIMARY KEY (shop_id, weekday)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create booking_rules table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS booking_rules (
            shop_id UUID PRIMARY KEY REFERENCES shops(id) ON DELETE CASCADE,
            min_notice_minutes INTEGER NOT NULL DEFAULT 0 CHECK (min_notice_minutes >= 0),
            max_horizon_days INTEGER NOT NULL DEFAULT 30 CHECK (max_horizon_days >= 1)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create reservations table. Times are shop-local wall-clock times.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reservations (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            shop_id UUID NOT NULL REFERENCES shops(id),
            starts_at TIMESTAMP NOT NULL,
            ends_at TIMESTAMP NOT NULL,
            duration_minutes INTEGER NOT NULL CHECK (duration_minutes > 0),
            total_price NUMERIC(10, 2) NOT NULL,
            services JSONB NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_reservation_range CHECK (ends_at > starts_at),
            CONSTRAINT reservations_no_overlap EXCLUDE USING gist (
                shop_id WITH =,
                tsrange(starts_at, ends_at, '[)') WITH &&
            )
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_reservations_shop_start ON reservations(shop_id, starts_at);
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully");
    Ok(())
}
