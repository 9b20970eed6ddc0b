//! Development fixture seeding.
//!
//! Creates an administrator, a store owner with one store, and two normal
//! users who have rated it. Every step is idempotent: existing rows are
//! left alone, so the command is safe to re-run.
//!
//! # Usage
//!
//! ```bash
//! storepulse-cli seed
//! ```

use sqlx::PgPool;

use storepulse_core::Role;

/// Errors from the seed command.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

/// Seed the database with development fixtures.
///
/// # Errors
///
/// Returns `SeedError` if the database is unreachable or an insert fails.
pub async fn run() -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").map_err(|_| SeedError::MissingEnvVar("DATABASE_URL"))?;

    let pool = PgPool::connect(&database_url).await?;
    tracing::info!("Database connected");

    let _admin = ensure_user(
        &pool,
        "System Administrator",
        "admin@storepulse.dev",
        "Admin@123",
        Some("Admin HQ"),
        Role::SystemAdministrator,
    )
    .await?;

    let owner = ensure_user(
        &pool,
        "Store Owner",
        "owner@storepulse.dev",
        "Owner@123",
        Some("123 Store St"),
        Role::StoreOwner,
    )
    .await?;

    let store = ensure_store(
        &pool,
        owner,
        "Storepulse Flagship Store",
        "store@storepulse.dev",
        "456 Commerce Blvd, Tech City",
    )
    .await?;

    let raters = [
        ("Rater One", "rater1@storepulse.dev", 5),
        ("Rater Two", "rater2@storepulse.dev", 4),
    ];
    for (name, email, score) in raters {
        let rater = ensure_user(&pool, name, email, "User@123", None, Role::NormalUser).await?;
        ensure_rating(&pool, rater, store, score).await?;
    }

    tracing::info!("Seeding complete");
    Ok(())
}

/// Insert a user unless one with the same email exists; returns the ID.
async fn ensure_user(
    pool: &PgPool,
    name: &str,
    email: &str,
    password: &str,
    address: Option<&str>,
    role: Role,
) -> Result<i32, SeedError> {
    let existing: Option<(i32,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    if let Some((id,)) = existing {
        tracing::info!(email, "user already exists");
        return Ok(id);
    }

    let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;

    let (id,): (i32,) = sqlx::query_as(
        r"
        INSERT INTO users (name, email, password_hash, address, role)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        ",
    )
    .bind(name)
    .bind(email)
    .bind(&password_hash)
    .bind(address)
    .bind(role.as_str())
    .fetch_one(pool)
    .await?;

    tracing::info!(email, %role, "user seeded");
    Ok(id)
}

/// Insert a store for the owner unless they already have one; returns the ID.
async fn ensure_store(
    pool: &PgPool,
    owner_id: i32,
    name: &str,
    email: &str,
    address: &str,
) -> Result<i32, SeedError> {
    let existing: Option<(i32,)> =
        sqlx::query_as("SELECT id FROM stores WHERE owner_id = $1 LIMIT 1")
            .bind(owner_id)
            .fetch_optional(pool)
            .await?;

    if let Some((id,)) = existing {
        tracing::info!(name, "store already exists");
        return Ok(id);
    }

    let (id,): (i32,) = sqlx::query_as(
        r"
        INSERT INTO stores (name, email, address, owner_id)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        ",
    )
    .bind(name)
    .bind(email)
    .bind(address)
    .bind(owner_id)
    .fetch_one(pool)
    .await?;

    tracing::info!(name, "store seeded");
    Ok(id)
}

/// Record a rating, leaving any existing one for the pair untouched.
async fn ensure_rating(
    pool: &PgPool,
    user_id: i32,
    store_id: i32,
    score: i32,
) -> Result<(), SeedError> {
    sqlx::query(
        r"
        INSERT INTO ratings (user_id, store_id, score)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id, store_id) DO NOTHING
        ",
    )
    .bind(user_id)
    .bind(store_id)
    .bind(score)
    .execute(pool)
    .await?;

    Ok(())
}
