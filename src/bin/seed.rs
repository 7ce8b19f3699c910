//! Seed data generator
//!
//! Users and patients are owned by the patient subsystem, so a fresh
//! database has nobody to attach a device to. This fills in a few of each
//! for local development.
//!
//! ## Usage
//! ```bash
//! # 10 users with one patient record each (default)
//! cargo run --bin seed
//!
//! # Custom amount and database
//! DATABASE_PATH=./data/oneup.db cargo run --bin seed -- --count 50
//! ```

use oneup_backend::config::Config;
use oneup_backend::db::Database;
use std::env;
use tracing::info;

const FIRST_NAMES: &[&str] = &[
    "Ana", "Luis", "Carmen", "Jorge", "Rosa", "Miguel", "Lucia", "Diego",
];
const LAST_NAMES: &[&str] = &[
    "Quispe", "Flores", "Rojas", "Mamani", "Torres", "Huaman", "Vargas",
];

fn parse_count() -> anyhow::Result<usize> {
    let args: Vec<String> = env::args().collect();
    match args.iter().position(|a| a == "--count") {
        Some(pos) => {
            let value = args
                .get(pos + 1)
                .ok_or_else(|| anyhow::anyhow!("--count needs a value"))?;
            Ok(value.parse()?)
        }
        None => Ok(10),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let count = parse_count()?;
    let config = Config::from_env();
    let db = Database::connect(&config.database).await?;

    let mut uow = db.read_write().await?;
    for i in 0..count {
        let email = format!("patient{}@oneup.pe", i + 1);
        let user_id: (i64,) = sqlx::query_as(
            "INSERT INTO users (email) VALUES (?) \
             ON CONFLICT(email) DO UPDATE SET email = excluded.email RETURNING id",
        )
        .bind(&email)
        .fetch_one(&mut *uow)
        .await?;

        sqlx::query(
            "INSERT INTO patients (user_id, first_name, last_name) VALUES (?, ?, ?) \
             ON CONFLICT(user_id) DO NOTHING",
        )
        .bind(user_id.0)
        .bind(FIRST_NAMES[i % FIRST_NAMES.len()])
        .bind(LAST_NAMES[i % LAST_NAMES.len()])
        .execute(&mut *uow)
        .await?;
    }
    uow.finish().await?;

    info!(count, path = %config.database.path, "Seeded users and patients");
    db.close().await;
    Ok(())
}
