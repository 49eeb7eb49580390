//! Integration tests for the infrastructure components
//!
//! These tests verify that the PostgreSQL database is reachable and that the
//! embedded migrations produce the expected schema. They need a running
//! database (see `DATABASE_URL`) and are ignored by default:
//!
//! ```bash
//! cargo test -p common -- --ignored
//! ```

use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};
use sqlx::Row;

/// Test that verifies PostgreSQL is accessible and migrated
#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_infrastructure_integration() -> Result<(), Box<dyn std::error::Error>> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    assert!(health_check(&pool).await?, "Database health check failed");

    run_migrations(&pool).await?;
    // Migrations are idempotent
    run_migrations(&pool).await?;

    for table in ["user_profiles", "orders", "order_tags", "orders_tags"] {
        let row = sqlx::query("SELECT to_regclass($1) IS NOT NULL AS present")
            .bind(format!("public.{}", table))
            .fetch_one(&pool)
            .await?;

        let present: bool = row.get("present");
        assert!(present, "table {} missing after migrations", table);
    }

    Ok(())
}
