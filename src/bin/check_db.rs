use nutriapp_backend::db;
use std::env;

#[tokio::main]
async fn main() -> Result<(), sqlx::Error> {
    dotenvy::dotenv().ok();

    let database_url = match env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("❌ DATABASE_URL must be set");
            std::process::exit(1);
        }
    };

    println!("Connecting to database and running migrations...");
    let pool = db::create_pool(&database_url, 1).await?;

    for table in ["usuarios", "historial_chats"] {
        let query = format!("SELECT COUNT(*) FROM {}", table);
        match sqlx::query_as::<_, (i64,)>(&query).fetch_one(&pool).await {
            Ok((count,)) => println!("✅ {} exists ({} rows)", table, count),
            Err(e) => println!("❌ {} not available: {}", table, e),
        }
    }

    let migrations = sqlx::query_as::<_, (i64, String)>(
        "SELECT version, description FROM _sqlx_migrations ORDER BY version DESC",
    )
    .fetch_all(&pool)
    .await?;

    println!("\nApplied migrations:");
    for (version, description) in migrations {
        println!("  - {} {}", version, description);
    }

    Ok(())
}
