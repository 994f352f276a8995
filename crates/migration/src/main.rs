use sea_orm::Database;
use sea_orm_migration::prelude::*;

const USAGE: &str = "\
Usage: migration [COMMAND]

Applies the pocketbook schema (expenses, incomes, work_attendance).

Commands:
  up      apply pending migrations (default)
  down    roll back the last migration
  fresh   drop every table and re-apply all migrations
  status  list applied and pending migrations
  help    print this message

Database:
  DATABASE_URL                        full connection string, or
  POCKETBOOK__SERVER__DATABASE__SQLITE  SQLite path shared with the server
                                      (default: pocketbook.db)";

const DEFAULT_SQLITE_PATH: &str = "pocketbook.db";

fn database_url() -> String {
    if let Ok(url) = std::env::var("DATABASE_URL") {
        return url;
    }
    let path = std::env::var("POCKETBOOK__SERVER__DATABASE__SQLITE")
        .unwrap_or_else(|_| DEFAULT_SQLITE_PATH.to_string());
    format!("sqlite:{path}?mode=rwc")
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cmd = std::env::args().nth(1).unwrap_or_else(|| "up".to_string());

    if matches!(cmd.as_str(), "help" | "-h" | "--help") {
        println!("{USAGE}");
        return Ok(());
    }
    if !matches!(cmd.as_str(), "up" | "down" | "fresh" | "status") {
        eprintln!("unknown command: {cmd}\n\n{USAGE}");
        std::process::exit(2);
    }

    let url = database_url();
    let db = Database::connect(&url).await?;

    match cmd.as_str() {
        "down" => migration::Migrator::down(&db, Some(1)).await?,
        "fresh" => migration::Migrator::fresh(&db).await?,
        "status" => migration::Migrator::status(&db).await?,
        _ => migration::Migrator::up(&db, None).await?,
    }
    println!("{cmd}: done ({url})");

    Ok(())
}
