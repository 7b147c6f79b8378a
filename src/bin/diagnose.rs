//! Prints a pass/fail report of the server's environment.
//!
//! Exits with status 1 when any check fails.

use lionsclub::{
    model::system::DiagnosticCheckDto,
    server::{
        config::Config,
        service::system::{
            check_database, check_env_vars, check_line_token, check_static_dir, check_upload_dir,
        },
        startup,
    },
};
use sea_orm::Database;
use tracing_subscriber::EnvFilter;

fn print_check(check: &DiagnosticCheckDto) {
    let outcome = if check.ok { "PASS" } else { "FAIL" };

    println!("[{}] {:<10} {}", outcome, check.name, check.detail);
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let mut checks = vec![check_env_vars(|name| std::env::var(name).ok())];

    match Config::from_env() {
        Ok(config) => {
            let database = match Database::connect(&config.database_url).await {
                Ok(db) => check_database(&db).await,
                Err(e) => DiagnosticCheckDto {
                    name: "database".to_string(),
                    ok: false,
                    detail: format!("Failed to connect: {}", e),
                },
            };
            checks.push(database);
            checks.push(check_static_dir(&config.static_dir).await);
            checks.push(check_upload_dir(&config.upload_dir).await);

            let line = match startup::build_line_client(&config) {
                Ok(line) => check_line_token(&line).await,
                Err(e) => DiagnosticCheckDto {
                    name: "line".to_string(),
                    ok: false,
                    detail: format!("Failed to build LINE client: {}", e),
                },
            };
            checks.push(line);
        }
        Err(e) => checks.push(DiagnosticCheckDto {
            name: "config".to_string(),
            ok: false,
            detail: e.to_string(),
        }),
    }

    for check in &checks {
        print_check(check);
    }

    let failed = checks.iter().filter(|check| !check.ok).count();
    if failed > 0 {
        println!("{} of {} checks failed", failed, checks.len());
        std::process::exit(1);
    }

    println!("All {} checks passed", checks.len());
}
