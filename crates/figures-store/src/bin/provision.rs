//! # Inventory Provisioning
//!
//! Sets absolute initial counts in a SQLite inventory.
//!
//! ## Usage
//! ```bash
//! # Five circles, twenty squares
//! cargo run -p figures-store --bin provision -- --stock Circle=5 --stock Square=20
//!
//! # Specify database path
//! cargo run -p figures-store --bin provision -- --db ./data/figures.db --stock Triangle=10
//! ```
//!
//! Counts are absolute, not added: running the same command twice leaves
//! the same stock. This is how initial counts get into the store; the API
//! never restocks.

use std::env;

use anyhow::{anyhow, bail, Context};
use figures_core::FigureKind;
use figures_store::{Database, DbConfig, InventoryStore};
use tracing_subscriber::EnvFilter;

/// Parses `Kind=N`.
fn parse_stock(arg: &str) -> anyhow::Result<(FigureKind, i64)> {
    let (name, count) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("expected Kind=N, got '{arg}'"))?;

    let kind = FigureKind::parse(Some(name)).map_err(|e| anyhow!("{e}"))?;
    let count: i64 = count
        .trim()
        .parse()
        .with_context(|| format!("invalid count in '{arg}'"))?;

    if count < 0 {
        bail!("count for {kind} must not be negative");
    }

    Ok((kind, count))
}

fn print_help() {
    println!("Figures Store Inventory Provisioning");
    println!();
    println!("Usage: provision [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -d, --db <PATH>       Database file path (default: ./figures.db)");
    println!("  -s, --stock <KIND=N>  Set the count for a kind (repeatable)");
    println!("  -h, --help            Show this help message");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./figures.db");
    let mut stock = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                db_path = args
                    .get(i + 1)
                    .cloned()
                    .ok_or_else(|| anyhow!("--db needs a path"))?;
                i += 1;
            }
            "--stock" | "-s" => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| anyhow!("--stock needs Kind=N"))?;
                stock.push(parse_stock(value)?);
                i += 1;
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            other => bail!("unknown argument '{other}' (try --help)"),
        }
        i += 1;
    }

    if stock.is_empty() {
        print_help();
        bail!("nothing to provision");
    }

    println!("Figures Store Inventory Provisioning");
    println!("====================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path))
        .await
        .with_context(|| format!("opening {db_path}"))?;
    let inventory = db.inventory();

    for (kind, count) in &stock {
        inventory.provision(*kind, *count).await?;
        println!("✓ {kind} = {count}");
    }

    println!();
    println!("Current stock:");
    for (kind, count) in inventory.list_counts().await? {
        println!("  {:<10} {}", kind.as_str(), count);
    }

    db.close().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stock() {
        assert_eq!(parse_stock("Circle=5").unwrap(), (FigureKind::Circle, 5));
        assert_eq!(parse_stock("square= 20").unwrap(), (FigureKind::Square, 20));

        assert!(parse_stock("Circle").is_err());
        assert!(parse_stock("Hexagon=1").is_err());
        assert!(parse_stock("Circle=-1").is_err());
        assert!(parse_stock("Circle=lots").is_err());
    }
}
