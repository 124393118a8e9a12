//! sqlweave CLI
//!
//! Validate, render and apply JSON table definitions.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sqlx::pool::PoolOptions;
use sqlx::{Database, MySql, Pool, Postgres, Sqlite};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use sqlweave::{Dialect, SqlHandle, TableDefinition};

/// Dialect-aware table definitions for SQLite, MySQL and PostgreSQL.
#[derive(Parser)]
#[command(name = "sqlweave")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL used by `apply`.
    #[arg(short, long, env = "DATABASE_URL", default_value = "sqlite:db.sqlite3?mode=rwc")]
    database_url: String,

    /// SQL dialect (sqlite, mysql, postgres). Unknown names fall back to sqlite.
    #[arg(long, env = "SQLWEAVE_DIALECT", default_value = "sqlite")]
    dialect: String,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a table definition without touching a database.
    Validate {
        /// JSON table definition.
        file: PathBuf,
    },

    /// Print the CREATE TABLE and CREATE INDEX statements for a definition.
    Render {
        /// JSON table definition.
        file: PathBuf,
    },

    /// List the portable column types and their keywords.
    Types,

    /// Create the table and its indexes in the database.
    Apply {
        /// JSON table definition.
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let dialect = Dialect::from_name(&cli.dialect);

    match cli.command {
        Commands::Validate { file } => {
            let def = commands::load_definition(&file)?;
            def.validate()?;
            println!("ok");
        }

        Commands::Render { file } => {
            let def = commands::load_definition(&file)?;
            for statement in commands::render_statements(dialect, &def)? {
                println!("{statement};");
            }
        }

        Commands::Types => {
            println!("{:<12} {dialect}", "type");
            println!("{:-<32}", "");
            for (name, keyword) in commands::type_listing(dialect) {
                println!("{name:<12} {keyword}");
            }
        }

        Commands::Apply { file } => {
            let def = commands::load_definition(&file)?;
            def.validate()?;

            info!(table = %def.table, dialect = %dialect, "Applying table definition");
            match dialect {
                Dialect::Sqlite => apply::<Sqlite>(&cli.database_url, dialect, &def).await?,
                Dialect::MySql => apply::<MySql>(&cli.database_url, dialect, &def).await?,
                Dialect::Postgres => apply::<Postgres>(&cli.database_url, dialect, &def).await?,
            }
            info!("Done.");
        }
    }

    Ok(())
}

/// Connects a pool of the dialect's driver and creates the table.
async fn apply<DB: Database>(url: &str, dialect: Dialect, def: &TableDefinition) -> anyhow::Result<()>
where
    Pool<DB>: SqlHandle,
{
    let mut pool = PoolOptions::<DB>::new()
        .max_connections(5)
        .connect(url)
        .await?;
    sqlweave::create_table(&mut pool, dialect, def).await?;
    pool.close().await;
    Ok(())
}
