//! Command-line front end over the generic record store.
//!
//! # Responsibility
//! - Load `.env` and `RECORDKIT_*` settings, wire logging, open the database.
//! - Map one subcommand onto one repository operation and print JSON.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use recordkit_core::db::open_db_with_config;
use recordkit_core::{
    init_logging, init_stderr_logging, AttributeMap, Category, Destination, Product, Record,
    RecordService, SqliteRepository, Station, StoreConfig, User,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};

const ENV_FILE: &str = ".env";

#[derive(Debug, Parser)]
#[command(name = "recordkit", version, about = "Inspect and edit a recordkit SQLite store")]
struct Cli {
    /// Database file; overrides RECORDKIT_DB_PATH.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create the database file and baseline tables.
    Init,
    /// Print one record by primary key.
    Get { entity: Entity, id: i64 },
    /// Print one page of records, e.g. `--query "where=category_id:3&by=price&order=asc"`.
    List {
        entity: Entity,
        #[arg(long, default_value = "")]
        query: String,
    },
    Count { entity: Entity },
    /// Insert a JSON object, or a JSON array as one batch.
    Insert { entity: Entity, json: String },
    /// Replace every writable column of the record identified by `id` in the JSON.
    Update { entity: Entity, json: String },
    /// Apply a JSON object of attributes checked against the entity's update schema.
    Patch { entity: Entity, id: i64, json: String },
    Delete { entity: Entity, id: i64 },
}

impl Command {
    fn entity(&self) -> Option<Entity> {
        match self {
            Self::Init => None,
            Self::Get { entity, .. }
            | Self::List { entity, .. }
            | Self::Count { entity }
            | Self::Insert { entity, .. }
            | Self::Update { entity, .. }
            | Self::Patch { entity, .. }
            | Self::Delete { entity, .. } => Some(*entity),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Entity {
    Category,
    Product,
    User,
    Destination,
    Station,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    load_env_file(Path::new(ENV_FILE))?;
    let mut config = StoreConfig::from_env().context("invalid RECORDKIT_* configuration")?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }

    let logging = match &config.log_dir {
        Some(dir) => init_logging(&config.log_level, &dir.to_string_lossy()),
        None => init_stderr_logging(&config.log_level),
    };
    logging.context("failed to initialize logging")?;

    let conn = open_db_with_config(&config)
        .with_context(|| format!("failed to open {}", config.db_path.display()))?;
    let repo = SqliteRepository::new(conn);

    let Some(entity) = cli.command.entity() else {
        info!(
            "event=cli_init module=cli status=ok db_path={}",
            config.db_path.display()
        );
        return print_json(&json!({ "db_path": config.db_path }));
    };

    match entity {
        Entity::Category => run::<Category>(&repo, &cli.command),
        Entity::Product => run::<Product>(&repo, &cli.command),
        Entity::User => run::<User>(&repo, &cli.command),
        Entity::Destination => run::<Destination>(&repo, &cli.command),
        Entity::Station => run::<Station>(&repo, &cli.command),
    }
}

fn run<R>(repo: &SqliteRepository, command: &Command) -> anyhow::Result<()>
where
    R: Record + Serialize + DeserializeOwned,
{
    let service = RecordService::<R, _>::new(repo);

    match command {
        Command::Init => Ok(()),
        Command::Get { id, .. } => {
            let record = service
                .get(*id)
                .with_context(|| format!("{} id={id}", R::TABLE))?;
            print_json(&record)
        }
        Command::List { query, .. } => print_json(&service.list(query)?),
        Command::Count { .. } => print_json(&json!({ "count": service.count()? })),
        Command::Insert { json, .. } => {
            let payload: serde_json::Value =
                serde_json::from_str(json).context("insert payload is not valid JSON")?;
            if payload.is_array() {
                let records: Vec<R> = serde_json::from_value(payload)
                    .with_context(|| format!("payload is not a list of {}", R::TABLE))?;
                print_json(&json!({ "inserted": service.create_many(&records)? }))
            } else {
                let record: R = serde_json::from_value(payload)
                    .with_context(|| format!("payload is not a {} record", R::TABLE))?;
                print_json(&json!({ "id": service.create(&record)? }))
            }
        }
        Command::Update { json, .. } => {
            let record: R = serde_json::from_str(json)
                .with_context(|| format!("payload is not a {} record", R::TABLE))?;
            print_json(&json!({ "updated": service.update(&record)? }))
        }
        Command::Patch { id, json, .. } => {
            let attrs: AttributeMap =
                serde_json::from_str(json).context("patch payload must be a JSON object")?;
            let updated = service.patch(*id, &attrs)?;
            if updated == 0 && !attrs.is_empty() {
                bail!("{} id={id} not found", R::TABLE);
            }
            print_json(&json!({ "updated": updated }))
        }
        Command::Delete { id, .. } => {
            print_json(&json!({ "deleted": service.delete(*id)? }))
        }
    }
}

/// Loads `path` into the process environment; returns whether it existed.
///
/// A missing file is normal and leaves only the process environment in use.
/// A file that exists but does not parse is an error.
fn load_env_file(path: &Path) -> anyhow::Result<bool> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(err) if err.not_found() => Ok(false),
        Err(err) => Err(err).with_context(|| format!("failed to load {}", path.display())),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
