//! CLI tool for inspecting a database schema and generating models from it

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use schema_reflect::database::{create_database_connection, extensions, DatabaseConnection};
use schema_reflect::model_manager::{
    render_rust, FieldSelector, ModelGenerator, ReflectionConfig,
    StorageSelector,
};
use schema_reflect::{build, init_logging};

/// Entry point for the reflect-tool CLI
#[derive(Parser)]
#[command(name = "reflect-tool")]
#[command(about = "Inspect a database schema and generate model definitions from it", long_about = None)]
struct Cli {
    /// Path to a SQLite database file
    #[arg(short, long, value_name = "PATH", global = true, conflicts_with = "config")]
    database: Option<PathBuf>,
    /// Path to the reflection configuration file (TOML)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,
    /// Output format for structured results
    #[arg(short, long, value_enum, default_value = "json", global = true)]
    format: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List storage names
    Storages,
    /// Show the normalized fields of one storage
    Fields {
        /// Storage name
        storage: String,
    },
    /// Show every storage with its fields
    Snapshot,
    /// Generate model specs for the selected storages
    Genclass {
        /// Storage selector: exact name, `:name`, or `/regex/` (repeatable)
        #[arg(short, long = "storage", value_name = "SEL")]
        storages: Vec<String>,
        /// Scope to generate models into
        #[arg(long, value_name = "NAME")]
        scope: Option<String>,
        /// Emit Rust struct definitions instead of specs
        #[arg(long)]
        rust: bool,
        /// Output file ('-' for stdout)
        #[arg(short, long, value_name = "OUTPUT", default_value = "-")]
        output: PathBuf,
    },
    /// Show the fields of one storage matching the given selectors
    Reflect {
        /// Storage name
        storage: String,
        /// Field selector: name, `/regex/`, `type:<Type>`, or `serial` (repeatable)
        #[arg(short, long = "select", value_name = "SEL")]
        selectors: Vec<String>,
    },
    /// Print build information
    Version,
}

#[derive(ValueEnum, Clone, Copy)]
enum OutputFormat {
    Json,
    Yaml,
}

fn render<T: Serialize>(value: &T, format: OutputFormat) -> Result<String, Box<dyn std::error::Error>> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)? + "\n",
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    })
}

fn write_output(output: &PathBuf, content: &str) -> io::Result<()> {
    if output.to_string_lossy() == "-" {
        io::stdout().write_all(content.as_bytes())
    } else {
        File::create(output)?.write_all(content.as_bytes())
    }
}

fn load_config(cli: &Cli) -> Result<ReflectionConfig, Box<dyn std::error::Error>> {
    match (&cli.config, &cli.database) {
        (Some(path), _) => Ok(ReflectionConfig::load(path)?),
        (None, Some(db)) => Ok(ReflectionConfig {
            database: extensions::sqlite_config(db.to_string_lossy().to_string()),
            ..Default::default()
        }),
        (None, None) => Err("either --database or --config is required".into()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let cli = Cli::parse();

    if let Commands::Version = cli.command {
        println!("{}", build::version_line());
        return Ok(());
    }

    let config = load_config(&cli)?;
    let conn: Arc<dyn DatabaseConnection> =
        create_database_connection(&config.database).await?.into();
    let adapter = config.get_adapter(Arc::clone(&conn))?;
    let generator = ModelGenerator::new(adapter.as_ref());

    let stdout = PathBuf::from("-");
    match &cli.command {
        Commands::Storages => {
            let mut storages = adapter.storages().await?;
            storages.sort();
            write_output(&stdout, &render(&storages, cli.format)?)?;
        }
        Commands::Fields { storage } => {
            let fields = adapter.fields(storage).await?;
            write_output(&stdout, &render(&fields, cli.format)?)?;
        }
        Commands::Snapshot => {
            let snapshot = adapter.storages_and_fields().await?;
            write_output(&stdout, &render(&snapshot, cli.format)?)?;
        }
        Commands::Genclass {
            storages,
            scope,
            rust,
            output,
        } => {
            // command-line selectors replace the configured ones
            let mut options = config.genclass.clone();
            if !storages.is_empty() {
                options.storages = storages
                    .iter()
                    .map(|s| StorageSelector::parse(s))
                    .collect::<Result<_, _>>()?;
            }
            if scope.is_some() {
                options.scope = scope.clone();
            }
            let specs = generator.auto_genclass(&options).await?;
            let content = if *rust {
                render_rust(&specs)
            } else {
                render(&specs, cli.format)?
            };
            write_output(output, &content)?;
        }
        Commands::Reflect { storage, selectors } => {
            let selectors = selectors
                .iter()
                .map(|s| FieldSelector::parse(s))
                .collect::<Result<Vec<_>, _>>()?;
            let fields = generator.reflect(storage, &selectors).await?;
            write_output(&stdout, &render(&fields, cli.format)?)?;
        }
        Commands::Version => {}
    }

    conn.close().await?;
    Ok(())
}
