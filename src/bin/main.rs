//! nlquery CLI - turn a question into SQL against a schema snapshot
//!
//! Usage:
//!   nlquery parse <query> --schema <snapshot.json> [--config <file>] [--dialect <d>] [--output <fmt>]
//!   nlquery match <query> --schema <snapshot.json> [--config <file>]
//!   nlquery tables --schema <snapshot.json>
//!
//! Examples:
//!   nlquery parse "最近7天的订单列表" --schema schema.json
//!   nlquery parse "各个module的统计" --schema schema.json --output json
//!   nlquery match "用户注册" --schema schema.json --config nlquery.json

use clap::{Parser, Subcommand, ValueEnum};
use nlquery::config::Settings;
use nlquery::metadata::{SchemaProvider, SchemaSnapshot};
use nlquery::sql::Dialect;
use nlquery::{PlanReport, QueryParser};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nlquery")]
#[command(about = "nlquery - turn free-text reporting questions into SQL")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan a question and print the SQL
    Parse {
        /// The question
        query: String,

        /// Path to the schema snapshot (JSON)
        #[arg(short, long)]
        schema: PathBuf,

        /// Path to a config file (JSON or TOML); searched for if omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// SQL dialect to generate (overrides the config)
        #[arg(short, long)]
        dialect: Option<DialectArg>,

        /// Output format
        #[arg(short, long, default_value = "sql")]
        output: OutputFormat,
    },

    /// Show ranked table matches for a question
    Match {
        /// The question
        query: String,

        /// Path to the schema snapshot (JSON)
        #[arg(short, long)]
        schema: PathBuf,

        /// Path to a config file (JSON or TOML); searched for if omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List tables, columns and match keywords of a snapshot
    Tables {
        /// Path to the schema snapshot (JSON)
        #[arg(short, long)]
        schema: PathBuf,
    },
}

#[derive(Clone, ValueEnum)]
enum DialectArg {
    Mysql,
    Postgres,
    Duckdb,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Mysql => Dialect::MySql,
            DialectArg::Postgres => Dialect::Postgres,
            DialectArg::Duckdb => Dialect::DuckDb,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Output SQL only
    Sql,
    /// Output the full plan as JSON
    Json,
    /// Output SQL with a summary of the plan
    Verbose,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Parse {
            query,
            schema,
            config,
            dialect,
            output,
        } => cmd_parse(&query, schema, config, dialect, output),
        Commands::Match {
            query,
            schema,
            config,
        } => cmd_match(&query, schema, config),
        Commands::Tables { schema } => cmd_tables(schema),
    }
}

fn load_settings(config: Option<PathBuf>) -> Result<Settings, ExitCode> {
    let result = match config {
        Some(path) => Settings::from_file(&path),
        None => Settings::load(),
    };
    result.map_err(|e| {
        eprintln!("Error loading config: {}", e);
        ExitCode::FAILURE
    })
}

fn load_schema(path: PathBuf) -> Result<SchemaSnapshot, ExitCode> {
    SchemaSnapshot::from_file(&path).map_err(|e| {
        eprintln!("Error loading schema {}: {}", path.display(), e);
        ExitCode::FAILURE
    })
}

fn cmd_parse(
    query: &str,
    schema: PathBuf,
    config: Option<PathBuf>,
    dialect: Option<DialectArg>,
    output: OutputFormat,
) -> ExitCode {
    let mut settings = match load_settings(config) {
        Ok(s) => s,
        Err(code) => return code,
    };
    if let Some(dialect) = dialect {
        settings.planner.dialect = dialect.into();
    }
    let snapshot = match load_schema(schema) {
        Ok(s) => s,
        Err(code) => return code,
    };

    info!(tables = snapshot.len(), dialect = %settings.planner.dialect, "planning");
    let parser = QueryParser::new(snapshot, settings);
    let report = parser.report(query);

    match output {
        OutputFormat::Json => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing plan: {}", e);
                return ExitCode::FAILURE;
            }
        },
        OutputFormat::Sql => match &report.plan {
            Some(plan) => println!("{}", plan.sql_query),
            None => print_failure(&report),
        },
        OutputFormat::Verbose => match &report.plan {
            Some(plan) => {
                println!("-- Table: {}", plan.primary_table);
                if !plan.related_tables.is_empty() {
                    println!("-- Related: {}", plan.related_tables.join(", "));
                }
                if let Some(time) = plan.query_intent.time_condition() {
                    println!("-- Time: {} ({})", time.description, time.field);
                }
                if let Some(group) = &plan.query_intent.group_field {
                    println!("-- Group field: {}", group);
                }
                println!("-- Chart: {}", plan.chart_type);
                println!();
                println!("{}", plan.sql_query);
            }
            None => print_failure(&report),
        },
    }

    if report.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_failure(report: &PlanReport) {
    eprintln!("Error: {}", report.error.as_deref().unwrap_or_default());
    if let Some(suggestion) = &report.suggestion {
        eprintln!("Hint: {}", suggestion);
    }
}

fn cmd_match(query: &str, schema: PathBuf, config: Option<PathBuf>) -> ExitCode {
    let settings = match load_settings(config) {
        Ok(s) => s,
        Err(code) => return code,
    };
    let snapshot = match load_schema(schema) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let parser = QueryParser::new(snapshot, settings);
    let matches = parser.match_tables(query);
    if matches.is_empty() {
        eprintln!("No table matched.");
        return ExitCode::FAILURE;
    }

    for m in &matches {
        println!("{:.3}  {}", m.score, m.table);
    }
    ExitCode::SUCCESS
}

fn cmd_tables(schema: PathBuf) -> ExitCode {
    let snapshot = match load_schema(schema) {
        Ok(s) => s,
        Err(code) => return code,
    };

    if snapshot.is_empty() {
        println!("No tables in snapshot.");
        return ExitCode::SUCCESS;
    }

    for (table, keywords) in snapshot.tables().iter().zip(snapshot.table_keywords()) {
        println!("{}", table.name);
        println!("  columns:  {}", table.columns.join(", "));
        let keywords: Vec<&str> = keywords.keywords.iter().map(String::as_str).collect();
        println!("  keywords: {}", keywords.join(", "));
    }

    ExitCode::SUCCESS
}
