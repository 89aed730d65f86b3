//! fieldspec CLI
//!
//! Command-line access to the field specification codec:
//! - Encoding a human path (`CollectionObject.determinations.taxon.fullName`) to its string id
//! - Decoding a stored string id back to its join path
//! - Projecting a string id to a mapping path
//! - Auditing the string ids of exported saved query fields

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use fieldspec_codec::{DatePart, FieldSpec};
use fieldspec_schema::SchemaCatalog;
use serde::Serialize;

mod check;
mod config;

use config::{CliConfig, OutputFormat};

#[derive(Parser)]
#[command(name = "fieldspec")]
#[command(
    author,
    version,
    about = "Encode and decode query field specifications"
)]
struct Cli {
    /// Datamodel JSON (default: $FIELDSPEC_SCHEMA, then ./datamodel.json)
    #[arg(long, global = true)]
    schema: Option<PathBuf>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a dotted path (`Table.field.field`) to its string id
    Encode {
        path: String,
        /// Date granularity for a temporal terminal field
        #[arg(long, value_enum)]
        date_part: Option<DatePartArg>,
        /// Tree rank below the terminal relationship (e.g. `Genus`)
        #[arg(long)]
        tree_rank: Option<String>,
    },

    /// Decode a string id back to its join path
    Decode {
        string_id: String,
        /// The stored column is a relationship column (`isrelfld`)
        #[arg(long)]
        relationship: bool,
    },

    /// Project a string id to its mapping path
    Project {
        string_id: String,
        #[arg(long)]
        relationship: bool,
    },

    /// Decode every saved query field in a JSON array and report corrupt rows
    Check {
        /// JSON array of `{ "stringid": ..., "isrelfld": ... }` rows
        input: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DatePartArg {
    FullDate,
    Year,
    Month,
    Day,
}

impl From<DatePartArg> for DatePart {
    fn from(value: DatePartArg) -> Self {
        match value {
            DatePartArg::FullDate => DatePart::FullDate,
            DatePartArg::Year => DatePart::Year,
            DatePartArg::Month => DatePart::Month,
            DatePartArg::Day => DatePart::Day,
        }
    }
}

/// JSON view of a decoded spec.
#[derive(Serialize)]
struct SpecView<'a> {
    base_table: &'a str,
    join_path: Vec<&'a str>,
    table: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    date_part: Option<DatePart>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tree_rank: Option<&'a str>,
    is_relationship: bool,
    mapping_path: Vec<String>,
}

impl<'a> SpecView<'a> {
    fn new(spec: &'a FieldSpec) -> Self {
        Self {
            base_table: &spec.base_table().name,
            join_path: spec.join_path().iter().map(|f| f.name.as_str()).collect(),
            table: &spec.table().name,
            date_part: spec.date_part(),
            tree_rank: spec.tree_rank(),
            is_relationship: spec.is_relationship(),
            mapping_path: spec.to_mapping_path(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::from_env().with_overrides(cli.schema, cli.json, cli.verbose);
    init_logging(&config);

    let catalog = SchemaCatalog::from_json_file(&config.schema_path).with_context(|| {
        format!("failed to load datamodel `{}`", config.schema_path.display())
    })?;

    match cli.command {
        Commands::Encode {
            path,
            date_part,
            tree_rank,
        } => cmd_encode(&catalog, &config, &path, date_part, tree_rank.as_deref()),
        Commands::Decode {
            string_id,
            relationship,
        } => cmd_decode(&catalog, &config, &string_id, relationship),
        Commands::Project {
            string_id,
            relationship,
        } => cmd_project(&catalog, &config, &string_id, relationship),
        Commands::Check { input } => cmd_check(&catalog, &config, &input),
    }
}

fn init_logging(config: &CliConfig) {
    // Logs go to stderr so `--json` output stays parseable.
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(config.log_level)
        .with_target(false)
        .try_init();
}

fn cmd_encode(
    catalog: &SchemaCatalog,
    config: &CliConfig,
    path: &str,
    date_part: Option<DatePartArg>,
    tree_rank: Option<&str>,
) -> Result<()> {
    let mut spec = FieldSpec::from_dotted_path(catalog, path)?;
    if let Some(part) = date_part {
        spec = spec.with_date_part(part.into())?;
    }
    if let Some(rank) = tree_rank {
        spec = spec.with_tree_rank(catalog, rank)?;
    }
    let attrs = spec.encode();

    match config.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&attrs)?),
        OutputFormat::Human => {
            println!("{} {}", "encoded".green().bold(), spec.to_string().bold());
            println!("  tablelist  {}", attrs.table_list);
            println!("  stringid   {}", attrs.string_id.cyan());
            println!("  fieldname  {}", attrs.field_name);
            println!("  isrelfld   {}", attrs.is_relationship);
        }
    }
    Ok(())
}

fn cmd_decode(
    catalog: &SchemaCatalog,
    config: &CliConfig,
    string_id: &str,
    relationship: bool,
) -> Result<()> {
    let spec = FieldSpec::decode(catalog, string_id, relationship)?;
    let view = SpecView::new(&spec);

    match config.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
        OutputFormat::Human => {
            println!("{} {}", "decoded".green().bold(), string_id.cyan());
            println!("  base table  {}", view.base_table);
            println!("  join path   {}", view.join_path.join(" -> "));
            println!("  table       {}", view.table);
            if let Some(part) = view.date_part {
                println!("  date part   {part}");
            }
            if let Some(rank) = view.tree_rank {
                println!("  tree rank   {}", rank.yellow());
            }
            println!("  isrelfld    {}", view.is_relationship);
        }
    }
    Ok(())
}

fn cmd_project(
    catalog: &SchemaCatalog,
    config: &CliConfig,
    string_id: &str,
    relationship: bool,
) -> Result<()> {
    let spec = FieldSpec::decode(catalog, string_id, relationship)?;
    let mapping_path = spec.to_mapping_path();

    match config.output {
        OutputFormat::Json => println!("{}", serde_json::to_string(&mapping_path)?),
        OutputFormat::Human => println!("{}", mapping_path.join(" ")),
    }
    Ok(())
}

fn cmd_check(catalog: &SchemaCatalog, config: &CliConfig, input: &std::path::Path) -> Result<()> {
    let rows = check::read_saved_fields(input)?;
    let report = check::check_fields(catalog, &rows);

    match config.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Human => {
            for row in &report.non_canonical {
                println!(
                    "{} #{} {} -> {} (isrelfld {})",
                    "non-canonical".yellow().bold(),
                    row.index,
                    row.string_id,
                    row.canonical.cyan(),
                    row.canonical_is_relationship
                );
            }
            for row in &report.corrupt {
                println!(
                    "{} #{} {}: {}",
                    "corrupt".red().bold(),
                    row.index,
                    row.string_id,
                    row.error
                );
            }
            println!(
                "{} {} rows: {} ok, {} non-canonical, {} corrupt",
                if report.is_clean() {
                    "ok".green().bold()
                } else {
                    "failed".red().bold()
                },
                report.total,
                report.ok,
                report.non_canonical.len(),
                report.corrupt.len()
            );
        }
    }

    if report.is_clean() {
        Ok(())
    } else {
        Err(anyhow!(
            "{} corrupt saved query field(s) in `{}`",
            report.corrupt.len(),
            input.display()
        ))
    }
}
