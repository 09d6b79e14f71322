use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use sheetsync::cli::{self, Target};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "sheetsync")]
#[command(about = "Query and update a remote spreadsheet from the command line.")]
#[command(long_about = "Sheetsync - local queries, minimal writes
Fetch once, query locally, write only the cells that change.

COMMANDS:
  fetch   - Load a sheet (from cache when fresh) and show its shape
  select  - Print rows matching field=value conditions
  insert  - Append one row aligned to the sheet header
  update  - Set fields on every matching row in one batched request

AUTH:
  A bearer token is read from $SHEETSYNC_TOKEN (or --token-env VAR).

EXAMPLES:
  sheetsync fetch 1AbCdEf Members --cache
  sheetsync select 1AbCdEf Members name=Alice
  sheetsync insert 1AbCdEf Members name=Carol age=28
  sheetsync update 1AbCdEf Members --set age=31 --where name=Alice")]
#[command(version)]
struct Cli {
    /// Show info-level logs (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct SheetArgs {
    /// Spreadsheet file id
    file_id: String,

    /// Sheet (tab) title
    sheet: String,

    /// YAML config file
    #[arg(short, long, env = "SHEETSYNC_CONFIG")]
    config: Option<PathBuf>,

    /// Enable the local cache
    #[arg(long)]
    cache: bool,

    /// Cache directory (default: ./cache)
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Cache freshness window in seconds (default: 600)
    #[arg(long)]
    cache_expires: Option<u64>,

    /// Environment variable holding the bearer token
    #[arg(long)]
    token_env: Option<String>,

    /// Override the Sheets API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Read through the legacy cell feed of this worksheet id (e.g. od6)
    #[arg(long, value_name = "ID")]
    worksheet_id: Option<String>,
}

impl From<SheetArgs> for Target {
    fn from(args: SheetArgs) -> Self {
        Target {
            file_id: args.file_id,
            sheet: args.sheet,
            config: args.config,
            cache: args.cache,
            cache_dir: args.cache_dir,
            cache_expires: args.cache_expires,
            token_env: args.token_env,
            base_url: args.base_url,
            worksheet_id: args.worksheet_id,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Load a sheet and show its header and row count
    Fetch {
        #[command(flatten)]
        target: SheetArgs,

        /// Ignore any cached copy
        #[arg(short, long)]
        force: bool,

        /// Delete the cached copy before fetching
        #[arg(long)]
        clear_cache: bool,
    },

    #[command(long_about = "Print rows matching every field=value condition.

Comparison is exact and case-sensitive. With no conditions, every row is printed.
The first column is the remote row number of each match.

EXAMPLES:
  sheetsync select 1AbCdEf Members status=active
  sheetsync select 1AbCdEf Members name=Alice --json")]
    /// Print rows matching field=value conditions
    Select {
        #[command(flatten)]
        target: SheetArgs,

        /// Conditions (field=value)
        conditions: Vec<String>,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Append one row (fields not in the header are dropped)
    Insert {
        #[command(flatten)]
        target: SheetArgs,

        /// Values (field=value)
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// Update fields on every matching row
    Update {
        #[command(flatten)]
        target: SheetArgs,

        /// New values (field=value)
        #[arg(short, long = "set", required = true)]
        set: Vec<String>,

        /// Conditions (field=value)
        #[arg(short = 'w', long = "where", required = true)]
        conditions: Vec<String>,
    },
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "sheetsync=info" } else { "sheetsync=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "❌ Error:".bold().red(), e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Fetch {
            target,
            force,
            clear_cache,
        } => cli::fetch(target.into(), force, clear_cache)?,

        Commands::Select {
            target,
            conditions,
            json,
        } => cli::select(target.into(), conditions, json)?,

        Commands::Insert { target, values } => cli::insert(target.into(), values)?,

        Commands::Update {
            target,
            set,
            conditions,
        } => cli::update(target.into(), set, conditions)?,
    }

    Ok(())
}
