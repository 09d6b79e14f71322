use crate::address::remote_row;
use crate::client::Client;
use crate::config::Config;
use crate::error::{SyncError, SyncResult};
use crate::query::Condition;
use crate::sync::{Sheet, SheetsApi, Values};
use crate::transport::auth::DEFAULT_TOKEN_ENV;
use crate::transport::http::DEFAULT_TIMEOUT_SECS;
use crate::transport::EnvToken;
use crate::types::{Row, Table};
use colored::Colorize;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::time::Duration;

/// Which sheet to open and how; flags override the config file
#[derive(Debug, Clone, Default)]
pub struct Target {
    pub file_id: String,
    pub sheet: String,
    pub config: Option<PathBuf>,
    pub cache: bool,
    pub cache_dir: Option<PathBuf>,
    pub cache_expires: Option<u64>,
    pub token_env: Option<String>,
    pub base_url: Option<String>,
    pub worksheet_id: Option<String>,
}

/// Build a sheet handle from flags and the optional config file
pub fn open_sheet(target: &Target) -> SyncResult<Sheet> {
    let config = match &target.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let mut options = config.options.clone();
    if target.cache {
        options.cache = true;
    }
    if let Some(dir) = &target.cache_dir {
        options.cache_dir = dir.clone();
    }
    if let Some(expires) = target.cache_expires {
        options.cache_expires = expires;
    }

    let token_env = target
        .token_env
        .clone()
        .or(config.token_env)
        .unwrap_or_else(|| DEFAULT_TOKEN_ENV.to_string());
    let timeout = Duration::from_secs(config.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));

    let mut client =
        Client::with_token_source(EnvToken::new(token_env), timeout)?.with_options(options);
    if let Some(base_url) = target.base_url.clone().or(config.base_url) {
        client = client.with_api(SheetsApi::with_base_url(base_url));
    }

    let file = client.file(target.file_id.clone());
    match target.worksheet_id.clone().or(config.worksheet_id) {
        Some(worksheet_id) => Ok(file.legacy_sheet(worksheet_id, target.sheet.clone())),
        None => Ok(file.sheet(target.sheet.clone())),
    }
}

/// Parse `field=value` arguments
pub fn parse_pairs(pairs: &[String]) -> SyncResult<Values> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.to_string()))
                .ok_or_else(|| {
                    SyncError::Config(format!("expected field=value, got '{}'", pair))
                })
        })
        .collect()
}

/// Execute the fetch command
pub fn fetch(target: Target, force: bool, clear_cache: bool) -> SyncResult<()> {
    println!("{}", "🔄 Sheetsync - Fetching sheet".bold().green());
    println!("   File:  {}", target.file_id);
    println!("   Sheet: {}", target.sheet);
    if force {
        println!("{}", "   Forced refresh (cache bypassed)".yellow());
    }
    println!();

    let mut sheet = open_sheet(&target)?;
    if clear_cache {
        sheet.clear_cache()?;
        println!("{}", "   Cached copy removed".yellow());
    }
    let table = sheet.fetch(force)?.table()?;

    if table.header.is_empty() {
        println!("{}", "⚠️  Sheet is empty".yellow());
        return Ok(());
    }

    println!("   Columns: {}", table.header.join(", ").bright_blue());
    println!("   Rows:    {}", table.row_count());
    Ok(())
}

/// Execute the select command
pub fn select(target: Target, conditions: Vec<String>, as_json: bool) -> SyncResult<()> {
    let condition = if conditions.is_empty() {
        Condition::All
    } else {
        Condition::Equals(parse_pairs(&conditions)?)
    };

    let mut sheet = open_sheet(&target)?;
    sheet.fetch(false)?;
    let rows = sheet.select(&condition)?;
    let table = sheet.table()?;

    if as_json {
        let out: Vec<Value> = rows.iter().map(|row| row_json(table, row)).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("{}", "No matching rows".yellow());
        return Ok(());
    }

    println!("{}", format!("row\t{}", table.header.join("\t")).bold());
    for row in &rows {
        println!(
            "{}\t{}",
            remote_row(row.origin).to_string().bright_black(),
            table.row_values(row).join("\t")
        );
    }
    println!("\n{}", format!("{} row(s)", rows.len()).green());
    Ok(())
}

/// Execute the insert command
pub fn insert(target: Target, values: Vec<String>) -> SyncResult<()> {
    let values = parse_pairs(&values)?;
    if values.is_empty() {
        return Err(SyncError::Config("insert needs at least one field=value".to_string()));
    }

    let mut sheet = open_sheet(&target)?;
    let ack = sheet.insert(&values)?;

    println!("{}", "✅ Row appended".bold().green());
    print_ack(&ack);
    Ok(())
}

/// Execute the update command
pub fn update(target: Target, set: Vec<String>, conditions: Vec<String>) -> SyncResult<()> {
    let values = parse_pairs(&set)?;
    if conditions.is_empty() {
        return Err(SyncError::Config(
            "update needs at least one --where field=value".to_string(),
        ));
    }
    let condition = Condition::Equals(parse_pairs(&conditions)?);

    let mut sheet = open_sheet(&target)?;
    match sheet.update(&values, &condition)? {
        Some(ack) => {
            println!("{}", "✅ Cells updated".bold().green());
            print_ack(&ack);
        }
        None => println!("{}", "⚠️  Nothing to update".yellow()),
    }
    Ok(())
}

fn row_json(table: &Table, row: &Row) -> Value {
    let values: serde_json::Map<String, Value> = table
        .header
        .iter()
        .zip(table.row_values(row))
        .map(|(field, value)| (field.clone(), Value::String(value)))
        .collect();

    json!({
        "origin": row.origin,
        "row": remote_row(row.origin),
        "values": values,
    })
}

fn print_ack(ack: &Value) {
    if let Some(cells) = ack
        .get("updatedCells")
        .or_else(|| ack.pointer("/updates/updatedCells"))
        .or_else(|| ack.get("totalUpdatedCells"))
    {
        println!("   Cells written: {}", cells);
    }
    if let Some(range) = ack.pointer("/updates/updatedRange") {
        println!("   Range: {}", range);
    }
}
