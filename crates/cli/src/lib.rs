//! # Condo CLI
//!
//! Command-line client for the condominium admin backend.
//!
//! It shares the catalog, session file and API client with the desktop
//! dashboard, so a login made here is picked up by the dashboard and the
//! other way around.
//!
//! ## Commands
//!
//! - `entities` - List the catalog entities and their endpoints
//! - `list` - Print an entity's collection as a table
//! - `show` - Print one record as JSON
//! - `delete` - Delete one record
//! - `login` / `logout` / `whoami` - Manage the stored session
//!

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use condo_client::{ApiClient, ClientConfig, FileSessionStore, SessionContext, authorize_admin};
use condo_core::Validatable;
use condo_model::{EntitySchema, Row, SortDirection, SortState, catalog, sorted_indices};

// Re-export dependencies for use in main.rs
pub use condo_client;
pub use condo_core;
pub use condo_model;

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Arguments
// ============================================================================

#[derive(Debug, Parser)]
#[command(name = "condo", version, about = "Condominium admin command-line client")]
pub struct Cli {
    /// Backend base URL
    #[arg(long, global = true, env = "CONDO_API_BASE")]
    pub api_base: Option<String>,

    /// Session file shared with the dashboard
    #[arg(long, global = true, env = "CONDO_SESSION_FILE")]
    pub session_file: Option<std::path::PathBuf>,

    /// Log requests
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List catalog entities
    Entities,
    /// Print an entity's records
    List {
        /// Catalog key, e.g. `residentes`
        entity: String,
        /// Column to sort by
        #[arg(long)]
        sort: Option<String>,
        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,
    },
    /// Print one record as JSON
    Show { entity: String, id: i64 },
    /// Delete one record
    Delete {
        entity: String,
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Log in and store the session
    Login {
        correo: String,
        #[arg(long, env = "CONDO_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Drop the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
}

// ============================================================================
// Execution
// ============================================================================

/// Run a parsed command
pub async fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Command::Entities => {
            print!("{}", render_entities());
            return Ok(());
        }
        Command::List { entity, sort, .. } => {
            let schema = lookup(entity)?;
            if let Some(key) = sort {
                sortable_column(schema, key)?;
            }
        }
        Command::Show { entity, .. } | Command::Delete { entity, .. } => {
            lookup(entity)?;
        }
        _ => {}
    }

    let api = connect(&cli)?;

    match cli.command {
        Command::Entities => {}
        Command::List { entity, sort, desc } => {
            let schema = lookup(&entity)?;
            require_admin(&api)?;
            let records = api.list(schema).await?;
            let rows = schema.rows(&records);
            let state = match sort {
                Some(key) => SortState::by(key, direction(desc)),
                None => SortState::unsorted(),
            };
            print!("{}", render_table(schema, &rows, &state));
        }
        Command::Show { entity, id } => {
            let schema = lookup(&entity)?;
            require_admin(&api)?;
            let record = api.get(&schema.item_path(id)).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Command::Delete { entity, id, yes } => {
            let schema = lookup(&entity)?;
            require_admin(&api)?;
            if schema.read_only {
                bail!("{} is read-only", schema.title);
            }
            let record = api.get(&schema.item_path(id)).await?;
            let prompt = record
                .as_object()
                .map(|r| schema.confirm_delete_message(r))
                .unwrap_or_else(|| format!("¿Eliminar {} {}?", schema.singular, id));
            if !yes {
                bail!("{prompt} Re-run with --yes to confirm");
            }
            api.remove(schema, id).await?;
            println!("{} Eliminado {} {}", "✓".green(), schema.singular, id);
        }
        Command::Login { correo, password } => {
            let password =
                password.context("Password required: pass --password or set CONDO_PASSWORD")?;
            let user = api.login(&correo, &password).await?;
            println!("{} {} ({})", "✓".green(), user.full_name().bold(), user.role());
        }
        Command::Logout => {
            api.logout();
            println!("{} Sesión cerrada", "✓".green());
        }
        Command::Whoami => match api.session().user() {
            Some(user) if api.session().is_authenticated() => {
                let correo = user.correo.as_deref().unwrap_or("-");
                println!("{} <{}> {}", user.full_name().bold(), correo, user.role().cyan());
            }
            _ => println!("{}", "No hay sesión iniciada".yellow()),
        },
    }
    Ok(())
}

fn connect(cli: &Cli) -> Result<ApiClient> {
    let mut config = ClientConfig::from_env()?;
    if let Some(base) = &cli.api_base {
        config = config.with_api_base(base);
    }
    if let Some(file) = &cli.session_file {
        config = config.with_session_file(file);
    }
    config.validate()?;

    let session = SessionContext::load(FileSessionStore::new(&config.session_file));
    Ok(ApiClient::new(config, session)?)
}

fn lookup(entity: &str) -> Result<&'static EntitySchema> {
    catalog()
        .get(entity)
        .with_context(|| format!("Known entities: {}", catalog().names().join(", ")))
}

fn require_admin(api: &ApiClient) -> Result<()> {
    match authorize_admin(&api.session().snapshot()) {
        condo_client::Access::Granted => Ok(()),
        condo_client::Access::RedirectLogin => bail!("Not logged in; run `condo login <correo>`"),
        condo_client::Access::RedirectHome => bail!("This account has no admin access"),
    }
}

fn sortable_column(schema: &EntitySchema, key: &str) -> Result<()> {
    match schema.get_column(key) {
        Some(column) if column.sortable => Ok(()),
        Some(_) => bail!("Column '{key}' of {} is not sortable", schema.name),
        None => bail!("{} has no column '{key}'", schema.name),
    }
}

fn direction(desc: bool) -> SortDirection {
    if desc {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// One line per catalog entity: key, endpoint and title
pub fn render_entities() -> String {
    let width = catalog().names().iter().map(|n| n.len()).max().unwrap_or(0);
    let mut out = String::new();
    for schema in catalog().iter() {
        let mut line = format!("{:<width$}  {}  {}", schema.name, schema.endpoint, schema.title);
        if schema.read_only {
            line.push_str("  (solo lectura)");
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Plain-text table of rows in sorted order, with the record count below
pub fn render_table(schema: &EntitySchema, rows: &[Row], state: &SortState) -> String {
    let headers: Vec<String> = schema
        .columns
        .iter()
        .map(|c| match state.indicator(c) {
            Some(indicator) if state.active().is_some_and(|(key, _)| key == c.key) => {
                format!("{} {}", c.label, indicator.glyph())
            }
            _ => c.label.clone(),
        })
        .collect();

    let body: Vec<Vec<String>> = sorted_indices(rows, state)
        .into_iter()
        .map(|i| {
            schema
                .columns
                .iter()
                .map(|c| c.render(rows[i].get(&c.key)).text)
                .collect()
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            body.iter()
                .map(|cells| cells[col].chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    push_line(&mut out, &headers, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    if body.is_empty() {
        out.push_str("Sin registros\n");
    }
    for cells in &body {
        push_line(&mut out, cells, &widths);
    }
    out.push_str(&format!("Mostrando {} registros\n", rows.len()));
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use condo_model::ColumnDef;

    fn schema() -> EntitySchema {
        EntitySchema::new("areas", "Áreas", "/api/areas-comunes/")
            .column(ColumnDef::new("id", "ID").sortable())
            .column(ColumnDef::new("nombre", "Nombre").sortable())
    }

    fn rows() -> Vec<Row> {
        vec![
            Row::new(Some(1)).with("id", 1_i64).with("nombre", "Piscina"),
            Row::new(Some(2)).with("id", 2_i64).with("nombre", "Gimnasio"),
        ]
    }

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_render_table_sorted() {
        let state = SortState::by("nombre", SortDirection::Ascending);
        let table = render_table(&schema(), &rows(), &state);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "ID  Nombre ▲");
        assert!(lines[2].contains("Gimnasio"));
        assert!(lines[3].contains("Piscina"));
        assert_eq!(lines[4], "Mostrando 2 registros");
    }

    #[test]
    fn test_render_table_empty() {
        let table = render_table(&schema(), &[], &SortState::unsorted());
        assert!(table.contains("Sin registros"));
        assert!(table.ends_with("Mostrando 0 registros\n"));
    }

    #[test]
    fn test_render_entities_lists_catalog() {
        let out = render_entities();
        assert_eq!(out.lines().count(), catalog().names().len());
        assert!(out.contains("/api/residencias/"));
        assert!(out.contains("(solo lectura)"));
    }

    #[test]
    fn test_sortable_column() {
        let schema = schema();
        assert!(sortable_column(&schema, "nombre").is_ok());
        assert!(sortable_column(&schema, "foto").is_err());
    }

    #[test]
    fn test_cli_parses_list() {
        let cli = Cli::try_parse_from(["condo", "list", "residentes", "--sort", "nombre", "--desc"])
            .unwrap();
        match cli.command {
            Command::List { entity, sort, desc } => {
                assert_eq!(entity, "residentes");
                assert_eq!(sort.as_deref(), Some("nombre"));
                assert!(desc);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(Cli::try_parse_from(["condo", "list", "residentes", "--desc"]).is_err());
    }
}
