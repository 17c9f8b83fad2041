//! hrgate - drive the HR portal's authenticated actions from a terminal.
//!
//! Every command is turned into the same page event the browser would
//! produce and dispatched through the core bindings, so the token handling
//! and failure reactions are exactly the ones the portal uses.

mod terminal;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hrgate_core::auth::SessionToken;
use hrgate_core::bindings::{Action, ActionOutcome, Dispatcher, EventKind, UiEvent};
use hrgate_core::models::EmployeeRow;
use hrgate_core::page::Element;
use hrgate_core::table::EmployeeTable;
use hrgate_core::utils::truncate_string;
use hrgate_core::{Config, SessionContext};

use terminal::{print_table, TerminalPage};

/// Element shape the CLI uses for delete commands, independent of the URL
const CLI_DELETE_SELECTOR: &str = r#"command[data-command="delete"]"#;

#[derive(Parser, Debug)]
#[command(name = "hrgate", version, about = "Authenticated actions against the HR employee portal")]
struct Cli {
    /// Portal origin, overrides config and HRGATE_BASE_URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Use this access token instead of fetching one from the portal
    #[arg(long, global = true, env = "HRGATE_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Answer yes to every confirmation prompt
    #[arg(short, long, global = true)]
    yes: bool,

    /// Debug logging (RUST_LOG still wins when set)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch the session access token
    Token {
        /// Ignore any cached token and fetch again
        #[arg(long)]
        refresh: bool,
    },
    /// Delete an item after confirmation
    Delete {
        url: String,
        #[arg(long)]
        employee_id: Option<String>,
        #[arg(long)]
        name: Option<String>,
        /// Custom confirmation text
        #[arg(long)]
        confirm: Option<String>,
        /// Employees table (JSON array) to remove the row from
        #[arg(long)]
        rows: Option<PathBuf>,
    },
    /// Submit an authenticated form
    Submit {
        url: String,
        #[arg(long, default_value = "post")]
        method: String,
        /// Form field as name=value, repeatable
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
        /// Where to go after success (reload otherwise)
        #[arg(long)]
        redirect: Option<String>,
        #[arg(long)]
        confirm: Option<String>,
    },
    /// Record a check-in
    CheckIn { employee_id: String },
    /// Record a check-out
    CheckOut { employee_id: String },
    /// Open the edit page for an employee
    Edit { employee_id: String },
    /// Clear the session and leave through the identity provider
    Logout,
    /// Search and filter an employees table exported as JSON
    Table {
        rows: PathBuf,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        department: Option<String>,
    },
    /// Print the effective configuration
    Config {
        /// Write it to the config file
        #[arg(long)]
        save: bool,
    },
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected name=value, got '{}'", raw))
}

/// Initialize the tracing subscriber for logging
fn init_tracing(verbose: bool) {
    // RUST_LOG controls the level; default to warn (debug with --verbose)
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_rows(path: &Path) -> Result<EmployeeTable> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read rows file {}", path.display()))?;
    let rows: Vec<EmployeeRow> =
        serde_json::from_str(&contents).context("Failed to parse rows file")?;
    Ok(EmployeeTable::new(rows))
}

async fn build_context(config: Config, token: Option<String>) -> Result<SessionContext> {
    let ctx = match token {
        Some(token) => SessionContext::with_seeded_token(config, SessionToken::new(token)).await,
        None => SessionContext::new(config),
    };
    ctx.context("Failed to create session")
}

fn exit_code(outcome: ActionOutcome) -> ExitCode {
    match outcome {
        ActionOutcome::Completed | ActionOutcome::Cancelled => ExitCode::SUCCESS,
        ActionOutcome::Ignored
        | ActionOutcome::RedirectedToLogin
        | ActionOutcome::Denied
        | ActionOutcome::Failed => ExitCode::FAILURE,
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load()?;
    if let Some(url) = cli.base_url.clone() {
        config.base_url = url;
    }
    info!(base_url = %config.base_url, "hrgate starting");

    let mut table = None;
    let event = match cli.command {
        Command::Config { save } => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            if save {
                config.save()?;
                eprintln!("Saved to {}", Config::config_path()?.display());
            }
            return Ok(ExitCode::SUCCESS);
        }
        Command::Table {
            rows,
            search,
            department,
        } => {
            let mut table = load_rows(&rows)?;
            if let Some(department) = department {
                if !table.set_department(&department) {
                    anyhow::bail!("Unknown department '{}'", department);
                }
            }
            if let Some(term) = search {
                table.search(&term);
            }
            print_table(&table);
            return Ok(ExitCode::SUCCESS);
        }
        Command::Token { refresh } => {
            let ctx = build_context(config, cli.token).await?;
            let token = if refresh {
                ctx.tokens().refresh().await?
            } else {
                ctx.tokens().acquire_token().await?
            };
            return Ok(match token {
                Some(token) => {
                    println!("access token: {}", truncate_string(&token.access_token, 12));
                    ExitCode::SUCCESS
                }
                None => {
                    eprintln!("No token - log in at {}", ctx.config().url_for(ctx.login_path()));
                    ExitCode::FAILURE
                }
            });
        }
        Command::Delete {
            url,
            employee_id,
            name,
            confirm,
            rows,
        } => {
            if let Some(path) = rows {
                table = Some(load_rows(&path)?);
            }
            let mut element = Element::new("command")
                .with_attr("data-command", "delete")
                .with_attr("action", url);
            if let Some(id) = employee_id {
                element = element.with_attr("data-employee-id", id);
            }
            if let Some(name) = name {
                element = element.with_attr("data-employee-name", name);
            }
            if let Some(confirm) = confirm {
                element = element.with_attr("data-confirm", confirm);
            }
            UiEvent::Click(element)
        }
        Command::Submit {
            url,
            method,
            fields,
            redirect,
            confirm,
        } => {
            let mut form = Element::new("form")
                .with_attr("action", url)
                .with_attr("method", method)
                .with_attr("data-requires-auth", "true");
            if let Some(redirect) = redirect {
                form = form.with_attr("data-redirect", redirect);
            }
            if let Some(confirm) = confirm {
                form = form.with_attr("data-confirm", confirm);
            }
            for (name, value) in fields {
                form = form.with_field(name, value);
            }
            UiEvent::Submit(form)
        }
        Command::CheckIn { employee_id } => UiEvent::Click(
            Element::new("button")
                .with_id("check-in-btn")
                .with_attr("data-employee-id", employee_id),
        ),
        Command::CheckOut { employee_id } => UiEvent::Click(
            Element::new("button")
                .with_id("check-out-btn")
                .with_attr("data-employee-id", employee_id),
        ),
        Command::Edit { employee_id } => UiEvent::Click(
            Element::new("button")
                .with_attr("data-action", "edit")
                .with_attr("data-employee-id", employee_id),
        ),
        Command::Logout => UiEvent::Click(Element::new("a").with_id("logout-btn")),
    };

    let ctx = build_context(config, cli.token).await?;
    let mut dispatcher = Dispatcher::standard()?;
    dispatcher.register(EventKind::Click, CLI_DELETE_SELECTOR, Action::DeleteItem)?;

    let mut page = TerminalPage::new(cli.yes, table);
    let outcome = dispatcher.dispatch(&ctx, &mut page, &event).await;
    info!(?outcome, "Command finished");
    Ok(exit_code(outcome))
}
