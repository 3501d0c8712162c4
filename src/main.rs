mod client;
mod config;
mod error;
mod model;
mod render;
mod report;
mod toggle;

use crate::client::{ApiClient, Transport};
use crate::config::{Scope, resolve, save};
use crate::error::ApiError;
use crate::render::OutputFormat;
use crate::toggle::Toggle;
use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::Path;

#[derive(Parser)]
#[command(
    name = "pihole-stats",
    version,
    about = "Pi-hole statistics and enable/disable from the command line"
)]
struct Cli {
    #[arg(
        long,
        global = true,
        env = "PIHOLE_URL",
        value_name = "URL",
        help = "Pi-hole admin console URL, e.g. http://pi.hole/admin (otherwise read from config)"
    )]
    url: Option<String>,

    #[arg(
        long,
        global = true,
        env = "PIHOLE_AUTH",
        hide_env_values = true,
        help = "API token override for this invocation (otherwise read from config)"
    )]
    token: Option<String>,

    #[arg(
        long,
        short = 'o',
        value_enum,
        default_value_t = OutputFormat::Pretty,
        global = true,
        help = "Output format"
    )]
    output: OutputFormat,

    #[arg(long, global = true, help = "Disable colored output")]
    no_color: bool,

    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase log verbosity (-v, -vv, -vvv)"
    )]
    verbose: u8,

    #[arg(short, long, global = true, help = "Only log errors")]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show statistics and status (default)
    Summary,
    /// Show whether blocking is enabled
    Status,
    /// Enable blocking (no-op when already enabled)
    #[command(alias = "e")]
    Enable,
    /// Disable blocking (no-op when already disabled)
    #[command(alias = "d")]
    Disable,
    /// Persist the URL and/or API token to the chosen scope
    Configure {
        #[arg(long, value_name = "URL")]
        set_url: Option<String>,
        #[arg(long, value_name = "TOKEN")]
        set_token: Option<String>,
        #[arg(
            long,
            value_enum,
            default_value_t = ScopeArg::User,
            help = "Where to write the config (local project dir or user config dir)"
        )]
        scope: ScopeArg,
    },
    /// Show current configuration (token masked)
    ConfigShow,
    /// Generate shell completion scripts
    Completion {
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CompletionShell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ScopeArg {
    Local,
    User,
}

impl From<ScopeArg> for Scope {
    fn from(value: ScopeArg) -> Self {
        match value {
            ScopeArg::Local => Scope::Local,
            ScopeArg::User => Scope::User,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    if cli.no_color {
        colored::control::set_override(false);
    }
    let cwd = std::env::current_dir().context("reading current directory")?;
    let mut stdout = io::stdout().lock();

    match cli.command.unwrap_or(Commands::Summary) {
        Commands::Configure {
            set_url,
            set_token,
            scope,
        } => {
            if set_url.is_none() && set_token.is_none() {
                return Err(anyhow!("Provide --set-url and/or --set-token"));
            }
            let mut existing = config::load_scope(scope.into(), &cwd)?;
            if let Some(url) = set_url {
                existing.url = Some(url);
            }
            if let Some(token) = set_token {
                existing.api_token = Some(token);
            }
            let path = save(scope.into(), &existing, &cwd)?;
            writeln!(stdout, "Saved config to {}", path.display())?;
        }
        Commands::ConfigShow => {
            let mut merged = config::load(&cwd)?;
            if merged.api_token.is_some() {
                merged.api_token = Some("*****".into());
            }
            writeln!(stdout, "{}", serde_yaml::to_string(&merged)?.trim_end())?;
        }
        Commands::Completion { shell } => {
            use clap_complete::{generate, shells};
            let mut cmd = Cli::command();
            let bin = cmd.get_name().to_string();
            match shell {
                CompletionShell::Bash => generate(shells::Bash, &mut cmd, bin, &mut stdout),
                CompletionShell::Zsh => generate(shells::Zsh, &mut cmd, bin, &mut stdout),
                CompletionShell::Fish => generate(shells::Fish, &mut cmd, bin, &mut stdout),
                CompletionShell::PowerShell => {
                    generate(shells::PowerShell, &mut cmd, bin, &mut stdout)
                }
            }
        }
        Commands::Summary => {
            let (url, client) = connect(&cwd, cli.url, cli.token)?;
            let snapshot = report::get_snapshot(&client).map_err(explain)?;
            render::snapshot(&mut stdout, &snapshot, &url, cli.output)?;
        }
        Commands::Status => {
            let client = connect(&cwd, cli.url, cli.token)?.1;
            let status = client.status().map_err(explain)?;
            render::status(&mut stdout, status, cli.output)?;
        }
        Commands::Enable => {
            let client = connect(&cwd, cli.url, cli.token)?.1;
            let outcome = toggle::apply(&client, Toggle::Enable).map_err(explain)?;
            render::toggle(&mut stdout, &outcome, cli.output)?;
        }
        Commands::Disable => {
            let client = connect(&cwd, cli.url, cli.token)?.1;
            let outcome = toggle::apply(&client, Toggle::Disable).map_err(explain)?;
            render::toggle(&mut stdout, &outcome, cli.output)?;
        }
    }

    Ok(())
}

/// Resolves configuration and builds the API client. Returns the admin URL
/// alongside it for display.
fn connect(
    cwd: &Path,
    url: Option<String>,
    token: Option<String>,
) -> Result<(String, ApiClient)> {
    let effective = resolve(cwd, url, token)?;
    let client = ApiClient::new(&effective.url, &effective.api_token).map_err(explain)?;
    Ok((effective.url, client))
}

/// Adds a user-facing hint on top of a core failure.
fn explain(err: ApiError) -> anyhow::Error {
    let hint = if err.is_decode() {
        "unexpected answer from Pi-hole; check the URL and API token"
    } else if err.is_transport() {
        "could not reach Pi-hole"
    } else {
        "Pi-hole reported an unknown state"
    };
    anyhow::Error::new(err).context(hint)
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if quiet { log::LevelFilter::Error } else { level })
        .format_timestamp(None)
        .init();
}
