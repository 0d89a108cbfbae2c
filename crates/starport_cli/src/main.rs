//! Starport CLI - browse and export a GitHub account's starred repositories.

mod commands;
mod config;
mod progress;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::Term;
use tracing_subscriber::EnvFilter;

use crate::commands::export::ExportArgs;
use crate::commands::shared::OutputFormat;

#[derive(Parser)]
#[command(name = "starport")]
#[command(version)]
#[command(about = "List and export a GitHub account's starred repositories")]
#[command(
    long_about = "Starport reads the public list of repositories a GitHub user has starred. \
It can show a single page, walk every page up to a safety cap, or export the \
complete list to a JSON or CSV file."
)]
#[command(after_long_help = r#"EXAMPLES
    Show the second page of stars, 50 per page:
        $ starport page octocat --page 2 --per-page 50

    List every starred repository as JSON:
        $ starport all octocat -o json

    Export stars to CSV in the current directory:
        $ starport export octocat -f csv -d .

    Generate shell completions:
        $ starport completions bash > ~/.local/share/bash-completion/completions/starport

CONFIGURATION
    Starport reads configuration from:
      1. ~/.config/starport/config.toml (or $XDG_CONFIG_HOME/starport/config.toml)
      2. ./starport.toml
      3. Environment variables (STARPORT_* prefix, nested keys joined with __)
      4. .env file in current directory

ENVIRONMENT VARIABLES
    STARPORT_GITHUB_TOKEN              GitHub personal access token (falls back to GITHUB_TOKEN)
    STARPORT_GITHUB__API_URL           API root (default: https://api.github.com)
    STARPORT_PAGINATION__PAGE_CAP      Maximum page requests per aggregation (default: 100)
    STARPORT_EXPORT__DIR               Export directory (default: ~/.local/share/starport/exports)
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show one page of a user's starred repositories
    Page {
        /// GitHub username
        user: String,

        /// Page number (1-based)
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Items per page, 1-100 (default from config or 30)
        #[arg(short = 'n', long)]
        per_page: Option<u32>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
    /// List all of a user's starred repositories
    All {
        /// GitHub username
        user: String,

        /// Items per page, 1-100 (default from config or 100)
        #[arg(short = 'n', long)]
        per_page: Option<u32>,

        /// Maximum page requests before stopping (default from config or 100)
        #[arg(short = 'c', long)]
        page_cap: Option<u32>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
    /// Export all of a user's starred repositories to a file
    ///
    /// Writes stars.json or stars.csv into the export directory, replacing
    /// any previous export of the same format. Nothing is written unless
    /// every page was fetched successfully.
    Export {
        /// GitHub username
        user: String,

        /// Export format: json or csv (default from config or json)
        #[arg(short, long)]
        format: Option<String>,

        /// Directory to write into (default from config)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Write JSON on a single line
        #[arg(long)]
        compact: bool,

        /// Items per page, 1-100 (default from config or 100)
        #[arg(short = 'n', long)]
        per_page: Option<u32>,

        /// Maximum page requests before stopping (default from config or 100)
        #[arg(short = 'c', long)]
        page_cap: Option<u32>,

        /// Output format for the export summary
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
    /// Generate man page(s)
    Man {
        /// Output directory for man pages (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Commands {
    fn output_format(&self) -> OutputFormat {
        match self {
            Commands::Page { output, .. }
            | Commands::All { output, .. }
            | Commands::Export { output, .. } => *output,
            Commands::Completions { .. } | Commands::Man { .. } => OutputFormat::Table,
        }
    }
}

async fn run(command: Commands, config: &config::Config) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Page {
            user,
            page,
            per_page,
            output,
        } => commands::page::handle_page(user, page, per_page, output, config).await,
        Commands::All {
            user,
            per_page,
            page_cap,
            output,
        } => commands::all::handle_all(user, per_page, page_cap, output, config).await,
        Commands::Export {
            user,
            format,
            dir,
            compact,
            per_page,
            page_cap,
            output,
        } => {
            let args = ExportArgs {
                user,
                format,
                dir,
                compact,
                per_page,
                page_cap,
            };
            commands::export::handle_export(args, output, config).await
        }
        Commands::Completions { shell } => commands::meta::handle_completions(shell),
        Commands::Man { output } => commands::meta::handle_man(output),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing for non-TTY mode (structured logging)
    if !Term::stdout().is_term() {
        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::new("starport=info,starport_cli=info"),
        };

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    // Load configuration (config file -> env vars -> defaults)
    let config = config::Config::load();

    let cli = Cli::parse();
    let output = cli.command.output_format();

    let outcome = tokio::select! {
        result = run(cli.command, &config) => result,
        _ = shutdown::interrupted() => std::process::exit(shutdown::INTERRUPTED_EXIT_CODE),
    };

    if let Err(e) = outcome {
        match output {
            OutputFormat::Json => {
                println!("{}", serde_json::json!({ "error": e.to_string() }));
            }
            OutputFormat::Table => {
                if Term::stdout().is_term() {
                    eprintln!("Error: {}", e);
                } else {
                    tracing::error!(error = %e, "Command failed");
                }
            }
        }
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn export_flags_parse() {
        let cli = Cli::try_parse_from([
            "starport", "export", "octocat", "-f", "csv", "-d", "/tmp/out", "--compact", "-c",
            "5", "-o", "json",
        ])
        .unwrap();

        match cli.command {
            Commands::Export {
                user,
                format,
                dir,
                compact,
                page_cap,
                output,
                ..
            } => {
                assert_eq!(user, "octocat");
                assert_eq!(format.as_deref(), Some("csv"));
                assert_eq!(dir, Some(PathBuf::from("/tmp/out")));
                assert!(compact);
                assert_eq!(page_cap, Some(5));
                assert_eq!(output, OutputFormat::Json);
            }
            _ => panic!("expected export command"),
        }
    }

    #[test]
    fn page_defaults_to_first_page_and_table() {
        let cli = Cli::try_parse_from(["starport", "page", "octocat"]).unwrap();
        assert_eq!(cli.command.output_format(), OutputFormat::Table);
        match cli.command {
            Commands::Page { page, per_page, .. } => {
                assert_eq!(page, 1);
                assert_eq!(per_page, None);
            }
            _ => panic!("expected page command"),
        }
    }

    #[test]
    fn user_argument_is_required() {
        assert!(Cli::try_parse_from(["starport", "all"]).is_err());
    }
}
