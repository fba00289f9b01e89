use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "jobhawk")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "A CLI tool for collecting job listings from job boards through a real browser session",
    long_about = "jobhawk drives a real Chrome session to collect job listings: it restores a \
                  saved login session (or logs in interactively), paces every interaction like \
                  a person at a keyboard, and writes the extracted listings to a JSON file."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one scraping session against a job board
    Scrape {
        /// Job title to search for
        #[arg(long)]
        title: String,

        /// Location to search in (free text, or "Remote")
        #[arg(long)]
        location: String,

        /// Job board to target
        #[arg(long, default_value = "monster")]
        site: String,

        /// Maximum number of listings to extract
        #[arg(long, default_value_t = 10)]
        max_items: usize,

        /// Run Chrome headless
        #[arg(long)]
        headless: bool,

        /// Path to the Chrome binary
        #[arg(long)]
        chrome_path: Option<PathBuf>,

        /// Named persistent Chrome profile (default: a throwaway profile)
        #[arg(long)]
        profile: Option<String>,

        /// Directory for result files
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Account email (prefer setting the environment variable)
        #[arg(long, env = "JOBHAWK_EMAIL", hide_env_values = true)]
        email: Option<String>,

        /// Account password (prefer setting the environment variable)
        #[arg(long, env = "JOBHAWK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Inspect or clear the saved login session
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Generate shell completion scripts
    #[command(after_help = "SUPPORTED SHELLS: bash, zsh, fish, powershell, elvish\n\n\
                            INSTALLATION:\n  \
                            bash: jobhawk completion --shell bash >> ~/.bashrc\n  \
                            zsh:  jobhawk completion --shell zsh >> ~/.zshrc")]
    Completion {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// Summarize the saved session artifact
    Show,

    /// Delete the saved session artifact
    Clear,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match cli.command {
        Commands::Scrape {
            title,
            location,
            site,
            max_items,
            headless,
            chrome_path,
            profile,
            output_dir,
            email,
            password,
        } => commands::scrape::execute(commands::scrape::ScrapeArgs {
            title,
            location,
            site,
            max_items,
            headless,
            chrome_path,
            profile,
            output_dir,
            email,
            password,
        }),
        Commands::Session { action } => match action {
            SessionAction::Show => commands::session::show(),
            SessionAction::Clear => commands::session::clear(),
        },
        Commands::Completion { shell } => {
            commands::completion::execute(shell, &mut Cli::command())
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("jobhawk=debug,jobhawk_core=debug,jobhawk_browser=debug")
    } else {
        EnvFilter::new("jobhawk=info,jobhawk_core=info,jobhawk_browser=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}
