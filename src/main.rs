use anyhow::Result;
use clap::Parser;
use pydeps::commands::{self, Config, Settings, config::DEFAULT_TIMEOUT_SECS};
use std::path::PathBuf;
use std::time::Duration;

/// pydeps - PyPI dependency viewer
///
/// Collect a set of PyPI packages and show the runtime dependencies declared
/// by the latest release of each one, grouped by package.
///
/// If the PYDEPS_INDEX_TOKEN environment variable is set, it is sent as a
/// bearer token. This is useful for private indexes.
///
/// Examples:
///   pydeps show requests flask     # Print dependencies of two packages
///   pydeps show -f packages.txt    # Read package names from a file
///   pydeps shell                   # Add and remove packages interactively
#[derive(Parser, Debug)]
#[command(author, version = env!("PYDEPS_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Package index base URL (defaults to https://pypi.org)
    #[arg(
        long = "index-url",
        env = "PYDEPS_INDEX_URL",
        value_name = "URL",
        global = true
    )]
    pub index_url: Option<String>,

    /// Per-lookup timeout in seconds
    #[arg(
        long,
        env = "PYDEPS_TIMEOUT",
        value_name = "SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..),
        global = true
    )]
    pub timeout: u64,

    /// Attempts per lookup for transient failures
    #[arg(
        long,
        env = "PYDEPS_RETRIES",
        value_name = "N",
        default_value_t = pydeps::http::MAX_RETRIES as u64,
        value_parser = clap::value_parser!(u64).range(1..),
        global = true
    )]
    pub retries: u64,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Show dependencies for the given packages
    Show(ShowArgs),

    /// Start an interactive session
    Shell,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Package names (case-insensitive)
    #[arg(value_name = "PACKAGE")]
    pub packages: Vec<String>,

    /// Read package names from a file, one per line
    #[arg(long, short = 'f', value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Save the report to a file instead of printing it
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

impl Cli {
    fn settings(&self) -> Settings {
        Settings {
            index_url: self.index_url.clone(),
            timeout: Duration::from_secs(self.timeout),
            retries: self.retries as usize,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = pydeps::runtime::RealRuntime;
    let config = Config::new(runtime, &cli.settings())?;

    match cli.command {
        Commands::Show(args) => {
            let mut stdout = std::io::stdout();
            commands::show(
                config,
                &args.packages,
                args.file.as_deref(),
                args.output.as_deref(),
                &mut stdout,
            )
            .await?
        }
        Commands::Shell => {
            let stdin = std::io::stdin();
            let mut input = stdin.lock();
            let mut stdout = std::io::stdout();
            commands::shell(config, &mut input, &mut stdout).await?
        }
    }
    Ok(())
}
