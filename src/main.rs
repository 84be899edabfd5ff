use addon_repo::config::{Config, DEFAULT_GITHUB_API_URL, DEFAULT_TIMEOUT_SECS};
use addon_repo::host::{GithubClient, HttpFetcher, Resolver};
use addon_repo::manifest::{self, GenerateOptions};
use addon_repo::release::WinedumpProbe;
use addon_repo::utils::logger::{LogLevel, Logger};
use addon_repo::utils::signature::get_signature;
use anyhow::Context;
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "addon-repo")]
#[command(about = "Resolves the latest addon releases and builds the addon manifest")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check every addon for new releases and write the manifest
    Generate {
        /// Directory containing one descriptor (*.toml) per addon
        #[arg(long)]
        addons: PathBuf,

        /// Previous manifest; updated in place. Prints to stdout when omitted.
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// GitHub token used for API requests
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Base URL of the GitHub REST API
        #[arg(long, env = "ADDON_REPO_GITHUB_API", default_value = DEFAULT_GITHUB_API_URL)]
        github_api: String,

        /// Path to the winedump binary used to inspect exports
        #[arg(long, env = "ADDON_REPO_WINEDUMP")]
        winedump: Option<PathBuf>,

        /// HTTP request timeout in seconds
        #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
        timeout_secs: u64,
    },

    /// Load and validate the addon descriptors without touching the network
    Validate {
        /// Directory containing one descriptor (*.toml) per addon
        #[arg(long)]
        addons: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let version = env!("CARGO_PKG_VERSION");
    let signature = get_signature(version);

    let cmd = Cli::command()
        .version(version)
        .before_help(signature);
    let matches = cmd.get_matches();
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    let logger = Logger::new();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            let trace: Vec<String> = e.chain().skip(1).map(|c| c.to_string()).collect();
            logger.log_message_with_trace(LogLevel::Error, &e.to_string(), &trace);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let logger = Logger::new();

    match cli.command {
        Commands::Validate { addons } => {
            let loaded = manifest::load_descriptors(&addons)
                .with_context(|| format!("Failed to validate {}", addons.display()))?;
            logger.log_message(
                LogLevel::Success,
                &format!("{} addon descriptors are valid", loaded.len()),
            );
            Ok(ExitCode::SUCCESS)
        }

        Commands::Generate {
            addons,
            manifest: manifest_path,
            token,
            github_api,
            winedump,
            timeout_secs,
        } => {
            let config = Config {
                github_api_url: github_api,
                winedump,
                timeout: Duration::from_secs(timeout_secs),
                ..Config::default()
            }
            .with_token(token);

            let github = GithubClient::new(&config)?;
            let fetcher = HttpFetcher::new(&config)?;
            let probe = WinedumpProbe::locate(config.winedump.as_deref());
            let resolver = Resolver::new(&github, &fetcher, &probe);

            let options = GenerateOptions {
                addons_path: addons,
                manifest_path: manifest_path.clone(),
            };
            let report = manifest::generate_manifest(&options, &resolver).await?;

            match &manifest_path {
                Some(path) => {
                    manifest::write_manifest(path, &report.manifest)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    logger.log_message(
                        LogLevel::Success,
                        &format!(
                            "Wrote {} addons to {}",
                            report.manifest.addons().len(),
                            path.display()
                        ),
                    );
                }
                None => print!("{}", manifest::manifest_to_json(&report.manifest)?),
            }

            if !report.failures.is_empty() {
                let failed: Vec<String> = report
                    .failures
                    .iter()
                    .map(|f| format!("{}: {}", f.addon, f.error))
                    .collect();
                logger.log_message_with_trace(
                    LogLevel::Warning,
                    &format!("{} addons kept their previous release", failed.len()),
                    &failed,
                );
            }

            Ok(ExitCode::SUCCESS)
        }
    }
}
