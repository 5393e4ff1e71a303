use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};

use metabo_version_check::config::{self, CheckerConfig};
use metabo_version_check::dataset::{LocatedDataset, locate_dataset};
use metabo_version_check::parser::filename::parse_local_version;
use metabo_version_check::pipeline::launch_pipeline;
use metabo_version_check::version::checker::{FetchPolicy, reconcile};
use metabo_version_check::version::upstreams;
use metabo_version_check::{logging, report};

/// Exit code when `--fail-on-outdated` is set and an update is available
const EXIT_UPDATE_AVAILABLE: u8 = 2;

#[derive(Parser)]
#[command(name = "metabo-version-check")]
#[command(version, about = "Checks the local metabolite dataset against the latest HMDB and LIPID MAPS releases")]
struct Cli {
    /// Config file (defaults to config.json in the application directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Dataset directory (overrides METABO_DATA_DIR and the config file)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Show debug logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Compare the active dataset with the latest upstream releases
    Check {
        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Exit with status 2 when an update is available
        #[arg(long)]
        fail_on_outdated: bool,
    },
    /// Show the versions encoded in dataset filenames
    Parse {
        #[arg(required = true)]
        filenames: Vec<String>,
    },
    /// Show the active dataset and its versions
    Locate,
    /// Run the enrichment pipeline, then show the new active dataset
    RunPipeline,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(config::config_path);
    let config = CheckerConfig::load(&config_path)?;

    let _guard = logging::init_logging(&config::log_path(), config.log.json, cli.verbose);

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli, config))
}

async fn run(cli: Cli, config: CheckerConfig) -> anyhow::Result<ExitCode> {
    let data_dir = config.resolve_data_dir(cli.data_dir);

    match cli.command.unwrap_or(Command::Check {
        json: false,
        fail_on_outdated: false,
    }) {
        Command::Check {
            json,
            fail_on_outdated,
        } => {
            let dataset = locate_dataset(&data_dir)?;

            let policy = FetchPolicy::from(&config.fetch);
            let upstreams = upstreams::from_config(
                &config.upstreams,
                Duration::from_millis(config.fetch.timeout_ms),
            );
            let result = reconcile(&dataset.version, &upstreams, &policy).await;

            if json {
                println!("{}", report::render_json(&result)?);
            } else {
                print!("{}", report::render_table(&result));
            }

            if fail_on_outdated && result.update_available() {
                return Ok(ExitCode::from(EXIT_UPDATE_AVAILABLE));
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Parse { filenames } => {
            let mut all_ok = true;
            for filename in filenames {
                match parse_local_version(&filename) {
                    Ok(version) => {
                        let versions: Vec<String> = version
                            .versions
                            .iter()
                            .map(|(source, token)| format!("{}={}", source, token))
                            .collect();
                        let revision = version
                            .revision
                            .map(|r| format!(" (revision {})", r))
                            .unwrap_or_default();
                        println!("{}: {}{}", filename, versions.join(", "), revision);
                    }
                    Err(e) => {
                        all_ok = false;
                        eprintln!("{}", e);
                    }
                }
            }
            Ok(if all_ok {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Locate => {
            let dataset = locate_dataset(&data_dir)?;
            print_dataset(&dataset);
            Ok(ExitCode::SUCCESS)
        }
        Command::RunPipeline => {
            let outcome = launch_pipeline(&config.pipeline).await?;
            println!("Pipeline finished in {:.1}s", outcome.elapsed.as_secs_f64());

            let dataset = locate_dataset(&data_dir)
                .with_context(|| format!("pipeline finished but no dataset found in {:?}", data_dir))?;
            print_dataset(&dataset);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_dataset(dataset: &LocatedDataset) {
    println!("{}", dataset.path.display());
    for (source, token) in &dataset.version.versions {
        println!("  {}: {}", source, token);
    }
    if let Some(revision) = dataset.version.revision {
        println!("  revision: {}", revision);
    }
}
