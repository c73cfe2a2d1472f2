mod display;
mod repl;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use clausekit_client::{AnalysisClient, ClientConfig};
use clausekit_core::validate::accepts_extension;
use clausekit_core::{CandidateFile, ClauseId, Submission, Workflow, validate};

#[derive(Parser)]
#[command(name = "clausekit", version)]
#[command(about = "Upload a contract and review its extracted clauses")]
struct Cli {
    /// Analysis service API root
    #[arg(long, global = true, env = "CLAUSEKIT_API_URL", default_value = ClientConfig::DEFAULT_BASE_URL)]
    api_url: String,

    /// Log request and state details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload a document and show the extracted clauses.
    ///
    /// Only the first file is used; any others are ignored.
    Analyze {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Expand a clause by id (repeatable)
        #[arg(long = "expand", value_name = "ID")]
        expand: Vec<u64>,

        /// Expand every clause
        #[arg(long, conflicts_with = "expand")]
        expand_all: bool,

        /// Print the raw analysis as JSON
        #[arg(long)]
        json: bool,

        /// Keep reading commands from stdin after the result is shown
        #[arg(short, long, conflicts_with = "json")]
        interactive: bool,
    },
    /// Check files against the upload policy without sending them
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Probe the analysis service
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!("clausekit v{}", env!("CARGO_PKG_VERSION"));

    let config = ClientConfig::new(cli.api_url);
    match cli.command {
        Command::Analyze {
            files,
            expand,
            expand_all,
            json,
            interactive,
        } => {
            let opts = AnalyzeOptions {
                expand: expand.into_iter().map(ClauseId).collect(),
                expand_all,
                json,
                interactive,
            };
            analyze(config, &files, opts).await
        }
        Command::Check { files } => Ok(check(&files)),
        Command::Health => health(config).await,
    }
}

struct AnalyzeOptions {
    expand: Vec<ClauseId>,
    expand_all: bool,
    json: bool,
    interactive: bool,
}

async fn analyze(
    config: ClientConfig,
    files: &[PathBuf],
    opts: AnalyzeOptions,
) -> anyhow::Result<ExitCode> {
    let flow = Workflow::new(AnalysisClient::new(config));
    let mut stdout = std::io::stdout();

    let Some((first, rest)) = files.split_first() else {
        return Ok(ExitCode::FAILURE);
    };
    if !rest.is_empty() {
        eprintln!("Only one document at a time: ignoring {} more", rest.len());
    }
    let file = CandidateFile::from_path(first)?;
    eprintln!("Selected: {} ({})", file.name, file.size_mib());

    if flow.update(|s| s.select(file)).is_err() {
        display::print_status(&mut stdout, &flow.session())?;
        if !opts.interactive {
            return Ok(ExitCode::FAILURE);
        }
    } else {
        eprintln!("Processing...");
        if let Submission::Failed(err) = flow.submit().await {
            eprintln!("Error: {err}");
            if !opts.interactive {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    flow.update(|s| {
        for &id in &opts.expand {
            if !s.toggle(id) {
                eprintln!("No clause #{id} in this result");
            }
        }
        if opts.expand_all {
            if let Some(view) = s.results_mut() {
                view.expand_all();
            }
        }
    });

    if let Some(view) = flow.session().results() {
        if opts.json {
            let json = serde_json::to_string_pretty(view.result())
                .context("serialising analysis result")?;
            println!("{json}");
        } else {
            display::print_results(&mut stdout, view)?;
        }
    }

    if opts.interactive {
        repl::run(&flow).await?;
    }
    Ok(ExitCode::SUCCESS)
}

fn check(files: &[PathBuf]) -> ExitCode {
    let mut all_ok = true;
    for path in files {
        let verdict = CandidateFile::from_path(path)
            .map_err(|e| e.to_string())
            .and_then(|file| {
                validate(&file)
                    .map(|kind| format!("{} {}", kind.mime_type(), file.size_mib()))
                    .map_err(|r| r.to_string())
            });
        match verdict {
            Ok(summary) => println!("ok        {}  ({summary})", path.display()),
            Err(reason) => {
                all_ok = false;
                let hint = if accepts_extension(path) {
                    ""
                } else {
                    " [extension not accepted]"
                };
                println!("rejected  {}  {reason}{hint}", path.display());
            }
        }
    }
    if all_ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn health(config: ClientConfig) -> anyhow::Result<ExitCode> {
    let url = config.base_url().to_string();
    let client = AnalysisClient::new(config);
    let status = client
        .health()
        .await
        .with_context(|| format!("probing {url}"))?;
    println!("{}: {} at {}", url, status.status, status.timestamp);
    Ok(ExitCode::SUCCESS)
}
