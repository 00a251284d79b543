//! Drive a planchette workspace from the command line.
//!
//! Logs go to stderr; reports go to stdout. Set `PLANCHETTE_LOG` (an
//! `EnvFilter` directive) or pass `-v` for more detail.
//!
//! # Examples
//!
//! ```sh
//! # Commands from stdin, one JSON object per line
//! echo '{"name": "open", "arguments": {"file": "notes.md"}}' | planchette run
//!
//! # A single command
//! planchette --home ./project exec after '{"target": "## Todo\n"}'
//! ```

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use planchette_cli::{SessionConfig, run_script, workspace_system_prompt};
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Drive a cursor-and-selection text workspace.
#[derive(Parser)]
#[command(name = "planchette")]
struct Cli {
    #[command(subcommand)]
    mode: Mode,

    /// JSON config file. Flags override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory that relative file paths resolve against.
    #[arg(long, global = true)]
    home: Option<String>,

    /// Lines shown per window.
    #[arg(long, global = true)]
    page_size: Option<usize>,

    /// Character budget for the workspace report.
    #[arg(long, global = true)]
    size_limit: Option<usize>,

    /// Namespace tool names as `{prefix}.{command}`.
    #[arg(long, global = true)]
    prefix: Option<String>,

    /// More logging (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Mode {
    /// Run JSON-lines commands from a script, or stdin when none is given.
    Run {
        #[arg(long)]
        script: Option<PathBuf>,
    },
    /// Run one command and print the report.
    Exec {
        /// Command name, e.g. `open`.
        name: String,
        /// Arguments as a JSON object.
        #[arg(default_value = "{}")]
        arguments: String,
    },
    /// Print tool definitions as JSON.
    Tools,
    /// Print the system prompt section describing the workspace.
    Prompt,
}

impl Cli {
    fn session_config(&self) -> Result<SessionConfig, String> {
        let mut config = match &self.config {
            Some(path) => SessionConfig::load(path)?,
            None => SessionConfig::default(),
        };
        if let Some(home) = &self.home {
            config.home = home.clone();
        }
        if let Some(page_size) = self.page_size {
            config.workspace.page_size = page_size;
        }
        if let Some(size_limit) = self.size_limit {
            config.workspace.size_limit = size_limit;
        }
        if let Some(prefix) = &self.prefix {
            config.tool_prefix = Some(prefix.clone());
        }
        Ok(config)
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("PLANCHETTE_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match cli.session_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    };
    info!(
        "Home {} (page size {}, budget {} chars)",
        config.resolved_home().display(),
        config.workspace.page_size,
        config.workspace.size_limit
    );

    let session = config.build_session();
    let tools = config.build_tool_set(&session);

    match cli.mode {
        Mode::Tools => match serde_json::to_string_pretty(&tools.definitions()) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: failed to serialize tool definitions: {e}");
                std::process::exit(1);
            }
        },
        Mode::Prompt => {
            println!("{}", workspace_system_prompt(config.tool_prefix.as_deref()));
        }
        Mode::Exec { name, arguments } => {
            let result = tools.execute(&config.tool_name(&name), &arguments).await;
            println!("{result}");
            if result.starts_with("Error:") {
                std::process::exit(1);
            }
        }
        Mode::Run { script } => {
            let stdout = tokio::io::stdout();
            let outcome = match script {
                Some(path) => match tokio::fs::File::open(&path).await {
                    Ok(file) => run_script(&tools, &config, BufReader::new(file), stdout).await,
                    Err(e) => {
                        eprintln!("Error: failed to open {}: {e}", path.display());
                        std::process::exit(2);
                    }
                },
                None => {
                    let stdin = BufReader::new(tokio::io::stdin());
                    run_script(&tools, &config, stdin, stdout).await
                }
            };
            match outcome {
                Ok(summary) => {
                    info!(
                        "Ran {} commands, {} failed",
                        summary.executed, summary.failed
                    );
                    if summary.failed > 0 {
                        std::process::exit(1);
                    }
                }
                Err(e) => {
                    eprintln!("Error: {e}");
                    std::process::exit(2);
                }
            }
        }
    }
}
