//! penmark CLI: assess written submissions from the command line.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "penmark", version, about = "Writing assessment and proofreading")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assess one or more submissions against a task
    Evaluate {
        /// Task ID (see `penmark tasks`)
        #[arg(long)]
        task: String,

        /// Submission text files
        #[arg(long = "file", required = true, num_args = 1..)]
        files: Vec<PathBuf>,

        /// Catalog file or directory used instead of the built-in tasks
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Language variant (en-GB, en-US, en-AU, en-CA, en-NZ, en-ZA)
        #[arg(long)]
        language: Option<String>,

        /// Proofing endpoint URL
        #[arg(long)]
        endpoint: Option<String>,

        /// Skip remote proofing
        #[arg(long)]
        offline: bool,

        /// Word list for unknown-word detection
        #[arg(long)]
        dictionary: Option<PathBuf>,

        /// Output format: text, json, html, all
        #[arg(long, default_value = "text")]
        format: String,

        /// Output directory
        #[arg(long)]
        output: Option<PathBuf>,

        /// Max concurrent assessments
        #[arg(long)]
        parallelism: Option<usize>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List available writing tasks
    Tasks {
        /// Only show one category (letter, email, memo, report)
        #[arg(long)]
        category: Option<String>,

        /// Catalog file or directory
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Validate task catalog TOML files
    Validate {
        /// Path to catalog file or directory
        #[arg(long)]
        catalog: PathBuf,
    },

    /// Create starter config and example catalog
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("penmark=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Evaluate {
            task,
            files,
            catalog,
            language,
            endpoint,
            offline,
            dictionary,
            format,
            output,
            parallelism,
            config,
        } => {
            commands::evaluate::execute(commands::evaluate::EvaluateArgs {
                task,
                files,
                catalog,
                language,
                endpoint,
                offline,
                dictionary,
                format,
                output,
                parallelism,
                config,
            })
            .await
        }
        Commands::Tasks { category, catalog } => commands::tasks::execute(category, catalog),
        Commands::Validate { catalog } => commands::validate::execute(catalog),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
