use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "switchyard",
    about = "Switchyard — blue/green rollout controller",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Path to switchyard.toml.
    #[arg(short, long, global = true, default_value = "switchyard.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold a switchyard.toml
    Init {
        /// Namespace the rollout operates in.
        #[arg(long, default_value = "flask-alb")]
        namespace: String,
        /// Registry URI images are pushed under.
        #[arg(long, default_value = "registry.example.com/flask")]
        registry: String,
    },
    /// Run the full pipeline: publish, deploy, approval gate, swap.
    ///
    /// Without --yes the run suspends after the deploy and prompts for the
    /// swap decision; rejecting leaves the deploy committed and skips the
    /// swap.
    Run {
        /// Revision identifier of the triggering commit; becomes the image tag.
        #[arg(short, long)]
        revision: String,
        /// Approve the swap without prompting.
        #[arg(short = 'y', long)]
        yes: bool,
        /// Build and push the image with this container CLI first.
        /// If not specified, the tag is assumed to be already published.
        #[arg(long)]
        build_with: Option<String>,
        /// Build context directory for --build-with.
        #[arg(long, default_value = ".")]
        context: PathBuf,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Phase one only: bootstrap the pair or update the staging workload
    Deploy {
        /// Revision identifier of the triggering commit; becomes the image tag.
        #[arg(short, long)]
        revision: String,
    },
    /// Phase two only: swap the stable entry points
    Swap,
    /// Plan a swap offline from a captured service listing
    Plan {
        /// File holding wide-format service listing output.
        listing: PathBuf,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Show workloads and entry points for the configured namespace
    Status {
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,switchyard=debug".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init {
            namespace,
            registry,
        } => commands::init::init(&cli.config, &namespace, &registry),
        Commands::Run {
            revision,
            yes,
            build_with,
            context,
            format,
        } => {
            commands::run::run(
                &cli.config,
                &revision,
                yes,
                build_with.as_deref(),
                &context,
                &format,
            )
            .await
        }
        Commands::Deploy { revision } => commands::deploy::deploy(&cli.config, &revision),
        Commands::Swap => commands::swap::swap(&cli.config),
        Commands::Plan { listing, format } => commands::plan::plan(&cli.config, &listing, &format),
        Commands::Status { format } => commands::status::status(&cli.config, &format),
    }
}
