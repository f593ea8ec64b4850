//! infogen CLI - Generate infographics from text with a chat model.

use clap::{Parser, Subcommand};
use infogen::cli;
use std::path::PathBuf;
use std::process::ExitCode;

/// Get the version string.
///
/// - Release builds (on a git tag): "0.1.0"
/// - Development builds: "0.1.0-dev (abc1234)"
fn version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("INFOGEN_GIT_HASH");
    const IS_RELEASE: &str = env!("INFOGEN_IS_RELEASE");

    static VERSION_STRING: std::sync::OnceLock<String> = std::sync::OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" {
            VERSION.to_string()
        } else {
            format!("{VERSION}-dev ({GIT_HASH})")
        }
    })
}

#[derive(Parser)]
#[command(name = "infogen")]
#[command(author, version = version(), about = "Generate infographics from text with a chat model", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an infographic from a prompt.
    Generate {
        /// Prompt text. Read from stdin when omitted.
        prompt: Option<String>,

        /// Template to suggest to the model (see `infogen templates`).
        /// An empty value removes an existing hint.
        #[arg(short, long)]
        template: Option<String>,

        /// Wait for the full reply instead of streaming it.
        #[arg(long)]
        no_stream: bool,

        /// Write the rendered SVG to this file.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Browse and manage past generations.
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },

    /// List available templates.
    Templates,

    /// Render a past generation to an image.
    Export {
        /// History record ID.
        id: String,

        /// Write the rendered SVG to this file.
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Print the image as a data URL.
        #[arg(long)]
        data_url: bool,
    },
}

#[derive(Subcommand)]
enum HistoryCommands {
    /// List recent generations.
    List {
        /// Maximum number of records to show. Defaults to 20.
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show a record's prompt and reply.
    Show {
        /// History record ID.
        id: String,
    },

    /// Delete a record.
    Delete {
        /// History record ID.
        id: String,
    },

    /// Delete all records.
    Clear,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            prompt,
            template,
            no_stream,
            out,
        } => cli::generate::run(prompt, template, no_stream, out.as_deref()),
        Commands::History { command } => match command {
            HistoryCommands::List { limit } => cli::history::list(limit),
            HistoryCommands::Show { id } => cli::history::show(&id),
            HistoryCommands::Delete { id } => cli::history::delete(&id),
            HistoryCommands::Clear => cli::history::clear(),
        },
        Commands::Templates => cli::templates::run(),
        Commands::Export { id, out, data_url } => cli::export::run(&id, out.as_deref(), data_url),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("infogen: error: {e}");
            ExitCode::FAILURE
        }
    }
}
