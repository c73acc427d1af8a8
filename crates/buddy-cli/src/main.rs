mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, journal::JournalSubcommand, sobriety::SobrietySubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "buddy",
    about = "Recovery Buddy: log meetings, keep your streak, earn badges",
    version,
    propagate_version = true
)]
struct Cli {
    /// Data root (default: nearest directory with .buddy/, else your home directory)
    #[arg(long, global = true, env = "BUDDY_ROOT")]
    root: Option<PathBuf>,

    /// User to act as (default: config default_user, else "guest")
    #[arg(long, short = 'u', global = true, env = "BUDDY_USER")]
    user: Option<String>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create .buddy/ and a default config
    Init,

    /// Log a meeting check-in; advances the streak and may award badges
    CheckIn {
        /// Where the meeting is (free text or coordinates)
        #[arg(long)]
        location: Option<String>,
    },

    /// Log a meeting check-out
    CheckOut,

    /// Write and read journal entries
    Journal {
        #[command(subcommand)]
        subcommand: JournalSubcommand,
    },

    /// Show the meeting log, newest first
    Log {
        /// Show at most this many events
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Show streak, counts and days sober
    #[command(alias = "streak")]
    Status,

    /// List earned badges and the ones still to earn
    Badges,

    /// List users with stored state
    Users,

    /// Manage the sobriety date
    Sobriety {
        #[command(subcommand)]
        subcommand: SobrietySubcommand,
    },

    /// Replace a user's state with a JSON export
    Import {
        /// JSON file to read
        file: PathBuf,
    },

    /// Write a user's state as JSON
    Export {
        /// Write to this file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Inspect and validate the configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Serve the HTTP API
    Serve {
        /// Port to listen on (0 = OS-assigned)
        #[arg(long, default_value = "3141")]
        port: u16,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = root::resolve_root(cli.root.as_deref()).and_then(|root| {
        let user = cli.user.as_deref();
        match cli.command {
            Commands::Init => cmd::init::run(&root),
            Commands::CheckIn { location } => cmd::checkin::check_in(&root, user, location, cli.json),
            Commands::CheckOut => cmd::checkin::check_out(&root, user, cli.json),
            Commands::Journal { subcommand } => cmd::journal::run(&root, user, subcommand, cli.json),
            Commands::Log { limit } => cmd::log::run(&root, user, limit, cli.json),
            Commands::Status => cmd::status::run(&root, user, cli.json),
            Commands::Badges => cmd::badges::run(&root, user, cli.json),
            Commands::Users => cmd::users::run(&root, cli.json),
            Commands::Sobriety { subcommand } => {
                cmd::sobriety::run(&root, user, subcommand, cli.json)
            }
            Commands::Import { file } => cmd::data::import(&root, user, &file, cli.json),
            Commands::Export { output } => cmd::data::export(&root, user, output.as_deref()),
            Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
            Commands::Serve { port } => cmd::serve::run(&root, port),
        }
    });

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
