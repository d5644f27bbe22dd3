mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{article::ArticleSubcommand, config::ConfigSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "newsroom",
    about = "Editorial review workflow: move articles from draft to publication",
    version,
    propagate_version = true
)]
struct Cli {
    /// Newsroom root (defaults to the nearest directory containing .newsroom/)
    #[arg(long, global = true, env = "NEWSROOM_ROOT")]
    root: Option<PathBuf>,

    /// Emit JSON instead of human-readable output
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Acting user id
    #[arg(long, global = true, env = "NEWSROOM_ACTOR")]
    actor: Option<String>,

    /// Acting user's role (staff, section-head, editor-in-chief, administrator, system-admin)
    #[arg(long, global = true, env = "NEWSROOM_ROLE")]
    role: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create .newsroom/ with a default config (safe to re-run)
    Init {
        /// Publication name (defaults to the directory name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Create, list and inspect articles
    Article {
        #[command(subcommand)]
        subcommand: ArticleSubcommand,
    },

    /// Apply one review action to one article
    Review {
        id: String,
        /// submit, approve-to-eic, request-revision, return-to-section,
        /// publish, resubmit, archive, restore
        action: String,
        #[arg(long)]
        feedback: Option<String>,
        /// Target status for restore: draft (default) or in-review
        #[arg(long)]
        restore_to: Option<String>,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Apply one review action to many articles
    Bulk {
        action: String,
        #[arg(required = true)]
        ids: Vec<String>,
        #[arg(long)]
        feedback: Option<String>,
        #[arg(long)]
        restore_to: Option<String>,
        /// Seconds to wait before reporting the batch as still processing
        #[arg(long)]
        timeout_secs: Option<u64>,
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Show a review queue (section-head or eic)
    Queue {
        queue: String,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// submitted (default), title, author or updated
        #[arg(long)]
        sort_by: Option<String>,
        /// asc or desc (default)
        #[arg(long)]
        order: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Run the HTTP API
    Serve {
        /// Port to listen on (defaults to server.port in config)
        #[arg(long)]
        port: Option<u16>,
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

    let root = root::resolve_root(cli.root.as_deref());
    let who = cmd::Who {
        actor: cli.actor,
        role: cli.role,
    };

    let result = match cli.command {
        Commands::Init { name } => cmd::init::run(&root, name.as_deref(), cli.json),
        Commands::Article { subcommand } => cmd::article::run(&root, &who, subcommand, cli.json),
        Commands::Review {
            id,
            action,
            feedback,
            restore_to,
            yes,
        } => cmd::review::run(
            &root,
            &who,
            cmd::review::ReviewArgs {
                id,
                action,
                feedback,
                restore_to,
                yes,
            },
            cli.json,
        ),
        Commands::Bulk {
            action,
            ids,
            feedback,
            restore_to,
            timeout_secs,
            yes,
        } => cmd::bulk::run(
            &root,
            &who,
            cmd::bulk::BulkArgs {
                action,
                ids,
                feedback,
                restore_to,
                timeout_secs,
                yes,
            },
            cli.json,
        ),
        Commands::Queue {
            queue,
            status,
            search,
            category,
            sort_by,
            order,
            limit,
        } => cmd::queue::run(
            &root,
            &queue,
            cmd::queue::QueueArgs {
                status,
                search,
                category,
                sort_by,
                order,
                limit,
            },
            cli.json,
        ),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
        Commands::Serve { port } => cmd::serve::run(&root, port),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
