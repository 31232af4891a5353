//! CLI entry point for `convlist`.

use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand};

use convlist::batch::read_batch;
use convlist::config::Config;
use convlist::model::folder::FolderBinding;
use convlist::render;
use convlist::store::mail::MailStore;

/// Expand and collapse mail conversations over a record batch.
#[derive(Parser)]
#[command(name = "convlist", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Folder id the listing is bound to (defaults to the primary folder)
    #[arg(long, global = true, value_name = "ID")]
    folder: Option<String>,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the visible rows of a batch
    View {
        batch: PathBuf,
        /// Expand the conversation containing this record (repeatable)
        #[arg(short, long, value_name = "ID")]
        expand: Vec<String>,
        /// Collapse everything after expanding, keeping this conversation
        #[arg(long, value_name = "ID")]
        collapse_all_except: Option<String>,
        /// Only unread messages
        #[arg(long)]
        unread: bool,
        #[arg(long)]
        json: bool,
    },
    /// Show item and conversation counts
    Stats {
        batch: PathBuf,
        /// Only unread messages
        #[arg(long)]
        unread: bool,
        #[arg(long)]
        json: bool,
    },
    /// Load a batch, expand conversations, then reload a newer batch
    Reload {
        old: PathBuf,
        new: PathBuf,
        /// Expand the conversation containing this record before reloading
        #[arg(short, long, value_name = "ID")]
        expand: Vec<String>,
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = convlist::config::load_config();

    // Configure logging: stderr + optional log file
    let log_level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_logging(log_level, &config);

    let folder = cli.folder.as_deref();

    match cli.command {
        Commands::View {
            batch,
            expand,
            collapse_all_except,
            unread,
            json,
        } => cmd_view(
            &config,
            folder,
            &batch,
            &expand,
            collapse_all_except.as_deref(),
            unread,
            json,
        ),
        Commands::Stats {
            batch,
            unread,
            json,
        } => cmd_stats(&config, folder, &batch, unread, json),
        Commands::Reload {
            old,
            new,
            expand,
            json,
        } => cmd_reload(&config, folder, &old, &new, &expand, json),
        Commands::Completions { shell } => cmd_completions(shell),
        Commands::Manpage => cmd_manpage(),
    }
}

/// Set up tracing with stderr output and optional file logging.
fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    // Try to set up file logging
    let log_dir = convlist::config::cache_dir(config);
    if std::fs::create_dir_all(&log_dir).is_ok() {
        let file_appender = tracing_appender::rolling::never(&log_dir, "convlist.log");
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        // Fall back to stderr only
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

/// Build an empty listing bound to `folder` (or the primary folder).
fn open_store(config: &Config, folder: Option<&str>, unread: bool) -> MailStore {
    let threading = config.threading.clone();
    let binding = match folder {
        Some(id) if convlist::model::folder::FolderId::new(id) != threading.primary_folder_id => {
            FolderBinding::new(id, id)
        }
        _ => FolderBinding::new(
            threading.primary_folder_id.clone(),
            threading.primary_folder_label.clone(),
        ),
    };
    let mut store = MailStore::new(binding, threading);
    store.set_unread_filter(unread);
    store
}

/// Read a batch and feed it through the store's next load.
fn load_into(store: &mut MailStore, path: &Path) -> anyhow::Result<convlist::ReconcileOutcome> {
    let request = store.load_request();
    let ticket = store.begin_load(&request);
    let batch = request.apply(read_batch(path)?);
    Ok(store.complete_load(ticket, batch)?)
}

fn expand_all(store: &mut MailStore, ids: &[String]) {
    for id in ids {
        if !store.expand(id) {
            tracing::warn!(id = %id, "Not part of a conversation, ignored");
        }
    }
}

fn print_listing(store: &MailStore, config: &Config, json: bool) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&render::listing_json(store))?
        );
    } else {
        for line in render::listing_lines(store, &config.display, &config.general) {
            println!("{line}");
        }
    }
    Ok(())
}

fn cmd_view(
    config: &Config,
    folder: Option<&str>,
    batch: &Path,
    expand: &[String],
    collapse_all_except: Option<&str>,
    unread: bool,
    json: bool,
) -> anyhow::Result<()> {
    let mut store = open_store(config, folder, unread);
    load_into(&mut store, batch)?;
    expand_all(&mut store, expand);
    if let Some(keep) = collapse_all_except {
        store.collapse_all(Some(keep));
    }
    print_listing(&store, config, json)
}

fn cmd_stats(
    config: &Config,
    folder: Option<&str>,
    batch: &Path,
    unread: bool,
    json: bool,
) -> anyhow::Result<()> {
    let mut store = open_store(config, folder, unread);
    load_into(&mut store, batch)?;

    let rows = store.list().total_len();
    let headers = store.snapshot().iter().filter(|r| r.is_header()).count();

    if json {
        let stats = serde_json::json!({
            "folder": store.folder().id.as_str(),
            "threaded": store.is_threaded_view(),
            "rows": rows,
            "item_count": store.visible_item_count(),
            "conversation_count": store.conversation_count(),
            "threads": headers,
            "unread_filter": store.has_filter_applied(),
        });
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!();
        println!("  {:<20} {}", "Folder", store.folder().id);
        println!("  {:<20} {}", "Threaded view", store.is_threaded_view());
        println!("  {:<20} {}", "Rows loaded", rows);
        println!("  {:<20} {}", "Items", store.visible_item_count());
        println!("  {:<20} {}", "Conversations", store.conversation_count());
        println!("  {:<20} {}", "Threads", headers);
        println!();
    }
    Ok(())
}

fn cmd_reload(
    config: &Config,
    folder: Option<&str>,
    old: &Path,
    new: &Path,
    expand: &[String],
    json: bool,
) -> anyhow::Result<()> {
    let mut store = open_store(config, folder, false);
    load_into(&mut store, old)?;
    expand_all(&mut store, expand);

    let outcome = load_into(&mut store, new)?;
    if !json {
        for (header, items) in &outcome.absorbed {
            println!("  + {header}: {}", items.join(", "));
        }
        for header in &outcome.expanded {
            println!("  v {header}");
        }
        for header in &outcome.collapsed {
            println!("  - {header}");
        }
        if outcome.changed() {
            println!();
        }
    }
    print_listing(&store, config, json)
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "convlist", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}
