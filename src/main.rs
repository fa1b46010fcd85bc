//! Forum-Sentry main entry point
//!
//! This is the command-line interface for the Forum-Sentry profile watcher.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use forum_sentry::config::{load_config_with_hash, Config};
use forum_sentry::{start_polling, ForumClient, ProfileSnapshot};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Forum-Sentry: a watcher for forum profile activity
///
/// Scrapes user profiles of a forum and reports new posts as they appear.
#[derive(Parser, Debug)]
#[command(name = "forum-sentry")]
#[command(version)]
#[command(about = "Watches forum profiles for new posts", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(
        short,
        long,
        value_name = "CONFIG",
        env = "CONFIG_FILE",
        default_value = "config.toml"
    )]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate the config and show what would be watched
    Check,

    /// Fetch and print a user's profile
    Profile {
        /// Numeric forum user id
        user_id: String,
    },

    /// Fetch and print a user's most recent post
    LatestPost {
        /// Numeric forum user id
        user_id: String,
    },

    /// Poll every configured user until interrupted
    Watch,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    match cli.command {
        Command::Check => handle_check(&config),
        Command::Profile { user_id } => handle_profile(&config, &user_id).await,
        Command::LatestPost { user_id } => handle_latest_post(&config, &user_id).await,
        Command::Watch => handle_watch(&config).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("forum_sentry=info,warn"),
            1 => EnvFilter::new("forum_sentry=debug,info"),
            2 => EnvFilter::new("forum_sentry=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles `check`: prints the validated configuration
fn handle_check(config: &Config) -> anyhow::Result<()> {
    println!("=== Forum-Sentry Configuration ===\n");

    println!("Forum:");
    println!("  Base URL: {}", config.forum.base_url);
    println!("  Fetch timeout: {}s", config.forum.fetch_timeout_secs);

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nProfile:");
    println!("  Reputation lookup: {}", config.profile.fetch_reputation);
    println!(
        "  Empty visitor section: {:?}",
        config.profile.empty_visitor_section
    );

    let fetches_per_poll = if config.profile.fetch_reputation { 3 } else { 1 };
    println!("\nWatched Users ({}):", config.watch.len());
    for entry in &config.watch {
        println!(
            "  - user {} every {}s (up to {} fetches per poll)",
            entry.user_id, entry.poll_interval_secs, fetches_per_poll
        );
    }

    println!("\n✓ Configuration is valid");
    Ok(())
}

async fn handle_profile(config: &Config, user_id: &str) -> anyhow::Result<()> {
    let client = ForumClient::from_config(config)?;
    let url = client.profile_url(user_id)?;
    let snapshot = client
        .fetch_user_profile(url.as_str())
        .await
        .with_context(|| format!("failed to fetch profile of user {}", user_id))?;

    print_profile(&snapshot);
    Ok(())
}

fn print_profile(snapshot: &ProfileSnapshot) {
    fn or_dash<T: ToString>(value: &Option<T>) -> String {
        value
            .as_ref()
            .map_or_else(|| "-".to_string(), ToString::to_string)
    }

    println!("User: {}", snapshot.user_name);
    println!("  Join date: {}", or_dash(&snapshot.join_date));
    println!("  Total posts: {}", or_dash(&snapshot.total_posts));
    println!("  Reputation: {}", or_dash(&snapshot.reputation));
    println!("  Bio: {}", or_dash(&snapshot.bio_text));

    println!("\nVisitor Messages ({}):", snapshot.visitor_messages.len());
    for message in &snapshot.visitor_messages {
        println!("  - {}: {}", message.author, message.body);
    }

    if snapshot.is_degraded() {
        println!("\nUnreadable Fields ({}):", snapshot.field_errors.len());
        for error in &snapshot.field_errors {
            println!("  - {}", error);
        }
    }
}

async fn handle_latest_post(config: &Config, user_id: &str) -> anyhow::Result<()> {
    let client = ForumClient::from_config(config)?;
    let post = client
        .fetch_latest_post(user_id)
        .await
        .with_context(|| format!("failed to get latest post of user {}", user_id))?;

    println!("Topic: {}\n", post.title);
    println!("{}", post.body);
    Ok(())
}

/// Handles `watch`: one poller per configured user, until Ctrl-C
async fn handle_watch(config: &Config) -> anyhow::Result<()> {
    if config.watch.is_empty() {
        bail!("no [[watch]] entries in configuration");
    }

    let client = ForumClient::from_config(config)?;
    let mut handles = Vec::with_capacity(config.watch.len());

    for entry in &config.watch {
        let alert_client = client.clone();
        let user_id = entry.user_id.clone();

        let handle = start_polling(
            client.clone(),
            &entry.user_id,
            Duration::from_secs(entry.poll_interval_secs),
            move || announce_latest_post(alert_client.clone(), user_id.clone()),
        )?;
        handles.push(handle);
    }

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;
    tracing::info!("Received shutdown signal, stopping {} poller(s)", handles.len());

    for handle in handles {
        handle.stop().await;
    }
    Ok(())
}

/// Logging notification sink: reports the post that raised the count
async fn announce_latest_post(client: ForumClient, user_id: String) {
    match client.fetch_latest_post(&user_id).await {
        Ok(post) => {
            tracing::info!(
                "New post by user {} in topic: {}\n{}",
                user_id,
                post.title,
                post.body
            );
        }
        Err(e) => {
            tracing::error!("Failed to get latest post of user {}: {}", user_id, e);
        }
    }
}
