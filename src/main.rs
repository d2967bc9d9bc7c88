use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

mod aggregate;
mod config;
mod dashboard;
mod db;
mod error;
#[cfg(test)]
mod memory;
mod models;
mod period;
mod report;
mod session;
mod taxonomy;
mod view;

use config::Config;
use dashboard::Dashboard;
use db::PgRowStore;
use session::{EnvSession, SessionProvider};
use view::{SortDirection, ViewState};

#[derive(Parser)]
#[command(name = "feedback-dashboard")]
#[command(about = "Customer feedback dashboard aggregates for branch surveys", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct ViewArgs {
    /// Main topic to include; repeat for several. Defaults to every main topic
    #[arg(long = "main-topic")]
    main_topics: Vec<String>,
    /// Main topic to drop from the default selection; repeat for several
    #[arg(long = "exclude-topic", conflicts_with = "main_topics")]
    excluded_topics: Vec<String>,
    /// Clear the main topic filter, which shows every topic
    #[arg(long, conflicts_with_all = ["main_topics", "excluded_topics"])]
    all_topics: bool,
    #[arg(long, default_value_t = SortDirection::Desc)]
    left_sort: SortDirection,
    #[arg(long, default_value_t = SortDirection::Desc)]
    right_sort: SortDirection,
}

impl ViewArgs {
    fn into_state(self) -> ViewState {
        let mut state = ViewState {
            left_sort: self.left_sort,
            right_sort: self.right_sort,
            ..ViewState::default()
        };
        if self.all_topics {
            state.toggle_select_all();
        } else if !self.excluded_topics.is_empty() {
            for topic in &self.excluded_topics {
                if state.is_selected(topic) {
                    state.toggle_main_topic(topic);
                }
            }
        } else if !self.main_topics.is_empty() {
            for topic in &self.main_topics {
                if !taxonomy::is_main_topic(topic) {
                    warn!(%topic, "main topic is not part of the topic taxonomy");
                }
            }
            state.select_main_topics(self.main_topics);
        }
        state
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print every dashboard aggregate as JSON
    Snapshot {
        #[arg(long)]
        pretty: bool,
    },
    /// Print the paired negative/positive topic ranking as JSON
    Butterfly {
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Generate a markdown report
    Report {
        #[command(flatten)]
        view: ViewArgs,
        #[arg(long, default_value = "dashboard.md")]
        out: PathBuf,
    },
    /// Export topic rankings as CSV
    Export {
        #[command(flatten)]
        view: ViewArgs,
        #[arg(long, default_value = "topics.csv")]
        out: PathBuf,
        /// Export the grouped topic counts instead of the ranking (admins only)
        #[arg(long)]
        raw_topics: bool,
    },
    /// List the main topics and their sub-topics
    Topics,
    /// Show the signed-in user
    Whoami {
        #[arg(long)]
        sign_out: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let session = EnvSession::load()?;

    match cli.command {
        Commands::Topics => {
            for (main, subs) in taxonomy::MAIN_TOPICS {
                println!("{main}");
                for sub in subs {
                    println!("  - {sub}");
                }
            }
            return Ok(());
        }
        Commands::Whoami { sign_out } => {
            match session.current_user() {
                Some(user) => println!(
                    "{} ({}){}",
                    user.email,
                    user.id,
                    if user.is_admin { " [admin]" } else { "" }
                ),
                None => println!("Not signed in."),
            }
            if sign_out {
                session.sign_out();
                println!("Signed out.");
            }
            return Ok(());
        }
        _ => {}
    }

    let config = Config::load()?;
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .context("failed to connect to Postgres")?;

    let dashboard = Dashboard::new(PgRowStore::new(pool));
    dashboard.refetch().await;
    let snapshot = dashboard.snapshot().await;

    match cli.command {
        Commands::Snapshot { pretty } => {
            let json = if pretty {
                serde_json::to_string_pretty(&snapshot)?
            } else {
                serde_json::to_string(&snapshot)?
            };
            println!("{json}");
        }
        Commands::Butterfly { view: args } => {
            if let Some(error) = &snapshot.error {
                anyhow::bail!("{error}");
            }
            let rows = view::build_butterfly(&snapshot.topic_data, &args.into_state());
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        Commands::Report { view: args, out } => {
            let report = report::build_report(&snapshot, &args.into_state());
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Export {
            view: args,
            out,
            raw_topics,
        } => {
            if let Some(error) = &snapshot.error {
                anyhow::bail!("{error}");
            }
            if raw_topics && !session::is_admin(&session) {
                anyhow::bail!("exporting raw topic counts requires an admin session");
            }
            let file = std::fs::File::create(&out)
                .with_context(|| format!("failed to create {}", out.display()))?;
            if raw_topics {
                report::write_topics_csv(file, &snapshot.topic_data)?;
                info!(topics = snapshot.topic_data.len(), "exported raw topics");
            } else {
                let rows = view::build_butterfly(&snapshot.topic_data, &args.into_state());
                report::write_butterfly_csv(file, &rows)?;
                info!(rows = rows.len(), "exported topic ranking");
            }
            println!("Export written to {}.", out.display());
        }
        Commands::Topics | Commands::Whoami { .. } => {}
    }

    Ok(())
}
