//! CLI binary for dinus-reco.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dinus_reco::AppConfig;
use dinus_reco::commands::{self, SearchOptions};
use dinus_reco::console::{Console, Flow, HELP};
use dinus_reco::platform::{SystemClipboard, SystemShareLauncher};
use dinus_reco::render::render_health;
use reco_client::{
    CitationStyle, CopyAcknowledgment, HttpRecommendationService, ResultFilter, SearchSession,
    SortMode,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Citation and thesis-supervisor recommendations for a research topic.
#[derive(Parser)]
#[command(name = "dinus-reco", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,

    /// Subcommand to run. Without one, starts an interactive session.
    #[command(subcommand)]
    command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Search and print citations and supervisors.
    Search {
        query: String,
        /// Citation order: relevance or year.
        #[arg(long)]
        sort: Option<SortMode>,
        /// Categories to show: both, citations or supervisors.
        #[arg(long)]
        show: Option<ResultFilter>,
        /// Extra pages of citations to reveal.
        #[arg(long, default_value_t = 0)]
        more: usize,
        /// Hide the low-relevance tail of the citation list.
        #[arg(long)]
        cutoff: bool,
        /// Print the view as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the formatted citation at a result position.
    Cite {
        query: String,
        /// 1-based position in the citation list.
        position: usize,
        /// Citation style: apa or ieee.
        #[arg(long, default_value = "apa")]
        style: CitationStyle,
        /// Also copy it to the system clipboard.
        #[arg(long)]
        copy: bool,
    },

    /// Print the WhatsApp share link for a citation.
    Share {
        query: String,
        /// 1-based position in the citation list.
        position: usize,
        /// Open the link in the browser.
        #[arg(long)]
        open: bool,
    },

    /// Suggest refinement keywords for a topic.
    Suggest {
        query: String,
        #[arg(long, default_value_t = 10)]
        top_k: usize,
    },

    /// Check that the recommendation service is up.
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so command output stays pipeable.
    let default_filter = if cli.verbose {
        "dinus_reco=debug,reco_client=debug"
    } else {
        "dinus_reco=info,reco_client=info"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let app = AppConfig::load(cli.config.as_deref())?;
    let config = Arc::new(app.client_config()?);
    info!(base_url = %config.base_url, "using recommendation service");

    let service = Arc::new(HttpRecommendationService::new(Arc::clone(&config))?);
    let session = SearchSession::new(Arc::clone(&service), Arc::clone(&config));
    session.set_sort_mode(app.search.sort);
    session.set_filter(app.search.show);

    match cli.command {
        None => run_interactive(session, &app.ui.emphasis).await,
        Some(Command::Search {
            query,
            sort,
            show,
            more,
            cutoff,
            json,
        }) => {
            let options = SearchOptions {
                sort: sort.unwrap_or(app.search.sort),
                show: show.unwrap_or(app.search.show),
                more,
                cutoff,
            };
            if json {
                let view = commands::search_view(&session, &query, &options).await?;
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                let text = commands::search(&session, &query, &options, &app.ui.emphasis).await?;
                print!("{text}");
            }
            Ok(())
        }
        Some(Command::Cite {
            query,
            position,
            style,
            copy,
        }) => {
            commands::run_search(&session, &query).await?;
            let text = if copy {
                let clipboard = SystemClipboard::detect();
                let ack = CopyAcknowledgment::new(std::time::Duration::from_millis(
                    config.copy_ack_ms,
                ));
                let text =
                    commands::cite(&session, position, style, Some((&clipboard, &ack))).await?;
                eprintln!("Copied {style} citation to the clipboard.");
                text
            } else {
                commands::cite::<_, SystemClipboard>(&session, position, style, None).await?
            };
            println!("{text}");
            Ok(())
        }
        Some(Command::Share {
            query,
            position,
            open,
        }) => {
            commands::run_search(&session, &query).await?;
            let launcher = SystemShareLauncher::new();
            let url = commands::share(&session, position, open.then_some(&launcher))?;
            println!("{url}");
            Ok(())
        }
        Some(Command::Suggest { query, top_k }) => {
            print!("{}", commands::suggest(&service, &query, top_k).await?);
            Ok(())
        }
        Some(Command::Health) => {
            let health = service.health().await?;
            print!("{}", render_health(&config.base_url, &health));
            if !health.ok {
                anyhow::bail!("recommendation service reported not ok");
            }
            Ok(())
        }
    }
}

async fn run_interactive(
    session: SearchSession<HttpRecommendationService>,
    emphasis: &str,
) -> anyhow::Result<()> {
    let (console, mut output) = Console::new(
        Arc::new(session),
        SystemClipboard::detect(),
        SystemShareLauncher::new(),
        emphasis,
    );

    println!("dinus-reco v{}", env!("CARGO_PKG_VERSION"));
    print!("{HELP}");
    prompt();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if console.handle_line(&line).await == Flow::Quit {
                    break;
                }
                if line.trim().is_empty() {
                    prompt();
                }
            }
            Some(text) = output.recv() => {
                print!("{text}");
                if !text.ends_with('\n') {
                    println!();
                }
                prompt();
            }
        }
    }
    Ok(())
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}
