//! CLI command definitions, routing, and tracing setup.

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use briefbuilder_core::{
    ProgressReporter, PublishReport, RenderOptions, RenderedBrief, publish, render_brief, to_text,
};
use briefbuilder_notion::NotionClient;
use briefbuilder_shared::{
    AppConfig, BriefBuilderError, ItemOrder, init_config, load_config, load_config_from,
    resolve_notion_credentials,
};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// BriefBuilder: turn a daily AI strategy brief into a structured page.
#[derive(Parser)]
#[command(
    name = "briefbuilder",
    version,
    about = "Render AI strategy briefs into structured blocks and publish them to Notion.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.briefbuilder/briefbuilder.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Render a brief and print the formatted items (or the full render as JSON).
    Render {
        /// Brief file to read (`-` for stdin).
        file: PathBuf,

        /// Item order: input or score. Overrides `[render] order`.
        #[arg(long)]
        order: Option<ItemOrder>,

        /// Brief date used in the title (YYYY-MM-DD, defaults to today).
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Print the items, blocks, and batches as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Render a brief and publish it as a new Notion database row.
    Publish {
        /// Brief file to read (`-` for stdin).
        file: PathBuf,

        /// Item order: input or score. Overrides `[render] order`.
        #[arg(long)]
        order: Option<ItemOrder>,

        /// Brief date (YYYY-MM-DD, defaults to today).
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr so stdout stays
/// clean for rendered output.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "briefbuilder=info",
        1 => "briefbuilder=debug",
        _ => "briefbuilder=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Render {
            file,
            order,
            date,
            json,
        } => cmd_render(config_path, &file, order, date, json),
        Command::Publish { file, order, date } => {
            cmd_publish(config_path, &file, order, date).await
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

/// Read the brief from a file, or stdin for `-`.
fn read_document(file: &Path) -> Result<String> {
    if file == Path::new("-") {
        let mut document = String::new();
        std::io::stdin()
            .read_to_string(&mut document)
            .map_err(|e| BriefBuilderError::io("<stdin>", e))?;
        return Ok(document);
    }
    let document =
        std::fs::read_to_string(file).map_err(|e| BriefBuilderError::io(file, e))?;
    Ok(document)
}

/// Load config and the brief, then render it.
fn render_from(
    config: &AppConfig,
    file: &Path,
    order: Option<ItemOrder>,
    date: NaiveDate,
) -> Result<RenderedBrief> {
    let order = config.render.resolve_order(order)?;
    let document = read_document(file)?;
    let options = RenderOptions::from_config(config, order, date);

    info!(file = %file.display(), ?order, %date, "rendering brief");
    let brief = render_brief(&document, &options)
        .wrap_err_with(|| format!("failed to render {}", file.display()))?;
    Ok(brief)
}

fn print_summary(brief: &RenderedBrief) {
    let with_score = brief.items.iter().filter(|i| i.score.is_some()).count();
    let with_action = brief.items.iter().filter(|i| i.action.is_some()).count();
    let count = |n: Option<u32>| n.map_or_else(|| "-".to_string(), |n| n.to_string());

    println!();
    println!("  {}", brief.title);
    println!(
        "  Items:    {} ({with_score} scored, {with_action} with actions)",
        brief.items.len()
    );
    println!("  Blocks:   {}", brief.block_count());
    println!("  Batches:  {}", brief.batches.len());
    if !brief.tally.is_empty() {
        println!(
            "  Sources:  {} newsletters, {} HN posts, {} GitHub repos",
            count(brief.tally.newsletters),
            count(brief.tally.hacker_news),
            count(brief.tally.github_repos),
        );
    }
    println!();
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_render(
    config_path: Option<&Path>,
    file: &Path,
    order: Option<ItemOrder>,
    date: Option<NaiveDate>,
    json: bool,
) -> Result<()> {
    let config = resolve_config(config_path)?;
    let date = date.unwrap_or_else(|| Local::now().date_naive());
    let brief = render_from(&config, file, order, date)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&brief)?);
    } else {
        println!("{}", to_text(&brief.groups));
        print_summary(&brief);
    }
    Ok(())
}

async fn cmd_publish(
    config_path: Option<&Path>,
    file: &Path,
    order: Option<ItemOrder>,
    date: Option<NaiveDate>,
) -> Result<()> {
    let config = resolve_config(config_path)?;
    let credentials = resolve_notion_credentials(&config.notion)?;
    let date = date.unwrap_or_else(|| Local::now().date_naive());

    let brief = render_from(&config, file, order, date)?;
    let client = NotionClient::new(credentials, &config.notion)?;

    let reporter = CliProgress::new();
    let report = match publish(&client, &brief, date, &reporter).await {
        Ok(report) => report,
        Err(e) => {
            reporter.abandon();
            return Err(e).wrap_err("publishing to Notion failed");
        }
    };

    print_summary(&brief);
    println!(
        "  Published page {} ({} blocks in {} batches)",
        report.page_id, report.blocks, report.batches
    );
    println!();
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }

    fn abandon(&self) {
        self.spinner.abandon();
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn batch_appended(&self, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Appending blocks [{current}/{total}]"));
    }

    fn done(&self, _report: &PublishReport) {
        self.spinner.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn render_flags_parse() {
        let cli = Cli::try_parse_from([
            "briefbuilder",
            "render",
            "brief.md",
            "--order",
            "score",
            "--date",
            "2025-07-14",
            "--json",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Render {
                order, date, json, ..
            } => {
                assert_eq!(order, Some(ItemOrder::ScoreDescending));
                assert_eq!(date, NaiveDate::from_ymd_opt(2025, 7, 14));
                assert!(json);
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn unknown_order_is_rejected() {
        let result = Cli::try_parse_from(["briefbuilder", "render", "b.md", "--order", "random"]);
        assert!(result.is_err());
    }

    #[test]
    fn missing_order_is_config_error() {
        let config = AppConfig::default();
        let date = NaiveDate::from_ymd_opt(2025, 7, 14).unwrap();
        let fixture = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../fixtures/briefs/strategy_brief.md");

        let err = render_from(&config, &fixture, None, date).unwrap_err();
        assert!(err.to_string().contains("item order is not configured"));

        let brief = render_from(&config, &fixture, Some(ItemOrder::Input), date).unwrap();
        assert_eq!(brief.items.len(), 5);
    }

    #[test]
    fn missing_file_is_reported() {
        let config = AppConfig::default();
        let date = NaiveDate::from_ymd_opt(2025, 7, 14).unwrap();
        let missing = Path::new("/nonexistent/brief.md");
        let err = render_from(&config, missing, Some(ItemOrder::Input), date).unwrap_err();
        assert!(err.to_string().contains("I/O error"));
    }
}
