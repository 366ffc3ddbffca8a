use std::path::PathBuf;

use clap::Parser;
use clap::builder::NonEmptyStringValueParser;
use miette::{IntoDiagnostic, Result};
use quire_common::telemetry::{self, LogSettings};
use quire_common::{
    Config, FileStore, GistClient, NotionClient, PageQuery, QuireError, ResolvedConfig,
};
use quire_renderer::{DraftInfo, DraftWriter, build_document};

mod console;

#[derive(Parser)]
#[command(version, about = "Quire - turn a Notion page into a Hugo draft", long_about = None)]
struct Cli {
    /// Title of the page to convert
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    title: String,

    /// Name of the select property holding the publishing status
    #[arg(long, default_value = "Status")]
    status_property: String,

    /// Status the page must have
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    status: String,

    /// Path to the config file (json, toml or yaml)
    #[arg(long, default_value = "secrets.yml")]
    config: PathBuf,

    /// Directory the draft is written into, overriding the config
    #[arg(long)]
    content_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_miette()?;
    telemetry::init(LogSettings::for_app("quire"));

    let cli = Cli::parse();
    let config = load_config(&cli).await?;
    convert(&cli, config).await
}

async fn load_config(cli: &Cli) -> Result<ResolvedConfig> {
    let mut config = Config::load(&FileStore::new(&cli.config))
        .await
        .map_err(QuireError::from)?
        .merge_env();
    if let Some(path) = &cli.content_path {
        config.content_path = Some(path.clone());
    }
    let config = config.resolve().map_err(QuireError::from)?;
    tracing::debug!(
        config = %cli.config.display(),
        database = %config.database_name,
        "loaded config"
    );
    Ok(config)
}

async fn convert(cli: &Cli, config: ResolvedConfig) -> Result<()> {
    let mut notion = NotionClient::new(&config.notion_api_key);
    if let Some(url) = &config.notion_base_url {
        notion = notion.with_base_url(url);
    }
    let mut gists = GistClient::new(&config.github_token);
    if let Some(url) = &config.github_base_url {
        gists = gists.with_base_url(url);
    }

    console::status("🏇", "fetching content from Notion");
    let query = PageQuery {
        title: &cli.title,
        status_property: &cli.status_property,
        status: &cli.status,
    };
    let (page, blocks) = notion.content(&config.database_name, &query).await?;

    console::status("🔨", "building markdown from blocks");
    let document = build_document(&page, &blocks, &notion, &gists).await?;
    for snippet in &document.snippets {
        console::substatus(&console::snippet_line(snippet));
    }

    console::status("🌍", "writing draft");
    let writer = match &config.draft_template {
        Some(template) => DraftWriter::with_template_file(&config.content_path, template).await?,
        None => DraftWriter::new(&config.content_path),
    };
    let path = writer
        .write(DraftInfo::new(page.title.clone(), document.markdown))
        .await?;

    console::status("✅", &format!("draft created: {}", path.display()));
    Ok(())
}

fn init_miette() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .color(true)
                .context_lines(5)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }))
    .into_diagnostic()?;
    miette::set_panic_hook();
    Ok(())
}
