//! `evault` - CLI for browsing case documents
//!
//! This binary loads the configured collection and renders, searches, exports
//! or opens its documents.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use evault::cli::{
    BrowseCommand, Cli, Command, ConfigCommand, ExportCommand, ImportCommand, OpenCommand,
    SearchCommand,
};
use evault::render::open_link;
use evault::source::sqlite::{documents_from_json, SqliteSource};
use evault::{
    init_logging, source, Config, DocumentsView, Error, LoadState, RecordLoader, Renderer, Screen,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config_path = cli.config;

    match cli.command {
        Command::List(list_cmd) => {
            let config = load_config(config_path)?;
            let mut view = documents_view(&config)?;
            view.settle().await;
            print_screen(&config, &view.screen(), list_cmd.format.into(), "")
        }
        Command::Search(search_cmd) => handle_search(&load_config(config_path)?, search_cmd).await,
        Command::Browse(browse_cmd) => handle_browse(&load_config(config_path)?, &browse_cmd).await,
        Command::Open(open_cmd) => handle_open(&load_config(config_path)?, &open_cmd).await,
        Command::Export(export_cmd) => handle_export(&load_config(config_path)?, export_cmd).await,
        Command::Import(import_cmd) => handle_import(&load_config(config_path)?, &import_cmd),
        Command::Status(status_cmd) => {
            handle_status(&load_config(config_path)?, status_cmd.json).await
        }
        // A broken configuration file can still be inspected
        Command::Config(config_cmd) => handle_config(config_path, config_cmd),
    }
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    Config::load_from(path).context("failed to load configuration")
}

fn documents_view(config: &Config) -> anyhow::Result<DocumentsView> {
    let source = source::from_config(config).context("failed to set up document source")?;
    Ok(DocumentsView::new(RecordLoader::new(
        source,
        &config.source.collection,
        config.fetch_timeout(),
    )))
}

/// Print a rendered screen; a failed load exits non-zero.
fn print_screen(
    config: &Config,
    screen: &Screen,
    format: evault::OutputFormat,
    query: &str,
) -> anyhow::Result<ExitCode> {
    let renderer = Renderer::new(config.view.clone());
    println!("{}", renderer.render(screen, format, query)?);
    Ok(match screen {
        Screen::Failed { .. } => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}

async fn handle_search(config: &Config, cmd: SearchCommand) -> anyhow::Result<ExitCode> {
    let mut view = documents_view(config)?;
    view.set_query(cmd.query);
    view.settle().await;

    let mut screen = view.screen();
    if let Some(limit) = cmd.limit {
        screen.truncate(limit);
    }
    print_screen(config, &screen, cmd.format.into(), view.query())
}

async fn handle_browse(config: &Config, cmd: &BrowseCommand) -> anyhow::Result<ExitCode> {
    let mut view = documents_view(config)?;
    view.mount();

    let renderer = Renderer::new(config.view.clone());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("{}: ", config.view.search_placeholder);
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        view.set_query(line);
        println!("{}", renderer.render(&view.screen(), cmd.format.into(), view.query())?);
    }

    view.unmount();
    Ok(ExitCode::SUCCESS)
}

async fn handle_open(config: &Config, cmd: &OpenCommand) -> anyhow::Result<ExitCode> {
    let mut view = documents_view(config)?;
    let state = view.settle().await;
    if let LoadState::Failed { reason } = &state {
        anyhow::bail!("could not load documents: {reason}");
    }

    let record = state.find_case(&cmd.case_id).ok_or_else(|| Error::RecordNotFound {
        case_id: cmd.case_id.clone(),
    })?;
    let url = record.document_link()?;

    if cmd.print {
        println!("{url}");
    } else {
        open_link(url)?;
    }
    Ok(ExitCode::SUCCESS)
}

async fn handle_export(config: &Config, cmd: ExportCommand) -> anyhow::Result<ExitCode> {
    let mut view = documents_view(config)?;
    if let Some(query) = cmd.query {
        view.set_query(query);
    }
    view.settle().await;

    let screen = view.screen();
    let html = Renderer::new(config.view.clone()).render(
        &screen,
        evault::OutputFormat::Html,
        view.query(),
    )?;
    write_file(&cmd.output, &html)?;

    match &screen {
        Screen::Failed { reason } => {
            eprintln!("Could not load documents: {reason}");
            Ok(ExitCode::FAILURE)
        }
        _ => {
            println!(
                "Exported {} documents to {}",
                screen.records().len(),
                cmd.output.display()
            );
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn write_file(path: &Path, contents: &str) -> evault::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, contents)?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "Wrote export");
    Ok(())
}

fn handle_import(config: &Config, cmd: &ImportCommand) -> anyhow::Result<ExitCode> {
    let text = std::fs::read_to_string(&cmd.file)
        .with_context(|| format!("failed to read {}", cmd.file.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", cmd.file.display()))?;

    let source =
        SqliteSource::open(config.database_path()).context("failed to open document database")?;
    let collection = cmd
        .collection
        .as_deref()
        .unwrap_or(&config.source.collection);

    let first_id = if cmd.replace {
        0
    } else {
        usize::try_from(source.count(collection)?).unwrap_or_default()
    };
    let documents = documents_from_json(value, first_id)?;
    let written = source.import(collection, &documents, cmd.replace)?;

    println!(
        "Imported {written} documents into '{collection}' ({} total) at {}",
        source.count(collection)?,
        source.path().display()
    );
    Ok(ExitCode::SUCCESS)
}

async fn handle_status(config: &Config, json: bool) -> anyhow::Result<ExitCode> {
    let mut view = documents_view(config)?;
    let state = view.settle().await;
    let source = view.loader().source();

    let (skipped, loaded_at, reason) = match &state {
        LoadState::Loaded {
            skipped, loaded_at, ..
        } => (Some(*skipped), Some(*loaded_at), None),
        LoadState::Failed { reason } => (None, None, Some(reason.as_str())),
        _ => (None, None, None),
    };

    if json {
        let status = serde_json::json!({
            "source": source.name(),
            "location": source.location(),
            "collection": view.loader().collection(),
            "state": state.label(),
            "records": state.records().len(),
            "skipped": skipped,
            "loaded_at": loaded_at,
            "reason": reason,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("evault status");
        println!("-------------");
        println!("Source:        {} ({})", source.name(), source.location());
        println!("Collection:    {}", view.loader().collection());
        println!("State:         {}", state.label());
        println!("Records:       {}", state.records().len());
        if let Some(skipped) = skipped {
            println!("Skipped:       {skipped}");
        }
        if let Some(loaded_at) = loaded_at {
            println!("Loaded at:     {}", loaded_at.to_rfc3339());
        }
        if let Some(reason) = reason {
            println!("Error:         {reason}");
        }
    }

    Ok(match state {
        LoadState::Failed { .. } => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}

fn handle_config(config_path: Option<PathBuf>, cmd: ConfigCommand) -> anyhow::Result<ExitCode> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = load_config(config_path)?.redacted();
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Source]");
                println!("  Kind:               {}", config.source.kind);
                println!("  Collection:         {}", config.source.collection);
                println!("  Timeout (secs):     {}", config.source.timeout_secs);
                println!();
                println!("[Firestore]");
                println!("  Project:            {}", config.firestore.project_id);
                println!("  Database:           {}", config.firestore.database_id);
                println!("  Endpoint:           {}", config.firestore.base_url);
                println!(
                    "  API key:            {}",
                    config.firestore.api_key.as_deref().unwrap_or("(none)")
                );
                println!("  Page size:          {}", config.firestore.page_size);
                println!();
                println!("[Sqlite]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[View]");
                println!("  Columns:            {}", config.view.columns);
                println!("  Thumbnail:          {}", config.view.thumbnail);
                println!("  Search placeholder: {}", config.view.search_placeholder);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::resolve_path(config_path).display());
        }
        ConfigCommand::Validate { file } => {
            let path = Config::resolve_path(file.or(config_path));
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => {
                    println!("Configuration error: {e}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
