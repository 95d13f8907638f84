use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use apidoc_recorder::config::load_config;
use apidoc_recorder::doc::render::{write_page, DocView};
use apidoc_recorder::doc::store;

#[derive(Parser)]
#[command(name = "apidoc-cli")]
#[command(about = "Inspect and re-render recorded API documentation", long_about = None)]
struct Cli {
    /// Documentation HTML path; calls are read from `<doc>.json`.
    #[arg(short, long, default_value = "apidoc.html")]
    doc: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Re-render the HTML page from the recorded JSON spec
    Render {
        /// Page title
        #[arg(short, long, default_value = "API Documentation")]
        title: String,

        /// Base URL shown on the page, as `label=url` (repeatable)
        #[arg(short, long = "base-url", value_parser = parse_base_url)]
        base_urls: Vec<(String, String)>,

        /// Take title and base URLs from a server config file instead
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// List documented endpoints and their example counts
    Summary,
}

fn parse_base_url(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(label, url)| (label.to_string(), url.to_string()))
        .ok_or_else(|| format!("expected label=url, got `{raw}`"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let json_path = store::json_path(&cli.doc)?;
    let spec = store::load_spec(&json_path)?;

    match cli.command {
        Commands::Render {
            title,
            base_urls,
            config,
        } => {
            let (title, base_urls) = match config {
                Some(path) => {
                    let config = load_config(&path)?;
                    (config.doc.doc_title, config.doc.base_urls)
                }
                None => (title, base_urls.into_iter().collect::<BTreeMap<_, _>>()),
            };
            let html_path = store::absolute(&cli.doc)?;
            let view = DocView {
                title: &title,
                base_urls: &base_urls,
                apis: &spec.api_specs,
            };
            write_page(&view, &html_path)?;
            println!(
                "Rendered {} endpoints ({} calls) to {}",
                spec.api_specs.len(),
                spec.call_count(),
                html_path.display()
            );
        }
        Commands::Summary => {
            if spec.is_empty() {
                println!("No calls recorded in {}", json_path.display());
            }
            for api in &spec.api_specs {
                let codes = api
                    .calls
                    .iter()
                    .map(|c| c.response_code.to_string())
                    .collect::<Vec<_>>()
                    .join(",");
                println!(
                    "{:<7} {:<40} {:>3} calls  [{}]",
                    api.http_verb,
                    api.path,
                    api.calls.len(),
                    codes
                );
            }
        }
    }

    Ok(())
}
