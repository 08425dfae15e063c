use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use coverwall::itunes::{fetch_album_cover, DEFAULT_ARTWORK_SIZE};
use coverwall::page::MemoryPage;
use coverwall::{App, ITunes, PageConfig, PageEvent, Picsum, Refresher, Result};
use log::{error, info, trace};
use reqwest::Client;
use tokio::io::{AsyncBufReadExt, BufReader};

mod render;

use render::{build_page, describe, render, TerminalNotifier};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Page config (JSON), defaults are used for anything missing
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// The random image endpoint (example: https://picsum.photos)
    #[arg(long)]
    image_endpoint: Option<String>,

    /// The album catalog endpoint (example: https://itunes.apple.com)
    #[arg(long)]
    catalog_endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load the page once and print it
    Refresh,

    /// Load the page, then read control ids from stdin as clicks
    Interactive,

    /// Print the artwork url of a random album from the pool
    Cover {
        #[arg(short, long, default_value_t = DEFAULT_ARTWORK_SIZE)]
        size: u32,
    },
}

fn read_config(args: &Args) -> Result<PageConfig> {
    let mut config = match &args.config {
        Some(path) => PageConfig::load(path)?,
        None => PageConfig::default(),
    };

    if let Some(endpoint) = &args.image_endpoint {
        config.image_endpoint = endpoint.clone();
    }

    if let Some(endpoint) = &args.catalog_endpoint {
        config.catalog_endpoint = endpoint.clone();
    }

    Ok(config)
}

struct Host {
    client: Client,
    page: Arc<MemoryPage>,
    app: App,
    config: PageConfig,
}

impl Host {
    fn new(config: PageConfig) -> Self {
        let client = Client::new();
        let page = Arc::new(build_page(&config.targets));

        let images = Picsum::with_client(config.image_endpoint.clone(), client.clone());
        let albums = ITunes::with_client(config.catalog_endpoint.clone(), client.clone());

        let refresher =
            Refresher::new(page.clone(), Arc::new(images), Arc::new(albums), &config);
        let app = App::new(refresher, page.clone(), Arc::new(TerminalNotifier));

        Self {
            client,
            page,
            app,
            config,
        }
    }

    async fn dispatch(&mut self, event: PageEvent) {
        if self.app.handle(event).await.is_some() {
            render(&self.client, &self.page, &self.config.targets).await;
            print!("{}", describe(&self.page, &self.config.targets));
        }
    }

    async fn interact(&mut self) {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            print!("> ");
            let _ = std::io::stdout().flush();

            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    error!("Failed to read stdin: {}", e);
                    break;
                }
            };

            let control = line.trim();
            if control.is_empty() {
                continue;
            }

            if control == "quit" {
                break;
            }

            trace!("Click: {}", control);
            self.dispatch(PageEvent::Click(control.to_string())).await;
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let config = read_config(&args)?;
    trace!("Config: {:#?}", config);

    match args.command {
        Commands::Refresh => {
            let mut host = Host::new(config);
            host.dispatch(PageEvent::Ready).await;
        }

        Commands::Interactive => {
            let mut host = Host::new(config);
            host.dispatch(PageEvent::Ready).await;
            host.interact().await;
        }

        Commands::Cover { size } => {
            let itunes = ITunes::new(config.catalog_endpoint.clone());
            let url = fetch_album_cover(&itunes, &config.pool, size).await?;
            println!("{}", url);
        }
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();

    let args = Args::parse();
    info!("Command: {:?}", args.command);

    if let Err(e) = run(args).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let args = Args::parse_from([
            "sewaddle",
            "--image-endpoint",
            "http://localhost:9000",
            "refresh",
        ]);

        let config = read_config(&args).unwrap();
        assert_eq!(config.image_endpoint, "http://localhost:9000");
        assert_eq!(config.catalog_endpoint, "https://itunes.apple.com");
    }

    #[test]
    fn cover_size_defaults_to_600() {
        let args = Args::parse_from(["sewaddle", "cover"]);
        assert!(matches!(args.command, Commands::Cover { size: 600 }));
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let args = Args::parse_from([
            "sewaddle",
            "--config",
            "/definitely/not/here/page.json",
            "refresh",
        ]);

        assert!(read_config(&args).is_err());
    }
}
