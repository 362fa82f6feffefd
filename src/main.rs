use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};

mod app;
mod config;
mod direction;
mod feedback;
mod handler;
mod input;
mod logging;
mod platform;
mod service;
mod tui;
mod ui;

use app::App;
use config::Config;
use direction::Direction;
use platform::{DirectorySaver, SystemClipboard};
use service::HttpConversionClient;

#[derive(Parser)]
#[command(name = "toonconv", version)]
#[command(about = "Convert between JSON and TOON using a conversion service")]
struct Cli {
    /// Conversion service endpoint (overrides env and config)
    #[arg(long, global = true)]
    endpoint: Option<String>,
    /// Remember the effective endpoint in the config file
    #[arg(long)]
    save_endpoint: bool,
    /// Initial conversion direction
    #[arg(short, long, value_enum, global = true, default_value_t = DirectionArg::JsonToToon)]
    direction: DirectionArg,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert once without the interactive UI
    Convert {
        /// Read input from this file instead of stdin
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Write output to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DirectionArg {
    JsonToToon,
    ToonToJson,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::JsonToToon => Direction::JsonToStructuredText,
            DirectionArg::ToonToJson => Direction::StructuredTextToJson,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging isn't up yet, so a broken config file is reported on stderr
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("warning: ignoring unreadable config file: {:#}", e);
            Config::new()
        }
    };
    let endpoint = config.resolve_endpoint(cli.endpoint.as_deref());
    if cli.save_endpoint {
        Config::save_endpoint(&endpoint)?;
    }

    let download_dir = config
        .download_dir
        .clone()
        .unwrap_or_else(DirectorySaver::default_dir);

    let app = App::new(
        Arc::new(HttpConversionClient::new(&endpoint)),
        Box::new(SystemClipboard),
        Box::new(DirectorySaver::new(download_dir)),
    )
    .with_direction(cli.direction.into());

    match cli.command {
        Some(Commands::Convert { input, output }) => {
            logging::init_stderr(config.log_level.as_deref());
            tracing::debug!(%endpoint, "one-shot conversion");
            convert_once(app, input, output).await
        }
        None => {
            let log_path = Config::config_dir()?.join("toon-converter.log");
            logging::init_file(&log_path, config.log_level.as_deref())?;
            tracing::info!(%endpoint, "starting interactive session");
            run_tui(app).await
        }
    }
}

async fn convert_once(mut app: App, input: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let text = match input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    app.input_mut().set(&text);
    app.submit().await;

    if let Some(error) = app.feedback().error() {
        bail!("{}", error);
    }

    match output {
        Some(path) => std::fs::write(path, app.output())?,
        None => print!("{}", app.output()),
    }
    if let Some(stats) = app.feedback().stats() {
        eprintln!("{}", stats);
    }

    Ok(())
}

async fn run_tui(mut app: App) -> Result<()> {
    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    result
}

async fn run_loop(terminal: &mut tui::Tui, app: &mut App, events: &mut tui::EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event).await?,
            None => break,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{Clipboard, FileSaver};
    use crate::service::{ConversionError, ConversionRequest, ConversionService, ConvertedBody, ServiceReply};
    use async_trait::async_trait;

    struct FixedService(ServiceReply);

    #[async_trait]
    impl ConversionService for FixedService {
        async fn convert(&self, _request: &ConversionRequest) -> Result<ServiceReply, ConversionError> {
            Ok(self.0.clone())
        }
    }

    struct NoClipboard;

    impl Clipboard for NoClipboard {
        fn write_text(&self, _text: &str) -> Result<()> {
            Ok(())
        }
    }

    struct NoSaver;

    impl FileSaver for NoSaver {
        fn save(&self, _bytes: &[u8], file_name: &str) -> Result<PathBuf> {
            Ok(PathBuf::from(file_name))
        }
    }

    fn app_replying(reply: ServiceReply) -> App {
        App::new(Arc::new(FixedService(reply)), Box::new(NoClipboard), Box::new(NoSaver))
    }

    #[tokio::test]
    async fn test_convert_once_returns_service_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.json");
        let output = dir.path().join("output.toon");
        std::fs::write(&input, "{oops").unwrap();
        let app = app_replying(ServiceReply::Rejected { error: Some("bad input".to_string()) });

        let err = convert_once(app, Some(input), Some(output.clone())).await.unwrap_err();

        assert_eq!(err.to_string(), "bad input");
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_convert_once_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.json");
        let output = dir.path().join("output.toon");
        std::fs::write(&input, "{\"a\":1}").unwrap();
        let app = app_replying(ServiceReply::Converted(ConvertedBody {
            output: Some("a: 1".to_string()),
            ..ConvertedBody::default()
        }));

        convert_once(app, Some(input), Some(output.clone())).await.unwrap();

        assert_eq!(std::fs::read_to_string(output).unwrap(), "a: 1");
    }
}
