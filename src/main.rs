use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tube_mp3::{
    create_router, spawn_pruner, AppState, Config, ConversionRequest, ConversionResult,
    Converter, Quality, StagingArea, YtDlp, YtDlpConfig,
};

#[derive(Parser)]
#[command(name = "tube-mp3")]
#[command(version, about = "Convert YouTube videos to MP3 from the browser")]
struct Cli {
    /// Config file (extension optional; missing file means defaults)
    #[arg(short, long, default_value = "config/tube-mp3")]
    config: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the web UI and API (default)
    Serve {
        /// Address to bind, overrides service.http.bind
        #[arg(long)]
        bind: Option<String>,

        /// Port to listen on, overrides service.http.port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Convert one URL and print the result as JSON
    Convert {
        url: String,

        /// Bitrate: 128, 192 or 320
        #[arg(short, long)]
        quality: Option<Quality>,
    },
}

fn build_converter(cfg: &Config) -> (Arc<Converter>, Arc<YtDlp>) {
    let ytdlp = Arc::new(YtDlp::new(YtDlpConfig::from(&cfg.converter)));
    let staging = StagingArea::new(cfg.staging.dir_path());
    let converter = Converter::new(ytdlp.clone(), staging, cfg.converter.max_concurrent);
    (Arc::new(converter), ytdlp)
}

async fn serve(cfg: Config, bind: Option<String>, port: Option<u16>) -> Result<()> {
    let (converter, ytdlp) = build_converter(&cfg);

    match ytdlp.version().await {
        Ok(version) => info!("Using yt-dlp {}", version),
        Err(e) => warn!("yt-dlp check failed, conversions will fail until fixed: {}", e),
    }

    info!("Staging directory: {}", converter.staging().root().display());
    if cfg.staging.retention_secs > 0 {
        spawn_pruner(
            converter.staging().clone(),
            Duration::from_secs(cfg.staging.retention_secs),
        );
    }

    let state = AppState::new(converter)
        .with_default_quality(cfg.converter.default_quality)
        .with_assets_dir(&cfg.service.http.assets_dir)
        .with_cors(cfg.service.http.cors);
    let app = create_router(state);

    let addr = format!(
        "{}:{}",
        bind.unwrap_or(cfg.service.http.bind),
        port.unwrap_or(cfg.service.http.port)
    );
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("{} listening on http://{}", cfg.service.name, addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await
        .context("HTTP server failed")?;

    Ok(())
}

async fn convert_once(cfg: Config, url: String, quality: Option<Quality>) -> Result<()> {
    let (converter, _) = build_converter(&cfg);
    let request = ConversionRequest::new(url, quality.unwrap_or(cfg.converter.default_quality));

    let result = converter.convert(&request).await;
    println!("{}", serde_json::to_string_pretty(&result)?);

    match result {
        ConversionResult::Success(_) => Ok(()),
        ConversionResult::Failure(failure) => bail!(failure.user_message),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("tube-mp3 v{}", env!("CARGO_PKG_VERSION"));

    match cli.command.unwrap_or(Command::Serve {
        bind: None,
        port: None,
    }) {
        Command::Serve { bind, port } => serve(cfg, bind, port).await,
        Command::Convert { url, quality } => convert_once(cfg, url, quality).await,
    }
}
