use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use transcript_api::api::models::LanguagesResponse;
use transcript_api::api::ApiServer;
use transcript_api::cli::{Cli, Commands};
use transcript_api::config::Config;
use transcript_api::output::{format_transcript, total_duration};
use transcript_api::providers::{CaptionProvider, YoutubeCaptionProvider};
use transcript_api::transcript::TranscriptService;
use transcript_api::{extract_video_id, utils, TranscriptApiError};

fn init_tracing(debug: bool, json_logs: bool) {
    let default_filter = if debug {
        "transcript_api=debug,tower_http=debug"
    } else {
        "transcript_api=info,tower_http=info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let registry = tracing_subscriber::registry().with(filter);
    if json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn build_service(config: &Config) -> Result<Arc<TranscriptService>> {
    let provider = YoutubeCaptionProvider::new(&config.upstream)?;
    tracing::debug!("Using caption provider: {}", provider.provider_name());

    Ok(Arc::new(TranscriptService::new(Arc::new(provider))))
}

fn require_video_id(url: &str) -> Result<String> {
    extract_video_id(url).ok_or_else(|| TranscriptApiError::InvalidUrl(url.to_string()).into())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // `config` may be asked to create a file that does not exist yet
    let mut config = match (&cli.command, cli.config.as_deref()) {
        (Commands::Config { show: false }, Some(path)) if !path.exists() => Config::default(),
        (_, path) => Config::load(path)?,
    };

    let debug = match &cli.command {
        Commands::Serve { debug, .. } => *debug || config.server.debug,
        _ => config.server.debug,
    };
    init_tracing(debug || cli.verbose, cli.json_logs);

    match cli.command {
        Commands::Serve { host, port, debug } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.server.debug |= debug;
            config.validate()?;

            let service = build_service(&config)?;
            ApiServer::new(service, Arc::new(config)).start().await?;
        }
        Commands::Fetch { url, language, format } => {
            let video_id = require_video_id(&url)?;
            let language = language.unwrap_or_else(|| config.upstream.default_language.clone());
            let service = build_service(&config)?;

            let segments = service
                .fetch_transcript(&video_id, &language)
                .await
                .map_err(TranscriptApiError::from)?;
            tracing::info!(
                "Fetched {} segments ({})",
                segments.len(),
                utils::format_duration(total_duration(&segments))
            );

            let response = format_transcript(segments, format.into(), &video_id, &language);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Languages { url } => {
            let video_id = require_video_id(&url)?;
            let service = build_service(&config)?;

            let languages = service
                .list_languages(&video_id)
                .await
                .map_err(TranscriptApiError::from)?;

            for language in &languages {
                tracing::info!("  • {}", utils::describe_language(language));
            }

            let response = LanguagesResponse::new(video_id, languages);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::VideoId { url } => {
            println!("{}", require_video_id(&url)?);
        }
        Commands::Config { show } => {
            if show {
                config.display();
            } else {
                let path = config.save(cli.config.as_deref())?;
                println!("Configuration written to: {}", path.display());
            }
        }
    }

    Ok(())
}
