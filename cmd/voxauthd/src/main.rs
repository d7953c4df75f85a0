//! voxauthd - Voice authentication HTTP server.

mod server;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use voxauth_asr::{CloudTranscriber, LocalTranscriber, TranscriptPolicy};
use voxauth_engine::Engine;
use voxauth_kv::RedbStore;
use voxauth_voiceprint::RemoteEncoder;

/// Voice authentication server: enrollment and verification over HTTP.
#[derive(Parser, Debug)]
#[command(name = "voxauthd")]
#[command(about = "Voice authentication server")]
struct Args {
    /// Listen address
    #[arg(long, default_value = "0.0.0.0:8000")]
    listen: String,

    /// Path to the enrollment database
    #[arg(long, default_value = "voxauth.redb")]
    db: PathBuf,

    /// Speaker-embedding sidecar endpoint
    #[arg(long, default_value = "http://127.0.0.1:9000/embed")]
    encoder_url: String,

    /// Embedding dimensionality the sidecar produces
    #[arg(long, default_value_t = 192)]
    encoder_dim: usize,

    /// Cloud speech-to-text endpoint (optional)
    #[arg(long)]
    cloud_stt_url: Option<String>,

    /// Cloud speech-to-text API key
    #[arg(long, env = "VOXAUTH_STT_KEY")]
    cloud_stt_key: Option<String>,

    /// Local ASR sidecar endpoint (optional)
    #[arg(long)]
    local_stt_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    let store = Arc::new(RedbStore::open(&args.db)?);
    let encoder = Arc::new(RemoteEncoder::new(&args.encoder_url, args.encoder_dim));

    let mut transcripts = TranscriptPolicy::new();
    if let Some(url) = &args.cloud_stt_url {
        let mut cloud = CloudTranscriber::new(url);
        if let Some(key) = &args.cloud_stt_key {
            cloud = cloud.with_api_key(key);
        }
        transcripts = transcripts.with_cloud(Arc::new(cloud));
    }
    if let Some(url) = &args.local_stt_url {
        transcripts = transcripts.with_local(Arc::new(LocalTranscriber::new(url)));
    }

    let engine = Arc::new(Engine::new(store, encoder, transcripts));
    info!(listen = %args.listen, db = %args.db.display(), "starting voxauthd");

    server::serve(&args.listen, engine).await
}
