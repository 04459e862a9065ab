//! Playlist generation command.

use anyhow::Context;
use std::path::Path;
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::config::{self, Config};
use crate::enrichment::{
    CatalogApi, DisabledSearch, FixtureCatalog, SpotifyClient, WebSearchApi, WebSearchClient,
    load_fixture,
};
use crate::error::{Error, Result};
use crate::model::{MILLISECONDS_PER_MINUTE, PlaylistResult, PlaylistStatus};
use crate::pipeline::Pipeline;

/// Tracks listed in text output.
const MAX_LISTED_TRACKS: usize = 10;

pub struct GenerateArgs<'a> {
    pub mode: &'a str,
    pub genre: Option<&'a str>,
    pub duration: Option<u32>,
    pub candidates: &'a Path,
    pub dry_run: bool,
    pub json: bool,
    pub token: Option<&'a str>,
}

/// Build a playlist and print it
pub fn cmd_generate(rt: &Runtime, args: GenerateArgs<'_>) -> anyhow::Result<()> {
    let config = config::load();
    let fixture = FixtureCatalog::new(load_fixture(args.candidates)?);
    let candidates = fixture.candidates();

    let token = args
        .token
        .map(str::to_string)
        .or_else(|| config.spotify_token());
    let (catalog, search) = collaborators(&config, fixture, args.dry_run, token)?;

    let pipeline = Pipeline::with_config(
        catalog.as_ref(),
        search.as_ref(),
        config.pipeline.to_pipeline_config(),
    );

    let playlist = rt
        .block_on(async {
            let cancel = CancellationToken::new();
            let on_interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("Interrupted, returning partial playlist");
                    on_interrupt.cancel();
                }
            });
            pipeline
                .build_playlist(args.mode, args.genre, args.duration, &candidates, &cancel)
                .await
        })
        .map_err(Error::from)?;

    if args.json {
        let json = serde_json::to_string_pretty(&playlist).context("Serializing playlist")?;
        println!("{json}");
    } else {
        print_playlist(&playlist);
    }
    Ok(())
}

type Collaborators = (Box<dyn CatalogApi>, Box<dyn WebSearchApi>);

/// Offline collaborators for a dry run, the live services otherwise.
fn collaborators(
    config: &Config,
    fixture: FixtureCatalog,
    dry_run: bool,
    token: Option<String>,
) -> Result<Collaborators> {
    if dry_run {
        tracing::info!("Dry run: using candidates file data only");
        return Ok((Box::new(fixture), Box::new(DisabledSearch)));
    }

    let token = token.ok_or_else(|| {
        Error::config(format!(
            "Spotify access token required: use --token, set {} or add it to the config file (or use --dry-run)",
            config::SPOTIFY_TOKEN_ENV
        ))
    })?;
    let catalog = SpotifyClient::with_base_url(
        token,
        config.catalog.market.clone(),
        config.catalog.base_url.clone(),
    )?;
    let search = WebSearchClient::new(
        config.search.endpoint.clone(),
        config.pipeline.search_result_limit,
    )?;
    Ok((Box::new(catalog), Box::new(search)))
}

/// "m:ss"
fn format_duration(duration_ms: u64) -> String {
    let minutes = duration_ms / MILLISECONDS_PER_MINUTE;
    let seconds = (duration_ms % MILLISECONDS_PER_MINUTE) / 1000;
    format!("{minutes}:{seconds:02}")
}

fn print_playlist(playlist: &PlaylistResult) {
    let marker = match playlist.status() {
        PlaylistStatus::Complete => "✓",
        PlaylistStatus::Exhausted | PlaylistStatus::Cancelled => "~",
        PlaylistStatus::NoAcceptableCandidates => "✗",
    };
    println!("{} {}", marker, playlist.explanation());
    println!();
    println!("Mode:        {}", playlist.mode());
    println!("Seed genres: {}", playlist.seed_genres().join(", "));

    let summary = playlist.summary();
    println!();
    println!("Verification");
    println!("============");
    println!("Candidates: {}", summary.total_candidates);
    println!("  Evaluated: {}", summary.evaluated);
    println!("  Accepted:  {}", summary.accepted);
    println!("  Rejected:  {}", summary.rejected);
    for (reason, count) in &summary.rejections {
        println!("    {:<22} {}", reason, count);
    }

    if playlist.is_empty() {
        return;
    }

    println!();
    println!("Tracks");
    println!("======");
    for (i, track) in playlist.tracks().iter().take(MAX_LISTED_TRACKS).enumerate() {
        let bpm = track
            .metadata
            .bpm()
            .map(|b| format!("{b:.0} BPM"))
            .unwrap_or_else(|| "? BPM".to_string());
        print!(
            "{:>3}. {} [{} | {}]",
            i + 1,
            track.candidate,
            bpm,
            format_duration(track.duration_ms)
        );
        if let Some(score) = track.distraction_score {
            print!(" distraction {score:.2}");
        }
        println!();
    }
    if playlist.tracks().len() > MAX_LISTED_TRACKS {
        println!("  ... and {} more", playlist.tracks().len() - MAX_LISTED_TRACKS);
    }
}
