//! Spotify Web API integration
//!
//! Resolves a candidate to a Spotify track: either directly by track ID, or
//! through a `track:` / `artist:` search. Only the track object is used; the
//! audio-features and audio-analysis endpoints are deprecated and not called.
//!
//! API docs: https://developer.spotify.com/documentation/web-api

pub mod dto;
mod adapter;
mod client;

pub use adapter::to_lookup;
pub use client::{DEFAULT_BASE_URL, SpotifyClient};
