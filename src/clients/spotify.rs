use log::debug;

use crate::clients::Catalog;
use crate::clients::retry;
use crate::clients::{
    entities::{Artist, Track},
    errors::{Error, Result},
};
use rspotify::{
    ClientCredsSpotify, Credentials,
    model::{
        ArtistId, Country, FullTrack, Market, RecommendationsAttribute, SearchResult, SearchType,
        SimplifiedArtist, SimplifiedTrack, TrackId,
    },
    prelude::*,
};

// Market for top-tracks lookups; the other endpoints take the account default
const MARKET: Market = Market::Country(Country::UnitedStates);

fn artist_from_simplified(artist: SimplifiedArtist) -> Artist {
    Artist {
        id: artist.id.map(|id| id.id().to_string()),
        name: artist.name,
    }
}

// Tracks without a catalog id (local files) are dropped by the callers
fn track_from_full(track: FullTrack) -> Option<Track> {
    let id = track.id.as_ref().map(|id| id.id().to_string())?;
    Some(Track {
        url: playback_url(&track.external_urls, &id),
        name: track.name,
        artists: track.artists.into_iter().map(artist_from_simplified).collect(),
        album: Some(track.album.name),
        id,
    })
}

// The recommendation endpoint returns slimmer track objects without album data
fn track_from_simplified(track: SimplifiedTrack) -> Option<Track> {
    let id = track.id.as_ref().map(|id| id.id().to_string())?;
    Some(Track {
        url: playback_url(&track.external_urls, &id),
        name: track.name,
        artists: track.artists.into_iter().map(artist_from_simplified).collect(),
        album: None,
        id,
    })
}

fn playback_url(external_urls: &std::collections::HashMap<String, String>, id: &str) -> String {
    external_urls
        .get("spotify")
        .cloned()
        .unwrap_or_else(|| format!("https://open.spotify.com/track/{id}"))
}

pub struct SpotifyClient {
    pub spotify: ClientCredsSpotify,
}

impl SpotifyClient {
    pub fn new(spotify: ClientCredsSpotify) -> Self {
        SpotifyClient { spotify }
    }

    // Create a SpotifyClient from environment variables or raise a configuration error
    pub fn try_default() -> Result<Self> {
        let client_id = std::env::var("SPOTIFY_CLIENT_ID").map_err(|_| missing_credentials())?;
        let client_secret =
            std::env::var("SPOTIFY_CLIENT_SECRET").map_err(|_| missing_credentials())?;

        let creds = Credentials::new(&client_id, &client_secret);
        Ok(Self::new(ClientCredsSpotify::new(creds)))
    }

    // Obtain an access token via the client-credentials flow.
    // The token is held in memory for the process lifetime; auth failures
    // are fatal and never retried.
    pub async fn authorize(&self) -> Result<()> {
        debug!("Requesting Spotify access token ...");
        match retry::call_with_retry("token request", || self.spotify.request_token()).await {
            Ok(()) => {
                debug!("Spotify access token acquired");
                Ok(())
            }
            Err(Error::Spotify(err)) => Err(Error::Authentication(err.to_string())),
            Err(err) => Err(err),
        }
    }
}

fn missing_credentials() -> Error {
    Error::Configuration(
        "Please set the SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET environment variables. \
         Get credentials at: https://developer.spotify.com/dashboard"
            .into(),
    )
}

impl Catalog for SpotifyClient {
    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<Track>> {
        debug!("Searching tracks for {query:?}");
        let result = retry::call_with_retry("track search", || {
            self.spotify
                .search(query, SearchType::Track, None, None, Some(limit), None)
        })
        .await?;

        match result {
            SearchResult::Tracks(page) => {
                Ok(page.items.into_iter().filter_map(track_from_full).collect())
            }
            _ => Err(Error::UnexpectedResponse(
                "track search did not return tracks".into(),
            )),
        }
    }

    async fn similar_to_track(&self, track_id: &str, limit: u32) -> Result<Vec<Track>> {
        let seed = TrackId::from_id(track_id)?;
        debug!("Fetching recommendations seeded by track {track_id}");
        let recs = retry::call_with_retry("track recommendations", || {
            self.spotify.recommendations(
                Vec::<RecommendationsAttribute>::new(),
                None::<Vec<ArtistId>>,
                None::<Vec<&str>>,
                Some([seed.clone()]),
                None,
                Some(limit),
            )
        })
        .await?;

        Ok(recs
            .tracks
            .into_iter()
            .filter_map(track_from_simplified)
            .collect())
    }

    async fn similar_to_artist(&self, artist_id: &str, limit: u32) -> Result<Vec<Track>> {
        let seed = ArtistId::from_id(artist_id)?;
        debug!("Fetching recommendations seeded by artist {artist_id}");
        let recs = retry::call_with_retry("artist recommendations", || {
            self.spotify.recommendations(
                Vec::<RecommendationsAttribute>::new(),
                Some([seed.clone()]),
                None::<Vec<&str>>,
                None::<Vec<TrackId>>,
                None,
                Some(limit),
            )
        })
        .await?;

        Ok(recs
            .tracks
            .into_iter()
            .filter_map(track_from_simplified)
            .collect())
    }

    async fn artist_top_tracks(&self, artist_id: &str) -> Result<Vec<Track>> {
        let artist = ArtistId::from_id(artist_id)?;
        debug!("Fetching top tracks for artist {artist_id}");
        let tracks = retry::call_with_retry("artist top tracks", || {
            self.spotify.artist_top_tracks(artist.clone(), Some(MARKET))
        })
        .await?;

        Ok(tracks.into_iter().filter_map(track_from_full).collect())
    }
}
