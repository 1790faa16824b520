/// Data entities for tracks and artists
pub mod entities;
/// Error types and result aliases
pub mod errors;
/// Retry policy for outbound catalog calls
pub mod retry;
/// Spotify API client
pub mod spotify;

pub use spotify::SpotifyClient;

use entities::Track;
use errors::Result;

/// Catalog operations the recommendation flow depends on.
///
/// `SpotifyClient` is the production implementation; tests substitute a
/// scripted fake. Searches and recommendations return the service's own
/// ordering, which is opaque to this crate.
#[allow(async_fn_in_trait)]
pub trait Catalog {
    /// Free-text track search, up to `limit` candidates in relevance order.
    /// Zero results is a valid outcome, not an error.
    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<Track>>;

    /// Recommendations seeded by a track id.
    async fn similar_to_track(&self, track_id: &str, limit: u32) -> Result<Vec<Track>>;

    /// Recommendations seeded by an artist id (broader fallback seed).
    async fn similar_to_artist(&self, artist_id: &str, limit: u32) -> Result<Vec<Track>>;

    /// The artist's current top tracks (last-resort recommendation source).
    async fn artist_top_tracks(&self, artist_id: &str) -> Result<Vec<Track>>;
}
