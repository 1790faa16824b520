use std::collections::HashSet;

use log::{debug, info, warn};
use trackrec::clients::Catalog;
use trackrec::clients::SpotifyClient;
use trackrec::clients::{
    entities::Track,
    errors::{Error, Result},
};

use crate::console;

// Configuration for the Recommender struct
pub struct Config<C> {
    pub catalog: C,
    pub search_limit: u32,
    pub recommendation_limit: usize,
    pub candidate_limit: u32,
}

pub struct ConfigBuilder {
    catalog: Option<SpotifyClient>,
    search_limit: Option<u32>,
    recommendation_limit: Option<usize>,
    candidate_limit: Option<u32>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            catalog: None,
            search_limit: None,          // Search results shown to the user. Default is 5.
            recommendation_limit: None,  // Tracks per recommendation round. Default is 10.
            candidate_limit: None, // Candidates requested per source, oversized so dedup still fills a round. Default is 50.
        }
    }

    pub fn build(self) -> Result<Config<SpotifyClient>> {
        let catalog = match self.catalog {
            Some(c) => c,
            None => SpotifyClient::try_default()?,
        };
        Ok(Config {
            catalog,
            search_limit: self.search_limit.unwrap_or(5),
            recommendation_limit: self.recommendation_limit.unwrap_or(10),
            candidate_limit: self.candidate_limit.unwrap_or(50),
        })
    }
}

// Merge candidate lists into the final recommendation set: sources are
// concatenated in the order given (primary first), deduplicated by track id,
// the seed itself and anything in `exclude` is dropped, and the result is
// truncated to `limit`.
pub fn merge_candidates(
    sources: &[Vec<Track>],
    seed_id: &str,
    exclude: &HashSet<String>,
    limit: usize,
) -> Vec<Track> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut merged = Vec::with_capacity(limit);

    for track in sources.iter().flatten() {
        if merged.len() >= limit {
            break;
        }
        if track.id == seed_id || exclude.contains(&track.id) {
            continue;
        }
        if seen.insert(track.id.as_str()) {
            merged.push(track.clone());
        }
    }
    merged
}

// The main Recommender struct that drives the interactive session
pub struct Recommender<C> {
    config: Config<C>,
}

impl<C: Catalog> Recommender<C> {
    pub fn new(config: Config<C>) -> Self {
        Recommender { config }
    }

    /// Interactive session: prompt, search, pick, recommend, repeat.
    pub async fn run(&self) -> Result<()> {
        console::print_welcome();

        loop {
            let query = console::prompt_query()?;

            let tracks = self
                .config
                .catalog
                .search_tracks(&query, self.config.search_limit)
                .await?;
            debug!("Search returned {} tracks", tracks.len());

            if tracks.is_empty() {
                println!("No tracks found for {query:?}. Try a different search.");
                continue;
            }

            console::print_search_results(&tracks);
            let seed = match console::prompt_selection(tracks.len())? {
                console::Selection::SearchAgain => continue,
                console::Selection::Pick(index) => &tracks[index],
            };
            console::print_selected(seed);

            // Ids shown so far, so a follow-up round never repeats a track
            let mut shown: HashSet<String> = HashSet::new();

            loop {
                println!("\nFinding similar tracks ...");
                match self.recommend(seed, &shown).await {
                    Ok(recommendations) => {
                        console::print_recommendations(&recommendations);
                        shown.extend(recommendations.iter().map(|t| t.id.clone()));
                        if !console::confirm("Would you like 10 more recommendations?")? {
                            break;
                        }
                    }
                    Err(Error::RecommendationsUnavailable) => {
                        println!("Sorry, couldn't find recommendations for this track.");
                        break;
                    }
                    Err(err) => return Err(err),
                }
            }

            if !console::confirm("Would you like another recommendation?")? {
                println!("\nThanks for using trackrec!");
                return Ok(());
            }
        }
    }

    /// Fetch up to `recommendation_limit` tracks similar to `seed`, skipping
    /// everything in `exclude`.
    ///
    /// Sources are tried in order until the round is full: recommendations
    /// seeded by the track, then by its primary artist, then the artist's
    /// top tracks. An unavailable source contributes nothing; the round
    /// fails only when every source came up empty.
    pub async fn recommend(&self, seed: &Track, exclude: &HashSet<String>) -> Result<Vec<Track>> {
        let limit = self.config.recommendation_limit;
        let mut sources: Vec<Vec<Track>> = Vec::new();

        let primary = absorb_unavailable(
            "track seed",
            self.config
                .catalog
                .similar_to_track(&seed.id, self.config.candidate_limit)
                .await,
        )?;
        sources.push(primary);

        let mut picked = merge_candidates(&sources, &seed.id, exclude, limit);
        if picked.len() < limit
            && let Some(artist_id) = seed.primary_artist_id()
        {
            info!("Track seed yielded {} of {limit} tracks, trying artist seed", picked.len());
            let fallback = absorb_unavailable(
                "artist seed",
                self.config
                    .catalog
                    .similar_to_artist(artist_id, self.config.candidate_limit)
                    .await,
            )?;
            sources.push(fallback);
            picked = merge_candidates(&sources, &seed.id, exclude, limit);

            if picked.len() < limit {
                info!("Artist seed yielded {} of {limit} tracks, trying top tracks", picked.len());
                let top = absorb_unavailable(
                    "artist top tracks",
                    self.config.catalog.artist_top_tracks(artist_id).await,
                )?;
                sources.push(top);
                picked = merge_candidates(&sources, &seed.id, exclude, limit);
            }
        }

        if picked.is_empty() {
            return Err(Error::RecommendationsUnavailable);
        }
        Ok(picked)
    }
}

// A permanent API error on a single source makes that source contribute
// nothing; auth failures and exhausted retries abort the whole round.
fn absorb_unavailable(label: &str, result: Result<Vec<Track>>) -> Result<Vec<Track>> {
    match result {
        Ok(tracks) => Ok(tracks),
        Err(Error::Spotify(err)) => {
            warn!("Recommendation source {label} unavailable: {err}");
            Ok(Vec::new())
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use trackrec::clients::entities::Artist;

    fn track(id: &str, name: &str, artist: &str) -> Track {
        Track {
            id: id.to_string(),
            name: name.to_string(),
            artists: vec![Artist {
                id: Some(format!("artist-{artist}")),
                name: artist.to_string(),
            }],
            album: None,
            url: format!("https://open.spotify.com/track/{id}"),
        }
    }

    fn tracks(prefix: &str, count: usize) -> Vec<Track> {
        (0..count)
            .map(|i| track(&format!("{prefix}{i}"), &format!("Song {prefix}{i}"), "Someone"))
            .collect()
    }

    fn permanent_failure() -> Error {
        // A constructible stand-in for a permanent API failure
        let err = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        Error::Spotify(rspotify::ClientError::Io(err))
    }

    #[derive(Default)]
    struct FakeCatalog {
        search_results: Vec<Track>,
        by_track: Option<Result<Vec<Track>>>,
        by_artist: Option<Result<Vec<Track>>>,
        top_tracks: Option<Result<Vec<Track>>>,
        by_track_calls: Cell<u32>,
        by_artist_calls: Cell<u32>,
        top_track_calls: Cell<u32>,
    }

    fn take(slot: &Option<Result<Vec<Track>>>) -> Result<Vec<Track>> {
        match slot {
            Some(Ok(tracks)) => Ok(tracks.clone()),
            Some(Err(_)) => Err(permanent_failure()),
            None => Ok(Vec::new()),
        }
    }

    impl Catalog for FakeCatalog {
        async fn search_tracks(&self, _query: &str, limit: u32) -> Result<Vec<Track>> {
            Ok(self
                .search_results
                .iter()
                .take(limit as usize)
                .cloned()
                .collect())
        }

        async fn similar_to_track(&self, _track_id: &str, _limit: u32) -> Result<Vec<Track>> {
            self.by_track_calls.set(self.by_track_calls.get() + 1);
            take(&self.by_track)
        }

        async fn similar_to_artist(&self, _artist_id: &str, _limit: u32) -> Result<Vec<Track>> {
            self.by_artist_calls.set(self.by_artist_calls.get() + 1);
            take(&self.by_artist)
        }

        async fn artist_top_tracks(&self, _artist_id: &str) -> Result<Vec<Track>> {
            self.top_track_calls.set(self.top_track_calls.get() + 1);
            take(&self.top_tracks)
        }
    }

    fn recommender(catalog: FakeCatalog) -> Recommender<FakeCatalog> {
        Recommender::new(Config {
            catalog,
            search_limit: 5,
            recommendation_limit: 10,
            candidate_limit: 50,
        })
    }

    fn ids(tracks: &[Track]) -> Vec<&str> {
        tracks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn merge_dedupes_by_id_and_keeps_primary_order() {
        let primary = vec![track("a", "A", "x"), track("b", "B", "x")];
        let fallback = vec![track("b", "B", "x"), track("c", "C", "y")];

        let merged = merge_candidates(&[primary, fallback], "seed", &HashSet::new(), 10);
        assert_eq!(ids(&merged), vec!["a", "b", "c"]);
    }

    #[test]
    fn merge_drops_seed_and_excluded_ids() {
        let primary = vec![track("seed", "Seed", "x"), track("a", "A", "x"), track("b", "B", "y")];
        let exclude: HashSet<String> = ["a".to_string()].into();

        let merged = merge_candidates(&[primary], "seed", &exclude, 10);
        assert_eq!(ids(&merged), vec!["b"]);
    }

    #[test]
    fn merge_truncates_to_limit() {
        let merged = merge_candidates(&[tracks("t", 25)], "seed", &HashSet::new(), 10);
        assert_eq!(merged.len(), 10);
    }

    #[tokio::test]
    async fn sufficient_primary_skips_fallback() {
        let catalog = FakeCatalog {
            by_track: Some(Ok(tracks("p", 15))),
            ..Default::default()
        };
        let rec = recommender(catalog);

        let seed = track("seed", "Seed", "Queen");
        let result = rec.recommend(&seed, &HashSet::new()).await.unwrap();

        assert_eq!(result.len(), 10);
        assert_eq!(rec.config.catalog.by_track_calls.get(), 1);
        assert_eq!(rec.config.catalog.by_artist_calls.get(), 0);
        assert_eq!(rec.config.catalog.top_track_calls.get(), 0);
    }

    #[tokio::test]
    async fn short_primary_is_padded_from_artist_seed() {
        // Fallback overlaps the primary results; the merged round must still
        // be exactly 10 distinct ids with the primary tracks first.
        let primary = tracks("p", 4);
        let mut fallback = tracks("p", 2);
        fallback.extend(tracks("f", 12));

        let catalog = FakeCatalog {
            by_track: Some(Ok(primary)),
            by_artist: Some(Ok(fallback)),
            ..Default::default()
        };
        let rec = recommender(catalog);

        let seed = track("seed", "Seed", "Queen");
        let result = rec.recommend(&seed, &HashSet::new()).await.unwrap();

        assert_eq!(result.len(), 10);
        let result_ids = ids(&result);
        assert_eq!(&result_ids[..4], &["p0", "p1", "p2", "p3"]);
        let distinct: HashSet<&str> = result_ids.iter().copied().collect();
        assert_eq!(distinct.len(), 10);
    }

    #[tokio::test]
    async fn failed_primary_source_falls_back() {
        let catalog = FakeCatalog {
            by_track: Some(Err(permanent_failure())),
            by_artist: Some(Ok(tracks("f", 12))),
            ..Default::default()
        };
        let rec = recommender(catalog);

        let seed = track("seed", "Seed", "Queen");
        let result = rec.recommend(&seed, &HashSet::new()).await.unwrap();

        assert_eq!(result.len(), 10);
        assert_eq!(rec.config.catalog.by_artist_calls.get(), 1);
    }

    #[tokio::test]
    async fn top_tracks_pad_when_both_seeds_run_dry() {
        let catalog = FakeCatalog {
            by_track: Some(Ok(tracks("p", 3))),
            by_artist: Some(Ok(Vec::new())),
            top_tracks: Some(Ok(tracks("top", 10))),
            ..Default::default()
        };
        let rec = recommender(catalog);

        let seed = track("seed", "Seed", "Queen");
        let result = rec.recommend(&seed, &HashSet::new()).await.unwrap();

        assert_eq!(result.len(), 10);
        assert_eq!(&ids(&result)[..3], &["p0", "p1", "p2"]);
        assert_eq!(rec.config.catalog.top_track_calls.get(), 1);
    }

    #[tokio::test]
    async fn all_sources_empty_is_unavailable() {
        let rec = recommender(FakeCatalog::default());

        let seed = track("seed", "Seed", "Queen");
        let result = rec.recommend(&seed, &HashSet::new()).await;

        assert!(matches!(result, Err(Error::RecommendationsUnavailable)));
    }

    #[tokio::test]
    async fn shown_tracks_are_excluded_from_the_next_round() {
        let catalog = FakeCatalog {
            by_track: Some(Ok(tracks("p", 30))),
            ..Default::default()
        };
        let rec = recommender(catalog);
        let seed = track("seed", "Seed", "Queen");

        let first = rec.recommend(&seed, &HashSet::new()).await.unwrap();
        let shown: HashSet<String> = first.iter().map(|t| t.id.clone()).collect();
        let second = rec.recommend(&seed, &shown).await.unwrap();

        assert_eq!(second.len(), 10);
        assert!(second.iter().all(|t| !shown.contains(&t.id)));
    }

    #[tokio::test]
    async fn search_select_recommend_end_to_end() {
        let mut results = vec![track("bohemian", "Bohemian Rhapsody", "Queen")];
        results.extend(tracks("other", 3));
        let catalog = FakeCatalog {
            search_results: results,
            by_track: Some(Ok(tracks("rec", 20))),
            ..Default::default()
        };
        let rec = recommender(catalog);

        let found = rec
            .config
            .catalog
            .search_tracks("bohemian rhapsody", 5)
            .await
            .unwrap();
        assert!(!found.is_empty());
        let seed = found
            .iter()
            .find(|t| t.name == "Bohemian Rhapsody" && t.artist_names() == "Queen")
            .unwrap();

        let recommendations = rec.recommend(seed, &HashSet::new()).await.unwrap();
        assert_eq!(recommendations.len(), 10);
        let distinct: HashSet<&str> = recommendations.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(distinct.len(), 10);
        assert!(
            recommendations
                .iter()
                .all(|t| t.url.starts_with("https://open.spotify.com/track/"))
        );
    }
}
