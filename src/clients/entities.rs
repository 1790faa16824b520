#[derive(Debug, Clone)]
pub struct Artist {
    pub id: Option<String>, // tracks from local files may carry no artist id
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub artists: Vec<Artist>,
    pub album: Option<String>, // recommendation responses omit album data
    pub url: String,
}

impl Track {
    // Comma-joined artist names for display
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    // Id of the primary (first listed) artist, used as the fallback seed
    pub fn primary_artist_id(&self) -> Option<&str> {
        self.artists.first().and_then(|a| a.id.as_deref())
    }
}
