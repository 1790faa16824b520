use dialoguer::{Confirm, Input};
use trackrec::clients::entities::Track;
use trackrec::clients::errors::Result;

/// What the user picked from the search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Go back to the search prompt.
    SearchAgain,
    /// Zero-based index into the result list.
    Pick(usize),
}

// Validate a raw track-number answer against a result list of length `len`.
// `1..=len` picks a track, `0` means search again, anything else is rejected.
pub fn parse_selection(raw: &str, len: usize) -> Option<Selection> {
    let choice: usize = raw.trim().parse().ok()?;
    match choice {
        0 => Some(Selection::SearchAgain),
        i if i <= len => Some(Selection::Pick(i - 1)),
        _ => None,
    }
}

// Trim a raw query; empty input is rejected locally, never sent to the API
pub fn normalize_query(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn print_welcome() {
    println!("{}", "=".repeat(60));
    println!("trackrec - music recommendations");
    println!("{}", "=".repeat(60));
    println!("Get similar-track recommendations based on what you're listening to.");
}

// Ask for a search query until the user types something non-empty
pub fn prompt_query() -> Result<String> {
    loop {
        println!("\n{}", "-".repeat(60));
        let raw: String = Input::new()
            .with_prompt("What are you listening to right now? (song name and/or artist)")
            .allow_empty(true)
            .interact_text()?;

        match normalize_query(&raw) {
            Some(query) => return Ok(query),
            None => println!("Please enter a song or artist name."),
        }
    }
}

pub fn print_search_results(tracks: &[Track]) {
    println!("\nSearch Results:");
    for (i, track) in tracks.iter().enumerate() {
        println!("{}. {} by {}", i + 1, track.name, track.artist_names());
    }
}

// Ask for a track number until the answer is valid
pub fn prompt_selection(len: usize) -> Result<Selection> {
    loop {
        let raw: String = Input::new()
            .with_prompt("Select a track number (or 0 to search again)")
            .allow_empty(true)
            .interact_text()?;

        match parse_selection(&raw, len) {
            Some(selection) => return Ok(selection),
            None => println!("Invalid choice. Please enter a number between 0 and {len}."),
        }
    }
}

pub fn print_selected(track: &Track) {
    println!("\nSelected: {} by {}", track.name, track.artist_names());
}

pub fn print_recommendations(tracks: &[Track]) {
    println!("\n{}", "=".repeat(60));
    println!("Recommended tracks for you");
    println!("{}", "=".repeat(60));

    for (i, track) in tracks.iter().enumerate() {
        println!("\n{}. {}", i + 1, track.name);
        println!("   Artist(s): {}", track.artist_names());
        if let Some(album) = &track.album {
            println!("   Album: {album}");
        }
        println!("   Listen: {}", track.url);
    }
}

pub fn confirm(prompt: &str) -> Result<bool> {
    println!("\n{}", "-".repeat(60));
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}
