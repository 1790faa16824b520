//! Trackrec - Spotify track recommendations for whatever you are listening to
//!
//! This library provides the catalog client, retry policy and data entities
//! used by the interactive `trackrec` binary to search Spotify for a track
//! and fetch similar ones.

/// Client modules for interacting with the external music catalog
pub mod clients;
