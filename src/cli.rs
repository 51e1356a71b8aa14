//! Command line interface and the non-interactive subcommands.

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::catalog::{Catalog, InsertOutcome, Track, TrackId};
use crate::config::Settings;
use crate::search::{SearchRequest, SearchTask};

#[derive(Debug, Parser)]
#[command(name = "musictube", version, about = "Browse and search a music catalog")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Open the terminal browser (default).
    Browse,
    /// Print tracks, optionally only one genre.
    List {
        #[arg(short, long)]
        genre: Option<String>,
    },
    /// Print genres with their track counts.
    Genres,
    /// Search and file the results under a genre.
    Search {
        query: String,
        /// Genre to file results under instead of `Search_<query>`.
        #[arg(short, long)]
        genre: Option<String>,
    },
    /// Save a track under the favorite genre (or `--genre`).
    Favorite {
        id: String,
        #[arg(short, long)]
        genre: Option<String>,
    },
    /// Remove a track's saved entries from the catalog file.
    Delete { id: String },
}

impl Args {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Browse)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("no track with id {0}")]
    UnknownTrack(String),
    #[error(transparent)]
    Store(#[from] crate::catalog::StoreError),
    #[error(transparent)]
    Search(#[from] crate::search::SearchError),
}

pub fn format_track(track: &Track) -> String {
    let artist = track.artist.as_deref().unwrap_or("-");
    format!(
        "{}\t{}\t{}\t{}\t{}s\t{}",
        track.id,
        track.title,
        artist,
        track.genre,
        track.duration.as_secs(),
        track.source
    )
}

pub fn list(catalog: &Catalog, genre: Option<&str>) -> Vec<String> {
    let tracks = match genre {
        Some(g) => catalog.genre_tracks(g),
        None => catalog.all_tracks(),
    };
    tracks.iter().map(format_track).collect()
}

pub fn genres(catalog: &Catalog) -> Vec<String> {
    catalog
        .genres()
        .into_iter()
        .map(|g| {
            let n = catalog.genre_len(&g);
            format!("{g}\t{n}")
        })
        .collect()
}

fn lookup(catalog: &Catalog, id: &str) -> Result<Track, CliError> {
    catalog
        .get(&TrackId::from(id))
        .ok_or_else(|| CliError::UnknownTrack(id.to_string()))
}

pub fn favorite(
    catalog: &Catalog,
    settings: &Settings,
    id: &str,
    genre: Option<&str>,
) -> Result<String, CliError> {
    let track = lookup(catalog, id)?;
    let genre = genre.unwrap_or(&settings.catalog.favorite_genre);
    Ok(match catalog.insert(genre, &track)? {
        InsertOutcome::Added(id) => format!("added {:?} to {genre} as {id}", track.title),
        InsertOutcome::Existing(id) => format!("{:?} already in {genre} as {id}", track.title),
    })
}

pub fn delete(catalog: &Catalog, id: &str) -> Result<String, CliError> {
    let track = lookup(catalog, id)?;
    let removed = catalog.delete(&track)?;
    Ok(format!("removed {removed} saved entries for {:?}", track.title))
}

pub fn search(
    runtime: &tokio::runtime::Runtime,
    catalog: &Arc<Catalog>,
    settings: &Settings,
    query: &str,
    genre: Option<&str>,
) -> Result<Vec<String>, CliError> {
    let mut request = SearchRequest::new(query, &settings.search);
    if let Some(g) = genre {
        request = request.with_genre(g);
    }
    let backend = Arc::new(crate::runtime::search_backend(settings));
    let summary = runtime.block_on(async {
        SearchTask::spawn(backend, request, Arc::clone(catalog)).join().await
    })?;
    Ok(list(catalog, Some(&summary.genre)))
}
