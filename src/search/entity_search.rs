//! Per-entity search over the catalog.
//!
//! Every search fetches a coarse substring superset from the store, scores
//! each candidate in memory with the configured [`RelevanceScorer`], drops
//! non-matches, sorts by score (stable, so storage order breaks ties) and
//! truncates.

use super::highlight::highlight_matches;
use super::query::{validate, SanitizedQuery};
use super::relevance::{RelevanceScorer, TieredScorer};
use crate::catalog_store::{
    query_blocking, ArtistRow, CatalogStore, NamedCount, NamedEntity, PlaylistRow, SongRow,
};
use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

pub const SONG_NAME_WEIGHT: f64 = 1.0;
pub const SONG_ARTIST_WEIGHT: f64 = 0.8;
pub const SONG_ALBUM_WEIGHT: f64 = 0.6;

/// Candidates fetched per requested result.
const CANDIDATE_FACTOR: usize = 2;

const ARTIST_POPULARITY_PER_SONG: f64 = 0.1;
const ARTIST_POPULARITY_CAP: f64 = 5.0;

const PLAYLIST_SUGGESTIONS: usize = 5;
const ARTIST_SUGGESTIONS: usize = 5;
const GENRE_SUGGESTIONS: usize = 3;
const POPULAR_PER_KIND: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchedField {
    Name,
    Artist,
    Album,
}

/// A search hit: the entity itself plus how well and where it matched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scored<T> {
    #[serde(flatten)]
    pub item: T,
    pub score: f64,
    pub matched_fields: Vec<MatchedField>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub playlists: usize,
    pub songs: usize,
    pub artists: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            playlists: 10,
            songs: 20,
            artists: 10,
        }
    }
}

impl SearchLimits {
    /// The same limit for every entity kind.
    pub fn uniform(limit: usize) -> Self {
        Self {
            playlists: limit,
            songs: limit,
            artists: limit,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResults {
    pub playlists: Vec<Scored<PlaylistRow>>,
    pub songs: Vec<Scored<SongRow>>,
    pub artists: Vec<Scored<ArtistRow>>,
}

impl SearchResults {
    pub fn total(&self) -> usize {
        self.playlists.len() + self.songs.len() + self.artists.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Playlist,
    Artist,
    Genre,
}

impl From<NamedEntity> for SuggestionKind {
    fn from(kind: NamedEntity) -> Self {
        match kind {
            NamedEntity::Playlist => SuggestionKind::Playlist,
            NamedEntity::Artist => SuggestionKind::Artist,
            NamedEntity::Genre => SuggestionKind::Genre,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchSuggestion {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    /// Number of songs behind the suggestion.
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlighted: Option<String>,
}

impl SearchSuggestion {
    fn from_named(kind: NamedEntity, named: NamedCount) -> Self {
        Self {
            text: named.name,
            kind: kind.into(),
            count: named.song_count,
            highlighted: None,
        }
    }
}

/// Keep positive scores, best first, at most `limit`.
fn rank<T>(mut scored: Vec<Scored<T>>, limit: usize) -> Vec<Scored<T>> {
    scored.retain(|s| s.score > 0.0);
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(limit);
    scored
}

fn candidate_count(limit: usize) -> usize {
    limit.saturating_mul(CANDIDATE_FACTOR)
}

/// Search service over a [`CatalogStore`].
#[derive(Clone)]
pub struct CatalogSearch {
    store: Arc<dyn CatalogStore>,
    scorer: Arc<dyn RelevanceScorer>,
}

impl CatalogSearch {
    pub fn new(store: Arc<dyn CatalogStore>, scorer: Arc<dyn RelevanceScorer>) -> Self {
        Self { store, scorer }
    }

    /// A search service using the tiered scorer.
    pub fn with_tiered_scorer(store: Arc<dyn CatalogStore>) -> Self {
        Self::new(store, Arc::new(TieredScorer))
    }

    // =========================================================================
    // Entity searches
    // =========================================================================

    /// Playlists scored on their name. Invalid queries yield no results.
    pub async fn search_playlists(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Scored<PlaylistRow>>> {
        match validate(query) {
            Ok(query) => self.playlists_for(&query, limit).await,
            Err(_) => Ok(Vec::new()),
        }
    }

    /// Songs scored on their name, artist and album.
    pub async fn search_songs(&self, query: &str, limit: usize) -> Result<Vec<Scored<SongRow>>> {
        match validate(query) {
            Ok(query) => self.songs_for(&query, limit).await,
            Err(_) => Ok(Vec::new()),
        }
    }

    /// Artists scored on their name plus a small popularity bonus.
    pub async fn search_artists(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Scored<ArtistRow>>> {
        match validate(query) {
            Ok(query) => self.artists_for(&query, limit).await,
            Err(_) => Ok(Vec::new()),
        }
    }

    /// All three entity searches, run concurrently with independent limits.
    pub async fn search_all(&self, query: &str, limits: SearchLimits) -> Result<SearchResults> {
        let query = match validate(query) {
            Ok(query) => query,
            Err(_) => return Ok(SearchResults::default()),
        };

        let (playlists, songs, artists) = tokio::try_join!(
            self.playlists_for(&query, limits.playlists),
            self.songs_for(&query, limits.songs),
            self.artists_for(&query, limits.artists),
        )?;

        let results = SearchResults {
            playlists,
            songs,
            artists,
        };
        debug!("search_all({:?}) -> {} results", query.as_str(), results.total());
        Ok(results)
    }

    pub(crate) async fn playlists_for(
        &self,
        query: &SanitizedQuery,
        limit: usize,
    ) -> Result<Vec<Scored<PlaylistRow>>> {
        let term = query.as_str().to_string();
        let take = candidate_count(limit);
        let candidates =
            query_blocking(&self.store, move |store| store.find_playlists(&term, take)).await?;

        let scored = candidates
            .into_iter()
            .map(|playlist| {
                let score = self.scorer.score(query.as_str(), &playlist.name, 1.0);
                let matched_fields = if score > 0.0 {
                    vec![MatchedField::Name]
                } else {
                    Vec::new()
                };
                Scored {
                    item: playlist,
                    score,
                    matched_fields,
                }
            })
            .collect();
        Ok(rank(scored, limit))
    }

    pub(crate) async fn songs_for(
        &self,
        query: &SanitizedQuery,
        limit: usize,
    ) -> Result<Vec<Scored<SongRow>>> {
        let term = query.as_str().to_string();
        let take = candidate_count(limit);
        let candidates =
            query_blocking(&self.store, move |store| store.find_songs(&term, take)).await?;

        let term = query.as_str();
        let scored = candidates
            .into_iter()
            .map(|song| {
                let name_score = self.scorer.score(term, &song.name, SONG_NAME_WEIGHT);
                let artist_score = self
                    .scorer
                    .score(term, &song.artist.name, SONG_ARTIST_WEIGHT);
                let album_score = song
                    .album
                    .as_ref()
                    .map(|album| self.scorer.score(term, &album.name, SONG_ALBUM_WEIGHT))
                    .unwrap_or(0.0);

                let matched_fields = [
                    (MatchedField::Name, name_score),
                    (MatchedField::Artist, artist_score),
                    (MatchedField::Album, album_score),
                ]
                .into_iter()
                .filter(|(_, score)| *score > 0.0)
                .map(|(field, _)| field)
                .collect();

                Scored {
                    item: song,
                    score: name_score + artist_score + album_score,
                    matched_fields,
                }
            })
            .collect();
        Ok(rank(scored, limit))
    }

    pub(crate) async fn artists_for(
        &self,
        query: &SanitizedQuery,
        limit: usize,
    ) -> Result<Vec<Scored<ArtistRow>>> {
        let term = query.as_str().to_string();
        let take = candidate_count(limit);
        let candidates =
            query_blocking(&self.store, move |store| store.find_artists(&term, take)).await?;

        let scored = candidates
            .into_iter()
            .map(|artist| {
                let name_score = self.scorer.score(query.as_str(), &artist.name, 1.0);
                let popularity = (artist.song_count as f64 * ARTIST_POPULARITY_PER_SONG)
                    .min(ARTIST_POPULARITY_CAP);
                let matched_fields = if name_score > 0.0 {
                    vec![MatchedField::Name]
                } else {
                    Vec::new()
                };
                Scored {
                    item: artist,
                    score: name_score + popularity,
                    matched_fields,
                }
            })
            .collect();
        Ok(rank(scored, limit))
    }

    // =========================================================================
    // Suggestions
    // =========================================================================

    /// Autocomplete suggestions from playlist, artist and genre names,
    /// ordered by relevance then song count.
    pub async fn suggestions(&self, query: &str, limit: usize) -> Result<Vec<SearchSuggestion>> {
        let query = match validate(query) {
            Ok(query) => query,
            Err(_) => return Ok(Vec::new()),
        };

        let find = |kind: NamedEntity, take: usize| {
            let term = query.as_str().to_string();
            query_blocking(&self.store, move |store| store.find_named(kind, &term, take))
        };
        let (playlists, artists, genres) = tokio::try_join!(
            find(NamedEntity::Playlist, PLAYLIST_SUGGESTIONS),
            find(NamedEntity::Artist, ARTIST_SUGGESTIONS),
            find(NamedEntity::Genre, GENRE_SUGGESTIONS),
        )?;

        let mut scored: Vec<(f64, SearchSuggestion)> = [
            (NamedEntity::Playlist, playlists),
            (NamedEntity::Artist, artists),
            (NamedEntity::Genre, genres),
        ]
        .into_iter()
        .flat_map(|(kind, rows)| {
            rows.into_iter()
                .map(move |row| SearchSuggestion::from_named(kind, row))
        })
        .map(|suggestion| {
            let score = self.scorer.score(query.as_str(), &suggestion.text, 1.0);
            (score, suggestion)
        })
        .collect();

        scored.sort_by(|(a_score, a), (b_score, b)| {
            b_score
                .total_cmp(a_score)
                .then_with(|| b.count.cmp(&a.count))
        });

        Ok(scored
            .into_iter()
            .take(limit)
            .map(|(_, mut suggestion)| {
                suggestion.highlighted =
                    Some(highlight_matches(&suggestion.text, query.as_str()));
                suggestion
            })
            .collect())
    }

    /// The artists and genres with the most songs, merged by song count.
    pub async fn popular_terms(&self, limit: usize) -> Result<Vec<SearchSuggestion>> {
        let top = |kind: NamedEntity| {
            query_blocking(&self.store, move |store| {
                store.top_named(kind, POPULAR_PER_KIND)
            })
        };
        let (artists, genres) =
            tokio::try_join!(top(NamedEntity::Artist), top(NamedEntity::Genre))?;

        let mut terms: Vec<SearchSuggestion> = artists
            .into_iter()
            .map(|row| SearchSuggestion::from_named(NamedEntity::Artist, row))
            .chain(
                genres
                    .into_iter()
                    .map(|row| SearchSuggestion::from_named(NamedEntity::Genre, row)),
            )
            .collect();
        terms.sort_by(|a, b| b.count.cmp(&a.count));
        terms.truncate(limit);
        Ok(terms)
    }
}
