use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::{MemberId, Opinion, OpinionCounts};

/// Descriptive metadata captured from the metadata provider when a movie is added
///
/// Immutable once the movie exists; carried through untouched by the spin logic.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetails {
    pub title: String,
    #[serde(default)]
    pub tmdb_id: Option<u64>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub rating: Option<f32>,
}

/// A movie suggested to a group, with every opinion field populated
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: Uuid,
    #[serde(flatten)]
    pub details: MovieDetails,
    pub added_by: MemberId,
    pub added_at: DateTime<Utc>,
    pub opinions: BTreeMap<MemberId, Opinion>,
    pub opinion_counts: OpinionCounts,
    pub watched: bool,
    pub watched_at: Option<DateTime<Utc>>,
    /// Member who confirmed the group watched it
    pub watched_by: Option<MemberId>,
    pub ratings: BTreeMap<MemberId, u8>,
}

impl Movie {
    /// Creates a fresh suggestion; the adder implicitly votes must-watch
    pub fn new_suggestion(details: MovieDetails, added_by: MemberId, added_at: DateTime<Utc>) -> Self {
        let mut opinions = BTreeMap::new();
        opinions.insert(added_by.clone(), Opinion::MustWatch);
        let opinion_counts = OpinionCounts::tally(&opinions);

        Self {
            id: Uuid::new_v4(),
            details,
            added_by,
            added_at,
            opinions,
            opinion_counts,
            watched: false,
            watched_at: None,
            watched_by: None,
            ratings: BTreeMap::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.details.title
    }

    /// Mean of the members' ratings, if anyone has rated it
    pub fn average_rating(&self) -> Option<f64> {
        if self.ratings.is_empty() {
            return None;
        }
        let sum: u32 = self.ratings.values().map(|r| u32::from(*r)).sum();
        Some(f64::from(sum) / self.ratings.len() as f64)
    }
}

/// Movie document as it may come back from storage
///
/// Older documents can miss any of the opinion or watch fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMovie {
    pub id: Uuid,
    #[serde(flatten)]
    pub details: MovieDetails,
    pub added_by: MemberId,
    pub added_at: DateTime<Utc>,
    #[serde(default)]
    pub opinions: Option<BTreeMap<MemberId, Opinion>>,
    #[serde(default)]
    pub opinion_counts: Option<OpinionCounts>,
    #[serde(default)]
    pub watched: Option<bool>,
    #[serde(default)]
    pub watched_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub watched_by: Option<MemberId>,
    #[serde(default)]
    pub ratings: Option<BTreeMap<MemberId, u8>>,
}

impl From<StoredMovie> for Movie {
    fn from(stored: StoredMovie) -> Self {
        let opinions = stored.opinions.unwrap_or_default();
        // Stored counts are only a cache; the map is the source of truth.
        let opinion_counts = OpinionCounts::tally(&opinions);
        if let Some(stale) = stored.opinion_counts {
            if stale != opinion_counts {
                tracing::warn!(
                    movie_id = %stored.id,
                    stored = ?stale,
                    tallied = ?opinion_counts,
                    "Stored opinion counts disagreed with opinions, re-tallied"
                );
            }
        }

        Movie {
            id: stored.id,
            details: stored.details,
            added_by: stored.added_by,
            added_at: stored.added_at,
            opinions,
            opinion_counts,
            watched: stored.watched.unwrap_or(false),
            watched_at: stored.watched_at,
            watched_by: stored.watched_by,
            ratings: stored.ratings.unwrap_or_default(),
        }
    }
}
