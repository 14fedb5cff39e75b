use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{MemberId, Movie};

/// Summary of a group's watch history
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GroupStats {
    pub movies_watched: usize,
    /// Mean of the per-movie averages, over movies someone rated
    pub average_rating: Option<f64>,
    pub favorite_genre: Option<String>,
    /// Member who confirmed the most watches
    pub top_contributor: Option<MemberId>,
}

/// Key with the highest count; ties go to the smallest key
fn most_frequent<K: Ord>(counts: BTreeMap<K, usize>) -> Option<K> {
    let mut best: Option<(K, usize)> = None;
    for (key, count) in counts {
        let top = best.as_ref().map_or(0, |(_, top)| *top);
        if count > top {
            best = Some((key, count));
        }
    }
    best.map(|(key, _)| key)
}

pub fn group_stats(watched: &[Movie]) -> GroupStats {
    let mut genres: BTreeMap<&str, usize> = BTreeMap::new();
    for genre in watched.iter().flat_map(|movie| movie.details.genres.iter()) {
        *genres.entry(genre.as_str()).or_default() += 1;
    }

    let mut contributors: BTreeMap<&MemberId, usize> = BTreeMap::new();
    for member in watched.iter().filter_map(|movie| movie.watched_by.as_ref()) {
        *contributors.entry(member).or_default() += 1;
    }

    let averages: Vec<f64> = watched.iter().filter_map(Movie::average_rating).collect();
    let average_rating = if averages.is_empty() {
        None
    } else {
        Some(averages.iter().sum::<f64>() / averages.len() as f64)
    };

    GroupStats {
        movies_watched: watched.len(),
        average_rating,
        favorite_genre: most_frequent(genres).map(str::to_string),
        top_contributor: most_frequent(contributors).cloned(),
    }
}
