use serde::Serialize;

use crate::models::{EligibilityPolicy, Movie};

/// Fewest eligible movies that make a spin meaningful
pub const MIN_SPIN_CHOICES: usize = 2;

/// Keeps the movies that qualify under `policy`, in their original order
pub fn filter_eligible(pool: &[Movie], policy: EligibilityPolicy) -> Vec<&Movie> {
    pool.iter()
        .filter(|movie| policy.qualifies(&movie.opinion_counts))
        .collect()
}

/// Number of eligible movies under each policy, for the filter tabs
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct PolicyCounts {
    #[serde(rename = "must-watch")]
    pub must_watch: usize,
    #[serde(rename = "all")]
    pub all: usize,
    #[serde(rename = "must-watch-or-seen")]
    pub must_watch_or_seen: usize,
    #[serde(rename = "must-watch-or-pass")]
    pub must_watch_or_pass: usize,
}

impl PolicyCounts {
    pub fn get(&self, policy: EligibilityPolicy) -> usize {
        match policy {
            EligibilityPolicy::MustWatch => self.must_watch,
            EligibilityPolicy::All => self.all,
            EligibilityPolicy::MustWatchOrSeen => self.must_watch_or_seen,
            EligibilityPolicy::MustWatchOrPass => self.must_watch_or_pass,
        }
    }
}

pub fn policy_counts(pool: &[Movie]) -> PolicyCounts {
    let count = |policy: EligibilityPolicy| {
        pool.iter()
            .filter(|movie| policy.qualifies(&movie.opinion_counts))
            .count()
    };

    PolicyCounts {
        must_watch: count(EligibilityPolicy::MustWatch),
        all: count(EligibilityPolicy::All),
        must_watch_or_seen: count(EligibilityPolicy::MustWatchOrSeen),
        must_watch_or_pass: count(EligibilityPolicy::MustWatchOrPass),
    }
}
