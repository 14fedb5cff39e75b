use crate::models::{Movie, OpinionCounts};

const MUST_WATCH_WEIGHT: u32 = 3;
const ALREADY_SEEN_WEIGHT: u32 = 1;

/// Source of uniform random numbers in `[0, 1)` for the draw
///
/// Any `FnMut() -> f64` closure is a source, which lets tests feed fixed
/// sequences or a seeded generator.
#[cfg_attr(test, mockall::automock)]
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

impl<F> RandomSource for F
where
    F: FnMut() -> f64,
{
    fn next_unit(&mut self) -> f64 {
        self()
    }
}

/// Production source backed by the thread-local generator
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_unit(&mut self) -> f64 {
        rand::random::<f64>()
    }
}

/// Selection weight of a movie; pass votes add nothing
pub fn weight(counts: &OpinionCounts) -> u32 {
    counts.must_watch * MUST_WATCH_WEIGHT + counts.already_seen * ALREADY_SEEN_WEIGHT
}

/// Picks one movie by roulette-wheel selection over opinion weights
///
/// Returns `None` only for an empty list. When no movie carries any weight
/// the pick is uniform over the whole list instead.
pub fn select_winner<'a, R>(eligible: &[&'a Movie], rng: &mut R) -> Option<&'a Movie>
where
    R: RandomSource + ?Sized,
{
    if eligible.is_empty() {
        return None;
    }

    let weighted: Vec<(&'a Movie, u32)> = eligible
        .iter()
        .map(|movie| (*movie, weight(&movie.opinion_counts)))
        .filter(|(_, weight)| *weight > 0)
        .collect();

    if weighted.is_empty() {
        let index = ((unit(rng) * eligible.len() as f64) as usize).min(eligible.len() - 1);
        tracing::debug!(
            candidates = eligible.len(),
            index,
            "No weighted candidates, picking uniformly"
        );
        return Some(eligible[index]);
    }

    let total_weight: f64 = weighted.iter().map(|(_, w)| f64::from(*w)).sum();
    let draw = unit(rng) * total_weight;

    let mut cumulative = 0.0;
    for (movie, weight) in &weighted {
        cumulative += f64::from(*weight);
        if cumulative > draw {
            tracing::debug!(
                movie_id = %movie.id,
                weight,
                total_weight,
                draw,
                "Winner drawn"
            );
            return Some(*movie);
        }
    }

    // Rounding left the draw past the last boundary.
    weighted.last().map(|(movie, _)| *movie)
}

/// Next draw from the source, forced into `[0, 1)`
fn unit<R: RandomSource + ?Sized>(rng: &mut R) -> f64 {
    let value = rng.next_unit();
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
