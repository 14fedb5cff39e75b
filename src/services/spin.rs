use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{EligibilityPolicy, Movie},
    services::{
        eligibility::{filter_eligible, MIN_SPIN_CHOICES},
        reel::{build_reel, map_to_reel_index, ReelSettings},
        selection::{select_winner, RandomSource},
    },
};

/// Result of one spin, fixed for the rest of the session
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinOutcome {
    pub policy: EligibilityPolicy,
    pub winner: Movie,
    pub eligible: Vec<Uuid>,
    pub reel: Vec<Uuid>,
    pub target_index: usize,
}

/// Runs filter, draw and reel placement over a snapshot of the unwatched pool
///
/// Fails with [`AppError::NotEnoughChoices`] when fewer than two movies
/// qualify under `policy`; nothing is drawn in that case.
pub fn spin<R>(
    pool: &[Movie],
    policy: EligibilityPolicy,
    rng: &mut R,
    settings: &ReelSettings,
) -> AppResult<SpinOutcome>
where
    R: RandomSource + ?Sized,
{
    let eligible = filter_eligible(pool, policy);

    tracing::info!(
        policy = %policy,
        pool = pool.len(),
        eligible = eligible.len(),
        "Spinning reel"
    );

    if eligible.len() < MIN_SPIN_CHOICES {
        return Err(AppError::NotEnoughChoices {
            eligible: eligible.len(),
            required: MIN_SPIN_CHOICES,
        });
    }

    let winner = select_winner(&eligible, rng)
        .ok_or_else(|| AppError::Internal("No winner drawn from eligible movies".to_string()))?;

    // Every eligible movie gets at least one slot.
    let settings = ReelSettings {
        length: settings.length.max(eligible.len()),
        ..*settings
    };
    let reel = build_reel(&eligible, settings.length);
    let target_index = map_to_reel_index(winner.id, &eligible, &settings).ok_or_else(|| {
        AppError::Internal(format!("Winner {} missing from reel", winner.id))
    })?;

    tracing::info!(
        winner_id = %winner.id,
        title = %winner.title(),
        target_index,
        "Spin complete"
    );

    Ok(SpinOutcome {
        policy,
        winner: winner.clone(),
        eligible: eligible.iter().map(|movie| movie.id).collect(),
        reel,
        target_index,
    })
}
