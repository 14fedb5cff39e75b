use uuid::Uuid;

use crate::models::Movie;

/// Shape of the cosmetic reel shown while spinning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReelSettings {
    /// Number of poster slots
    pub length: usize,
    /// Fraction of the reel before the landing zone starts
    pub zone_fraction: f64,
}

impl Default for ReelSettings {
    fn default() -> Self {
        Self {
            length: 60,
            zone_fraction: 0.75,
        }
    }
}

impl ReelSettings {
    /// First slot of the landing zone
    pub fn zone_start(&self) -> usize {
        let fraction = self.zone_fraction.clamp(0.0, 1.0);
        (self.length as f64 * fraction).ceil() as usize
    }
}

/// Lays the eligible movies out cyclically: `reel[i] = eligible[i % len]`
pub fn build_reel(eligible: &[&Movie], length: usize) -> Vec<Uuid> {
    if eligible.is_empty() {
        return Vec::new();
    }
    (0..length).map(|i| eligible[i % eligible.len()].id).collect()
}

/// Slot the reel should stop on so that it shows the winner
///
/// Prefers the first winner slot inside the landing zone. When the reel is
/// too short for that, the last winner slot anywhere is used. `None` means
/// the winner never appears on the reel.
pub fn map_to_reel_index(winner: Uuid, eligible: &[&Movie], settings: &ReelSettings) -> Option<usize> {
    let cycle = eligible.len();
    let offset = eligible.iter().position(|movie| movie.id == winner)?;
    if offset >= settings.length {
        return None;
    }

    let zone_start = settings.zone_start();
    let in_zone = if offset >= zone_start {
        offset
    } else {
        let laps = (zone_start - offset).div_ceil(cycle);
        offset + laps * cycle
    };

    if in_zone < settings.length {
        return Some(in_zone);
    }

    let last = offset + ((settings.length - 1 - offset) / cycle) * cycle;
    tracing::debug!(
        reel_length = settings.length,
        zone_start,
        index = last,
        "Winner has no slot in landing zone, using last occurrence"
    );
    Some(last)
}
