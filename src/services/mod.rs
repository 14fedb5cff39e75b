pub mod eligibility;
pub mod opinions;
pub mod reel;
pub mod selection;
pub mod spin;
pub mod stats;
