use serde::{Deserialize, Serialize};
use std::fmt::Display;

mod group;
mod movie;
mod opinion;

pub use group::Group;
pub use movie::{Movie, MovieDetails, StoredMovie};
pub use opinion::{EligibilityPolicy, Opinion, OpinionCounts};

/// Stable member identifier supplied by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub String);

impl MemberId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MemberId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for MemberId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
