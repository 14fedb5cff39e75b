use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt::Display};

use super::MemberId;

/// A member's stance on a suggested movie
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Opinion {
    MustWatch,
    AlreadySeen,
    Pass,
}

impl Display for Opinion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Opinion::MustWatch => write!(f, "must-watch"),
            Opinion::AlreadySeen => write!(f, "already-seen"),
            Opinion::Pass => write!(f, "pass"),
        }
    }
}

/// Per-movie tally of member opinions
///
/// Always derived from the full opinion map via [`OpinionCounts::tally`];
/// never adjusted on its own.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OpinionCounts {
    pub must_watch: u32,
    pub already_seen: u32,
    pub pass: u32,
}

impl OpinionCounts {
    /// Counts every opinion currently held in the map
    pub fn tally(opinions: &BTreeMap<MemberId, Opinion>) -> Self {
        opinions
            .values()
            .fold(Self::default(), |mut counts, opinion| {
                match opinion {
                    Opinion::MustWatch => counts.must_watch += 1,
                    Opinion::AlreadySeen => counts.already_seen += 1,
                    Opinion::Pass => counts.pass += 1,
                }
                counts
            })
    }

    pub fn total(&self) -> u32 {
        self.must_watch + self.already_seen + self.pass
    }
}

/// Rule deciding which unwatched movies may enter a spin
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum EligibilityPolicy {
    #[default]
    MustWatch,
    All,
    MustWatchOrSeen,
    MustWatchOrPass,
}

impl EligibilityPolicy {
    pub const ALL_POLICIES: [EligibilityPolicy; 4] = [
        EligibilityPolicy::MustWatch,
        EligibilityPolicy::All,
        EligibilityPolicy::MustWatchOrSeen,
        EligibilityPolicy::MustWatchOrPass,
    ];

    /// Whether a movie with these counts qualifies under the policy
    pub fn qualifies(&self, counts: &OpinionCounts) -> bool {
        match self {
            EligibilityPolicy::MustWatch => counts.must_watch > 0,
            EligibilityPolicy::All => true,
            EligibilityPolicy::MustWatchOrSeen => counts.must_watch > 0 || counts.already_seen > 0,
            // Pass votes alone make a movie eligible here.
            EligibilityPolicy::MustWatchOrPass => counts.must_watch > 0 || counts.pass > 0,
        }
    }
}

impl Display for EligibilityPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EligibilityPolicy::MustWatch => write!(f, "must-watch"),
            EligibilityPolicy::All => write!(f, "all"),
            EligibilityPolicy::MustWatchOrSeen => write!(f, "must-watch-or-seen"),
            EligibilityPolicy::MustWatchOrPass => write!(f, "must-watch-or-pass"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: &str) -> MemberId {
        MemberId::from(id)
    }

    #[test]
    fn test_tally_empty_map() {
        let counts = OpinionCounts::tally(&BTreeMap::new());
        assert_eq!(counts, OpinionCounts::default());
        assert_eq!(counts.total(), 0);
    }

    #[test]
    fn test_tally_mixed_opinions() {
        let mut opinions = BTreeMap::new();
        opinions.insert(member("ana"), Opinion::MustWatch);
        opinions.insert(member("ben"), Opinion::MustWatch);
        opinions.insert(member("cam"), Opinion::AlreadySeen);
        opinions.insert(member("dee"), Opinion::Pass);

        let counts = OpinionCounts::tally(&opinions);
        assert_eq!(counts.must_watch, 2);
        assert_eq!(counts.already_seen, 1);
        assert_eq!(counts.pass, 1);
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn test_opinion_serialization() {
        let json = serde_json::to_string(&Opinion::AlreadySeen).unwrap();
        assert_eq!(json, r#""already-seen""#);

        let opinion: Opinion = serde_json::from_str(r#""must-watch""#).unwrap();
        assert_eq!(opinion, Opinion::MustWatch);
    }

    #[test]
    fn test_counts_serialize_camel_case() {
        let counts = OpinionCounts {
            must_watch: 1,
            already_seen: 2,
            pass: 3,
        };
        let json = serde_json::to_value(counts).unwrap();
        assert_eq!(json["mustWatch"], 1);
        assert_eq!(json["alreadySeen"], 2);
        assert_eq!(json["pass"], 3);
    }

    #[test]
    fn test_policy_serialization() {
        let policy: EligibilityPolicy = serde_json::from_str(r#""must-watch-or-pass""#).unwrap();
        assert_eq!(policy, EligibilityPolicy::MustWatchOrPass);
        assert_eq!(policy.to_string(), "must-watch-or-pass");
        assert_eq!(EligibilityPolicy::default(), EligibilityPolicy::MustWatch);
    }

    #[test]
    fn test_policy_qualifies() {
        let seen_only = OpinionCounts {
            must_watch: 0,
            already_seen: 1,
            pass: 0,
        };
        let pass_only = OpinionCounts {
            must_watch: 0,
            already_seen: 0,
            pass: 2,
        };
        let nobody = OpinionCounts::default();

        assert!(!EligibilityPolicy::MustWatch.qualifies(&seen_only));
        assert!(EligibilityPolicy::MustWatchOrSeen.qualifies(&seen_only));
        assert!(!EligibilityPolicy::MustWatchOrSeen.qualifies(&pass_only));
        assert!(EligibilityPolicy::MustWatchOrPass.qualifies(&pass_only));
        assert!(EligibilityPolicy::All.qualifies(&nobody));
        assert!(!EligibilityPolicy::MustWatchOrPass.qualifies(&nobody));
    }
}
