use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::MemberId;

/// A set of members sharing one movie list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub owner: MemberId,
    pub members: Vec<MemberId>,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub movie_count: usize,
}

impl Group {
    /// Creates a group whose only member is its owner
    pub fn new(name: String, owner: MemberId, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            members: vec![owner.clone()],
            owner,
            created_at: now,
            last_activity: now,
            movie_count: 0,
        }
    }

    pub fn is_member(&self, member: &MemberId) -> bool {
        self.members.contains(member)
    }

    pub fn is_owner(&self, member: &MemberId) -> bool {
        &self.owner == member
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_group_has_owner_as_member() {
        let owner = MemberId::from("ana");
        let group = Group::new("Friday crew".to_string(), owner.clone(), Utc::now());

        assert!(group.is_member(&owner));
        assert!(group.is_owner(&owner));
        assert!(!group.is_member(&MemberId::from("ben")));
        assert_eq!(group.movie_count, 0);
        assert_eq!(group.created_at, group.last_activity);
    }
}
