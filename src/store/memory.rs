use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Group, MemberId, Movie, MovieDetails, Opinion},
    services::opinions::set_opinion,
};

use super::{MovieStore, SeedDocument, MAX_RATING};

/// Group document with its movie subcollection
struct GroupRecord {
    group: Group,
    movies: Vec<Movie>,
}

impl GroupRecord {
    fn movie_mut(&mut self, movie_id: Uuid) -> AppResult<&mut Movie> {
        self.movies
            .iter_mut()
            .find(|movie| movie.id == movie_id)
            .ok_or_else(|| AppError::NotFound(format!("Movie {} not found", movie_id)))
    }

    fn require_member(&self, member: &MemberId) -> AppResult<()> {
        if self.group.is_member(member) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "{} is not a member of group {}",
                member, self.group.id
            )))
        }
    }
}

/// Document store held in process memory
///
/// Each operation takes the write lock once for its whole read-modify-write,
/// so concurrent opinion updates are serialized and none is lost.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<HashMap<Uuid, GroupRecord>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from exported documents, normalizing every movie
    pub fn from_seed(seed: SeedDocument) -> Self {
        let mut groups = HashMap::new();
        for entry in seed.groups {
            let movies: Vec<Movie> = entry.movies.into_iter().map(Movie::from).collect();
            let mut group = entry.group;
            group.movie_count = movies.len();
            tracing::info!(
                group_id = %group.id,
                movies = movies.len(),
                "Seeded group"
            );
            groups.insert(group.id, GroupRecord { group, movies });
        }

        Self {
            inner: Arc::new(RwLock::new(groups)),
        }
    }
}

fn group_not_found(group_id: Uuid) -> AppError {
    AppError::NotFound(format!("Group {} not found", group_id))
}

#[async_trait::async_trait]
impl MovieStore for InMemoryStore {
    async fn create_group(&self, name: String, owner: MemberId) -> AppResult<Group> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::InvalidInput("Group name must not be empty".to_string()));
        }

        let group = Group::new(name, owner, Utc::now());
        let mut inner = self.inner.write().await;
        inner.insert(
            group.id,
            GroupRecord {
                group: group.clone(),
                movies: Vec::new(),
            },
        );

        tracing::info!(group_id = %group.id, owner = %group.owner, "Group created");
        Ok(group)
    }

    async fn join_group(&self, group_id: Uuid, member: MemberId) -> AppResult<Group> {
        let mut inner = self.inner.write().await;
        let record = inner.get_mut(&group_id).ok_or_else(|| group_not_found(group_id))?;

        if record.group.is_member(&member) {
            return Err(AppError::InvalidInput(format!(
                "{} is already a member of group {}",
                member, group_id
            )));
        }

        record.group.members.push(member.clone());
        record.group.last_activity = Utc::now();

        tracing::info!(group_id = %group_id, member = %member, "Member joined group");
        Ok(record.group.clone())
    }

    async fn get_group(&self, group_id: Uuid) -> AppResult<Group> {
        let inner = self.inner.read().await;
        inner
            .get(&group_id)
            .map(|record| record.group.clone())
            .ok_or_else(|| group_not_found(group_id))
    }

    async fn leave_group(&self, group_id: Uuid, member: &MemberId) -> AppResult<Option<Group>> {
        let mut inner = self.inner.write().await;
        let record = inner.get_mut(&group_id).ok_or_else(|| group_not_found(group_id))?;
        record.require_member(member)?;

        record.group.members.retain(|m| m != member);
        if record.group.members.is_empty() {
            inner.remove(&group_id);
            tracing::info!(group_id = %group_id, member = %member, "Last member left, group deleted");
            return Ok(None);
        }

        if record.group.is_owner(member) {
            record.group.owner = record.group.members[0].clone();
            tracing::info!(
                group_id = %group_id,
                owner = %record.group.owner,
                "Ownership transferred"
            );
        }
        record.group.last_activity = Utc::now();

        tracing::info!(group_id = %group_id, member = %member, "Member left group");
        Ok(Some(record.group.clone()))
    }

    async fn delete_group(&self, group_id: Uuid, member: &MemberId) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        let record = inner.get(&group_id).ok_or_else(|| group_not_found(group_id))?;

        if !record.group.is_owner(member) {
            return Err(AppError::Forbidden(
                "Only the group owner can delete the group".to_string(),
            ));
        }

        inner.remove(&group_id);
        tracing::info!(group_id = %group_id, member = %member, "Group deleted");
        Ok(())
    }

    async fn add_movie(
        &self,
        group_id: Uuid,
        added_by: MemberId,
        details: MovieDetails,
    ) -> AppResult<Movie> {
        if details.title.trim().is_empty() {
            return Err(AppError::InvalidInput("Movie title must not be empty".to_string()));
        }

        let mut inner = self.inner.write().await;
        let record = inner.get_mut(&group_id).ok_or_else(|| group_not_found(group_id))?;
        record.require_member(&added_by)?;

        let now = Utc::now();
        let movie = Movie::new_suggestion(details, added_by, now);
        record.movies.push(movie.clone());
        record.group.movie_count = record.movies.len();
        record.group.last_activity = now;

        tracing::info!(
            group_id = %group_id,
            movie_id = %movie.id,
            title = %movie.title(),
            "Movie added"
        );
        Ok(movie)
    }

    async fn remove_movie(&self, group_id: Uuid, movie_id: Uuid, member: &MemberId) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        let record = inner.get_mut(&group_id).ok_or_else(|| group_not_found(group_id))?;

        let position = record
            .movies
            .iter()
            .position(|movie| movie.id == movie_id)
            .ok_or_else(|| AppError::NotFound(format!("Movie {} not found", movie_id)))?;

        if record.movies[position].added_by != *member && !record.group.is_owner(member) {
            return Err(AppError::Forbidden(
                "Only the member who added a movie or the group owner can remove it".to_string(),
            ));
        }

        record.movies.remove(position);
        record.group.movie_count = record.movies.len();
        record.group.last_activity = Utc::now();

        tracing::info!(group_id = %group_id, movie_id = %movie_id, member = %member, "Movie removed");
        Ok(())
    }

    async fn list_movies(&self, group_id: Uuid) -> AppResult<Vec<Movie>> {
        let inner = self.inner.read().await;
        let record = inner.get(&group_id).ok_or_else(|| group_not_found(group_id))?;
        Ok(record.movies.clone())
    }

    async fn unwatched_movies(&self, group_id: Uuid) -> AppResult<Vec<Movie>> {
        let inner = self.inner.read().await;
        let record = inner.get(&group_id).ok_or_else(|| group_not_found(group_id))?;
        Ok(record
            .movies
            .iter()
            .filter(|movie| !movie.watched)
            .cloned()
            .collect())
    }

    async fn update_opinion(
        &self,
        group_id: Uuid,
        movie_id: Uuid,
        member: &MemberId,
        opinion: Option<Opinion>,
    ) -> AppResult<Movie> {
        let mut inner = self.inner.write().await;
        let record = inner.get_mut(&group_id).ok_or_else(|| group_not_found(group_id))?;
        record.require_member(member)?;

        let movie = record.movie_mut(movie_id)?;
        set_opinion(movie, member, opinion);
        Ok(movie.clone())
    }

    async fn mark_watched(&self, group_id: Uuid, movie_id: Uuid, member: &MemberId) -> AppResult<Movie> {
        let mut inner = self.inner.write().await;
        let record = inner.get_mut(&group_id).ok_or_else(|| group_not_found(group_id))?;
        record.require_member(member)?;

        let now = Utc::now();
        let movie = record.movie_mut(movie_id)?;
        if movie.watched {
            return Err(AppError::InvalidInput(format!(
                "Movie {} is already marked watched",
                movie_id
            )));
        }
        movie.watched = true;
        movie.watched_at = Some(now);
        movie.watched_by = Some(member.clone());
        let movie = movie.clone();
        record.group.last_activity = now;

        tracing::info!(group_id = %group_id, movie_id = %movie_id, member = %member, "Movie marked watched");
        Ok(movie)
    }

    async fn unwatch(&self, group_id: Uuid, movie_id: Uuid, member: &MemberId) -> AppResult<Movie> {
        let mut inner = self.inner.write().await;
        let record = inner.get_mut(&group_id).ok_or_else(|| group_not_found(group_id))?;
        record.require_member(member)?;

        let movie = record.movie_mut(movie_id)?;
        if !movie.watched {
            return Err(AppError::InvalidInput(format!(
                "Movie {} is not marked watched",
                movie_id
            )));
        }
        movie.watched = false;
        movie.watched_at = None;
        movie.watched_by = None;
        movie.ratings.clear();
        let movie = movie.clone();
        record.group.last_activity = Utc::now();

        tracing::info!(group_id = %group_id, movie_id = %movie_id, member = %member, "Movie returned to pool");
        Ok(movie)
    }

    async fn rate_movie(
        &self,
        group_id: Uuid,
        movie_id: Uuid,
        member: &MemberId,
        rating: u8,
    ) -> AppResult<Movie> {
        if !(1..=MAX_RATING).contains(&rating) {
            return Err(AppError::InvalidInput(format!(
                "Rating must be between 1 and {}, got {}",
                MAX_RATING, rating
            )));
        }

        let mut inner = self.inner.write().await;
        let record = inner.get_mut(&group_id).ok_or_else(|| group_not_found(group_id))?;
        record.require_member(member)?;

        let movie = record.movie_mut(movie_id)?;
        if !movie.watched {
            return Err(AppError::InvalidInput(
                "Only watched movies can be rated".to_string(),
            ));
        }
        movie.ratings.insert(member.clone(), rating);

        tracing::debug!(
            movie_id = %movie_id,
            member = %member,
            rating,
            average = ?movie.average_rating(),
            "Movie rated"
        );
        Ok(movie.clone())
    }

    async fn watch_history(&self, group_id: Uuid) -> AppResult<Vec<Movie>> {
        let inner = self.inner.read().await;
        let record = inner.get(&group_id).ok_or_else(|| group_not_found(group_id))?;

        let mut watched: Vec<Movie> = record
            .movies
            .iter()
            .filter(|movie| movie.watched)
            .cloned()
            .collect();
        watched.sort_by(|a, b| b.watched_at.cmp(&a.watched_at));
        Ok(watched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OpinionCounts;
    use crate::store::seed::SeedGroup;
    use serde_json::json;

    fn details(title: &str) -> MovieDetails {
        MovieDetails {
            title: title.to_string(),
            ..MovieDetails::default()
        }
    }

    async fn store_with_group() -> (InMemoryStore, Group) {
        let store = InMemoryStore::new();
        let group = store
            .create_group("Movie club".to_string(), MemberId::from("owner"))
            .await
            .unwrap();
        store.join_group(group.id, MemberId::from("ana")).await.unwrap();
        store.join_group(group.id, MemberId::from("ben")).await.unwrap();
        (store, group)
    }

    #[tokio::test]
    async fn test_add_movie_seeds_opinion_and_count() {
        let (store, group) = store_with_group().await;

        let movie = store
            .add_movie(group.id, MemberId::from("ana"), details("Heat"))
            .await
            .unwrap();

        assert_eq!(movie.opinion_counts.must_watch, 1);
        let group = store.get_group(group.id).await.unwrap();
        assert_eq!(group.movie_count, 1);
    }

    #[tokio::test]
    async fn test_add_movie_requires_membership() {
        let (store, group) = store_with_group().await;

        let result = store
            .add_movie(group.id, MemberId::from("stranger"), details("Heat"))
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_join_twice_is_rejected() {
        let (store, group) = store_with_group().await;
        let result = store.join_group(group.id, MemberId::from("ana")).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_unknown_group_and_movie() {
        let (store, group) = store_with_group().await;

        let missing_group = store.unwatched_movies(Uuid::new_v4()).await;
        assert!(matches!(missing_group, Err(AppError::NotFound(_))));

        let missing_movie = store
            .update_opinion(group.id, Uuid::new_v4(), &MemberId::from("ana"), Some(Opinion::Pass))
            .await;
        assert!(matches!(missing_movie, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_concurrent_opinions_are_not_lost() {
        let (store, group) = store_with_group().await;
        let movie = store
            .add_movie(group.id, MemberId::from("owner"), details("Heat"))
            .await
            .unwrap();

        let (group_id, movie_id) = (group.id, movie.id);

        let mut handles = Vec::new();
        for i in 0..20 {
            let store = store.clone();
            let member = MemberId::from(format!("member-{i}"));
            store.join_group(group_id, member.clone()).await.unwrap();
            handles.push(tokio::spawn(async move {
                let opinion = if i % 2 == 0 { Opinion::MustWatch } else { Opinion::Pass };
                store
                    .update_opinion(group_id, movie_id, &member, Some(opinion))
                    .await
            }));
        }
        for handle in handles {
            tokio_test::assert_ok!(handle.await.unwrap());
        }

        let movies = store.list_movies(group.id).await.unwrap();
        assert_eq!(movies[0].opinions.len(), 21);
        assert_eq!(
            movies[0].opinion_counts,
            OpinionCounts {
                must_watch: 11,
                already_seen: 0,
                pass: 10
            }
        );
    }

    #[tokio::test]
    async fn test_watch_lifecycle() {
        let (store, group) = store_with_group().await;
        let heat = store
            .add_movie(group.id, MemberId::from("ana"), details("Heat"))
            .await
            .unwrap();
        store
            .add_movie(group.id, MemberId::from("ben"), details("Alien"))
            .await
            .unwrap();

        let ben = MemberId::from("ben");
        let watched = store.mark_watched(group.id, heat.id, &ben).await.unwrap();
        assert!(watched.watched);
        assert!(watched.watched_at.is_some());
        assert_eq!(watched.watched_by, Some(ben.clone()));

        let pool = store.unwatched_movies(group.id).await.unwrap();
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].title(), "Alien");

        let again = store.mark_watched(group.id, heat.id, &ben).await;
        assert!(matches!(again, Err(AppError::InvalidInput(_))));

        store
            .rate_movie(group.id, heat.id, &MemberId::from("ana"), 4)
            .await
            .unwrap();
        let history = store.watch_history(group.id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].average_rating(), Some(4.0));

        let restored = store.unwatch(group.id, heat.id, &ben).await.unwrap();
        assert!(!restored.watched);
        assert!(restored.watched_at.is_none());
        assert!(restored.watched_by.is_none());
        assert!(restored.ratings.is_empty());
        assert_eq!(store.unwatched_movies(group.id).await.unwrap().len(), 2);

        let not_watched = store.unwatch(group.id, heat.id, &ben).await;
        assert!(matches!(not_watched, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_watch_changes_require_membership() {
        let (store, group) = store_with_group().await;
        let heat = store
            .add_movie(group.id, MemberId::from("ana"), details("Heat"))
            .await
            .unwrap();
        let stranger = MemberId::from("stranger");

        let denied = store.mark_watched(group.id, heat.id, &stranger).await;
        assert!(matches!(denied, Err(AppError::Forbidden(_))));
        assert_eq!(store.unwatched_movies(group.id).await.unwrap().len(), 1);

        store
            .mark_watched(group.id, heat.id, &MemberId::from("ana"))
            .await
            .unwrap();
        let denied = store.unwatch(group.id, heat.id, &stranger).await;
        assert!(matches!(denied, Err(AppError::Forbidden(_))));
        assert_eq!(store.watch_history(group.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_leave_group_transfers_ownership() {
        let (store, group) = store_with_group().await;
        let owner = MemberId::from("owner");

        let group = store.leave_group(group.id, &owner).await.unwrap().unwrap();
        assert_eq!(group.owner, MemberId::from("ana"));
        assert_eq!(group.members, vec![MemberId::from("ana"), MemberId::from("ben")]);

        let again = store.leave_group(group.id, &owner).await;
        assert!(matches!(again, Err(AppError::Forbidden(_))));

        let group = store
            .leave_group(group.id, &MemberId::from("ben"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(group.owner, MemberId::from("ana"));
    }

    #[tokio::test]
    async fn test_last_member_leaving_deletes_group() {
        let store = InMemoryStore::new();
        let group = store
            .create_group("Solo".to_string(), MemberId::from("ana"))
            .await
            .unwrap();

        let left = store.leave_group(group.id, &MemberId::from("ana")).await.unwrap();
        assert!(left.is_none());

        let gone = store.get_group(group.id).await;
        assert!(matches!(gone, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_group_is_owner_only() {
        let (store, group) = store_with_group().await;
        store
            .add_movie(group.id, MemberId::from("ana"), details("Heat"))
            .await
            .unwrap();

        let denied = store.delete_group(group.id, &MemberId::from("ana")).await;
        assert!(matches!(denied, Err(AppError::Forbidden(_))));

        store
            .delete_group(group.id, &MemberId::from("owner"))
            .await
            .unwrap();
        let gone = store.list_movies(group.id).await;
        assert!(matches!(gone, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_rating_rules() {
        let (store, group) = store_with_group().await;
        let heat = store
            .add_movie(group.id, MemberId::from("ana"), details("Heat"))
            .await
            .unwrap();

        let unwatched = store.rate_movie(group.id, heat.id, &MemberId::from("ana"), 3).await;
        assert!(matches!(unwatched, Err(AppError::InvalidInput(_))));

        store
            .mark_watched(group.id, heat.id, &MemberId::from("ana"))
            .await
            .unwrap();
        for bad in [0, 6] {
            let result = store.rate_movie(group.id, heat.id, &MemberId::from("ana"), bad).await;
            assert!(matches!(result, Err(AppError::InvalidInput(_))));
        }
    }

    #[tokio::test]
    async fn test_remove_movie_permissions() {
        let (store, group) = store_with_group().await;
        let by_ana = store
            .add_movie(group.id, MemberId::from("ana"), details("Heat"))
            .await
            .unwrap();
        let also_ana = store
            .add_movie(group.id, MemberId::from("ana"), details("Alien"))
            .await
            .unwrap();

        let denied = store.remove_movie(group.id, by_ana.id, &MemberId::from("ben")).await;
        assert!(matches!(denied, Err(AppError::Forbidden(_))));

        store
            .remove_movie(group.id, by_ana.id, &MemberId::from("ana"))
            .await
            .unwrap();
        store
            .remove_movie(group.id, also_ana.id, &MemberId::from("owner"))
            .await
            .unwrap();

        let group = store.get_group(group.id).await.unwrap();
        assert_eq!(group.movie_count, 0);
    }

    #[tokio::test]
    async fn test_seed_normalizes_movies() {
        let group = Group::new("Seeded".to_string(), MemberId::from("ana"), Utc::now());
        let movie = serde_json::from_value(json!({
            "id": "0b6f8c1e-7c1a-4c57-9f0e-6d8f4f1f2a11",
            "title": "Old doc",
            "addedBy": "ana",
            "addedAt": "2023-11-02T19:30:00Z",
            "opinions": { "ana": "already-seen" }
        }))
        .unwrap();
        let seed = SeedDocument {
            groups: vec![SeedGroup {
                group: group.clone(),
                movies: vec![movie],
            }],
        };

        let store = InMemoryStore::from_seed(seed);

        let pool = store.unwatched_movies(group.id).await.unwrap();
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].opinion_counts.already_seen, 1);
        assert_eq!(store.get_group(group.id).await.unwrap().movie_count, 1);
    }
}
