//! Persistence boundary for groups and their movies
//!
//! Implementations must apply each mutating call as a single atomic
//! read-modify-write against the backing store. Retries, if any, belong to
//! the implementation; callers never retry.

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Group, MemberId, Movie, MovieDetails, Opinion},
};

pub mod memory;
pub mod seed;

pub use memory::InMemoryStore;
pub use seed::SeedDocument;

/// Highest star rating a member can give a watched movie
pub const MAX_RATING: u8 = 5;

#[async_trait::async_trait]
pub trait MovieStore: Send + Sync {
    /// Creates a group owned by `owner`
    async fn create_group(&self, name: String, owner: MemberId) -> AppResult<Group>;

    /// Adds a member to an existing group
    async fn join_group(&self, group_id: Uuid, member: MemberId) -> AppResult<Group>;

    async fn get_group(&self, group_id: Uuid) -> AppResult<Group>;

    /// Removes a member from a group
    ///
    /// The last member leaving deletes the group and yields `None`. An owner
    /// who leaves hands ownership to the next remaining member.
    async fn leave_group(&self, group_id: Uuid, member: &MemberId) -> AppResult<Option<Group>>;

    /// Deletes a group and all its movies; owner only
    async fn delete_group(&self, group_id: Uuid, member: &MemberId) -> AppResult<()>;

    /// Adds a suggestion; the adder's must-watch vote is recorded with it
    async fn add_movie(
        &self,
        group_id: Uuid,
        added_by: MemberId,
        details: MovieDetails,
    ) -> AppResult<Movie>;

    /// Deletes a movie; only its adder or the group owner may do this
    async fn remove_movie(&self, group_id: Uuid, movie_id: Uuid, member: &MemberId) -> AppResult<()>;

    /// Every movie in the group, in the order they were added
    async fn list_movies(&self, group_id: Uuid) -> AppResult<Vec<Movie>>;

    /// The candidate pool for a spin
    async fn unwatched_movies(&self, group_id: Uuid) -> AppResult<Vec<Movie>>;

    /// Sets or clears one member's opinion and re-tallies the counts atomically
    async fn update_opinion(
        &self,
        group_id: Uuid,
        movie_id: Uuid,
        member: &MemberId,
        opinion: Option<Opinion>,
    ) -> AppResult<Movie>;

    /// Marks a movie watched by the group and bumps its last activity in one step
    async fn mark_watched(&self, group_id: Uuid, movie_id: Uuid, member: &MemberId) -> AppResult<Movie>;

    /// Returns a watched movie to the pool, dropping its watch record and ratings
    async fn unwatch(&self, group_id: Uuid, movie_id: Uuid, member: &MemberId) -> AppResult<Movie>;

    /// Records a member's 1 to 5 star rating on a watched movie
    async fn rate_movie(
        &self,
        group_id: Uuid,
        movie_id: Uuid,
        member: &MemberId,
        rating: u8,
    ) -> AppResult<Movie>;

    /// Watched movies, most recently watched first
    async fn watch_history(&self, group_id: Uuid) -> AppResult<Vec<Movie>>;
}
