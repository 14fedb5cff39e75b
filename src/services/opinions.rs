use crate::models::{MemberId, Movie, Opinion, OpinionCounts};

/// Sets or clears a member's opinion and re-tallies the movie's counts
///
/// `None` removes the member's entry. Counts are rebuilt from the whole map
/// on every call so they can never drift from the opinions they summarize.
pub fn set_opinion(movie: &mut Movie, member: &MemberId, opinion: Option<Opinion>) {
    match opinion {
        Some(opinion) => {
            movie.opinions.insert(member.clone(), opinion);
        }
        None => {
            movie.opinions.remove(member);
        }
    }

    movie.opinion_counts = OpinionCounts::tally(&movie.opinions);

    tracing::debug!(
        movie_id = %movie.id,
        member = %member,
        opinion = ?opinion,
        counts = ?movie.opinion_counts,
        "Opinion updated"
    );
}

/// Maps a button press to the opinion to store
///
/// Pressing the opinion a member already holds deselects it.
pub fn toggle_opinion(current: Option<Opinion>, requested: Opinion) -> Option<Opinion> {
    if current == Some(requested) {
        None
    } else {
        Some(requested)
    }
}
