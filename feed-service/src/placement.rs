//! Promoted-post placement.
//!
//! Slots are judged against the organic page as fetched, never against a
//! partially filled one. Insertions then run from the highest index down so
//! every target index still refers to the original neighbours.

use postfeed_core::{AdPositionMap, CoreError, Post, RandomSource};

/// A promoted post (by position in the candidate pool) bound to an insertion index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub index: usize,
    pub promoted: usize,
}

/// Whether a `(min_posts, index)` slot may be filled in `posts`.
pub fn is_feasible(posts: &[Post], min_posts: usize, index: usize) -> bool {
    let len = posts.len();
    if len < min_posts {
        return false;
    }
    // Never at the very top or the very bottom of the page
    if index == 0 || index >= len {
        return false;
    }
    !posts[index - 1].nsfw && !posts[index].nsfw
}

/// Feasible insertion indices, deduplicated and sorted highest first.
pub fn feasible_indices(posts: &[Post], positions: &AdPositionMap) -> Vec<usize> {
    let mut indices: Vec<usize> = positions
        .iter()
        .filter(|&(min_posts, index)| is_feasible(posts, min_posts, index))
        .map(|(_, index)| index)
        .collect();
    indices.sort_unstable_by(|a, b| b.cmp(a));
    indices.dedup();
    indices
}

/// Decides which promoted post fills each feasible slot. Draws are uniform
/// and independent, so the same promoted post can fill several slots.
pub fn plan_placements<R>(
    posts: &[Post],
    pool_len: usize,
    positions: &AdPositionMap,
    rng: &R,
) -> Result<Vec<Placement>, CoreError>
where
    R: RandomSource + ?Sized,
{
    if pool_len == 0 {
        return Ok(Vec::new());
    }

    feasible_indices(posts, positions)
        .into_iter()
        .map(|index| {
            Ok(Placement {
                index,
                promoted: rng.gen_index(pool_len)?,
            })
        })
        .collect()
}

/// Inserts `promoted` at `index`, shifting everything from `index` on one slot right.
pub fn insert_promoted(
    posts: &mut Vec<Post>,
    promoted: Post,
    index: usize,
) -> Result<(), CoreError> {
    if index > posts.len() {
        return Err(CoreError::InvalidInput {
            message: format!(
                "invalid index {}, posts has length {}",
                index,
                posts.len()
            ),
        });
    }
    posts.insert(index, promoted);
    Ok(())
}

/// Applies a plan produced by [`plan_placements`] for the same `posts`.
pub fn apply_placements(
    mut posts: Vec<Post>,
    pool: &[Post],
    plan: &[Placement],
) -> Result<Vec<Post>, CoreError> {
    posts.reserve(plan.len());
    for placement in plan {
        let promoted = pool.get(placement.promoted).cloned().ok_or_else(|| {
            CoreError::InvalidInput {
                message: format!("no promoted post at pool position {}", placement.promoted),
            }
        })?;
        insert_promoted(&mut posts, promoted, placement.index)?;
    }
    Ok(posts)
}
