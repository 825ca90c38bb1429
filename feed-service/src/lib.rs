pub mod assembly;
pub mod pagination;
pub mod placement;
pub mod submission;

#[cfg(test)]
mod testing;

pub use assembly::{FeedAssembler, FeedSettings};
pub use pagination::{page_number, total_pages};
pub use placement::{
    apply_placements, feasible_indices, insert_promoted, is_feasible, plan_placements, Placement,
};
pub use submission::{generate_author, generate_post_id, SubmissionService, AUTHOR_ALPHABET};
