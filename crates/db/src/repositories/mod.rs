//! Repository layer over the SeaORM entities.

mod comment;
mod follow;
mod group;
mod like;
mod post;
mod user;

pub use comment::CommentRepository;
pub use follow::FollowRepository;
pub use group::GroupRepository;
pub use like::LikeRepository;
pub use post::PostRepository;
pub use user::UserRepository;
