//! Business logic services.

#![allow(missing_docs)]

pub mod comment;
pub mod feed;
pub mod follow;
pub mod group;
pub mod like;
pub mod post;
pub mod user;

pub use comment::CommentService;
pub use feed::{FeedPage, FeedScope, FeedService, PAGE_SIZE, PageMeta};
pub use follow::FollowService;
pub use group::{CreateGroupInput, GroupService};
pub use like::LikeService;
pub use post::{CreatePostInput, EditOutcome, EditPostInput, PostDetail, PostService};
pub use user::UserService;
