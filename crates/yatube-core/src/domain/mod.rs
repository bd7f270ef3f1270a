//! Domain entities - the core business objects.

mod comment;
mod follow;
mod group;
mod post;
mod user;

pub use comment::{Comment, CommentChanges};
pub use follow::Follow;
pub use group::Group;
pub use post::{Post, PostChanges};
pub use user::User;
