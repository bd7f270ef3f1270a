use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a blog entry written by one author.
///
/// `author_id` and `pub_date` are fixed at creation; [`Post::apply`] never touches them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub image: Option<String>,
    pub pub_date: DateTime<Utc>,
    pub group_id: Option<Uuid>,
}

/// Validated, client-writable post fields. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostChanges {
    pub text: Option<String>,
    pub image: Option<Option<String>>,
    pub group_id: Option<Option<Uuid>>,
}

impl Post {
    /// Create a new post authored by `author_id`, published now.
    pub fn new(author_id: Uuid, changes: PostChanges) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            text: changes.text.unwrap_or_default(),
            image: changes.image.flatten(),
            pub_date: Utc::now(),
            group_id: changes.group_id.flatten(),
        }
    }

    /// Apply client changes.
    pub fn apply(&mut self, changes: PostChanges) {
        if let Some(text) = changes.text {
            self.text = text;
        }
        if let Some(image) = changes.image {
            self.image = image;
        }
        if let Some(group_id) = changes.group_id {
            self.group_id = group_id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_keeps_author_and_pub_date() {
        let author = Uuid::new_v4();
        let mut post = Post::new(
            author,
            PostChanges {
                text: Some("hello".into()),
                ..Default::default()
            },
        );
        let published = post.pub_date;

        post.apply(PostChanges {
            text: Some("edited".into()),
            group_id: Some(Some(Uuid::new_v4())),
            ..Default::default()
        });

        assert_eq!(post.text, "edited");
        assert_eq!(post.author_id, author);
        assert_eq!(post.pub_date, published);
        assert!(post.group_id.is_some());
    }

    #[test]
    fn test_apply_explicit_null_clears_group() {
        let mut post = Post::new(
            Uuid::new_v4(),
            PostChanges {
                text: Some("hello".into()),
                group_id: Some(Some(Uuid::new_v4())),
                ..Default::default()
            },
        );

        post.apply(PostChanges {
            group_id: Some(None),
            ..Default::default()
        });

        assert_eq!(post.group_id, None);
        assert_eq!(post.text, "hello");
    }
}
