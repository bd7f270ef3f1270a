//! Resource serializers - map wire payloads to validated domain changes and
//! domain entities back to wire representations.
//!
//! Server-derived fields (authors, timestamps, parent ids) are never read from
//! input; the request types do not even declare them.

mod comment;
mod follow;
mod group;
mod post;
mod user;

use std::collections::HashMap;

use uuid::Uuid;

use crate::error::{DomainError, FieldErrors};

pub use comment::CommentSerializer;
pub use follow::FollowSerializer;
pub use group::GroupSerializer;
pub use post::PostSerializer;
pub use user::{NewUser, UserSerializer};

pub(crate) const REQUIRED: &str = "This field is required.";
pub(crate) const BLANK: &str = "This field may not be blank.";

/// How strictly an incoming payload is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Required fields must be present.
    Create,
    /// Full replacement (PUT): required fields must be present.
    Update,
    /// Partial update (PATCH): every field is optional.
    PartialUpdate,
}

impl WriteMode {
    pub fn from_partial(partial: bool) -> Self {
        if partial {
            WriteMode::PartialUpdate
        } else {
            WriteMode::Update
        }
    }

    fn requires_all(&self) -> bool {
        !matches!(self, WriteMode::PartialUpdate)
    }
}

/// Validate a required, non-blank text field.
pub(crate) fn check_text(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<String>,
    mode: WriteMode,
) -> Option<String> {
    match value {
        None if mode.requires_all() => {
            errors.add(field, REQUIRED);
            None
        }
        None => None,
        Some(text) if text.trim().is_empty() => {
            errors.add(field, BLANK);
            None
        }
        Some(text) => Some(text),
    }
}

pub(crate) fn username_of(
    names: &HashMap<Uuid, String>,
    user_id: Uuid,
) -> Result<String, DomainError> {
    names
        .get(&user_id)
        .cloned()
        .ok_or_else(|| DomainError::Internal(format!("user {} vanished while rendering", user_id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_required_unless_partial() {
        let mut errors = FieldErrors::new();
        assert_eq!(check_text(&mut errors, "text", None, WriteMode::Create), None);
        assert_eq!(errors.messages("text"), [REQUIRED.to_string()]);

        let mut errors = FieldErrors::new();
        assert_eq!(check_text(&mut errors, "text", None, WriteMode::PartialUpdate), None);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_blank_text_rejected() {
        let mut errors = FieldErrors::new();
        check_text(&mut errors, "text", Some("   ".into()), WriteMode::PartialUpdate);
        assert_eq!(errors.messages("text"), [BLANK.to_string()]);
    }

    #[test]
    fn test_write_mode_from_partial() {
        assert_eq!(WriteMode::from_partial(true), WriteMode::PartialUpdate);
        assert_eq!(WriteMode::from_partial(false), WriteMode::Update);
    }
}
