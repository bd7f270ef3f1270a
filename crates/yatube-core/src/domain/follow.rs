use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, FieldErrors};

/// Follow relationship - `user_id` follows `following_id`.
///
/// A follow is either present or absent; it is never updated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Follow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub following_id: Uuid,
    pub created: DateTime<Utc>,
}

impl Follow {
    /// Create a follow, refusing self-follows.
    pub fn new(user_id: Uuid, following_id: Uuid) -> Result<Self, DomainError> {
        if user_id == following_id {
            return Err(FieldErrors::single("following", Follow::SELF_FOLLOW).into());
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            following_id,
            created: Utc::now(),
        })
    }

    pub const SELF_FOLLOW: &'static str = "You cannot follow yourself.";
    pub const ALREADY_FOLLOWING: &'static str = "You are already following this user.";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_follow_rejected() {
        let id = Uuid::new_v4();
        let err = Follow::new(id, id).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn test_follow_other_user() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let follow = Follow::new(a, b).unwrap();
        assert_eq!(follow.user_id, a);
        assert_eq!(follow.following_id, b);
    }
}
