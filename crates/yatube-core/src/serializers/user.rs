use std::sync::Arc;

use yatube_shared::dto::{RegisterUserRequest, UserResponse};

use super::{BLANK, REQUIRED};
use crate::domain::User;
use crate::error::{DomainError, FieldErrors};
use crate::ports::UserRepository;

const USERNAME_MAX_LEN: usize = 150;
const PASSWORD_MIN_LEN: usize = 8;

/// Validated registration data. The password is still plain text here and
/// must be hashed before a [`User`] is built.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// User payloads. `password` is write-only and never rendered.
#[derive(Clone)]
pub struct UserSerializer {
    users: Arc<dyn UserRepository>,
}

fn valid_username_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_')
}

impl UserSerializer {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn parse(&self, input: RegisterUserRequest) -> Result<NewUser, DomainError> {
        let mut errors = FieldErrors::new();
        let username = input.username.trim().to_string();

        if username.is_empty() {
            errors.add("username", REQUIRED);
        } else if username.chars().count() > USERNAME_MAX_LEN {
            errors.add(
                "username",
                format!("Ensure this field has no more than {} characters.", USERNAME_MAX_LEN),
            );
        } else if !username.chars().all(valid_username_char) {
            errors.add(
                "username",
                "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
            );
        } else if self.users.find_by_username(&username).await?.is_some() {
            errors.add("username", "A user with that username already exists.");
        }

        if input.password.is_empty() {
            errors.add("password", REQUIRED);
        } else if input.password.trim().is_empty() {
            errors.add("password", BLANK);
        } else if input.password.chars().count() < PASSWORD_MIN_LEN {
            errors.add(
                "password",
                format!("Password must be at least {} characters.", PASSWORD_MIN_LEN),
            );
        }

        let email = input.email.trim().to_string();
        if !email.is_empty() && !email.contains('@') {
            errors.add("email", "Enter a valid email address.");
        }

        errors.into_result(NewUser {
            username,
            password: input.password,
            email,
            first_name: input.first_name,
            last_name: input.last_name,
        })
    }

    pub fn render(&self, user: User) -> UserResponse {
        UserResponse {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}
