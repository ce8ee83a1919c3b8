//! User directory data model.
//!
//! Users are keyed by the subject identifier issued by the external identity
//! provider. The internal numeric id is assigned by the store and never leaves
//! the server as an addressing key.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Maximum length for a subject identifier.
pub const SUBJECT_ID_MAX: usize = 255;
/// Maximum length for a username.
pub const USERNAME_MAX: usize = 64;

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptySubjectId,
    SubjectIdWhitespace,
    SubjectIdTooLong { max: usize },
    EmptyUsername,
    UsernameTooLong { max: usize },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySubjectId => write!(f, "subject id must not be empty"),
            Self::SubjectIdWhitespace => {
                write!(f, "subject id must not contain surrounding whitespace")
            }
            Self::SubjectIdTooLong { max } => {
                write!(f, "subject id must be at most {max} characters")
            }
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable external identity issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SubjectId(String);

impl SubjectId {
    /// Validate and construct a [`SubjectId`].
    ///
    /// # Examples
    /// ```
    /// use tradepost::domain::SubjectId;
    ///
    /// let subject = SubjectId::new("user_2abc").expect("valid subject");
    /// assert_eq!(subject.as_ref(), "user_2abc");
    /// assert!(SubjectId::new(" padded ").is_err());
    /// ```
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(UserValidationError::EmptySubjectId);
        }
        if id.trim() != id {
            return Err(UserValidationError::SubjectIdWhitespace);
        }
        if id.chars().count() > SUBJECT_ID_MAX {
            return Err(UserValidationError::SubjectIdTooLong {
                max: SUBJECT_ID_MAX,
            });
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for SubjectId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<SubjectId> for String {
    fn from(value: SubjectId) -> Self {
        value.0
    }
}

impl TryFrom<String> for SubjectId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Human readable name shown to other users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`]; surrounding whitespace is trimmed.
    pub fn new(username: impl Into<String>) -> Result<Self, UserValidationError> {
        let username = username.into();
        let trimmed = username.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if trimmed.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Store-assigned numeric user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a store-assigned identifier.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Access the raw identifier.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Directory entry for a known user.
///
/// ## Invariants
/// - `subject_id` is globally unique and never changes once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(value_type = i64, example = 42)]
    id: UserId,
    #[schema(value_type = String, example = "user_2abcDEF")]
    subject_id: SubjectId,
    #[schema(value_type = String, example = "ada")]
    username: Username,
}

impl User {
    /// Build a [`User`] from validated components.
    pub fn new(id: UserId, subject_id: SubjectId, username: Username) -> Self {
        Self {
            id,
            subject_id,
            username,
        }
    }

    /// Store-assigned identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// External identity.
    pub fn subject_id(&self) -> &SubjectId {
        &self.subject_id
    }

    /// Name shown to other users.
    pub fn username(&self) -> &Username {
        &self.username
    }
}
