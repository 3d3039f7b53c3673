//! Typed id-or-email lookup key.
//!
//! Callers pass a single path segment that may be either a record UUID
//! or an email address. The discriminant is resolved once here rather
//! than re-detected at every call site.

use uuid::Uuid;
use validator::ValidateEmail;

/// A polymorphic lookup key: a syntactically valid email address is an
/// email lookup, anything that parses as a UUID is an id lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    /// Email lookup key, normalized to lowercase.
    Email(String),
    /// Record id lookup key.
    Id(Uuid),
    /// Neither an email nor a UUID. Lookups with this key miss rather
    /// than error; absence handling stays with the caller.
    Unknown(String),
}

impl Identifier {
    pub fn parse(raw: &str) -> Self {
        if raw.validate_email() {
            Self::Email(raw.to_lowercase())
        } else if let Ok(id) = Uuid::parse_str(raw) {
            Self::Id(id)
        } else {
            Self::Unknown(raw.to_string())
        }
    }
}

impl From<Uuid> for Identifier {
    fn from(id: Uuid) -> Self {
        Self::Id(id)
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Email(email) => write!(f, "{email}"),
            Self::Id(id) => write!(f, "{id}"),
            Self::Unknown(raw) => write!(f, "{raw}"),
        }
    }
}
