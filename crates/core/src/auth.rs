use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::AppError;

/// Role attached to a resolved identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// No verified credential was presented.
    Anonymous,
    /// Verified studio customer.
    User,
    /// Verified studio operator.
    Admin,
}

impl Role {
    /// Returns a stable transport value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anonymous => "anonymous",
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    /// Returns whether this role may access routes gated on `required`.
    ///
    /// `Admin` satisfies `User`; nothing satisfies `Admin` except `Admin`.
    #[must_use]
    pub fn satisfies(self, required: Role) -> bool {
        match required {
            Self::Anonymous => true,
            Self::User => matches!(self, Self::User | Self::Admin),
            Self::Admin => self == Self::Admin,
        }
    }
}

impl Display for Role {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "anonymous" => Ok(Self::Anonymous),
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(AppError::Validation(format!("unknown role value '{value}'"))),
        }
    }
}

/// Principal resolved for the duration of one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    subject: Option<String>,
    email: Option<String>,
    role: Role,
}

impl Identity {
    /// Creates the identity used when no credential could be verified.
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            subject: None,
            email: None,
            role: Role::Anonymous,
        }
    }

    /// Creates a verified identity.
    #[must_use]
    pub fn verified(subject: impl Into<String>, email: Option<String>, role: Role) -> Self {
        Self {
            subject: Some(subject.into()),
            email,
            role,
        }
    }

    /// Returns the stable subject claim from the identity provider.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Returns the email, if the provider returned one.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the resolved role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns whether no credential was verified.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.role == Role::Anonymous
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::anonymous()
    }
}
