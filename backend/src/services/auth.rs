//! Caller identity and role checks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ScheduleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
    Student,
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "staff" => Ok(Self::Staff),
            "student" => Ok(Self::Student),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Admin => "admin",
            Self::Staff => "staff",
            Self::Student => "student",
        };
        f.write_str(name)
    }
}

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub role: Role,
}

impl Identity {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Per-request caller information passed to every coordinator operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub identity: Option<Identity>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self { identity: None }
    }

    pub fn authenticated(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    pub fn admin(user_id: impl Into<String>) -> Self {
        Self::authenticated(Identity::new(user_id, Role::Admin))
    }

    pub fn require_authenticated(&self) -> Result<&Identity, ScheduleError> {
        self.identity.as_ref().ok_or(ScheduleError::Unauthenticated)
    }

    pub fn require_admin(&self) -> Result<&Identity, ScheduleError> {
        let identity = self.require_authenticated()?;
        if identity.is_admin() {
            Ok(identity)
        } else {
            Err(ScheduleError::Forbidden)
        }
    }
}
