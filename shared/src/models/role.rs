//! Role and acting-user identity

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Portal role
///
/// - `Pusat`: central office
/// - `Daerah`: regional office
/// - `Sekolah`: school
/// - `Mitra`: delivery partner
/// - `Murid`: student
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Pusat,
    Daerah,
    Sekolah,
    Mitra,
    Murid,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Pusat,
        Role::Daerah,
        Role::Sekolah,
        Role::Mitra,
        Role::Murid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Pusat => "pusat",
            Role::Daerah => "daerah",
            Role::Sekolah => "sekolah",
            Role::Mitra => "mitra",
            Role::Murid => "murid",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Pusat => "Pusat",
            Role::Daerah => "Dinas Daerah",
            Role::Sekolah => "Sekolah",
            Role::Mitra => "Mitra",
            Role::Murid => "Murid",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pusat" => Ok(Role::Pusat),
            "daerah" => Ok(Role::Daerah),
            "sekolah" => Ok(Role::Sekolah),
            "mitra" => Ok(Role::Mitra),
            "murid" => Ok(Role::Murid),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Identity of the acting user, resolved by the session layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub username: String,
    pub role: Role,
    /// Display name written to the ledger
    pub full_name: String,
    /// Set for school-bound roles (sekolah, murid)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_id: Option<String>,
}

impl Actor {
    pub fn new(
        user_id: impl Into<String>,
        username: impl Into<String>,
        role: Role,
        full_name: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            role,
            full_name: full_name.into(),
            school_id: None,
        }
    }

    pub fn with_school(mut self, school_id: impl Into<String>) -> Self {
        self.school_id = Some(school_id.into());
        self
    }
}
