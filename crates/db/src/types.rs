use std::fmt;

use diesel_derive_newtype::DieselNewType;
use svix_ksuid::KsuidLike;

#[derive(DieselNewType, Debug, Hash, PartialEq, Eq, Clone)]
pub struct DbId(String);

impl DbId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DbId {
    fn default() -> Self {
        DbId(svix_ksuid::Ksuid::new(None, None).to_string())
    }
}

impl fmt::Display for DbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for DbId {
    fn from(string: String) -> Self {
        DbId(string)
    }
}

impl From<&str> for DbId {
    fn from(string: &str) -> Self {
        DbId(string.to_string())
    }
}

impl From<svix_ksuid::Ksuid> for DbId {
    fn from(id: svix_ksuid::Ksuid) -> Self {
        DbId(id.to_string())
    }
}

impl From<DbId> for String {
    fn from(id: DbId) -> Self {
        id.0
    }
}
