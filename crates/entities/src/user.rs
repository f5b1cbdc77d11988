use serde::{Deserialize, Serialize};

/// Public view of the signed-in account.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub full_name: Option<String>,
}

impl User {
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => "User",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_back() {
        let mut user = User {
            id: String::from("u1"),
            name: String::from("kage"),
            email: String::from("kage@example.com"),
            full_name: Some(String::from("Kage Tanaka")),
        };
        assert_eq!(user.display_name(), "Kage Tanaka");

        user.full_name = Some(String::from("  "));
        assert_eq!(user.display_name(), "User");

        user.full_name = None;
        assert_eq!(user.display_name(), "User");
    }
}
