use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account as persisted in the store.
///
/// `password` is stored and compared in plain text; the API never echoes it
/// back (see [`crate::accounts::AccountUser`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// The entire persisted application state, always fully materialized in
/// memory. Uniqueness of `users` emails and `newsletter` entries is enforced
/// at insertion by the services that mutate the snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub users: Vec<User>,
    pub newsletter: Vec<String>,
    pub recommendations: Vec<serde_json::Value>,
}

impl Snapshot {
    /// Look up a user by email. Exact, case-sensitive match.
    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users.iter().find(|u| u.email == email)
    }

    /// Whether the email is already on the newsletter list.
    pub fn is_subscribed(&self, email: &str) -> bool {
        self.newsletter.iter().any(|e| e == email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn user(email: &str, name: Option<&str>) -> User {
        User {
            email: email.to_string(),
            password: "pw".to_string(),
            name: name.map(|n| n.to_string()),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn user_serializes_with_camel_case_timestamp() {
        let json = serde_json::to_value(user("a@b.com", Some("Ann"))).unwrap();
        assert_eq!(json["email"], "a@b.com");
        assert_eq!(json["name"], "Ann");
        assert_eq!(json["createdAt"], "2024-05-01T12:00:00Z");
    }

    #[test]
    fn absent_name_is_omitted_from_json() {
        let json = serde_json::to_value(user("a@b.com", None)).unwrap();
        assert!(json.get("name").is_none());
    }

    #[test]
    fn email_lookup_is_case_sensitive() {
        let snapshot = Snapshot { users: vec![user("A@b.com", None)], ..Default::default() };
        assert!(snapshot.user_by_email("A@b.com").is_some());
        assert!(snapshot.user_by_email("a@b.com").is_none());
    }

    #[test]
    fn default_snapshot_is_empty() {
        let snapshot = Snapshot::default();
        assert!(snapshot.users.is_empty());
        assert!(snapshot.newsletter.is_empty());
        assert!(snapshot.recommendations.is_empty());
        assert!(!snapshot.is_subscribed("a@b.com"));
    }
}
