use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A directory entry as served by the remote endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(rename = "isActive")]
    pub is_active: bool,
    pub name: String,
    pub age: i32,
    pub company: String,
    pub email: String,
    pub address: String,
    pub about: String,
    /// ISO-8601 on the wire, e.g. `2015-11-10T01:47:18-00:00`
    pub registered: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub friends: Vec<Friend>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Friend {
    pub id: String,
    pub name: String,
}

impl User {
    /// Short status label for list views
    pub fn status_label(&self) -> &'static str {
        if self.is_active {
            "Active"
        } else {
            "Offline"
        }
    }

    /// Friend names in payload order
    pub fn friend_names(&self) -> Vec<&str> {
        self.friends.iter().map(|f| f.name.as_str()).collect()
    }
}
