//! Persisted record types.
//!
//! `CachedUser` and `CachedFriend` are the at-rest shapes of `User` and
//! `Friend`. Every attribute except the id is optional so that older or
//! partially written files still load; the `wrapped_*` accessors supply
//! display defaults. Users reference friends by id, the friend rows live in
//! their own id-unique table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Friend, User};

const UNKNOWN_NAME: &str = "Unknown name";
const UNKNOWN_FRIEND: &str = "Unknown friend";

const TAG_SEPARATOR: char = ',';
const TAG_ESCAPE: char = '\\';

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedUser {
    pub id: String,
    pub name: Option<String>,
    pub age: Option<i32>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub about: Option<String>,
    pub registered: Option<DateTime<Utc>>,
    /// Flattened with `encode_tags`
    pub tags: Option<String>,
    #[serde(default)]
    pub friend_ids: Vec<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedFriend {
    pub id: String,
    pub name: Option<String>,
}

impl CachedUser {
    pub fn wrapped_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN_NAME)
    }

    pub fn wrapped_age(&self) -> i32 {
        self.age.unwrap_or_default()
    }

    pub fn wrapped_company(&self) -> &str {
        self.company.as_deref().unwrap_or_default()
    }

    pub fn wrapped_email(&self) -> &str {
        self.email.as_deref().unwrap_or_default()
    }

    pub fn wrapped_address(&self) -> &str {
        self.address.as_deref().unwrap_or_default()
    }

    pub fn wrapped_about(&self) -> &str {
        self.about.as_deref().unwrap_or_default()
    }

    /// Missing registration dates read back as the Unix epoch
    pub fn wrapped_registered(&self) -> DateTime<Utc> {
        self.registered.unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    pub fn wrapped_tags(&self) -> Vec<String> {
        self.tags.as_deref().map(decode_tags).unwrap_or_default()
    }

    pub fn wrapped_is_active(&self) -> bool {
        self.is_active.unwrap_or(false)
    }

    /// Rebuild the value record, given the already-resolved friend rows
    pub fn to_user(&self, friends: Vec<Friend>) -> User {
        User {
            id: self.id.clone(),
            is_active: self.wrapped_is_active(),
            name: self.wrapped_name().to_string(),
            age: self.wrapped_age(),
            company: self.wrapped_company().to_string(),
            email: self.wrapped_email().to_string(),
            address: self.wrapped_address().to_string(),
            about: self.wrapped_about().to_string(),
            registered: self.wrapped_registered(),
            tags: self.wrapped_tags(),
            friends,
        }
    }
}

impl From<&User> for CachedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: Some(user.name.clone()),
            age: Some(user.age),
            company: Some(user.company.clone()),
            email: Some(user.email.clone()),
            address: Some(user.address.clone()),
            about: Some(user.about.clone()),
            registered: Some(user.registered),
            tags: encode_tags(&user.tags),
            friend_ids: user.friends.iter().map(|f| f.id.clone()).collect(),
            is_active: Some(user.is_active),
        }
    }
}

impl CachedFriend {
    pub fn wrapped_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN_FRIEND)
    }

    pub fn to_friend(&self) -> Friend {
        Friend {
            id: self.id.clone(),
            name: self.wrapped_name().to_string(),
        }
    }

    /// Placeholder for a friend id with no row in the friend table
    pub fn unknown(id: &str) -> Friend {
        Friend {
            id: id.to_string(),
            name: UNKNOWN_FRIEND.to_string(),
        }
    }
}

impl From<&Friend> for CachedFriend {
    fn from(friend: &Friend) -> Self {
        Self {
            id: friend.id.clone(),
            name: Some(friend.name.clone()),
        }
    }
}

// ============================================================================
// Tag flattening
// ============================================================================

/// Join tags into one comma-separated string.
///
/// Separators and escape characters inside a tag are backslash-escaped so
/// `decode_tags` can split the string back into the original sequence. An
/// empty list is stored as no value at all, which keeps `[""]` (stored as
/// `""`) distinct from `[]`.
pub fn encode_tags(tags: &[String]) -> Option<String> {
    if tags.is_empty() {
        return None;
    }

    let mut out = String::new();
    for (i, tag) in tags.iter().enumerate() {
        if i > 0 {
            out.push(TAG_SEPARATOR);
        }
        for c in tag.chars() {
            if c == TAG_SEPARATOR || c == TAG_ESCAPE {
                out.push(TAG_ESCAPE);
            }
            out.push(c);
        }
    }
    Some(out)
}

/// Split a string produced by `encode_tags`.
///
/// Always yields at least one tag. A trailing lone escape is kept as a
/// literal backslash.
pub fn decode_tags(encoded: &str) -> Vec<String> {
    let mut tags = Vec::new();
    let mut current = String::new();
    let mut chars = encoded.chars();

    while let Some(c) = chars.next() {
        match c {
            TAG_ESCAPE => current.push(chars.next().unwrap_or(TAG_ESCAPE)),
            TAG_SEPARATOR => tags.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    tags.push(current);
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_encode_tags_plain() {
        assert_eq!(encode_tags(&tags(&["swift", "ios"])).as_deref(), Some("swift,ios"));
        assert_eq!(encode_tags(&[]), None);
    }

    #[test]
    fn test_tags_round_trip_preserves_order() {
        let original = tags(&["swift", "ios"]);
        assert_eq!(decode_tags(&encode_tags(&original).unwrap()), original);
    }

    #[test]
    fn test_tags_with_separator_and_escape_round_trip() {
        let original = tags(&["a,b", "c\\d", "", "trailing\\"]);
        let encoded = encode_tags(&original).unwrap();
        assert_eq!(encoded, "a\\,b,c\\\\d,,trailing\\\\");
        assert_eq!(decode_tags(&encoded), original);

        let single_empty = tags(&[""]);
        let encoded = encode_tags(&single_empty).unwrap();
        assert_eq!(encoded, "");
        assert_eq!(decode_tags(&encoded), single_empty);
    }

    #[test]
    fn test_empty_and_single_empty_tag_lists_stay_distinct() {
        let mut user = User {
            id: "a".to_string(),
            is_active: true,
            name: "Ada".to_string(),
            age: 36,
            company: String::new(),
            email: String::new(),
            address: String::new(),
            about: String::new(),
            registered: DateTime::<Utc>::UNIX_EPOCH,
            tags: vec![],
            friends: vec![],
        };
        let cached = CachedUser::from(&user);
        assert_eq!(cached.tags, None);
        assert!(cached.wrapped_tags().is_empty());

        user.tags = tags(&[""]);
        let cached = CachedUser::from(&user);
        assert_eq!(cached.tags.as_deref(), Some(""));
        assert_eq!(cached.wrapped_tags(), tags(&[""]));
    }

    #[test]
    fn test_decode_legacy_unescaped_string() {
        assert_eq!(decode_tags("cillum,consequat"), tags(&["cillum", "consequat"]));
        assert_eq!(decode_tags("dangling\\"), tags(&["dangling\\"]));
    }

    #[test]
    fn test_wrapped_defaults() {
        let cached = CachedUser {
            id: "x".to_string(),
            name: None,
            age: None,
            company: None,
            email: None,
            address: None,
            about: None,
            registered: None,
            tags: None,
            friend_ids: vec![],
            is_active: None,
        };
        assert_eq!(cached.wrapped_name(), "Unknown name");
        assert_eq!(cached.wrapped_age(), 0);
        assert_eq!(cached.wrapped_company(), "");
        assert!(cached.wrapped_tags().is_empty());
        assert!(!cached.wrapped_is_active());
        assert_eq!(cached.wrapped_registered(), DateTime::<Utc>::UNIX_EPOCH);

        let friend = CachedFriend { id: "f".to_string(), name: None };
        assert_eq!(friend.to_friend().name, "Unknown friend");
    }

    #[test]
    fn test_cached_user_from_user() {
        let user = User {
            id: "a".to_string(),
            is_active: true,
            name: "Ada".to_string(),
            age: 36,
            company: "Engine".to_string(),
            email: "ada@example.com".to_string(),
            address: "1 Loop".to_string(),
            about: "Counts".to_string(),
            registered: DateTime::<Utc>::UNIX_EPOCH,
            tags: tags(&["swift", "ios"]),
            friends: vec![Friend { id: "b".to_string(), name: "Babbage".to_string() }],
        };

        let cached = CachedUser::from(&user);
        assert_eq!(cached.tags.as_deref(), Some("swift,ios"));
        assert_eq!(cached.friend_ids, vec!["b".to_string()]);
        assert_eq!(cached.to_user(user.friends.clone()), user);
    }
}
