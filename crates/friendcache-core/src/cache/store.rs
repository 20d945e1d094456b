use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::models::{Friend, User};

use super::record::{CachedFriend, CachedUser};
use super::StoreError;

/// Store file name in the cache directory
const STORE_FILE: &str = "users.json";

/// Scratch file the next snapshot is written to before it replaces the store
const STORE_TMP_FILE: &str = "users.json.tmp";

/// An unreadable store file is moved here so the next sync can start over
const STORE_CORRUPT_FILE: &str = "users.json.corrupt";

const MINUTES_PER_HOUR: i64 = 60;
const MINUTES_PER_DAY: i64 = 1440;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }
}

/// Relative age of a sync time, rounded to the nearest unit ("2h ago")
pub fn age_display(cached_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(cached_at) = cached_at else {
        return "never".to_string();
    };

    match (now - cached_at).num_minutes() {
        // Future timestamps from clock skew land here too
        m if m < 1 => "just now".to_string(),
        m if m < MINUTES_PER_HOUR => format!("{}m ago", m),
        m if m < MINUTES_PER_DAY => format!("{}h ago", (m + MINUTES_PER_HOUR / 2) / MINUTES_PER_HOUR),
        m => format!("{}d ago", (m + MINUTES_PER_DAY / 2) / MINUTES_PER_DAY),
    }
}

/// Both tables, as written to disk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Tables {
    users: Vec<CachedUser>,
    friends: Vec<CachedFriend>,
}

/// Row positions by id, rebuilt whenever the tables are replaced
#[derive(Debug, Clone, Default)]
struct Index {
    users: HashMap<String, usize>,
    friends: HashMap<String, usize>,
}

impl Index {
    fn build(tables: &Tables) -> Result<Self, String> {
        let mut index = Index::default();
        for (pos, user) in tables.users.iter().enumerate() {
            if index.users.insert(user.id.clone(), pos).is_some() {
                return Err(format!("duplicate user id {}", user.id));
            }
        }
        for (pos, friend) in tables.friends.iter().enumerate() {
            if index.friends.insert(friend.id.clone(), pos).is_some() {
                return Err(format!("duplicate friend id {}", friend.id));
            }
        }
        Ok(index)
    }
}

/// Counts from one upsert batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertSummary {
    pub inserted: usize,
    pub updated: usize,
}

/// Persistent user/friend store keyed by id.
///
/// Rows keep the position of their first insertion, so `read_all` order is
/// stable across syncs and restarts.
pub struct UserStore {
    cache_dir: PathBuf,
    tables: Tables,
    index: Index,
    cached_at: Option<DateTime<Utc>>,
    quarantined: Option<PathBuf>,
}

impl UserStore {
    /// Open the store in `cache_dir`, creating the directory if needed.
    ///
    /// A missing store file means an empty store. A corrupt one is moved
    /// aside to `users.json.corrupt` and the store starts empty, so the
    /// next successful sync rebuilds it.
    pub fn open(cache_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let cache_dir = cache_dir.into();
        std::fs::create_dir_all(&cache_dir).map_err(|e| StoreError::io(&cache_dir, e))?;

        let path = cache_dir.join(STORE_FILE);
        let mut quarantined = None;
        let loaded = match Self::load(&path) {
            Err(StoreError::Corrupt { reason, .. }) => {
                let aside = cache_dir.join(STORE_CORRUPT_FILE);
                warn!(
                    path = %path.display(),
                    moved_to = %aside.display(),
                    reason = %reason,
                    "Store file is corrupt, starting with an empty cache"
                );
                std::fs::rename(&path, &aside).map_err(|e| StoreError::io(&path, e))?;
                quarantined = Some(aside);
                None
            }
            other => other?,
        };

        let (tables, index, cached_at) = match loaded {
            Some(cached) => cached,
            None => (Tables::default(), Index::default(), None),
        };

        debug!(
            path = %path.display(),
            users = tables.users.len(),
            friends = tables.friends.len(),
            "User store opened"
        );

        Ok(Self {
            cache_dir,
            tables,
            index,
            cached_at,
            quarantined,
        })
    }

    /// Read and index the store file, `None` if there is none yet
    fn load(path: &Path) -> Result<Option<(Tables, Index, Option<DateTime<Utc>>)>, StoreError> {
        if !path.exists() {
            return Ok(None);
        }

        let corrupt = |reason: String| StoreError::Corrupt {
            path: path.to_path_buf(),
            reason,
        };

        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                return Err(corrupt(e.to_string()));
            }
            Err(e) => return Err(StoreError::io(path, e)),
        };
        let cached: CachedData<Tables> =
            serde_json::from_str(&contents).map_err(|e| corrupt(e.to_string()))?;
        let index = Index::build(&cached.data).map_err(corrupt)?;

        Ok(Some((cached.data, index, Some(cached.cached_at))))
    }

    pub fn path(&self) -> PathBuf {
        self.cache_dir.join(STORE_FILE)
    }

    pub fn len(&self) -> usize {
        self.tables.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.users.is_empty()
    }

    pub fn friend_count(&self) -> usize {
        self.tables.friends.len()
    }

    /// When the last successful upsert was written, if ever
    pub fn last_synced(&self) -> Option<DateTime<Utc>> {
        self.cached_at
    }

    pub fn age_display(&self) -> String {
        age_display(self.cached_at, Utc::now())
    }

    /// Where a corrupt store file was moved on open, if that happened
    pub fn quarantined(&self) -> Option<&Path> {
        self.quarantined.as_deref()
    }

    /// Insert or overwrite every record in `records`, keyed by id.
    ///
    /// The batch is all-or-nothing: the new tables are built and written to
    /// disk first, and only replace the in-memory tables once the write has
    /// landed. Embedded friends are upserted into the friend table.
    pub fn upsert(&mut self, records: &[User]) -> Result<UpsertSummary, StoreError> {
        let mut tables = self.tables.clone();
        let mut index = self.index.clone();
        let mut summary = UpsertSummary::default();

        for user in records {
            if user.id.is_empty() {
                return Err(StoreError::ConstraintViolation(format!(
                    "user '{}' has an empty id",
                    user.name
                )));
            }

            for friend in &user.friends {
                if friend.id.is_empty() {
                    return Err(StoreError::ConstraintViolation(format!(
                        "friend '{}' of user {} has an empty id",
                        friend.name, user.id
                    )));
                }
                let row = CachedFriend::from(friend);
                match index.friends.get(&friend.id) {
                    Some(&pos) => tables.friends[pos] = row,
                    None => {
                        index.friends.insert(friend.id.clone(), tables.friends.len());
                        tables.friends.push(row);
                    }
                }
            }

            let row = CachedUser::from(user);
            match index.users.get(&user.id) {
                Some(&pos) => {
                    tables.users[pos] = row;
                    summary.updated += 1;
                }
                None => {
                    index.users.insert(user.id.clone(), tables.users.len());
                    tables.users.push(row);
                    summary.inserted += 1;
                }
            }
        }

        let cached_at = self.persist(&tables)?;

        self.tables = tables;
        self.index = index;
        self.cached_at = Some(cached_at);

        info!(
            inserted = summary.inserted,
            updated = summary.updated,
            total = self.tables.users.len(),
            "User store updated"
        );
        Ok(summary)
    }

    /// Every stored user, in first-insertion order
    pub fn read_all(&self) -> Vec<User> {
        self.tables.users.iter().map(|row| self.resolve(row)).collect()
    }

    pub fn get(&self, id: &str) -> Option<User> {
        self.index
            .users
            .get(id)
            .map(|&pos| self.resolve(&self.tables.users[pos]))
    }

    fn resolve(&self, row: &CachedUser) -> User {
        let friends: Vec<Friend> = row
            .friend_ids
            .iter()
            .map(|id| match self.index.friends.get(id) {
                Some(&pos) => self.tables.friends[pos].to_friend(),
                None => CachedFriend::unknown(id),
            })
            .collect();
        row.to_user(friends)
    }

    /// Write `tables` to a scratch file, then rename it over the store file
    fn persist(&self, tables: &Tables) -> Result<DateTime<Utc>, StoreError> {
        let cached = CachedData::new(tables);
        let contents = serde_json::to_string_pretty(&cached)?;

        let tmp_path = self.cache_dir.join(STORE_TMP_FILE);
        let path = self.path();
        write_then_rename(&tmp_path, &path, &contents)?;

        Ok(cached.cached_at)
    }
}

fn write_then_rename(tmp_path: &Path, path: &Path, contents: &str) -> Result<(), StoreError> {
    std::fs::write(tmp_path, contents).map_err(|e| StoreError::io(tmp_path, e))?;
    std::fs::rename(tmp_path, path).map_err(|e| StoreError::io(path, e))
}

// ============================================================================
// Tests
// ============================================================================
