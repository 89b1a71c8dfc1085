//! Send store backed by fjall.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use chrono::{DateTime, Utc};
use fjall::{Keyspace, KeyspaceCreateOptions, PersistMode};
use serde::{Deserialize, Serialize};

use crate::logging::{debug, error, info, trace};
use crate::profile::{UserProfile, display_names, normalize_email};
use crate::record::{RawRecord, SendRecord, normalize_at};
use crate::scope::Scope;

use super::error::StoreError;
use super::format::{decode_value, encode_value};

const META_CONFIG_KEY: &str = "config";

/// Separates follower and followee in follow-edge keys.
const EDGE_SEPARATOR: char = '\0';

/// Current store version.
/// Increment this when changing the on-disk layout.
const STORE_VERSION: u32 = 1;

/// When one user started following another.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowEdge {
    pub since: DateTime<Utc>,
}

/// Persistent store of sends and of who follows whom.
///
/// # Example
///
/// ```ignore
/// use sendboard::store::SendStore;
///
/// let store = SendStore::init(Path::new(".sendboard"))?;
/// let send = store.add(&raw, Utc::now())?;
/// store.set_shared(&send.id, true)?;
/// let board = sendboard::rank(&store.in_scope(&Scope::World)?);
/// ```
pub struct SendStore {
    db: fjall::Database,
    meta: Keyspace,
    sends: Keyspace,
    follows: Keyspace,
    profiles: Keyspace,
}

impl SendStore {
    /// Open an existing store at the given path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        debug!(path = %path.display(), "opening send store");
        if !path.exists() {
            return Err(StoreError::NotInitialized(path.display().to_string()));
        }

        let db = fjall::Database::builder(path).open()?;
        let meta = db.keyspace("_meta", KeyspaceCreateOptions::default)?;

        let Some(config) = meta.get(META_CONFIG_KEY)? else {
            return Err(StoreError::NotInitialized(path.display().to_string()));
        };
        let version = u32::from_le_bytes(
            config
                .as_ref()
                .try_into()
                .map_err(|_| StoreError::InvalidFormat("Invalid config format".to_string()))?,
        );
        if version != STORE_VERSION {
            error!(expected = STORE_VERSION, found = version, "store version mismatch");
            return Err(StoreError::InvalidFormat(format!(
                "Store version mismatch: expected {}, got {}",
                STORE_VERSION, version
            )));
        }

        let sends = db.keyspace("sends", KeyspaceCreateOptions::default)?;
        let follows = db.keyspace("follows", KeyspaceCreateOptions::default)?;
        let profiles = db.keyspace("profiles", KeyspaceCreateOptions::default)?;

        info!(path = %path.display(), "send store opened");
        Ok(Self {
            db,
            meta,
            sends,
            follows,
            profiles,
        })
    }

    /// Initialize a new store at the given path.
    pub fn init(path: &Path) -> Result<Self, StoreError> {
        debug!(path = %path.display(), "initializing send store");
        let db = fjall::Database::builder(path).open()?;
        let meta = db.keyspace("_meta", KeyspaceCreateOptions::default)?;
        let sends = db.keyspace("sends", KeyspaceCreateOptions::default)?;
        let follows = db.keyspace("follows", KeyspaceCreateOptions::default)?;
        let profiles = db.keyspace("profiles", KeyspaceCreateOptions::default)?;

        meta.insert(META_CONFIG_KEY, STORE_VERSION.to_le_bytes())?;
        db.persist(PersistMode::SyncAll)?;

        info!(path = %path.display(), "send store initialized");
        Ok(Self {
            db,
            meta,
            sends,
            follows,
            profiles,
        })
    }

    /// Open the store if it exists, otherwise create it.
    pub fn open_or_init(path: &Path) -> Result<Self, StoreError> {
        if path.exists() {
            Self::open(path)
        } else {
            Self::init(path)
        }
    }

    /// The store format version recorded on disk.
    pub fn version(&self) -> Result<u32, StoreError> {
        let config = self
            .meta
            .get(META_CONFIG_KEY)?
            .ok_or_else(|| StoreError::InvalidFormat("Missing config".to_string()))?;
        let bytes: [u8; 4] = config
            .as_ref()
            .try_into()
            .map_err(|_| StoreError::InvalidFormat("Invalid config format".to_string()))?;
        Ok(u32::from_le_bytes(bytes))
    }

    // Sends

    /// Normalize a raw send, give it a fresh id, and persist it.
    pub fn add(&self, raw: &RawRecord, now: DateTime<Utc>) -> Result<SendRecord, StoreError> {
        let id = uuid::Uuid::new_v4().simple().to_string();
        let record = normalize_at(&id, raw, now);
        self.insert(&record)?;
        Ok(record)
    }

    /// Persist an already-normalized send under its own id, replacing any
    /// previous send with that id.
    pub fn insert(&self, record: &SendRecord) -> Result<(), StoreError> {
        trace!(id = %record.id, user = %record.user_id, "inserting send");
        self.sends.insert(&record.id, encode_value(record)?)?;
        self.db.persist(PersistMode::SyncAll)?;
        debug!(id = %record.id, "send stored");
        Ok(())
    }

    /// Get a send by id.
    pub fn get(&self, id: &str) -> Result<Option<SendRecord>, StoreError> {
        let Some(bytes) = self.sends.get(id)? else {
            return Ok(None);
        };
        Ok(Some(decode_value(&bytes)?))
    }

    /// Delete a send.
    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        if self.sends.get(id)?.is_none() {
            return Err(StoreError::SendNotFound(id.to_string()));
        }
        self.sends.remove(id)?;
        self.db.persist(PersistMode::SyncAll)?;
        info!(id = id, "send deleted");
        Ok(())
    }

    /// Make a send public or private. Returns the updated send.
    pub fn set_shared(&self, id: &str, shared: bool) -> Result<SendRecord, StoreError> {
        let mut record = self
            .get(id)?
            .ok_or_else(|| StoreError::SendNotFound(id.to_string()))?;
        record.is_shared = shared;
        self.insert(&record)?;
        Ok(record)
    }

    /// Every stored send, ordered by id.
    pub fn all(&self) -> Result<Vec<SendRecord>, StoreError> {
        let mut records = Vec::new();

        for kv in self.sends.prefix("") {
            let (_, value) = kv.into_inner()?;
            records.push(decode_value(&value)?);
        }

        debug!(count = records.len(), "loaded sends");
        Ok(records)
    }

    /// All sends owned by `user_id`, shared or not.
    pub fn for_user(&self, user_id: &str) -> Result<Vec<SendRecord>, StoreError> {
        Ok(self
            .all()?
            .into_iter()
            .filter(|r| r.user_id == user_id)
            .collect())
    }

    /// Sends visible in `scope`.
    pub fn in_scope(&self, scope: &Scope) -> Result<Vec<SendRecord>, StoreError> {
        Ok(self
            .all()?
            .into_iter()
            .filter(|r| scope.admits(r))
            .collect())
    }

    // Follow graph

    /// Record that `user` follows `target`.
    pub fn follow(&self, user: &str, target: &str, now: DateTime<Utc>) -> Result<(), StoreError> {
        if user == target {
            return Err(StoreError::SelfFollow(user.to_string()));
        }
        let key = edge_key(user, target)?;
        if self.follows.get(&key)?.is_some() {
            return Err(StoreError::AlreadyFollowing {
                user: user.to_string(),
                target: target.to_string(),
            });
        }

        self.follows.insert(&key, encode_value(&FollowEdge { since: now })?)?;
        self.db.persist(PersistMode::SyncAll)?;
        info!(user = user, target = target, "follow added");
        Ok(())
    }

    /// Stop `user` following `target`.
    pub fn unfollow(&self, user: &str, target: &str) -> Result<(), StoreError> {
        let key = edge_key(user, target)?;
        if self.follows.get(&key)?.is_none() {
            return Err(StoreError::NotFollowing {
                user: user.to_string(),
                target: target.to_string(),
            });
        }

        self.follows.remove(&key)?;
        self.db.persist(PersistMode::SyncAll)?;
        info!(user = user, target = target, "follow removed");
        Ok(())
    }

    /// When `user` started following `target`, if they do.
    pub fn follow_edge(&self, user: &str, target: &str) -> Result<Option<FollowEdge>, StoreError> {
        let Some(bytes) = self.follows.get(edge_key(user, target)?)? else {
            return Ok(None);
        };
        Ok(Some(decode_value(&bytes)?))
    }

    /// The ids of everyone `user` follows.
    pub fn following(&self, user: &str) -> Result<HashSet<String>, StoreError> {
        check_user_id(user)?;
        let prefix = format!("{}{}", user, EDGE_SEPARATOR);
        let mut targets = HashSet::new();

        for kv in self.follows.prefix(&prefix) {
            let key_bytes = kv.key()?;
            let key = String::from_utf8_lossy(&key_bytes);
            if let Some(target) = key.strip_prefix(&prefix) {
                targets.insert(target.to_string());
            }
        }

        trace!(user = user, count = targets.len(), "loaded following");
        Ok(targets)
    }

    /// Build the friends scope for `user` from their follow edges.
    pub fn friends_scope(&self, user: &str) -> Result<Scope, StoreError> {
        Ok(Scope::Friends {
            following: self.following(user)?,
        })
    }

    // Profiles

    /// Create or replace a climber's profile.
    pub fn put_profile(&self, profile: &UserProfile) -> Result<(), StoreError> {
        self.profiles
            .insert(&profile.user_id, encode_value(profile)?)?;
        self.db.persist(PersistMode::SyncAll)?;
        debug!(user = %profile.user_id, "profile stored");
        Ok(())
    }

    /// A climber's profile, if they saved one.
    pub fn profile(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError> {
        let Some(bytes) = self.profiles.get(user_id)? else {
            return Ok(None);
        };
        Ok(Some(decode_value(&bytes)?))
    }

    /// Every saved profile, ordered by user id.
    pub fn profiles(&self) -> Result<Vec<UserProfile>, StoreError> {
        let mut profiles = Vec::new();
        for kv in self.profiles.prefix("") {
            let (_, value) = kv.into_inner()?;
            profiles.push(decode_value(&value)?);
        }
        Ok(profiles)
    }

    /// Chosen display names keyed by user id.
    pub fn display_names(&self) -> Result<HashMap<String, String>, StoreError> {
        Ok(display_names(&self.profiles()?))
    }

    /// The profile registered under `email`. When several share it, the
    /// lowest user id wins.
    pub fn find_by_email(&self, email: &str) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.profiles()?.into_iter().find(|p| p.has_email(email)))
    }

    /// Follow whoever registered `email`. Returns their user id.
    pub fn follow_by_email(
        &self,
        user: &str,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<String, StoreError> {
        let target = self
            .find_by_email(email)?
            .ok_or_else(|| StoreError::EmailNotFound(normalize_email(email)))?;
        self.follow(user, &target.user_id, now)?;
        Ok(target.user_id)
    }
}

/// Ids containing the edge separator would alias other users' edges.
fn check_user_id(id: &str) -> Result<(), StoreError> {
    if id.contains(EDGE_SEPARATOR) {
        return Err(StoreError::InvalidUserId(id.escape_debug().to_string()));
    }
    Ok(())
}

fn edge_key(user: &str, target: &str) -> Result<String, StoreError> {
    check_user_id(user)?;
    check_user_id(target)?;
    Ok(format!("{}{}{}", user, EDGE_SEPARATOR, target))
}
