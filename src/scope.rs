//! Visibility scopes for feeds and leaderboards.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::record::SendRecord;

/// Which sends a viewer gets to see.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scope {
    /// Every shared send.
    World,
    /// Shared sends from the users the viewer follows.
    Friends { following: HashSet<String> },
    /// All of the viewer's own sends, shared or private.
    Mine { user_id: String },
}

/// The name of a scope without the data it needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ScopeKind {
    #[default]
    World,
    Friends,
    Mine,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown scope '{0}', expected one of: world, friends, mine")]
pub struct ParseScopeError(pub String);

impl FromStr for ScopeKind {
    type Err = ParseScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "world" => Ok(ScopeKind::World),
            "friends" => Ok(ScopeKind::Friends),
            "mine" => Ok(ScopeKind::Mine),
            _ => Err(ParseScopeError(s.to_string())),
        }
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeKind::World => write!(f, "world"),
            ScopeKind::Friends => write!(f, "friends"),
            ScopeKind::Mine => write!(f, "mine"),
        }
    }
}

impl Scope {
    pub fn kind(&self) -> ScopeKind {
        match self {
            Scope::World => ScopeKind::World,
            Scope::Friends { .. } => ScopeKind::Friends,
            Scope::Mine { .. } => ScopeKind::Mine,
        }
    }

    /// Whether `record` is visible in this scope.
    pub fn admits(&self, record: &SendRecord) -> bool {
        match self {
            Scope::World => record.is_shared,
            Scope::Friends { following } => {
                record.is_shared && following.contains(&record.user_id)
            }
            Scope::Mine { user_id } => record.user_id == *user_id,
        }
    }

    /// Keep only the records visible in this scope, preserving order.
    pub fn filter<'a, I>(&self, records: I) -> Vec<&'a SendRecord>
    where
        I: IntoIterator<Item = &'a SendRecord>,
    {
        records.into_iter().filter(|r| self.admits(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Status;
    use chrono::Utc;

    fn send(user: &str, shared: bool) -> SendRecord {
        SendRecord {
            id: format!("{}-{}", user, shared),
            color: "Pink".into(),
            grade: "V3".into(),
            status: Status::Send,
            attempts: "3".into(),
            feeling: String::new(),
            image_url: String::new(),
            user_id: user.into(),
            user_name: user.into(),
            user_email: String::new(),
            timestamp: Utc::now(),
            is_shared: shared,
        }
    }

    fn ids(records: &[&SendRecord]) -> Vec<String> {
        records.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn test_world_sees_shared_only() {
        let records = vec![send("a", true), send("a", false), send("b", true)];
        let visible = Scope::World.filter(&records);
        assert_eq!(ids(&visible), ["a-true", "b-true"]);
    }

    #[test]
    fn test_friends_needs_follow_and_share() {
        let records = vec![send("a", true), send("a", false), send("b", true)];
        let scope = Scope::Friends {
            following: HashSet::from(["a".to_string()]),
        };
        assert_eq!(ids(&scope.filter(&records)), ["a-true"]);
    }

    #[test]
    fn test_mine_includes_private() {
        let records = vec![send("a", true), send("a", false), send("b", true)];
        let scope = Scope::Mine {
            user_id: "a".into(),
        };
        assert_eq!(ids(&scope.filter(&records)), ["a-true", "a-false"]);
    }

    #[test]
    fn test_parse_scope_kind() {
        assert_eq!("world".parse::<ScopeKind>(), Ok(ScopeKind::World));
        assert_eq!("Friends".parse::<ScopeKind>(), Ok(ScopeKind::Friends));
        assert_eq!("mine".parse::<ScopeKind>(), Ok(ScopeKind::Mine));
        assert!("everyone".parse::<ScopeKind>().is_err());
        assert_eq!(ScopeKind::Mine.to_string(), "mine");
    }
}
