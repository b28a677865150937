//! Nicknames registered per authenticated user

use dashmap::DashMap;

use crate::validation::Nickname;

/// user id -> nickname. A user without an entry has not picked a nickname
/// yet and may not open a game connection.
#[derive(Debug, Default)]
pub struct PlayerRegistry {
    nicknames: DashMap<String, Nickname>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace the nickname; returns the previous one
    pub fn register(&self, user_id: &str, nickname: Nickname) -> Option<Nickname> {
        self.nicknames.insert(user_id.to_string(), nickname)
    }

    pub fn nickname(&self, user_id: &str) -> Option<Nickname> {
        self.nicknames.get(user_id).map(|n| n.value().clone())
    }

    pub fn len(&self) -> usize {
        self.nicknames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nicknames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_replace() {
        let registry = PlayerRegistry::new();
        assert!(registry.nickname("u1").is_none());

        let first = Nickname::parse("alice").unwrap();
        assert!(registry.register("u1", first.clone()).is_none());
        assert_eq!(registry.nickname("u1"), Some(first.clone()));

        let second = Nickname::parse("alice2").unwrap();
        assert_eq!(registry.register("u1", second.clone()), Some(first));
        assert_eq!(registry.nickname("u1"), Some(second));
        assert_eq!(registry.len(), 1);
    }
}
