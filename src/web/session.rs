use std::collections::HashMap;
use std::sync::RwLock;

use rand::thread_rng;
use uuid::Uuid;

use crate::judging::{Category, ShuffleCache};

/// The authenticated identity attached to a session token.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: i32,
    pub name: String,
    pub is_admin: bool,
}

struct Session {
    user: CurrentUser,
    shuffles: HashMap<Category, ShuffleCache>,
}

/// In-memory session store: opaque token -> identity, plus the per-(judge,
/// category) cached ballot shuffle. Destroying a session drops its cached
/// orders with it.
#[derive(Default)]
pub struct SessionStore {
    inner: RwLock<HashMap<Uuid, Session>>,
}

impl SessionStore {
    pub fn create(&self, user: CurrentUser) -> Uuid {
        let token = Uuid::new_v4();
        self.inner
            .write()
            .expect("session store lock poisoned")
            .insert(
                token,
                Session {
                    user,
                    shuffles: HashMap::new(),
                },
            );
        token
    }

    pub fn current_user(&self, token: Option<&str>) -> Option<CurrentUser> {
        let token = Uuid::parse_str(token?).ok()?;
        self.inner
            .read()
            .expect("session store lock poisoned")
            .get(&token)
            .map(|session| session.user.clone())
    }

    pub fn destroy(&self, token: Option<&str>) {
        if let Some(token) = token.and_then(|t| Uuid::parse_str(t).ok()) {
            self.inner
                .write()
                .expect("session store lock poisoned")
                .remove(&token);
        }
    }

    /// The session-stable shuffled order for a judge with no saved ranking.
    /// A fresh shuffle is drawn only when no cached order exists for this
    /// candidate set; a changed candidate set invalidates the cache.
    pub fn shuffled_order(
        &self,
        token: &str,
        category: Category,
        candidate_ids: &[i32],
    ) -> Vec<i32> {
        let Ok(token) = Uuid::parse_str(token) else {
            return candidate_ids.to_vec();
        };
        let mut inner = self.inner.write().expect("session store lock poisoned");
        let Some(session) = inner.get_mut(&token) else {
            return candidate_ids.to_vec();
        };

        match session.shuffles.get(&category) {
            Some(cache) if cache.matches(candidate_ids) => cache.order().to_vec(),
            _ => {
                let cache = ShuffleCache::draw(candidate_ids, &mut thread_rng());
                let order = cache.order().to_vec();
                session.shuffles.insert(category, cache);
                order
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn judge() -> CurrentUser {
        CurrentUser {
            id: 1,
            name: String::from("alex"),
            is_admin: false,
        }
    }

    #[test]
    fn shuffled_order_is_stable_within_a_session() {
        let store = SessionStore::default();
        let token = store.create(judge()).to_string();
        let first = store.shuffled_order(&token, Category::Adult, &[1, 2, 3, 4, 5]);
        let second = store.shuffled_order(&token, Category::Adult, &[1, 2, 3, 4, 5]);
        assert_eq!(first, second);
    }

    #[test]
    fn categories_cache_independently() {
        let store = SessionStore::default();
        let token = store.create(judge()).to_string();
        let adult = store.shuffled_order(&token, Category::Adult, &[1, 2, 3]);
        let youth = store.shuffled_order(&token, Category::Youth, &[7, 8, 9]);
        let mut sorted = youth.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![7, 8, 9]);
        assert_eq!(adult, store.shuffled_order(&token, Category::Adult, &[1, 2, 3]));
    }

    #[test]
    fn changed_candidate_set_redraws() {
        let store = SessionStore::default();
        let token = store.create(judge()).to_string();
        store.shuffled_order(&token, Category::Adult, &[1, 2, 3]);
        let redrawn = store.shuffled_order(&token, Category::Adult, &[1, 2, 3, 4]);
        let mut sorted = redrawn.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![1, 2, 3, 4]);
    }

    #[test]
    fn destroy_clears_identity() {
        let store = SessionStore::default();
        let token = store.create(judge()).to_string();
        assert!(store.current_user(Some(&token)).is_some());
        store.destroy(Some(&token));
        assert!(store.current_user(Some(&token)).is_none());
    }

    #[test]
    fn garbage_token_is_anonymous() {
        let store = SessionStore::default();
        assert!(store.current_user(Some("not-a-uuid")).is_none());
        assert!(store.current_user(None).is_none());
    }
}
