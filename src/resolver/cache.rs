use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, SystemTime};

/// Cached resolution result for one service
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub config: HashMap<String, String>,
    pub secrets: HashMap<String, String>,
    pub last_refresh: SystemTime,
}

/// Per-service TTL cache.
///
/// Entries are replaced wholesale on refresh and never invalidated eagerly.
/// The lock is held only for lookups and inserts, not across fetches, so two
/// concurrent misses for the same service can both hit the backend; the last
/// writer wins. Secret values are expected to be stable within the TTL
/// window, so that race is accepted.
pub struct TtlCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl TtlCache {
    /// Create a cache with the given entry time-to-live
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Get the entry for a service if it is still fresh at `now`
    pub fn get_fresh(&self, service_name: &str, now: SystemTime) -> Option<CacheEntry> {
        let entries = self.entries.read().unwrap();
        let entry = entries.get(service_name)?;

        let age = now
            .duration_since(entry.last_refresh)
            .unwrap_or(Duration::ZERO);

        if age <= self.ttl {
            Some(entry.clone())
        } else {
            None
        }
    }

    /// Replace the entry for a service
    pub fn insert(
        &self,
        service_name: &str,
        config: HashMap<String, String>,
        secrets: HashMap<String, String>,
        now: SystemTime,
    ) {
        let entry = CacheEntry {
            config,
            secrets,
            last_refresh: now,
        };
        self.entries
            .write()
            .unwrap()
            .insert(service_name.to_string(), entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> (HashMap<String, String>, HashMap<String, String>) {
        let mut config = HashMap::new();
        config.insert("account".to_string(), "acct-1".to_string());
        let mut secrets = HashMap::new();
        secrets.insert("password".to_string(), "hunter2".to_string());
        (config, secrets)
    }

    #[test]
    fn test_fresh_entry_is_returned() {
        let cache = TtlCache::new(Duration::from_secs(300));
        let now = SystemTime::now();
        let (config, secrets) = sample_entry();

        cache.insert("snowflake", config.clone(), secrets.clone(), now);

        let entry = cache.get_fresh("snowflake", now).unwrap();
        assert_eq!(entry.config, config);
        assert_eq!(entry.secrets, secrets);
    }

    #[test]
    fn test_entry_at_exact_ttl_is_still_fresh() {
        let cache = TtlCache::new(Duration::from_secs(300));
        let now = SystemTime::now();
        let (config, secrets) = sample_entry();

        cache.insert("snowflake", config, secrets, now);

        let later = now + Duration::from_secs(300);
        assert!(cache.get_fresh("snowflake", later).is_some());
    }

    #[test]
    fn test_expired_entry_is_none() {
        let cache = TtlCache::new(Duration::from_secs(300));
        let now = SystemTime::now();
        let (config, secrets) = sample_entry();

        cache.insert("snowflake", config, secrets, now);

        let later = now + Duration::from_secs(301);
        assert!(cache.get_fresh("snowflake", later).is_none());
    }

    #[test]
    fn test_unknown_service_is_none() {
        let cache = TtlCache::new(Duration::from_secs(300));
        assert!(cache.get_fresh("gong", SystemTime::now()).is_none());
    }

    #[test]
    fn test_insert_replaces_wholesale() {
        let cache = TtlCache::new(Duration::from_secs(300));
        let now = SystemTime::now();
        let (config, secrets) = sample_entry();

        cache.insert("snowflake", config, secrets, now);
        cache.insert("snowflake", HashMap::new(), HashMap::new(), now);

        let entry = cache.get_fresh("snowflake", now).unwrap();
        assert!(entry.config.is_empty());
        assert!(entry.secrets.is_empty());
    }
}
