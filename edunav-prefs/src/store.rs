//! Key/value store abstraction and the in-memory implementation

use compact_str::CompactString;
use indexmap::IndexMap;

use crate::PrefResult;

/// Durable string-keyed storage. Values are opaque strings; callers encode
/// structured data (e.g. JSON lists) themselves.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Option<String>;

    /// Writes `value` under `key`. Implementations persist before returning.
    fn set(&mut self, key: &str, value: String) -> PrefResult<()>;

    fn remove(&mut self, key: &str) -> PrefResult<()>;
}

/// Non-durable store, used for tests and when no data directory exists.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: IndexMap<CompactString, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<CompactString>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> PrefResult<()> {
        self.entries.insert(CompactString::from(key), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> PrefResult<()> {
        self.entries.shift_remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_returns_value() {
        let mut store = MemoryStore::new();
        store.set("theme", "dark".into()).unwrap();
        assert_eq!(store.get("theme").as_deref(), Some("dark"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_drops_key() {
        let mut store = MemoryStore::with_entries([("theme", "light")]);
        store.remove("theme").unwrap();
        assert!(store.get("theme").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn overwrite_keeps_single_entry() {
        let mut store = MemoryStore::new();
        store.set("downloads", "[]".into()).unwrap();
        store.set("downloads", "[\"1\"]".into()).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("downloads").as_deref(), Some("[\"1\"]"));
    }
}
