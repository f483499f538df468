use std::collections::BTreeMap;

use redis::{Commands, Connection};

use crate::error::{Error, Result};
use crate::store::KeyValueStore;

pub struct RedisStore {
    conn: Connection,
}

impl RedisStore {
    pub fn connect(url: &str) -> Result<Self> {
        let client =
            redis::Client::open(url).map_err(|err| Error::store(&format!("redis url {url}"), err))?;
        let conn = client
            .get_connection()
            .map_err(|err| Error::store(&format!("connect to redis at {url}"), err))?;
        Ok(Self { conn })
    }
}

impl KeyValueStore for RedisStore {
    fn sadd(&mut self, key: &str, member: &str) -> Result<()> {
        self.conn.sadd::<_, _, ()>(key, member)?;
        Ok(())
    }

    fn smembers(&mut self, key: &str) -> Result<Vec<String>> {
        Ok(self.conn.smembers(key)?)
    }

    fn replace_hash(&mut self, key: &str, fields: &[(&str, String)]) -> Result<()> {
        redis::pipe()
            .atomic()
            .del(key)
            .ignore()
            .hset_multiple(key, fields)
            .ignore()
            .query::<()>(&mut self.conn)?;
        Ok(())
    }

    fn hgetall(&mut self, key: &str) -> Result<BTreeMap<String, String>> {
        Ok(self.conn.hgetall(key)?)
    }

    fn hlen(&mut self, key: &str) -> Result<usize> {
        Ok(self.conn.hlen(key)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Needs a live server, e.g. WC_TEST_REDIS_URL=redis://127.0.0.1:6379
    fn test_store() -> Option<RedisStore> {
        let url = std::env::var("WC_TEST_REDIS_URL").ok()?;
        if url.trim().is_empty() {
            return None;
        }
        Some(RedisStore::connect(url.trim()).expect("test redis should accept connections"))
    }

    fn scoped(name: &str) -> String {
        format!("wc_snapshot_test:{}:{name}", std::process::id())
    }

    fn cleanup(store: &mut RedisStore, keys: &[&str]) {
        for key in keys {
            let _: redis::RedisResult<()> = store.conn.del(*key);
        }
    }

    #[test]
    fn set_members_are_unique() {
        let Some(mut store) = test_store() else {
            return;
        };
        let key = scoped("matches");
        store.sadd(&key, "1").unwrap();
        store.sadd(&key, "1").unwrap();
        store.sadd(&key, "2").unwrap();
        let mut members = store.smembers(&key).unwrap();
        members.sort();
        assert_eq!(members, vec!["1", "2"]);
        cleanup(&mut store, &[&key]);
    }

    #[test]
    fn replace_hash_drops_old_fields() {
        let Some(mut store) = test_store() else {
            return;
        };
        let key = scoped("hash");
        let missing = scoped("missing");
        store
            .replace_hash(&key, &[("a", "1".to_string()), ("b", "2".to_string())])
            .unwrap();
        store.replace_hash(&key, &[("a", "3".to_string())]).unwrap();
        let fields = store.hgetall(&key).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("a").map(String::as_str), Some("3"));
        assert_eq!(store.hlen(&key).unwrap(), 1);
        assert_eq!(store.hlen(&missing).unwrap(), 0);
        assert!(store.hgetall(&missing).unwrap().is_empty());
        cleanup(&mut store, &[&key]);
    }
}
