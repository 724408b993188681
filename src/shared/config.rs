use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfflineConfig {
    pub database: DatabaseConfig,
    pub sync: SyncConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Stable identifier for this client context; owns the drain lease.
    pub client_id: String,
    /// Age after which a persistently failing operation is dead-lettered.
    pub retention_secs: u64,
    /// Lifetime of the drain lease; stale leases are reclaimable after this.
    pub lease_ttl_secs: u64,
    pub auto_sync: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cached records older than this are treated as absent by reads.
    pub freshness_secs: u64,
}

impl Default for OfflineConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: default_database_url(),
                max_connections: 5,
            },
            sync: SyncConfig {
                client_id: Uuid::new_v4().to_string(),
                retention_secs: 7 * 24 * 60 * 60,
                lease_ttl_secs: 30,
                auto_sync: true,
            },
            cache: CacheConfig {
                freshness_secs: 5 * 60,
            },
        }
    }
}

impl OfflineConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("DEVTRACK_DATABASE_URL") {
            if !v.trim().is_empty() {
                cfg.database.url = v;
            }
        }
        if let Ok(v) = std::env::var("DEVTRACK_DB_MAX_CONNECTIONS") {
            if let Some(value) = parse_u32(&v) {
                cfg.database.max_connections = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("DEVTRACK_CLIENT_ID") {
            if !v.trim().is_empty() {
                cfg.sync.client_id = v;
            }
        }
        if let Ok(v) = std::env::var("DEVTRACK_RETENTION_SECS") {
            if let Some(value) = parse_u64(&v) {
                cfg.sync.retention_secs = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("DEVTRACK_LEASE_TTL_SECS") {
            if let Some(value) = parse_u64(&v) {
                cfg.sync.lease_ttl_secs = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("DEVTRACK_AUTO_SYNC") {
            cfg.sync.auto_sync = parse_bool(&v, cfg.sync.auto_sync);
        }
        if let Ok(v) = std::env::var("DEVTRACK_CACHE_FRESHNESS_SECS") {
            if let Some(value) = parse_u64(&v) {
                cfg.cache.freshness_secs = value.max(1);
            }
        }

        cfg
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.database.url.trim().is_empty() {
            return Err("Database url must not be empty".to_string());
        }
        if self.database.max_connections == 0 {
            return Err("Database max_connections must be greater than 0".to_string());
        }
        if self.sync.client_id.trim().is_empty() {
            return Err("Sync client_id must not be empty".to_string());
        }
        if self.sync.retention_secs == 0 {
            return Err("Sync retention_secs must be greater than 0".to_string());
        }
        if self.sync.lease_ttl_secs == 0 {
            return Err("Sync lease_ttl_secs must be greater than 0".to_string());
        }
        if self.cache.freshness_secs == 0 {
            return Err("Cache freshness_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

fn default_database_url() -> String {
    let dir = dirs::data_dir()
        .map(|d| d.join("devtrack"))
        .unwrap_or_else(|| std::path::PathBuf::from("./data"));
    format!("sqlite:{}", dir.join("offline.db").display())
}

fn parse_bool(s: &str, default: bool) -> bool {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

fn parse_u32(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok()
}

fn parse_u64(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}
