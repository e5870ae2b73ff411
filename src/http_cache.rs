use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED};
use serde::{Deserialize, Serialize};
use tracing::debug;

const CACHE_VERSION: u32 = 1;
const CACHE_DIR: &str = "mlb_streak_terminal";
const CACHE_FILE: &str = "http_cache.json";
// Entries untouched for this long are dropped on load and on flush.
const MAX_ENTRY_AGE: Duration = Duration::from_secs(30 * 24 * 60 * 60);

static CACHE: Mutex<Option<CacheState>> = Mutex::new(None);

#[derive(Debug, Default)]
struct CacheState {
    file: HttpCacheFile,
    dirty: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct HttpCacheFile {
    version: u32,
    entries: HashMap<String, CacheEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    body: String,
    etag: Option<String>,
    last_modified: Option<String>,
    fetched_at: u64,
}

impl CacheEntry {
    fn is_fresh(&self, ttl: Duration, now: u64) -> bool {
        now.saturating_sub(self.fetched_at) < ttl.as_secs()
    }
}

/// Returns the body for `url`, serving it from the cache while it is younger
/// than `ttl` and revalidating with the stored validators once it is not.
pub fn fetch_json_cached(client: &Client, url: &str, ttl: Duration) -> Result<String> {
    let now = system_time_to_secs(SystemTime::now()).unwrap_or_default();
    let cached_entry = {
        let mut guard = CACHE.lock().expect("http cache lock poisoned");
        let cache = guard.get_or_insert_with(load_cache_state);
        cache.file.entries.get(url).cloned()
    };

    if let Some(entry) = cached_entry.as_ref() {
        if entry.is_fresh(ttl, now) {
            debug!(url, "http cache hit");
            return Ok(entry.body.clone());
        }
    }

    let mut req = client.get(url);
    if let Some(entry) = cached_entry.as_ref() {
        if let Some(etag) = entry.etag.as_ref() {
            req = req.header(IF_NONE_MATCH, etag);
        }
        if let Some(last_modified) = entry.last_modified.as_ref() {
            req = req.header(IF_MODIFIED_SINCE, last_modified);
        }
    }

    let resp = req.send().context("request failed")?;
    let status = resp.status();
    let headers = resp.headers().clone();
    if status == StatusCode::NOT_MODIFIED {
        if let Some(mut entry) = cached_entry {
            debug!(url, "http cache revalidated");
            entry.fetched_at = now;
            let body = entry.body.clone();
            store_entry(url, entry);
            return Ok(body);
        }
        return Err(anyhow::anyhow!("received 304 without cache body"));
    }

    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow::anyhow!("http {}: {}", status, truncate(&body, 200)));
    }

    let etag = headers
        .get(ETAG)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());
    let last_modified = headers
        .get(LAST_MODIFIED)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());

    store_entry(
        url,
        CacheEntry {
            body: body.clone(),
            etag,
            last_modified,
            fetched_at: now,
        },
    );
    Ok(body)
}

/// Writes pending entries to disk. Called once per batch of fetches.
pub fn flush() -> Result<()> {
    let mut guard = CACHE.lock().expect("http cache lock poisoned");
    let Some(cache) = guard.as_mut() else {
        return Ok(());
    };
    if !cache.dirty {
        return Ok(());
    }
    cache.file.version = CACHE_VERSION;
    let now = system_time_to_secs(SystemTime::now()).unwrap_or_default();
    let evicted = prune_expired(&mut cache.file.entries, now, MAX_ENTRY_AGE);
    if evicted > 0 {
        debug!(evicted, "http cache evicted old entries");
    }
    save_cache_file(&cache.file)?;
    cache.dirty = false;
    Ok(())
}

pub fn app_cache_dir() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(CACHE_DIR));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(CACHE_DIR))
}

fn store_entry(key: &str, entry: CacheEntry) {
    let mut guard = CACHE.lock().expect("http cache lock poisoned");
    let cache = guard.get_or_insert_with(load_cache_state);
    cache.file.entries.insert(key.to_string(), entry);
    cache.dirty = true;
}

fn load_cache_state() -> CacheState {
    let mut file = load_cache_file();
    let now = system_time_to_secs(SystemTime::now()).unwrap_or_default();
    let evicted = prune_expired(&mut file.entries, now, MAX_ENTRY_AGE);
    CacheState {
        file,
        dirty: evicted > 0,
    }
}

/// Drops entries fetched more than `max_age` before `now`. Returns how many went.
fn prune_expired(entries: &mut HashMap<String, CacheEntry>, now: u64, max_age: Duration) -> usize {
    let before = entries.len();
    entries.retain(|_, entry| entry.is_fresh(max_age, now));
    before - entries.len()
}

fn load_cache_file() -> HttpCacheFile {
    let Some(path) = cache_path() else {
        return HttpCacheFile::default();
    };
    let Ok(raw) = fs::read_to_string(path) else {
        return HttpCacheFile::default();
    };
    let cache = serde_json::from_str::<HttpCacheFile>(&raw).unwrap_or_default();
    if cache.version != CACHE_VERSION {
        return HttpCacheFile::default();
    }
    cache
}

fn save_cache_file(cache: &HttpCacheFile) -> Result<()> {
    let Some(path) = cache_path() else {
        return Ok(());
    };
    let Some(dir) = path.parent() else {
        return Ok(());
    };
    fs::create_dir_all(dir).ok();
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string(cache).context("serialize http cache")?;
    fs::write(&tmp, json).context("write http cache")?;
    fs::rename(&tmp, &path).context("swap http cache")?;
    Ok(())
}

fn cache_path() -> Option<PathBuf> {
    app_cache_dir().map(|dir| dir.join(CACHE_FILE))
}

fn system_time_to_secs(time: SystemTime) -> Option<u64> {
    time.duration_since(UNIX_EPOCH).ok().map(|d| d.as_secs())
}

fn truncate(body: &str, max: usize) -> &str {
    match body.char_indices().nth(max) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
