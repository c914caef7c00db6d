use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
    time::Duration,
};

use tokio::time::Instant;

use super::WindowHit;

/// In-process sliding-window log, one timestamp queue per key.
#[derive(Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, VecDeque<Instant>>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn hit(&self, key: &str, window: Duration, limit: u32) -> WindowHit {
        let now = Instant::now();
        let mut entries = self.lock();
        let log = entries.entry(key.to_string()).or_default();

        prune(log, now, window);

        let allowed = (log.len() as u32) < limit;
        if allowed {
            log.push_back(now);
        }

        let oldest = log.front().copied().unwrap_or(now);
        let reset_after = window.saturating_sub(now.duration_since(oldest));

        WindowHit {
            allowed,
            count: log.len() as u32,
            reset_after,
        }
    }

    pub fn count(&self, key: &str, period: Duration) -> u32 {
        let now = Instant::now();
        let mut entries = self.lock();

        match entries.get_mut(key) {
            Some(log) => {
                prune(log, now, period);
                log.len() as u32
            }
            None => 0,
        }
    }

    pub fn record(&self, key: &str, period: Duration) -> u32 {
        let now = Instant::now();
        let mut entries = self.lock();
        let log = entries.entry(key.to_string()).or_default();

        prune(log, now, period);
        log.push_back(now);

        log.len() as u32
    }

    pub fn remove(&self, keys: &[String]) {
        let mut entries = self.lock();
        for key in keys {
            entries.remove(key);
        }
    }

    /// Drops timestamps older than `max_age` and forgets empty keys.
    ///
    /// Returns the number of keys removed.
    pub fn purge(&self, max_age: Duration) -> usize {
        let now = Instant::now();
        let mut entries = self.lock();
        let before = entries.len();

        entries.retain(|_, log| {
            prune(log, now, max_age);
            !log.is_empty()
        });

        before - entries.len()
    }

    pub fn tracked_keys(&self) -> usize {
        self.lock().len()
    }
}

fn prune(log: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(at) = log.front() {
        if now.duration_since(*at) >= window {
            log.pop_front();
        } else {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::MemoryBackend;

    /// Expect requests beyond the limit to be rejected within the window
    #[tokio::test(start_paused = true)]
    async fn rejects_requests_over_limit() {
        let backend = MemoryBackend::new();
        let window = Duration::from_secs(60);

        assert!(backend.hit("k", window, 2).allowed);
        assert!(backend.hit("k", window, 2).allowed);

        let hit = backend.hit("k", window, 2);
        assert!(!hit.allowed);
        assert_eq!(hit.count, 2);
        assert_eq!(hit.reset_after, window);
    }

    /// Expect old requests to slide out of the window
    #[tokio::test(start_paused = true)]
    async fn slides_window() {
        let backend = MemoryBackend::new();
        let window = Duration::from_secs(60);

        backend.hit("k", window, 1);
        tokio::time::advance(Duration::from_secs(30)).await;
        let blocked = backend.hit("k", window, 1);
        assert!(!blocked.allowed);
        assert_eq!(blocked.reset_after, Duration::from_secs(30));

        tokio::time::advance(Duration::from_secs(31)).await;
        assert!(backend.hit("k", window, 1).allowed);
    }

    /// Expect purge to forget keys without recent activity
    #[tokio::test(start_paused = true)]
    async fn purges_expired_keys() {
        let backend = MemoryBackend::new();
        backend.hit("old", Duration::from_secs(60), 5);
        tokio::time::advance(Duration::from_secs(120)).await;
        backend.hit("fresh", Duration::from_secs(60), 5);

        let removed = backend.purge(Duration::from_secs(60));

        assert_eq!(removed, 1);
        assert_eq!(backend.tracked_keys(), 1);
    }
}
