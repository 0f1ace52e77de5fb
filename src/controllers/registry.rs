use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use super::admin_view::AdminView;
use crate::auth::csrf::generate_token;

const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(2 * 60 * 60);

#[derive(Debug)]
struct Entry {
    view: Arc<AdminView>,
    last_seen: Instant,
}

/// Server-side home of each logged-in admin's [`AdminView`].
///
/// The cookie only carries the opaque view id; the backend bearer token stays
/// inside the view's service handle. Views not touched within the idle timeout
/// are dropped, along with their token.
#[derive(Debug, Clone)]
pub struct ViewRegistry {
    idle_timeout: Duration,
    views: Arc<Mutex<HashMap<String, Entry>>>,
}

impl Default for ViewRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TIMEOUT)
    }
}

impl ViewRegistry {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            idle_timeout,
            views: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.views.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn is_idle(&self, entry: &Entry, now: Instant) -> bool {
        now.duration_since(entry.last_seen) >= self.idle_timeout
    }

    /// Store a new view and sweep out idle ones.
    pub fn insert(&self, view: AdminView) -> String {
        let id = generate_token();
        let now = Instant::now();
        let mut views = self.lock();
        let before = views.len();
        views.retain(|_, entry| !self.is_idle(entry, now));
        if views.len() < before {
            log::info!("[ViewRegistry] Evicted {} idle views", before - views.len());
        }
        views.insert(id.clone(), Entry { view: Arc::new(view), last_seen: now });
        id
    }

    /// Look up a view and mark it as seen. An idle view is evicted instead.
    pub fn get(&self, id: &str) -> Option<Arc<AdminView>> {
        let now = Instant::now();
        let mut views = self.lock();
        let idle = self.is_idle(views.get(id)?, now);
        if idle {
            views.remove(id);
            return None;
        }
        let entry = views.get_mut(id)?;
        entry.last_seen = now;
        Some(entry.view.clone())
    }

    pub fn remove(&self, id: &str) -> Option<Arc<AdminView>> {
        self.lock().remove(id).map(|entry| entry.view)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
