//! Shared test fixtures.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use dataset_cache::{CacheError, CacheKey, DatasetPath, DatasetStore, MemoryStore, Result, Workspace};

/// Dataset store that records every call and can delay or fail writes.
#[derive(Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    events: Mutex<Vec<String>>,
    write_delays: Mutex<HashMap<String, Duration>>,
    failing_writes: Mutex<HashSet<String>>,
    list_delay: Mutex<Option<Duration>>,
    list_calls: AtomicUsize,
}

#[allow(dead_code)]
impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, workspace: &Workspace, path: &DatasetPath, payload: &[u8]) {
        self.inner.insert(workspace, path, payload.to_vec());
    }

    pub fn delay_write(&self, key: &CacheKey, delay: Duration) {
        self.write_delays
            .lock()
            .unwrap()
            .insert(key.to_string(), delay);
    }

    pub fn fail_write(&self, key: &CacheKey) {
        self.failing_writes.lock().unwrap().insert(key.to_string());
    }

    pub fn delay_lists(&self, delay: Duration) {
        *self.list_delay.lock().unwrap() = Some(delay);
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn log(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl DatasetStore for RecordingStore {
    fn has(&self, workspace: &Workspace, path: &DatasetPath) -> bool {
        self.inner.has(workspace, path)
    }

    fn read(&self, workspace: &Workspace, path: &DatasetPath) -> Option<Vec<u8>> {
        self.inner.read(workspace, path)
    }

    async fn write(
        &self,
        workspace: &Workspace,
        path: &DatasetPath,
        bytes: Vec<u8>,
    ) -> Result<()> {
        let key = CacheKey::new(workspace, path).to_string();
        self.log(format!("start {}", key));

        let delay = self.write_delays.lock().unwrap().get(&key).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing_writes.lock().unwrap().contains(&key) {
            self.log(format!("fail {}", key));
            return Err(CacheError::Store(format!("rejected write to {}", key)));
        }

        self.inner.write(workspace, path, bytes).await?;
        self.log(format!("end {}", key));
        Ok(())
    }

    async fn list(&self, workspace: &Workspace, path: &DatasetPath) -> Result<Vec<String>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.list_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.inner.list(workspace, path).await
    }

    fn set_refetch_interval(&self, workspace: &Workspace, path: &DatasetPath, interval: Duration) {
        self.inner.set_refetch_interval(workspace, path, interval);
    }
}

#[allow(dead_code)]
pub fn ws(name: &str) -> Workspace {
    Workspace::new(name).unwrap()
}

#[allow(dead_code)]
pub fn path(raw: &str) -> DatasetPath {
    DatasetPath::parse(raw).unwrap()
}
