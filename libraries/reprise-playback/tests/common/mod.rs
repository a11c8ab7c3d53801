//! Shared fakes for playback integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use reprise_core::{KeyValueStore, RepriseError, SharedStore, StorageChange};
use reprise_playback::{MediaElement, ScrollTarget};
use reprise_storage::MemoryStore;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

/// In-memory store plus a shared handle to it
pub fn memory_store() -> (Arc<MemoryStore>, SharedStore) {
    let store = Arc::new(MemoryStore::new());
    let shared: SharedStore = store.clone();
    (store, shared)
}

#[derive(Debug, Clone)]
struct MediaState {
    current_time: f64,
    duration: f64,
    paused: bool,
    rate: f64,
}

/// Video element stand-in
pub struct FakeMedia {
    state: Mutex<MediaState>,
}

impl FakeMedia {
    /// Paused media at position 0
    pub fn new(duration: f64) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(MediaState {
                current_time: 0.0,
                duration,
                paused: true,
                rate: 1.0,
            }),
        })
    }

    pub fn set_time(&self, seconds: f64) {
        self.state.lock().unwrap().current_time = seconds;
    }

    pub fn set_duration(&self, seconds: f64) {
        self.state.lock().unwrap().duration = seconds;
    }

    pub fn current_time_value(&self) -> f64 {
        self.state.lock().unwrap().current_time
    }

    pub fn paused(&self) -> bool {
        self.state.lock().unwrap().paused
    }

    pub fn rate(&self) -> f64 {
        self.state.lock().unwrap().rate
    }
}

impl MediaElement for FakeMedia {
    fn current_time(&self) -> f64 {
        self.state.lock().unwrap().current_time
    }

    fn set_current_time(&self, seconds: f64) {
        self.state.lock().unwrap().current_time = seconds;
    }

    fn duration(&self) -> f64 {
        self.state.lock().unwrap().duration
    }

    fn is_paused(&self) -> bool {
        self.state.lock().unwrap().paused
    }

    fn play(&self) {
        self.state.lock().unwrap().paused = false;
    }

    fn pause(&self) {
        self.state.lock().unwrap().paused = true;
    }

    fn set_playback_rate(&self, rate: f64) {
        self.state.lock().unwrap().rate = rate;
    }
}

/// Records every scroll it is asked to perform
#[derive(Default)]
pub struct RecordingViewport {
    scrolls: Mutex<Vec<f64>>,
}

impl RecordingViewport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn scrolls(&self) -> Vec<f64> {
        self.scrolls.lock().unwrap().clone()
    }
}

impl ScrollTarget for RecordingViewport {
    fn scroll_to(&self, offset: f64) {
        self.scrolls.lock().unwrap().push(offset);
    }
}

/// Store whose every operation fails, as when quota is exhausted
pub struct FailingStore {
    changes: broadcast::Sender<StorageChange>,
}

impl FailingStore {
    pub fn shared() -> SharedStore {
        let (changes, _) = broadcast::channel(4);
        Arc::new(Self { changes })
    }
}

fn unavailable<T>() -> reprise_core::Result<T> {
    Err(RepriseError::storage("quota exceeded"))
}

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> reprise_core::Result<Option<Value>> {
        unavailable()
    }

    async fn get_all(&self) -> reprise_core::Result<HashMap<String, Value>> {
        unavailable()
    }

    async fn set(&self, _key: &str, _value: Value) -> reprise_core::Result<()> {
        unavailable()
    }

    async fn set_many(&self, _entries: Vec<(String, Value)>) -> reprise_core::Result<()> {
        unavailable()
    }

    async fn remove(&self, _key: &str) -> reprise_core::Result<()> {
        unavailable()
    }

    async fn clear(&self) -> reprise_core::Result<()> {
        unavailable()
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
        self.changes.subscribe()
    }
}
