//! Recording fakes for the tether-core collaborator traits.
//!
//! Every fake appends to one shared call log so tests can assert ordering
//! across resources (cache before session before realtime).

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;

use tether_core::{
    CacheError, ChannelState, QueryCache, QueryKey, QuerySelector, RealtimeChannel,
    RealtimeClient, RealtimeError, Session, SessionError, SessionProvider,
};

/// Install a test subscriber once; repeat calls are no-ops.
/// Run tests with `RUST_LOG=tether_health=debug` to see event flow.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn new_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn calls(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

pub fn count_calls(log: &CallLog, prefix: &str) -> usize {
    log.lock()
        .unwrap()
        .iter()
        .filter(|call| call.starts_with(prefix))
        .count()
}

pub struct FakeCache {
    log: CallLog,
    active: Mutex<Vec<QueryKey>>,
    fetching: Mutex<Vec<QueryKey>>,
    fail_invalidate: AtomicBool,
}

impl FakeCache {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            active: Mutex::new(Vec::new()),
            fetching: Mutex::new(Vec::new()),
            fail_invalidate: AtomicBool::new(false),
        }
    }

    pub fn set_active(&self, keys: Vec<QueryKey>) {
        *self.active.lock().unwrap() = keys;
    }

    pub fn set_fetching(&self, keys: Vec<QueryKey>) {
        *self.fetching.lock().unwrap() = keys;
    }

    pub fn fail_next_invalidate(&self) {
        self.fail_invalidate.store(true, Ordering::SeqCst);
    }
}

impl QueryCache for FakeCache {
    fn invalidate(&self, selector: QuerySelector) -> BoxFuture<'_, Result<(), CacheError>> {
        self.log
            .lock()
            .unwrap()
            .push(format!("cache.invalidate:{selector:?}"));
        let fail = self.fail_invalidate.swap(false, Ordering::SeqCst);
        Box::pin(async move {
            if fail {
                Err(CacheError::Backend("injected invalidate failure".into()))
            } else {
                Ok(())
            }
        })
    }

    fn refetch(
        &self,
        selector: QuerySelector,
        active_only: bool,
    ) -> BoxFuture<'_, Result<(), CacheError>> {
        self.log
            .lock()
            .unwrap()
            .push(format!("cache.refetch:{selector:?}:active={active_only}"));
        Box::pin(async { Ok(()) })
    }

    fn cancel(&self, key: &QueryKey) -> BoxFuture<'_, Result<(), CacheError>> {
        self.log.lock().unwrap().push(format!("cache.cancel:{key}"));
        Box::pin(async { Ok(()) })
    }

    fn active_keys(&self) -> Vec<QueryKey> {
        self.active.lock().unwrap().clone()
    }

    fn fetching_keys(&self) -> Vec<QueryKey> {
        self.fetching.lock().unwrap().clone()
    }
}

pub struct FakeSessionProvider {
    log: CallLog,
    session: Mutex<Option<Session>>,
    fail: AtomicBool,
}

impl FakeSessionProvider {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            session: Mutex::new(Some(Session {
                user_id: "user-1".to_string(),
                expires_at: None,
            })),
            fail: AtomicBool::new(false),
        }
    }

    pub fn set_session(&self, session: Option<Session>) {
        *self.session.lock().unwrap() = session;
    }

    pub fn expire(&self) {
        self.set_session(None);
    }

    pub fn fail_next_lookup(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

impl SessionProvider for FakeSessionProvider {
    fn current_session(&self) -> BoxFuture<'_, Result<Option<Session>, SessionError>> {
        self.log.lock().unwrap().push("session.current".to_string());
        let fail = self.fail.swap(false, Ordering::SeqCst);
        let session = self.session.lock().unwrap().clone();
        Box::pin(async move {
            if fail {
                Err(SessionError::Unavailable("injected auth outage".into()))
            } else {
                Ok(session)
            }
        })
    }
}

pub struct FakeChannel {
    topic: String,
    state: Mutex<ChannelState>,
    log: CallLog,
}

impl FakeChannel {
    pub fn new(topic: &str, state: ChannelState, log: CallLog) -> Arc<Self> {
        Arc::new(Self {
            topic: topic.to_string(),
            state: Mutex::new(state),
            log,
        })
    }

    pub fn set_state(&self, state: ChannelState) {
        *self.state.lock().unwrap() = state;
    }
}

impl RealtimeChannel for FakeChannel {
    fn topic(&self) -> &str {
        &self.topic
    }

    fn state(&self) -> ChannelState {
        *self.state.lock().unwrap()
    }

    fn subscribe(&self) -> BoxFuture<'_, Result<(), RealtimeError>> {
        self.log
            .lock()
            .unwrap()
            .push(format!("realtime.subscribe:{}", self.topic));
        *self.state.lock().unwrap() = ChannelState::Joining;
        Box::pin(async { Ok(()) })
    }
}

pub struct FakeRealtimeClient {
    log: CallLog,
    channels: Mutex<Vec<Arc<FakeChannel>>>,
    fail_connect: AtomicBool,
}

impl FakeRealtimeClient {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            channels: Mutex::new(Vec::new()),
            fail_connect: AtomicBool::new(false),
        }
    }

    pub fn add_channel(&self, channel: Arc<FakeChannel>) {
        self.channels.lock().unwrap().push(channel);
    }

    pub fn fail_next_connect(&self) {
        self.fail_connect.store(true, Ordering::SeqCst);
    }
}

impl RealtimeClient for FakeRealtimeClient {
    fn connect(&self) -> BoxFuture<'_, Result<(), RealtimeError>> {
        self.log.lock().unwrap().push("realtime.connect".to_string());
        let fail = self.fail_connect.swap(false, Ordering::SeqCst);
        Box::pin(async move {
            if fail {
                Err(RealtimeError::ConnectFailed("injected socket failure".into()))
            } else {
                Ok(())
            }
        })
    }

    fn channels(&self) -> Vec<Arc<dyn RealtimeChannel>> {
        self.channels
            .lock()
            .unwrap()
            .iter()
            .map(|c| Arc::clone(c) as Arc<dyn RealtimeChannel>)
            .collect()
    }
}

/// Let spawned fire-and-gate tasks run to completion on the
/// current-thread test runtime.
pub async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}
