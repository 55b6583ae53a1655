//! In-crate test doubles for the session ports.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use warden_domain::{Credentials, TokenPair};

use crate::ports::{AuthApi, AuthApiError, Clock, KeyValueStore, StoreError};

/// Token whose payload is `{"sub":"a"}`.
pub const SCENARIO_TOKEN: &str = "h.eyJzdWIiOiJhIn0.s";

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn insert(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    pub fn snapshot(&self) -> HashMap<String, String> {
        self.values.lock().unwrap().clone()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.value(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.insert(key, value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}

/// Backend double answering from queued responses and counting calls.
#[derive(Debug, Default)]
pub struct StubApi {
    login_responses: Mutex<VecDeque<Result<TokenPair, AuthApiError>>>,
    refresh_responses: Mutex<VecDeque<Result<TokenPair, AuthApiError>>>,
    logout_response: Mutex<Option<AuthApiError>>,
    pub login_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    pub logout_calls: AtomicUsize,
    pub last_refresh_token: Mutex<Option<String>>,
}

impl StubApi {
    pub fn on_login(&self, response: Result<TokenPair, AuthApiError>) {
        self.login_responses.lock().unwrap().push_back(response);
    }

    pub fn on_refresh(&self, response: Result<TokenPair, AuthApiError>) {
        self.refresh_responses.lock().unwrap().push_back(response);
    }

    pub fn fail_logout(&self, error: AuthApiError) {
        *self.logout_response.lock().unwrap() = Some(error);
    }

    pub fn refresh_count(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }
}

fn unexpected(call: &str) -> AuthApiError {
    AuthApiError::Transport(format!("unexpected {call} call"))
}

#[async_trait]
impl AuthApi for StubApi {
    async fn login(&self, _credentials: &Credentials) -> Result<TokenPair, AuthApiError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        self.login_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unexpected("login")))
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthApiError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_refresh_token.lock().unwrap() = Some(refresh_token.to_string());
        tokio::task::yield_now().await;
        self.refresh_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unexpected("refresh")))
    }

    async fn logout(&self) -> Result<(), AuthApiError> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        self.logout_response.lock().unwrap().clone().map_or(Ok(()), Err)
    }
}

#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2026, 5, 4, 9, 30, 0).unwrap()),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
