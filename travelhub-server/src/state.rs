//! Application state shared across handlers

use std::sync::Arc;

use travelhub_core::AppConfig;

use crate::auth::{PasswordHasher, SessionManager};
use crate::services::{Accounts, Rankings, Reviews};
use crate::store::Store;
use crate::uploads::UploadStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn Store>,
    config: AppConfig,
    accounts: Accounts,
    sessions: SessionManager,
    reviews: Reviews,
    rankings: Rankings,
}

impl AppState {
    /// Wire every service to one store.
    pub fn new(store: Arc<dyn Store>, config: AppConfig, hasher: PasswordHasher) -> Self {
        let uploads = UploadStore::new(config.uploads.static_dir.clone());
        Self {
            inner: Arc::new(AppStateInner {
                accounts: Accounts::new(store.clone(), hasher),
                sessions: SessionManager::new(store.clone(), config.session_ttl()),
                reviews: Reviews::new(store.clone(), uploads),
                rankings: Rankings::new(store.clone()),
                store,
                config,
            }),
        }
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.inner.store
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn accounts(&self) -> &Accounts {
        &self.inner.accounts
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.inner.sessions
    }

    pub fn reviews(&self) -> &Reviews {
        &self.inner.reviews
    }

    pub fn rankings(&self) -> &Rankings {
        &self.inner.rankings
    }
}
