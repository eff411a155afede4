use std::sync::Arc;

use crate::auth::RefreshTokens;
use crate::configuration::{ApplicationSettings, AuthSettings};
use crate::middleware::HitCounter;
use crate::store::{AccountStore, ChirpStore, RefreshTokenStore};

/// Shared, explicitly constructed application state.
/// Settings are read-only; the stores own all mutable state.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthSettings,
    pub application: ApplicationSettings,
    pub accounts: Arc<dyn AccountStore>,
    pub chirps: Arc<dyn ChirpStore>,
    pub refresh_tokens: RefreshTokens,
    pub hits: HitCounter,
}

impl AppState {
    pub fn new<S>(auth: AuthSettings, application: ApplicationSettings, store: S) -> Self
    where
        S: AccountStore + ChirpStore + RefreshTokenStore + 'static,
    {
        let store = Arc::new(store);
        Self {
            auth,
            application,
            accounts: store.clone(),
            chirps: store.clone(),
            refresh_tokens: RefreshTokens::new(store),
            hits: HitCounter::new(),
        }
    }
}
