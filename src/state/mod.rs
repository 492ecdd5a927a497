mod phrase_store;

pub(crate) use phrase_store::{LoadStatus, PhraseStore};

use crate::api::ApiClient;
use leptos::prelude::*;

#[derive(Clone, Copy)]
pub(crate) struct AppState {
    pub api_client: RwSignal<ApiClient>,

    /// Catalog mirror; each page reloads it on mount.
    pub store: PhraseStore,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            api_client: RwSignal::new(ApiClient::from_env()),
            store: PhraseStore::new(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
pub(crate) struct AppContext(pub AppState);
