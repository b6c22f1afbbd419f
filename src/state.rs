//! Shared application state handed to every handler invocation.

use crate::session::SessionStore;
use crate::static_files::StaticFiles;
use crate::store::Store;
use crate::templates::Templates;

/// Everything a handler may touch: the record store, the session table and
/// the page/asset loaders.
///
/// Owned by the server for its whole lifetime and passed by reference into
/// each dispatch; there is no module-level global state.
#[derive(Debug)]
pub struct AppState {
    pub store: Store,
    pub sessions: SessionStore,
    pub templates: Templates,
    pub assets: StaticFiles,
}

impl AppState {
    pub fn new(store: Store, templates: Templates, assets: StaticFiles) -> Self {
        Self {
            store,
            sessions: SessionStore::new(),
            templates,
            assets,
        }
    }
}
