use std::sync::Arc;

use libcat_dal::Pool;

#[derive(Clone)]
pub struct AppState {
    state: Arc<AppStateInner>,
}

impl AppState {
    pub fn new(pool: Pool) -> Self {
        AppState {
            state: Arc::new(AppStateInner { pool }),
        }
    }

    pub fn pool(&self) -> &Pool {
        &self.state.pool
    }
}

struct AppStateInner {
    pool: Pool,
}

// Required by axum-valid's `Garde` extractor: the validation context `()`
// must be derivable from the router state.
impl axum::extract::FromRef<AppState> for () {
    fn from_ref(_: &AppState) {}
}
