use std::{sync::Arc, time::Duration};

pub mod config;
pub mod dispatch;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod protocol;
pub mod store;
pub mod tcp;

use store::CategoryStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CategoryStore>,
    pub read_timeout: Duration,
}

impl AppState {
    pub fn new(store: Arc<dyn CategoryStore>, read_timeout: Duration) -> Self {
        Self {
            store,
            read_timeout,
        }
    }
}
