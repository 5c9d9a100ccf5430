use crate::config::{Config, Credentials};
use std::{path::PathBuf, sync::Arc};

#[derive(Clone)]
pub struct AppState {
    pub data_dir: PathBuf,
    pub credentials: Option<Arc<Credentials>>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            data_dir: config.data_dir.clone(),
            credentials: config.credentials.clone().map(Arc::new),
        }
    }
}
