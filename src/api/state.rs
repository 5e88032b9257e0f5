use std::sync::Arc;

use crate::chain::ChainReader;
use crate::store::Db;

#[derive(Clone)]
pub struct AppState {
    pub chain: Arc<dyn ChainReader>,
    pub db: Db,
}

impl AppState {
    pub fn new(chain: Arc<dyn ChainReader>, db: Db) -> Self {
        Self { chain, db }
    }
}
