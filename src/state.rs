//! Application state: the collaborator handles every request needs, built
//! once in `main` and cloned into the workers. Trait objects behind `Arc` so
//! tests can substitute fakes (a failing mailer, a prefilled store).

use std::sync::Arc;

use crate::auth::TokenService;
use crate::config::Config;
use crate::email::{LogMailer, Mailer};
use crate::images::{ImageNormalizer, PngNormalizer};
use crate::store::{MemoryStore, Store};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: TokenService,
    pub mailer: Arc<dyn Mailer>,
    pub images: Arc<dyn ImageNormalizer>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            tokens: TokenService::new(&config.jwt_secret),
            mailer: Arc::new(LogMailer),
            images: Arc::new(PngNormalizer),
        }
    }
}
