use std::sync::Arc;

use axum::{
    Router,
    extract::{DefaultBodyLimit, FromRef},
    routing::{delete, get, post},
};
use axum_extra::extract::cookie::Key;
use tokio::sync::Mutex;
use tracing::warn;

use crate::api::ExtractionApi;
use crate::config::Config;
use crate::db::{AccountStore, RecordStore};
use crate::error::CardError;
use crate::handlers::{admin, auth, cards};
use crate::service::images::ImageStore;

/// Shared state behind every handler. Each store is guarded by its own
/// mutex; a request holds it for the whole read-modify-write.
#[derive(Clone)]
pub struct CardState {
    pub records: Arc<Mutex<RecordStore>>,
    pub accounts: Arc<Mutex<AccountStore>>,
    pub images: Arc<ImageStore>,
    pub extraction: ExtractionApi,
    pub customer_types: Arc<[String]>,
    pub secure_cookie: bool,
    pub upload_limit: usize,
    key: Key,
}

impl CardState {
    pub fn from_config(cfg: &Config) -> Result<Self, CardError> {
        let records = RecordStore::open(&cfg.storage.records_path);
        let accounts = AccountStore::open(&cfg.storage.accounts_path, cfg.admin.clone());
        let images = ImageStore::new(&cfg.storage.image_dir)?;
        let extraction = ExtractionApi::new(&cfg.extraction)?;

        let key = match cfg.basic.cookie_key.as_deref() {
            Some(secret) => Key::try_from(secret.as_bytes())
                .map_err(|e| CardError::CookieKey(e.to_string()))?,
            None => {
                warn!("no cookie_key configured; sessions will not survive a restart");
                Key::generate()
            }
        };

        Ok(Self {
            records: Arc::new(Mutex::new(records)),
            accounts: Arc::new(Mutex::new(accounts)),
            images: Arc::new(images),
            extraction,
            customer_types: cfg.catalog.customer_types.clone().into(),
            secure_cookie: !cfg.basic.insecure_cookie,
            upload_limit: cfg.basic.upload_limit_bytes,
            key,
        })
    }
}

impl FromRef<CardState> for Key {
    fn from_ref(state: &CardState) -> Self {
        state.key.clone()
    }
}

pub fn card_router(state: CardState) -> Router {
    let auth_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me));

    let card_routes = Router::new()
        .route(
            "/cards",
            get(cards::list)
                .post(cards::create)
                .delete(admin::delete_cards),
        )
        .route("/cards/extract", post(cards::extract))
        .route("/cards/export", get(cards::export))
        .route("/cards/{id}/image", get(cards::image))
        .layer(DefaultBodyLimit::max(state.upload_limit));

    Router::new()
        .merge(auth_routes)
        .merge(card_routes)
        .route("/customer-types", get(cards::customer_types))
        .route("/accounts", delete(admin::delete_accounts))
        .with_state(state)
}
