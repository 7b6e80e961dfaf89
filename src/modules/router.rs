use crate::{modules, types::Context};
use axum::Router;
use std::sync::Arc;

pub fn get_router() -> Router<Arc<Context>> {
    Router::new().nest("/city", modules::city::get_router())
}
