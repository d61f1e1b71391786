use auth::AuthConfig;
use shared::error::ApiError;
use storage::Storage;

pub mod orders;
pub mod products;
pub mod users;

pub use orders::{
    add_order_items, get_my_orders, get_order_by_id, get_orders, update_order_to_delivered,
    update_order_to_paid,
};
pub use products::{
    create_product, create_review, delete_product, get_product, list_products, top_products,
    update_product,
};
pub use users::{
    authenticate, delete_user, get_user_by_id, get_user_profile, list_users, load_session_user,
    register_user, update_user, update_user_profile,
};

pub const DEFAULT_PAGE_SIZE: u32 = 8;

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
    pub auth: AuthConfig,
    pub page_size: u32,
}

impl ApiContext {
    pub fn new(storage: Storage, auth: AuthConfig) -> Self {
        Self {
            storage,
            auth,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

pub(crate) fn internal(err: anyhow::Error) -> ApiError {
    tracing::error!(error = ?err, "storage operation failed");
    ApiError::internal()
}

/// Malformed and unknown record ids both surface as this message.
pub const RESOURCE_NOT_FOUND: &str = "Resource not found";

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
