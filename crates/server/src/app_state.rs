use server_api::ApiContext;

use crate::config::Settings;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) api: ApiContext,
    /// Adds `Secure` to the session cookie.
    pub(crate) secure_cookies: bool,
    pub(crate) paypal_client_id: String,
    pub(crate) max_upload_bytes: usize,
}

impl AppState {
    pub(crate) fn new(api: ApiContext, settings: &Settings) -> Self {
        Self {
            api,
            secure_cookies: settings.production,
            paypal_client_id: settings.paypal_client_id.clone().unwrap_or_default(),
            max_upload_bytes: settings.max_upload_bytes,
        }
    }
}
