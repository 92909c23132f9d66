use crate::config::GoogleConfig;
use crate::error::{AppError, Result};
use crate::sheets::client::AUTH_SCOPE;
use hyper_util::client::legacy::connect::HttpConnector;
use std::path::Path;
use tracing::debug;
use yup_oauth2::{
    ServiceAccountAuthenticator, authenticator::Authenticator, hyper_rustls::HttpsConnector,
};

type AuthType = Authenticator<HttpsConnector<HttpConnector>>;

/// Create and verify authenticator by fetching a token
pub(super) async fn create_and_verify_authenticator(config: &GoogleConfig) -> Result<AuthType> {
    let auth = from_service_account(&config.service_account_json).await?;

    // Fail before any fetch work if the key is rejected
    let _token = auth
        .token(&[AUTH_SCOPE])
        .await
        .map_err(|e| AppError::Auth(format!("Failed to get token: {}", e)))?;

    Ok(auth)
}

async fn from_service_account(key_path: &Path) -> Result<AuthType> {
    let key = yup_oauth2::read_service_account_key(key_path)
        .await
        .map_err(|e| {
            AppError::Auth(format!(
                "Failed to read service account key {:?}: {}",
                key_path, e
            ))
        })?;

    debug!(client_email = %key.client_email, "Loaded service account key");

    let auth = ServiceAccountAuthenticator::builder(key)
        .build()
        .await
        .map_err(|e| AppError::Auth(format!("Failed to build authenticator: {}", e)))?;

    Ok(auth)
}
