use crate::models::profile::UserProfile;
use crate::errors::Result;
use async_trait::async_trait;

/// Base trait for account activity sources
#[async_trait]
pub trait ProfileSource {
    /// Name of the upstream this source talks to
    fn source_name(&self) -> &'static str;

    /// Fetch the public profile and contribution calendar of an account.
    /// Fails with `SignalError::NotFound` when the account does not exist.
    async fn fetch_profile(&self, login: &str) -> Result<UserProfile>;

    /// Cheap existence check
    async fn user_exists(&self, login: &str) -> Result<bool>;
}
