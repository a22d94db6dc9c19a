//! Identity adapters

use async_trait::async_trait;

use crate::domain::entities::UserId;
use crate::domain::ports::IdentityProvider;

/// Identity fixed at construction, e.g. from configuration
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityProvider {
    actor: Option<UserId>,
}

impl StaticIdentityProvider {
    pub fn new(actor: Option<UserId>) -> Self {
        Self { actor }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn current_actor(&self) -> Option<UserId> {
        self.actor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_configured_actor() {
        let actor = UserId::new();
        assert_eq!(
            StaticIdentityProvider::new(Some(actor)).current_actor().await,
            Some(actor)
        );
        assert_eq!(StaticIdentityProvider::anonymous().current_actor().await, None);
    }
}
