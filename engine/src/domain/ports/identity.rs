//! Identity port

use async_trait::async_trait;

use crate::domain::entities::UserId;

/// Source of the currently signed-in actor
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The signed-in actor, or `None` when unauthenticated
    async fn current_actor(&self) -> Option<UserId>;
}
