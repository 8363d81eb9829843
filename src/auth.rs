use std::fmt::Debug;

use async_trait::async_trait;

use crate::session::SessionContext;

/// Validates credentials presented through `AUTH`.
///
/// The challenge/response exchange happens in the session layer; this only
/// sees the decoded user name and password.
#[async_trait]
pub trait UserAuthenticator: Send + Sync + Debug {
    async fn authenticate(&self, ctx: &SessionContext, user: &str, password: &str) -> bool;
}
