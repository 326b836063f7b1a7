use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use tower_sessions::Session;

/// Key under which the admin flag is stored in the visitor's session.
pub const ADMIN_FLAG_KEY: &str = "is_admin";

/// AdminSession Extractor Result
///
/// Represents the resolved authorization state of the requesting visitor.
/// There are exactly two states: Anonymous (`is_admin == false`, the default)
/// and Admin. Handlers for mutating routes consult `is_admin` before touching
/// the repository; the others pass it through to the views so the templates can
/// show or hide the curation controls.
pub struct AdminSession {
    session: Session,
    /// True only when this visitor's session holds a granted admin flag.
    pub is_admin: bool,
}

impl AdminSession {
    /// grant
    ///
    /// Transitions the session to Admin. Called only after the submitted
    /// password matched the configured admin secret. Returns false when the
    /// session store refused the write, in which case the visitor stays
    /// Anonymous and the caller reports an explicit failure.
    pub async fn grant(&self) -> bool {
        match self.session.insert(ADMIN_FLAG_KEY, true).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("failed to persist admin flag: {:?}", e);
                false
            }
        }
    }

    /// revoke
    ///
    /// Transitions the session back to Anonymous by destroying the underlying
    /// session record and clearing the cookie. If destruction fails the state
    /// is indeterminate; the caller signals failure, and since the flag is
    /// re-read from the store on every request, admin actions stay denied
    /// whenever the flag cannot be read back.
    pub async fn revoke(self) -> bool {
        match self.session.flush().await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("failed to destroy session: {:?}", e);
                false
            }
        }
    }
}

/// AdminSession Extractor Implementation
///
/// Implements Axum's FromRequestParts trait, making AdminSession usable as a
/// function argument in any handler. The extractor pulls the visitor's session
/// (materialized by the tower-sessions layer) and reads the admin flag out of
/// it. A session that cannot be read resolves to Anonymous: the gate denies by
/// default rather than failing open.
///
/// Rejection: 500 only when the session layer itself is missing from the stack.
impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(status, msg)| {
                tracing::error!("session extraction failed: {} {}", status, msg);
                StatusCode::INTERNAL_SERVER_ERROR
            })?;

        let is_admin = match session.get::<bool>(ADMIN_FLAG_KEY).await {
            Ok(flag) => flag.unwrap_or(false),
            Err(e) => {
                // Store read failure: treat the visitor as Anonymous.
                tracing::error!("failed to read admin flag: {:?}", e);
                false
            }
        };

        Ok(AdminSession { session, is_admin })
    }
}
