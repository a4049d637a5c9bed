//! Axum extractor for bound request data
//!
//! `Bound<T>` runs the [`Binder`] on the incoming request before the handler
//! is called:
//!
//! ```rust,ignore
//! async fn create_user(Bound(user): Bound<User>) -> Json<User> {
//!     // user is decoded, sanitized and validated
//!     Json(user)
//! }
//!
//! let app = Router::new()
//!     .route("/users", post(create_user))
//!     .layer(Extension(Arc::new(Binder::new(config)?)));
//! ```
//!
//! Without an `Extension<Arc<Binder>>` layer the process-wide default binder
//! is used.

use axum::extract::{FromRequest, Request};
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, OnceLock};

use crate::core::binder::{Bindable, Binder};
use crate::core::error::BindError;

static DEFAULT_BINDER: OnceLock<Arc<Binder>> = OnceLock::new();

/// The binder shared by requests that do not carry their own
pub fn default_binder() -> Arc<Binder> {
    DEFAULT_BINDER
        .get_or_init(|| Arc::new(Binder::default()))
        .clone()
}

/// Axum extractor that binds, sanitizes and validates `T`
#[derive(Debug, Clone, Default)]
pub struct Bound<T>(pub T);

impl<T> Bound<T> {
    /// Get the bound value
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Bound<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for Bound<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<S, T> FromRequest<S> for Bound<T>
where
    S: Send + Sync,
    T: Bindable + Send,
{
    type Rejection = BindError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let binder = req
            .extensions()
            .get::<Arc<Binder>>()
            .cloned()
            .unwrap_or_else(default_binder);

        match binder.bind_request(req).await {
            Ok(value) => Ok(Bound(value)),
            Err(e) => {
                tracing::debug!(code = e.error_code(), error = %e, "request binding rejected");
                Err(e)
            }
        }
    }
}
