//! Request extractors

use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::ApiError;

/// JSON body that is deserialized and then checked with [`Validate`]
///
/// Malformed JSON, missing fields and failed rules all reject with
/// `VALIDATION_ERROR` instead of axum's plain-text rejections.
///
/// # Example
///
/// ```no_run
/// use avafund_api::extract::ValidatedJson;
/// use serde::Deserialize;
/// use validator::Validate;
///
/// #[derive(Deserialize, Validate)]
/// struct Greeting {
///     #[validate(length(min = 1))]
///     text: String,
/// }
///
/// async fn greet(ValidatedJson(greeting): ValidatedJson<Greeting>) -> String {
///     greeting.text
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}
