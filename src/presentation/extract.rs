// JSON body extractor that also runs request validation
use crate::domain::validation::Validate;
use crate::presentation::error::{error_response, INVALID_BODY_MESSAGE};
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::Response;
use axum::{async_trait, Json};
use serde::de::DeserializeOwned;

/// A body that parsed and passed [`Validate`]. Either failure is a 400.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| {
                tracing::debug!(error = %rejection.body_text(), "Rejected request body");
                error_response(
                    StatusCode::BAD_REQUEST,
                    INVALID_BODY_MESSAGE,
                    Some(rejection.body_text()),
                )
            })?;

        value.validate().map_err(|e| {
            error_response(StatusCode::BAD_REQUEST, INVALID_BODY_MESSAGE, Some(e.to_string()))
        })?;

        Ok(Self(value))
    }
}
