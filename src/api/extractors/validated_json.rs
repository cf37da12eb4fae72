//! Validated JSON extractor - Combines deserialization with validation.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::errors::AppError;

/// Validated JSON extractor that automatically validates requests.
///
/// # Example
///
/// ```rust,ignore
/// use serde::Deserialize;
/// use validator::Validate;
/// use storefront_api::api::extractors::ValidatedJson;
///
/// #[derive(Deserialize, Validate)]
/// struct AddItemRequest {
///     product_id: i32,
///     #[validate(range(min = 1))]
///     quantity: i32,
/// }
///
/// async fn add_item(ValidatedJson(payload): ValidatedJson<AddItemRequest>) {
///     // payload is already validated
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::validation(format_validation_errors(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// Format validation errors into a user-friendly string, sorted by field
/// so the message is stable.
fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Payload {
        #[validate(range(min = 1, message = "quantity must be at least 1"))]
        quantity: i32,
        #[validate(length(min = 1, message = "name is required"))]
        name: String,
    }

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_payload_passes() {
        let ValidatedJson(payload) =
            ValidatedJson::<Payload>::from_request(json_request(r#"{"quantity":2,"name":"x"}"#), &())
                .await
                .unwrap();

        assert_eq!(payload.quantity, 2);
    }

    #[tokio::test]
    async fn test_rule_violations_joined() {
        let result =
            ValidatedJson::<Payload>::from_request(json_request(r#"{"quantity":0,"name":""}"#), &()).await;

        match result {
            Err(AppError::Validation(msg)) => {
                assert_eq!(msg, "name is required, quantity must be at least 1")
            }
            other => panic!("unexpected: {:?}", other.map(|v| v.0)),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_validation_error() {
        let result = ValidatedJson::<Payload>::from_request(json_request("{"), &()).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
