//! Validated JSON extractor - Combines deserialization with validation.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::errors::AppError;

/// Validated JSON extractor that automatically validates requests.
///
/// Malformed bodies and failed validation both become
/// `AppError::Validation` (400).
///
/// # Example
///
/// ```rust,ignore
/// use serde::Deserialize;
/// use validator::Validate;
/// use crud_api_skeleton::api::extractors::ValidatedJson;
///
/// #[derive(Deserialize, Validate)]
/// struct RenameRequest {
///     #[validate(length(min = 1, max = 100))]
///     name: String,
/// }
///
/// async fn rename(ValidatedJson(payload): ValidatedJson<RenameRequest>) {
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

/// Format validation errors into a user-friendly string, including errors
/// of nested structs and list items
fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();
    collect_messages(errors, "", &mut messages);
    messages.sort();
    messages.join(", ")
}

fn collect_messages(errors: &ValidationErrors, prefix: &str, messages: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(errs) => {
                messages.extend(errs.iter().map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", path))
                }));
            }
            ValidationErrorsKind::Struct(nested) => collect_messages(nested, &path, messages),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_messages(nested, &format!("{}[{}]", path, index), messages);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, Validate)]
    struct Item {
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
    }

    #[derive(Debug, Deserialize, Validate)]
    struct Batch {
        #[validate(length(min = 1, max = 2), nested)]
        items: Vec<Item>,
    }

    #[test]
    fn test_nested_list_errors_are_reported() {
        let batch = Batch {
            items: vec![
                Item {
                    name: "ok".to_string(),
                },
                Item {
                    name: String::new(),
                },
            ],
        };

        let errors = batch.validate().unwrap_err();
        assert_eq!(format_validation_errors(&errors), "Name is required");
    }

    #[test]
    fn test_field_without_message_names_path() {
        let batch = Batch { items: Vec::new() };

        let errors = batch.validate().unwrap_err();
        assert_eq!(format_validation_errors(&errors), "items is invalid");
    }
}
