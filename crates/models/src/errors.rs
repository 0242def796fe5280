use serde::Serialize;
use thiserror::Error;

/// One failing field and the reason it was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// All validation failures for a payload, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[error("validation failed{}", render(.errors))]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError { field: field.into(), message: message.into() });
    }

    pub fn is_empty(&self) -> bool { self.errors.is_empty() }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Merge another set of errors, prefixing each field (`[3].price`).
    pub fn extend_prefixed(&mut self, prefix: &str, other: ValidationErrors) {
        for e in other.errors {
            self.errors.push(FieldError { field: format!("{prefix}.{}", e.field), message: e.message });
        }
    }

    /// `Ok(value)` when nothing was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

fn render(errors: &[FieldError]) -> String {
    let parts: Vec<String> = errors.iter().map(|e| format!("{}: {}", e.field, e.message)).collect();
    if parts.is_empty() { String::new() } else { format!(": {}", parts.join("; ")) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_every_field() {
        let mut errs = ValidationErrors::default();
        errs.push("name", "Drug name is required");
        errs.push("price", "Price must be greater than zero");
        assert_eq!(
            errs.to_string(),
            "validation failed: name: Drug name is required; price: Price must be greater than zero"
        );
    }

    #[test]
    fn prefixed_merge_keeps_messages() {
        let mut inner = ValidationErrors::default();
        inner.push("quantity", "Quantity is required");
        let mut outer = ValidationErrors::default();
        outer.extend_prefixed("[2]", inner);
        assert!(outer.contains("[2].quantity"));
        assert_eq!(outer.errors[0].message, "Quantity is required");
    }

    #[test]
    fn converts_into_anyhow_with_message() {
        let mut errs = ValidationErrors::default();
        errs.push("quantity", "Quantity is required");
        let err = anyhow::Error::from(errs);
        assert_eq!(err.to_string(), "validation failed: quantity: Quantity is required");
        assert!(err.downcast_ref::<ValidationErrors>().is_some());
        assert_eq!(ValidationErrors::default().to_string(), "validation failed");
    }

    #[test]
    fn into_result_is_ok_when_empty() {
        assert_eq!(ValidationErrors::default().into_result(7), Ok(7));
    }
}
