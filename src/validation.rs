//! Required-field checks run before an invoice is persisted.
//!
//! All checks run; the caller gets every missing field at once so the message
//! can list them together.

use std::fmt;

use crate::draft::InvoiceDraft;

/// One failed check.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Wire name of the field
    pub field: String,
    /// Label shown to the user
    pub label: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, label: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            label: label.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Error for an empty required field
    pub fn missing(field: &str, label: &str) -> Self {
        Self::new(field, label, format!("{} is required", label))
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter()
    }

    pub fn fields(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.field.as_str()).collect()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.label.as_str()).collect()
    }

    /// Numbered list of everything that is missing.
    pub fn to_user_message(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }

        let noun = if self.errors.len() == 1 { "field is" } else { "fields are" };
        let mut parts = vec![format!(
            "Invoice not saved: {} required {} missing",
            self.errors.len(),
            noun
        )];

        for (i, error) in self.errors.iter().enumerate() {
            match &error.suggestion {
                Some(suggestion) => parts.push(format!("{}. {} ({})", i + 1, error.message, suggestion)),
                None => parts.push(format!("{}. {}", i + 1, error.message)),
            }
        }

        parts.join("\n")
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_user_message())
    }
}

impl std::error::Error for ValidationErrors {}

// ============================================================================
// Validation functions
// ============================================================================

/// Validate that a string is not empty after trimming
pub fn validate_required(value: &str, field: &str, label: &str, errors: &mut ValidationErrors) {
    if value.trim().is_empty() {
        errors.add(ValidationError::missing(field, label));
    }
}

pub fn validate_present<T>(value: Option<&T>, field: &str, label: &str, errors: &mut ValidationErrors) {
    if value.is_none() {
        errors.add(ValidationError::missing(field, label));
    }
}

/// Check everything the backend needs before a draft can be saved.
pub fn validate_draft(draft: &InvoiceDraft, user_id: Option<&str>) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if user_id.map_or(true, |id| id.trim().is_empty()) {
        errors.add(
            ValidationError::missing("user_id", "Signed-in user")
                .with_suggestion("sign in to save invoices"),
        );
    }
    validate_required(&draft.invoice_number, "invoice_number", "Invoice number", &mut errors);
    if draft.items.named_items().next().is_none() {
        errors.add(
            ValidationError::new("items", "Item name", "At least one item with a name is required")
                .with_suggestion("give a line item a name"),
        );
    }
    validate_required(&draft.from, "from", "From", &mut errors);
    validate_required(&draft.to, "to", "To", &mut errors);
    validate_present(draft.issued_date.as_ref(), "issued_date", "Issued date", &mut errors);
    validate_present(draft.due_date.as_ref(), "due_date", "Due date", &mut errors);

    errors.into_result()
}
