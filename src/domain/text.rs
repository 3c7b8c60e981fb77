use super::ValidationErrors;
use unicode_segmentation::UnicodeSegmentation;

/// Longest value accepted for a plain string column.
pub const MAX_STRING_LENGTH: usize = 255;

/// A required string field. Missing and blank values are both reported as
/// missing; the trimmed value is returned otherwise.
pub fn required_text(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<String>,
) -> Option<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => check_length(errors, field, v),
        _ => {
            errors.add(field, format!("The {} field is required.", field));
            None
        }
    }
}

/// A nullable string field. The outer `Option` is `None` when the field was
/// not submitted; `Some(None)` means it was submitted blank.
pub fn optional_text(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<String>,
) -> Option<Option<String>> {
    let value = value?.trim().to_string();
    if value.is_empty() {
        return Some(None);
    }
    check_length(errors, field, value).map(Some)
}

fn check_length(errors: &mut ValidationErrors, field: &'static str, value: String) -> Option<String> {
    if value.graphemes(true).count() > MAX_STRING_LENGTH {
        errors.add(
            field,
            format!(
                "The {} field must not be greater than {} characters.",
                field, MAX_STRING_LENGTH
            ),
        );
        None
    } else {
        Some(value)
    }
}
