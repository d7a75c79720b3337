use crate::error::{SizingError, SizingResult};
use std::path::Path;
use validator::{Validate, ValidationErrors};

pub fn validate_model<T: Validate>(model: &T) -> SizingResult<()> {
    match model.validate() {
        Ok(()) => Ok(()),
        Err(errors) => {
            let error_messages = format_validation_errors(&errors);
            Err(SizingError::validation("model", error_messages))
        }
    }
}

pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();

    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            let message = match &error.message {
                Some(message) => message.to_string(),
                None => match &error.code {
                    std::borrow::Cow::Borrowed("length") => {
                        format!("Length validation failed for field '{}'", field)
                    }
                    std::borrow::Cow::Borrowed("range") => {
                        format!("Value out of range for field '{}'", field)
                    }
                    _ => format!("Validation failed for field '{}': {}", field, error.code),
                },
            };
            messages.push(message);
        }
    }

    messages.sort();
    messages.join(", ")
}

pub fn validate_file_type(path: &Path, allowed_types: &[&str]) -> SizingResult<()> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");

    if !allowed_types.contains(&extension.to_lowercase().as_str()) {
        return Err(SizingError::validation(
            "file_type",
            format!(
                "File type '{}' not allowed for {}. Allowed types: {}",
                extension,
                path.display(),
                allowed_types.join(", ")
            ),
        ));
    }

    Ok(())
}
