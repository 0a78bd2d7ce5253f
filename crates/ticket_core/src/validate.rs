use shared::domain::{PHONE_DIGITS, PHONE_PREFIX, TICKET_TITLE};
use thiserror::Error;

use crate::{directory::CategoryDirectory, form::FormState};

const MIN_TITLE_LEN: usize = 3;

/// First rule a form breaks. The display text is what the dialog shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title should be at least 3 characters long.")]
    TitleTooShort,
    #[error("Please select a category")]
    CategoryNotSelected,
    #[error("Please enter a valid 10-digit phone number.")]
    InvalidPhoneNumber,
    #[error("Please add the attachment as it is mandatory")]
    AttachmentRequired,
}

/// Checks the rules in order and stops at the first violation.
pub fn validate(form: &FormState, directory: &CategoryDirectory) -> Result<(), ValidationError> {
    check_title(TICKET_TITLE)?;

    let Some(category) = form.selected_category() else {
        return Err(ValidationError::CategoryNotSelected);
    };

    if form.phone_number().chars().count() != PHONE_PREFIX.len() + PHONE_DIGITS {
        return Err(ValidationError::InvalidPhoneNumber);
    }

    if directory.requires_attachment(category) && form.attachment().is_none() {
        return Err(ValidationError::AttachmentRequired);
    }

    Ok(())
}

fn check_title(title: &str) -> Result<(), ValidationError> {
    if title.chars().count() < MIN_TITLE_LEN {
        return Err(ValidationError::TitleTooShort);
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/validate_tests.rs"]
mod tests;
