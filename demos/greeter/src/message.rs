//! Builds the greeting from a validated request.

use crate::GreetCommand;
use crate::error::ValidationError;

const DEFAULT_SALUTATION: &str = "Hello";

/// A rendered greeting and how often to print it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Greeting {
    /// The line to print.
    pub line: String,
    /// Number of repetitions.
    pub repeat: usize,
}

/// Validates `request` and renders its greeting.
///
/// # Errors
///
/// Returns a [`ValidationError`] for blank input, conflicting delivery
/// modes, or a repeat count below one.
pub fn build(request: &GreetCommand) -> Result<Greeting, ValidationError> {
    if request.is_excited && request.is_quiet {
        return Err(ValidationError::ConflictingDeliveryModes);
    }
    let recipient = request.recipient.trim();
    if recipient.is_empty() {
        return Err(ValidationError::BlankRecipient);
    }
    let repeat = usize::try_from(request.repeat)
        .ok()
        .filter(|n| *n > 0)
        .ok_or(ValidationError::RepeatOutOfRange(request.repeat))?;

    let words = salutation(&request.salutations)?;
    let base = format!("{words}, {recipient}{}", request.punctuation);
    let line = if request.is_excited {
        base.to_uppercase()
    } else if request.is_quiet {
        base.to_lowercase()
    } else {
        base
    };
    Ok(Greeting { line, repeat })
}

fn salutation(words: &[String]) -> Result<String, ValidationError> {
    if words.is_empty() {
        return Ok(DEFAULT_SALUTATION.to_owned());
    }
    let mut trimmed = Vec::with_capacity(words.len());
    for (index, word) in words.iter().enumerate() {
        let visible = word.trim();
        if visible.is_empty() {
            return Err(ValidationError::BlankSalutation(index));
        }
        trimmed.push(visible);
    }
    Ok(trimmed.join(" "))
}
