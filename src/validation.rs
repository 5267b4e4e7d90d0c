// Validation utilities module
// Provides custom validation functions for domain-specific rules

use regex::Regex;
use validator::ValidationError;

/// Validates that a color is a hex display hint like "#FF0000".
/// The short form ("#F00") is accepted too.
pub fn validate_hex_color(color: &str) -> Result<(), ValidationError> {
    let pattern = Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$")
        .map_err(|_| ValidationError::new("invalid_color_pattern"))?;
    if pattern.is_match(color) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_hex_color"))
    }
}
