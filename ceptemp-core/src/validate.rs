//! CEP input validation.
//!
//! A CEP (Brazilian postal code) is exactly eight ASCII digits. Nothing is
//! sent upstream unless the input passes this check.

/// Returns true iff `code` is exactly eight ASCII digits.
///
/// Leading zeros are fine; hyphens, spaces and non-ASCII digits are not.
pub fn is_valid_cep(code: &str) -> bool {
    code.len() == 8 && code.bytes().all(|b| b.is_ascii_digit())
}
