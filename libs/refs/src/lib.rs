//! # strata-refs
//!
//! Typed resource references, parsing, and validation for strata
//! topology descriptors.
//!
//! ## Design Principles
//!
//! - Entities are addressed by declared name; the declaration is the
//!   identity, nothing is system-generated
//! - All references have a canonical string representation with strict
//!   parsing
//! - References support roundtrip serialization (parse → format → parse)
//! - References are typed to prevent wiring one resource kind where
//!   another is expected
//!
//! ## Reference Format
//!
//! All resource references use a kind-prefixed format: `{kind}/{name}`
//!
//! Examples:
//! - `net/edge`
//! - `svc/web`
//! - `taskdef/web`
//!
//! Names are lowercase DNS-label style: ASCII letters, digits, and
//! hyphens, 1-63 characters, starting and ending with a letter or
//! digit.

mod error;
mod macros;
mod types;

pub use error::RefError;
pub use types::*;

/// Maximum length of a resource name.
pub const MAX_NAME_LEN: usize = 63;

/// Validates a resource name.
///
/// Names must be 1-63 characters of lowercase ASCII letters, digits,
/// and hyphens, and must start and end with a letter or digit.
pub fn validate_name(name: &str) -> Result<(), RefError> {
    if name.is_empty() {
        return Err(RefError::Empty);
    }

    if name.len() > MAX_NAME_LEN {
        return Err(RefError::InvalidName {
            message: format!("name '{}' exceeds {} characters", name, MAX_NAME_LEN),
        });
    }

    if !name
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
    {
        return Err(RefError::InvalidName {
            message: format!(
                "name '{}' contains characters outside [a-z0-9-]",
                name
            ),
        });
    }

    if name.starts_with('-') || name.ends_with('-') {
        return Err(RefError::InvalidName {
            message: format!("name '{}' must start and end with a letter or digit", name),
        });
    }

    Ok(())
}
