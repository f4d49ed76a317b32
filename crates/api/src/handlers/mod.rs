pub mod images;
pub mod music;
pub mod prompts;
pub mod replicate;
pub mod videos;

use mediaforge_core::error::CoreError;

/// Longest provider task or prediction id accepted in a path.
const MAX_RESOURCE_ID_LEN: usize = 128;

/// Check a provider resource id taken from the request path.
///
/// Ids are forwarded into upstream URLs, so only ASCII letters, digits, `_`
/// and `-` are allowed.
pub(crate) fn check_resource_id(name: &str, id: &str) -> Result<(), CoreError> {
    let valid = !id.is_empty()
        && id.len() <= MAX_RESOURCE_ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if valid {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "{name} may only contain letters, digits, '_' and '-' (max {MAX_RESOURCE_ID_LEN} characters)"
        )))
    }
}
