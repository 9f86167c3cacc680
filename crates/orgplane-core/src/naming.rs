//! Slug and tenant collection name derivation.
//!
//! Both functions are pure: the same organization name always maps to the
//! same slug and collection name.

use crate::error::{OrgError, OrgResult};

/// Prefix shared by every tenant collection.
pub const COLLECTION_PREFIX: &str = "org_";

/// Derive the slug for an organization name.
///
/// Trims, lowercases, collapses every run of characters outside
/// `[a-z0-9]` into a single `_`, and strips leading/trailing `_`.
/// Returns [`OrgError::InvalidName`] when nothing is left.
pub fn slugify(name: &str) -> OrgResult<String> {
    let lowered = name.trim().to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_separator = false;

    for c in lowered.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_separator && !slug.is_empty() {
                slug.push('_');
            }
            pending_separator = false;
            slug.push(c);
        } else {
            pending_separator = true;
        }
    }

    if slug.is_empty() {
        return Err(OrgError::InvalidName { name: name.into() });
    }
    Ok(slug)
}

/// Tenant collection name for an organization name: `org_<slug>`.
pub fn collection_name(name: &str) -> OrgResult<String> {
    Ok(format!("{COLLECTION_PREFIX}{}", slugify(name)?))
}

/// True if `name` is usable as a collection identifier (`[a-z0-9_]+`).
pub fn is_valid_collection_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}
