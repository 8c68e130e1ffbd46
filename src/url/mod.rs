//! URL handling module for Moss
//!
//! This module provides href resolution and normalization, host helpers,
//! wildcard domain matching and the URL classification table.

mod classify;
mod domain;
mod matcher;
mod normalize;

pub use classify::{Category, Classifier, Matcher, Rule, RULES, SOCIAL_DOMAINS};
pub use domain::{extract_domain, is_same_site};
pub use matcher::matches_wildcard;
pub use normalize::{normalize_url, resolve_link};
