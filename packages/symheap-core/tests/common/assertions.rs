//! Custom assertions for test verification
//!
//! This module provides domain-specific assertions for symbolic heap testing.

use std::collections::HashSet;
use std::sync::Arc;
use symheap_core::shared::models::Ident;

/// Assert that two identifier sets share nothing
pub fn assert_disjoint(left: &[Ident], right: &[Ident]) {
    let left_set: HashSet<&Ident> = left.iter().collect();
    let common: Vec<&Ident> = right.iter().filter(|id| left_set.contains(id)).collect();
    assert!(common.is_empty(), "Expected disjoint identifiers, both contain: {:?}", common);
}

/// Assert that two handles point to the same instance
pub fn assert_same_instance<T: std::fmt::Debug>(left: &Arc<T>, right: &Arc<T>) {
    assert!(
        Arc::ptr_eq(left, right),
        "Expected one shared instance, got two:\n{:?}\n{:?}",
        left,
        right
    );
}
