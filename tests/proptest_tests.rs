// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property-based tests using proptest.
//!
//! These tests check placeholder substitution, variable layering and alias
//! resolution against arbitrary inputs.

use mapcfg::domain::variables::{layer, substitute, Properties};
use mapcfg::domain::{TypeAliasRegistry, TypeRef};
use proptest::prelude::*;

fn key() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_.]{0,12}"
}

// Text without an opening token is returned as is
proptest! {
    #[test]
    fn test_substitute_without_placeholder_is_identity(
        text in "[^$]*",
        variables in prop::collection::btree_map(key(), "\\PC*", 0..5),
    ) {
        prop_assert_eq!(substitute(&text, &variables), text);
    }
}

// A known placeholder is replaced by its value, surrounding text is kept
proptest! {
    #[test]
    fn test_substitute_known_placeholder(
        prefix in "[a-z :/]*",
        suffix in "[a-z :/]*",
        name in key(),
        value in "[^$\\\\]*",
    ) {
        let mut variables = Properties::new();
        variables.insert(name.clone(), value.clone());

        let text = format!("{prefix}${{{name}}}{suffix}");
        prop_assert_eq!(substitute(&text, &variables), format!("{prefix}{value}{suffix}"));
    }
}

// Placeholders without a value stay verbatim
proptest! {
    #[test]
    fn test_substitute_unknown_placeholder_is_kept(name in key()) {
        let text = format!("x ${{{name}}} y");
        prop_assert_eq!(substitute(&text, &Properties::new()), text);
    }
}

// Later layers win; keys of every layer survive
proptest! {
    #[test]
    fn test_layer_last_wins(
        first in prop::collection::btree_map(key(), "[a-z]*", 0..8),
        second in prop::collection::btree_map(key(), "[a-z]*", 0..8),
    ) {
        let merged = layer([&first, &second]);

        for (k, v) in &second {
            prop_assert_eq!(merged.get(k), Some(v));
        }
        for (k, v) in &first {
            if !second.contains_key(k) {
                prop_assert_eq!(merged.get(k), Some(v));
            }
        }
        prop_assert!(merged.keys().all(|k| first.contains_key(k) || second.contains_key(k)));
    }
}

// Alias lookup ignores case
proptest! {
    #[test]
    fn test_alias_case_insensitive(alias in "[a-zA-Z][a-zA-Z0-9]{0,15}") {
        let mut aliases = TypeAliasRegistry::new();
        aliases.register(&alias, TypeRef::from("com.example.Target")).unwrap();

        let upper = aliases.resolve(&alias.to_uppercase());
        let lower = aliases.resolve(&alias.to_lowercase());
        prop_assert_eq!(upper.as_str(), "com.example.Target");
        prop_assert_eq!(lower.as_str(), "com.example.Target");
    }
}

// Re-registering the same mapping is accepted, a different one is not
proptest! {
    #[test]
    fn test_alias_reregistration(alias in "[a-z]{1,10}") {
        let mut aliases = TypeAliasRegistry::new();
        aliases.register(&alias, TypeRef::from("com.example.A")).unwrap();

        prop_assert!(aliases.register(&alias.to_uppercase(), TypeRef::from("com.example.A")).is_ok());
        prop_assert!(aliases.register(&alias, TypeRef::from("com.example.B")).is_err());
    }
}

// Unregistered names resolve to themselves
proptest! {
    #[test]
    fn test_unknown_alias_is_type_name(name in "[a-z]{1,8}(\\.[a-z]{1,8}){1,3}") {
        let aliases = TypeAliasRegistry::new();
        prop_assert_eq!(aliases.resolve(&name), TypeRef::from(name.as_str()));
    }
}
