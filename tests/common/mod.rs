//! Shared helpers for the translation integration tests.
#![allow(dead_code)]

use warrant::{Access, RulePath, TranslateError, translate};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// The path of the write rule guarding `/users/$uid`.
pub fn user_write_path() -> RulePath {
    "rules/users/$uid/.write".parse().expect("valid rule path")
}

pub fn translate_user_rule(source: &str) -> Result<Access, TranslateError> {
    init_logging();
    translate(source, &user_write_path())
}

pub fn refs(names: &[&[&str]]) -> Vec<Vec<String>> {
    names
        .iter()
        .map(|conj| conj.iter().map(|s| s.to_string()).collect())
        .collect()
}
