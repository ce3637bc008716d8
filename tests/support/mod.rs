#![allow(dead_code)]

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use sql_complexity::{analyze, QueryRecord};

pub(crate) fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from("tests/fixtures").join(name)
}

pub(crate) fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("{prefix}_{nanos}"))
}

pub(crate) fn analyze_ok(sql: &str) -> QueryRecord {
    analyze(sql).unwrap_or_else(|e| panic!("query should parse: {sql}\n{e}"))
}
