//! Append-only JSON lines files

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const OUTPUT_DIR: &str = "output";

/// `<base>/<kind>/<prefix>_<YYYY-MM-DD>.jsonl`
pub fn daily_file(base: &Path, kind: &str, prefix: &str) -> PathBuf {
    base.join(kind)
        .join(format!("{}_{}.jsonl", prefix, Utc::now().format("%Y-%m-%d")))
}

pub fn append_jsonl<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    writeln!(file, "{}", serde_json::to_string(record)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn appends_one_line_per_record() {
        let dir = std::env::temp_dir().join(format!("arb-pipeline-jsonl-{}", uuid::Uuid::new_v4()));
        let path = daily_file(&dir, "records", "test");

        append_jsonl(&path, &json!({"n": 1})).unwrap();
        append_jsonl(&path, &json!({"n": 2})).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines, vec![r#"{"n":1}"#, r#"{"n":2}"#]);

        fs::remove_dir_all(&dir).ok();
    }
}
