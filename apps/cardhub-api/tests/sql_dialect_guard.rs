//! Keeps every inline SQL string Postgres-flavoured. The engine leans on
//! Postgres-only behaviour (FOR UPDATE SKIP LOCKED, ON CONFLICT .. DO
//! UPDATE), so stray SQLite/MySQL idioms are a sign a query was pasted from
//! the wrong place.

use std::fs;
use std::path::{Path, PathBuf};

const FORBIDDEN: &[(&str, &str)] = &[
    ("AUTOINCREMENT", "SQLite autoincrement"),
    ("INSERT OR IGNORE", "SQLite conflict clause"),
    ("INSERT OR REPLACE", "SQLite conflict clause"),
    ("datetime('now')", "SQLite timestamp function"),
    ("strftime(", "SQLite date formatting"),
    ("ON DUPLICATE KEY", "MySQL upsert clause"),
    ("`", "MySQL identifier quoting"),
];

fn collect_rs_files(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out);
        } else if path.extension().and_then(|s| s.to_str()) == Some("rs") {
            out.push(path);
        }
    }
}

fn sql_bearing_lines(content: &str) -> Vec<(usize, &str)> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            if line.trim_start().starts_with("//") {
                return false;
            }
            let upper = line.to_uppercase();
            ["SELECT ", "INSERT INTO", "UPDATE ", "DELETE FROM", "ON CONFLICT"]
                .iter()
                .any(|kw| upper.contains(kw))
        })
        .map(|(i, line)| (i + 1, line))
        .collect()
}

#[test]
fn inline_sql_stays_postgres_dialect() {
    let mut files = Vec::new();
    collect_rs_files(Path::new("src"), &mut files);
    collect_rs_files(Path::new("../../libs/cardhub-db/src"), &mut files);
    assert!(!files.is_empty(), "no source files found to check");

    let mut violations = Vec::new();
    for file in &files {
        let Ok(content) = fs::read_to_string(file) else {
            continue;
        };
        for (lineno, line) in sql_bearing_lines(&content) {
            for (needle, why) in FORBIDDEN {
                if line.contains(needle) {
                    violations.push(format!("{}:{lineno}: {why}: {}", file.display(), line.trim()));
                }
            }
            // Positional placeholders must be $N, not ?.
            if line.contains("VALUES (?") || line.contains("= ?") {
                violations.push(format!(
                    "{}:{lineno}: non-Postgres placeholder: {}",
                    file.display(),
                    line.trim()
                ));
            }
        }
    }

    assert!(
        violations.is_empty(),
        "non-Postgres SQL found:\n{}",
        violations.join("\n")
    );
}
