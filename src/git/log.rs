//! Commit log parsing.
//!
//! The log is requested with [`LOG_FORMAT`], one commit per line:
//! `SHA|AUTHOR|EMAIL|DATE|SUBJECT`.

use crate::snapshot::CommitRecord;

/// Pretty format producing one `|`-delimited line per commit.
pub const LOG_FORMAT: &str = "--pretty=format:%H|%an|%ae|%aI|%s";

const FIELD_COUNT: usize = 5;

/// Parses a whole log stream, skipping empty and malformed lines.
pub fn parse_log(output: &str) -> Vec<CommitRecord> {
    output.lines().filter_map(parse_log_line).collect()
}

/// Parses one log line.
///
/// Splitting stops after the fourth delimiter, so a `|` inside the
/// subject stays part of the message.
pub fn parse_log_line(line: &str) -> Option<CommitRecord> {
    if line.is_empty() {
        return None;
    }

    let fields: Vec<&str> = line.splitn(FIELD_COUNT, '|').collect();
    let [sha, author, email, date, message] = fields.as_slice() else {
        return None;
    };

    Some(CommitRecord {
        sha: sha.to_string(),
        author: author.to_string(),
        email: email.to_string(),
        date: date.to_string(),
        message: message.to_string(),
        files: None,
    })
}

/// Splits a name-only file listing into its non-empty lines.
pub fn parse_file_list(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
