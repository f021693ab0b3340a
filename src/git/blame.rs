//! Line-porcelain blame parsing.
//!
//! `git blame --line-porcelain` emits one group per line of the file, in
//! document order:
//!
//! ```text
//! <sha> <original-line> <final-line> [<group-size>]
//! author Ada Lovelace
//! author-mail <ada@example.com>
//! author-time 1700000000
//! ...
//! \t<content>
//! ```
//!
//! Each group is attributed from its own metadata only. A group that
//! carries no `author` lines gets empty fields rather than values
//! inherited from an earlier group of the same commit.

use chrono::DateTime;

use crate::snapshot::LineAttribution;

const AUTHOR_PREFIX: &str = "author ";
const AUTHOR_MAIL_PREFIX: &str = "author-mail ";
const AUTHOR_TIME_PREFIX: &str = "author-time ";

/// Parses a complete line-porcelain stream.
pub fn parse_line_porcelain(output: &str) -> Vec<LineAttribution> {
    let mut parser = BlameParser::new();
    for line in output.split('\n') {
        parser.feed(line);
    }
    parser.finish()
}

/// Metadata collected for the group currently being read.
#[derive(Debug, Default)]
struct PendingGroup {
    sha: String,
    original_line: u32,
    author: String,
    email: String,
    date: String,
}

impl PendingGroup {
    /// Reads a header line: sha, original line, final line, optional size.
    fn from_header(line: &str) -> Option<Self> {
        let mut tokens = line.split_whitespace();
        let sha = tokens.next()?;
        let original = tokens.next()?;
        tokens.next()?;

        Some(Self {
            sha: sha.to_string(),
            original_line: original.parse().ok()?,
            ..Self::default()
        })
    }

    fn apply_metadata(&mut self, line: &str) {
        if let Some(author) = line.strip_prefix(AUTHOR_PREFIX) {
            self.author = author.to_string();
        } else if let Some(mail) = line.strip_prefix(AUTHOR_MAIL_PREFIX) {
            self.email = mail.trim_matches(['<', '>']).to_string();
        } else if let Some(time) = line.strip_prefix(AUTHOR_TIME_PREFIX) {
            self.date = format_author_time(time).unwrap_or_default();
        }
    }
}

/// Converts Unix seconds into `YYYY-MM-DDTHH:MM:SSZ`.
fn format_author_time(raw: &str) -> Option<String> {
    let secs: i64 = raw.trim().parse().ok()?;
    DateTime::from_timestamp(secs, 0).map(|dt| dt.format("%Y-%m-%dT%H:%M:%SZ").to_string())
}

enum State {
    ExpectHeader,
    ExpectMetadataOrContent(PendingGroup),
}

/// Incremental blame parser. Create one per file.
pub struct BlameParser {
    state: State,
    next_line: u32,
    lines: Vec<LineAttribution>,
}

impl BlameParser {
    pub fn new() -> Self {
        Self {
            state: State::ExpectHeader,
            next_line: 1,
            lines: Vec::new(),
        }
    }

    /// Consumes one line of the stream (without its newline).
    pub fn feed(&mut self, line: &str) {
        self.state = match std::mem::replace(&mut self.state, State::ExpectHeader) {
            State::ExpectHeader => {
                if line.is_empty() {
                    State::ExpectHeader
                } else {
                    match PendingGroup::from_header(line) {
                        Some(group) => State::ExpectMetadataOrContent(group),
                        None => State::ExpectHeader,
                    }
                }
            }
            State::ExpectMetadataOrContent(mut group) => match line.strip_prefix('\t') {
                Some(content) => {
                    self.emit(group, content);
                    State::ExpectHeader
                }
                None => {
                    group.apply_metadata(line);
                    State::ExpectMetadataOrContent(group)
                }
            },
        };
    }

    /// Ends the stream and returns the attributions in document order.
    ///
    /// A final group cut off before its content line still counts as a
    /// (blank) line.
    pub fn finish(mut self) -> Vec<LineAttribution> {
        if let State::ExpectMetadataOrContent(group) =
            std::mem::replace(&mut self.state, State::ExpectHeader)
        {
            self.emit(group, "");
        }
        self.lines
    }

    fn emit(&mut self, group: PendingGroup, content: &str) {
        let line = self.next_line;
        self.lines.push(LineAttribution {
            line_start: line,
            line_end: line,
            commit: group.sha,
            author: group.author,
            email: group.email,
            date: group.date,
            content: content.to_string(),
            original_line_start: group.original_line,
        });
        self.next_line += 1;
    }
}

impl Default for BlameParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHA_A: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const SHA_B: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

    fn group(sha: &str, original: u32, final_line: u32, author: &str, time: i64, content: &str) -> String {
        format!(
            "{sha} {original} {final_line} 1\n\
             author {author}\n\
             author-mail <{}@example.com>\n\
             author-time {time}\n\
             author-tz +0000\n\
             committer {author}\n\
             committer-mail <{}@example.com>\n\
             committer-time {time}\n\
             committer-tz +0000\n\
             summary Some change\n\
             filename click.md\n\
             \t{content}\n",
            author.to_lowercase(),
            author.to_lowercase()
        )
    }

    #[test]
    fn test_parse_empty_stream() {
        assert!(parse_line_porcelain("").is_empty());
    }

    #[test]
    fn test_parse_reconstructs_document() {
        let document = ["# Title", "", "Body text", "\tindented"];
        let stream = [
            group(SHA_A, 1, 1, "Ada", 1_700_000_000, document[0]),
            group(SHA_A, 2, 2, "Ada", 1_700_000_000, document[1]),
            group(SHA_B, 7, 3, "Grace", 1_700_003_600, document[2]),
            group(SHA_B, 8, 4, "Grace", 1_700_003_600, document[3]),
        ]
        .concat();

        let lines = parse_line_porcelain(&stream);
        assert_eq!(lines.len(), document.len());

        for (i, line) in lines.iter().enumerate() {
            assert_eq!(line.line_start, i as u32 + 1);
            assert_eq!(line.line_end, line.line_start);
            assert_eq!(line.content, document[i]);
        }

        assert_eq!(lines[0].commit, SHA_A);
        assert_eq!(lines[0].author, "Ada");
        assert_eq!(lines[0].email, "ada@example.com");
        assert_eq!(lines[0].date, "2023-11-14T22:13:20Z");
        assert_eq!(lines[2].commit, SHA_B);
        assert_eq!(lines[2].original_line_start, 7);
        assert_eq!(lines[3].original_line_start, 8);
    }

    #[test]
    fn test_group_without_metadata_is_not_inherited() {
        let stream = format!(
            "{}{SHA_A} 2 2\n\tsecond line\n",
            group(SHA_A, 1, 1, "Ada", 1_700_000_000, "first line")
        );
        let lines = parse_line_porcelain(&stream);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].author, "Ada");
        assert_eq!(lines[1].commit, SHA_A);
        assert_eq!(lines[1].author, "");
        assert_eq!(lines[1].email, "");
        assert_eq!(lines[1].date, "");
        assert_eq!(lines[1].content, "second line");
    }

    #[test]
    fn test_malformed_header_is_skipped() {
        let stream = format!(
            "garbage\n{SHA_A} 1\n{}",
            group(SHA_A, 1, 1, "Ada", 0, "only line")
        );
        let lines = parse_line_porcelain(&stream);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].line_start, 1);
        assert_eq!(lines[0].content, "only line");
        assert_eq!(lines[0].date, "1970-01-01T00:00:00Z");
    }

    #[test]
    fn test_blank_lines_between_groups_are_skipped() {
        let stream = format!(
            "\n{}\n\n{}",
            group(SHA_A, 1, 1, "Ada", 0, "one"),
            group(SHA_B, 1, 2, "Grace", 0, "two")
        );
        let lines = parse_line_porcelain(&stream);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].line_start, 2);
        assert_eq!(lines[1].author, "Grace");
    }

    #[test]
    fn test_truncated_final_group_still_counts() {
        let stream = format!(
            "{}{SHA_A} 2 2\nauthor Ada\nauthor-mail <ada@example.com>",
            group(SHA_A, 1, 1, "Ada", 0, "text")
        );
        let lines = parse_line_porcelain(&stream);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].content, "");
        assert_eq!(lines[1].author, "Ada");
    }

    #[test]
    fn test_trailing_whitespace_is_part_of_content() {
        let stream = format!(
            "{}{}",
            group(SHA_A, 1, 1, "Ada", 0, "end   "),
            group(SHA_A, 2, 2, "Ada", 0, "   ")
        );
        let lines = parse_line_porcelain(&stream);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].content, "end   ");
        assert_eq!(lines[1].content, "   ");
    }

    #[test]
    fn test_invalid_author_time_leaves_date_empty() {
        let stream = format!("{SHA_A} 1 1 1\nauthor-time soon\n\tx\n");
        let lines = parse_line_porcelain(&stream);
        assert_eq!(lines[0].date, "");
    }

    #[test]
    fn test_parser_state_is_per_instance() {
        let stream = group(SHA_A, 1, 1, "Ada", 0, "line");
        assert_eq!(parse_line_porcelain(&stream)[0].line_start, 1);
        assert_eq!(parse_line_porcelain(&stream)[0].line_start, 1);
    }
}
