//! Invocation of the external git binary.
//!
//! Every query degrades to [`Lookup::Absent`] on failure. Nothing here
//! returns an error: callers treat a failed query as "no data".

use std::path::Path;
use std::process::Command;

use crate::lookup::Lookup;

/// A version-control tool that can be queried from a working directory.
pub trait Vcs {
    /// Runs the tool and returns its raw standard output.
    fn bytes(&self, args: &[&str], cwd: &Path) -> Lookup<Vec<u8>>;

    /// Runs the tool and returns its standard output as trimmed text.
    fn text(&self, args: &[&str], cwd: &Path) -> Lookup<String> {
        self.bytes(args, cwd)
            .map(|stdout| String::from_utf8_lossy(&stdout).trim().to_string())
    }
}

/// Runs the `git` command-line tool synchronously.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
}

impl GitCli {
    /// Creates a runner for the given git executable.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new("git")
    }
}

impl Vcs for GitCli {
    fn bytes(&self, args: &[&str], cwd: &Path) -> Lookup<Vec<u8>> {
        tracing::debug!("Running {} {} in {:?}", self.program, args.join(" "), cwd);

        let output = match Command::new(&self.program)
            .args(args)
            .current_dir(cwd)
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(
                    "Error running git command {} {}: {}",
                    self.program,
                    args.join(" "),
                    e
                );
                return Lookup::Absent;
            }
        };

        if !output.status.success() {
            tracing::warn!(
                "Error running git command {} {}: {}",
                self.program,
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Lookup::Absent;
        }

        Lookup::Found(output.stdout)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_program_is_absent() {
        let dir = tempdir().unwrap();
        let runner = GitCli::new("strata-no-such-program");
        assert!(runner.text(&["--version"], dir.path()).is_absent());
    }

    #[test]
    fn test_text_is_trimmed() {
        let vcs = fake::FakeVcs::new().respond(&["log"], "\n  abc|def  \n\n");
        let dir = tempdir().unwrap();
        assert_eq!(
            vcs.text(&["log"], dir.path()),
            Lookup::Found("abc|def".to_string())
        );
    }

    #[test]
    fn test_fake_unknown_query_is_absent() {
        let vcs = fake::FakeVcs::new();
        let dir = tempdir().unwrap();
        assert!(vcs.text(&["status"], dir.path()).is_absent());
        assert_eq!(*vcs.calls.borrow(), vec!["status".to_string()]);
    }
}
