//! Confirmation protocol: prompt records, answers and per-run approval memory

use crate::types::{Action, ActionKind, CleanError};
use chrono::{DateTime, Local};
use console::{style, Term};
use indicatif::HumanBytes;
use std::collections::BTreeSet;
use std::io::{BufRead, StdinLock, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Answer to one prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// Perform this action
    Yes,
    /// Leave this file alone
    No,
    /// Perform this and every later action of the same kind
    Always,
    /// Stop the run now
    Quit,
}

impl Response {
    /// Interpret a typed answer by its first character
    ///
    /// Anything unrecognised, including an empty line, counts as "no".
    pub fn parse(input: &str) -> Self {
        match input.trim().chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('y') => Response::Yes,
            Some('a') => Response::Always,
            Some('q') => Response::Quit,
            _ => Response::No,
        }
    }
}

/// What the user is asked about
#[derive(Debug, Clone, PartialEq)]
pub struct PromptRecord {
    /// 1-based position in the plan
    pub index: usize,
    pub total: usize,
    /// Current location of the file (after earlier renames in the plan)
    pub path: PathBuf,
    /// Why the action is proposed
    pub issue: String,
    pub kind: ActionKind,
    /// Rendered destination (path or mode)
    pub destination: Option<String>,
    pub size: u64,
    pub mtime: SystemTime,
}

impl PromptRecord {
    pub fn new(index: usize, total: usize, action: &Action, current: &Path) -> Self {
        Self {
            index,
            total,
            path: current.to_path_buf(),
            issue: action.reason.clone(),
            kind: action.kind,
            destination: action.destination.as_ref().map(ToString::to_string),
            size: action.target.size,
            mtime: action.target.mtime,
        }
    }

    /// `ACTION:` line, e.g. `MOVE -> /target/a.txt`
    pub fn action_line(&self) -> String {
        match &self.destination {
            Some(destination) => format!("{} -> {}", self.kind, destination),
            None => self.kind.to_string(),
        }
    }

    /// Multi-line block shown before asking
    pub fn render(&self) -> String {
        let modified: DateTime<Local> = self.mtime.into();
        format!(
            "\n[{}/{}] {} {}\n{} {} ({}, modified {})\n{} {}",
            self.index,
            self.total,
            style("FILE:").bold(),
            self.path.display(),
            style("ISSUE:").bold(),
            self.issue,
            HumanBytes(self.size),
            modified.format("%Y-%m-%d %H:%M"),
            style("ACTION:").bold(),
            style(self.action_line()).cyan()
        )
    }
}

/// Source of answers for the executor
pub trait Prompter {
    /// Present the record and return the user's answer
    fn confirm(&mut self, record: &PromptRecord) -> Result<Response, CleanError>;
}

pub const PROMPT_TEXT: &str = "Confirm: [y]es, [n]o, [a]lways for this type, [q]uit: ";

/// Line-oriented prompter over any reader/writer pair
///
/// End of input is treated as "quit" so a closed stdin can never approve
/// anything.
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the writer (used by tests to inspect the transcript)
    pub fn into_output(self) -> W {
        self.output
    }
}

impl LinePrompter<StdinLock<'static>, Term> {
    /// Prompter reading stdin and writing to the terminal
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), Term::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn confirm(&mut self, record: &PromptRecord) -> Result<Response, CleanError> {
        writeln!(self.output, "{}", record.render()).map_err(CleanError::Io)?;
        write!(self.output, "{}", PROMPT_TEXT).map_err(CleanError::Io)?;
        self.output.flush().map_err(CleanError::Io)?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|e| CleanError::Prompt(e.to_string()))?;
        if read == 0 {
            writeln!(self.output).map_err(CleanError::Io)?;
            return Ok(Response::Quit);
        }
        Ok(Response::parse(&line))
    }
}

/// Action kinds the user answered "always" for during this run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApprovalMemory {
    always: BTreeSet<ActionKind>,
}

impl ApprovalMemory {
    /// Empty memory: every action is prompted
    pub fn new() -> Self {
        Self::default()
    }

    /// Memory approving every kind up front (`--yes`)
    pub fn approve_all() -> Self {
        Self {
            always: ActionKind::ALL.into_iter().collect(),
        }
    }

    pub fn is_always(&self, kind: ActionKind) -> bool {
        self.always.contains(&kind)
    }

    pub fn remember(&mut self, kind: ActionKind) {
        self.always.insert(kind);
    }
}
