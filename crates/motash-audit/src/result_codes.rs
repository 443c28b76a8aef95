//! Allowed result codes, taken from a task's description.
//!
//! Grammar: one brace-enclosed list of comma-separated non-negative integers,
//! e.g. `Nightly backup {0,1,3}`. No match, or more than one, means the
//! default `{0}`. The running sentinel is always allowed.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// `0x00041301`: the task is still running. The scheduler reports it as a
/// last result even when the run state is not `Running`.
pub const SCHED_S_TASK_RUNNING: i32 = 267009;

/// Value used for tokens that do not parse as an `i32`.
pub const MALFORMED_CODE: i32 = 0;

static ALLOWED_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{[0-9,]+\}").unwrap_or_else(|e| panic!("invalid allowed-codes regex: {e}"))
});

/// Set of exit codes treated as success for one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedResults {
    codes: HashSet<i32>,
}

impl AllowedResults {
    /// Parse the description. Never fails.
    pub fn from_description(description: &str) -> Self {
        let mut matches = ALLOWED_LIST.find_iter(description);
        let mut codes: HashSet<i32> = match (matches.next(), matches.next()) {
            (Some(only), None) => only
                .as_str()
                .trim_start_matches('{')
                .trim_end_matches('}')
                .split(',')
                .map(parse_code)
                .collect(),
            _ => HashSet::from([0]),
        };
        codes.insert(SCHED_S_TASK_RUNNING);
        Self { codes }
    }

    pub fn contains(&self, code: i32) -> bool {
        self.codes.contains(&code)
    }

    /// Codes in ascending order, for logs.
    pub fn sorted(&self) -> Vec<i32> {
        let mut codes: Vec<i32> = self.codes.iter().copied().collect();
        codes.sort_unstable();
        codes
    }
}

fn parse_code(token: &str) -> i32 {
    token.trim().parse().unwrap_or(MALFORMED_CODE)
}
