//! Plain-text rendering of a failure list.

use chrono::Local;

use crate::types::Failure;

/// Template used when the configuration does not override it.
pub const DEFAULT_REPORT_FORMAT: &str = "{path} ({result}) at: {timestamp}";

/// `dd-MMM-yyyy HH:mm:ss`, rendered in the host's local time zone.
pub const TIMESTAMP_FORMAT: &str = "%d-%b-%Y %H:%M:%S";

/// Render one line per failure.
///
/// Placeholders: `{path}`, `{result}`, `{timestamp}`. The positional forms
/// `{0}`, `{1}`, `{2}` are accepted as the same three values.
pub fn failures_as_text(failures: &[Failure], template: &str) -> String {
    let mut text = String::new();
    for failure in failures {
        text.push_str(&format_failure(failure, template));
        text.push('\n');
    }
    text
}

/// Render a single failure with the given template.
pub fn format_failure(failure: &Failure, template: &str) -> String {
    let result = failure.result.to_string();
    let timestamp = local_timestamp(failure);

    // Single pass, so braces inside a substituted path are left alone.
    let mut out = String::with_capacity(template.len() + failure.path.len() + 32);
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let Some(end) = tail.find('}') else {
            out.push_str(tail);
            return out;
        };
        let value = match &tail[1..end] {
            "path" | "0" => Some(failure.path.as_str()),
            "result" | "1" => Some(result.as_str()),
            "timestamp" | "2" => Some(timestamp.as_str()),
            _ => None,
        };
        match value {
            Some(v) => out.push_str(v),
            None => out.push_str(&tail[..=end]),
        }
        rest = &tail[end + 1..];
    }
    out.push_str(rest);
    out
}

/// Last run in local time, as the scheduler's own tools show it.
pub fn local_timestamp(failure: &Failure) -> String {
    failure
        .last_run
        .with_timezone(&Local)
        .format(TIMESTAMP_FORMAT)
        .to_string()
}

/// Short headline for notifiers that need a subject line.
pub fn summary_line(failures: &[Failure], host: &str) -> String {
    match failures.len() {
        1 => format!("Motash: 1 problem on {host}"),
        n => format!("Motash: {n} problems on {host}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn failure(path: &str, result: i32) -> Failure {
        let at = Utc.with_ymd_and_hms(2026, 2, 22, 8, 5, 9).unwrap();
        Failure::new("task", path, at, result)
    }

    fn local(at: DateTime<Utc>) -> String {
        at.with_timezone(&Local).format(TIMESTAMP_FORMAT).to_string()
    }

    #[test]
    fn test_default_template() {
        let f = failure("\\Ops\\Backup", 5);
        let text = failures_as_text(std::slice::from_ref(&f), DEFAULT_REPORT_FORMAT);
        assert_eq!(text, format!("\\Ops\\Backup (5) at: {}\n", local(f.last_run)));
    }

    #[test]
    fn test_timestamp_is_local_time() {
        let f = failure("\\A", 1);
        let expected = f.last_run.with_timezone(&Local);
        assert_eq!(local_timestamp(&f), expected.format("%d-%b-%Y %H:%M:%S").to_string());
        assert_eq!(local_timestamp(&f).len(), "22-Feb-2026 08:05:09".len());
    }

    #[test]
    fn test_one_line_per_failure() {
        let failures = vec![failure("\\A", 1), failure("\\B", 2)];
        let text = failures_as_text(&failures, DEFAULT_REPORT_FORMAT);
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().nth(1).unwrap().starts_with("\\B (2)"));
    }

    #[test]
    fn test_positional_template() {
        let f = failure("\\Ops\\Sync", -1);
        let line = format_failure(&f, "{1} | {0} | {2}");
        assert_eq!(line, format!("-1 | \\Ops\\Sync | {}", local(f.last_run)));
    }

    #[test]
    fn test_braces_in_path_not_expanded() {
        let line = format_failure(&failure("\\Ops\\{1}", 3), DEFAULT_REPORT_FORMAT);
        assert!(line.starts_with("\\Ops\\{1} (3)"));
        assert_eq!(format_failure(&failure("\\A", 3), "{unknown} {path"), "{unknown} {path");
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(failures_as_text(&[], DEFAULT_REPORT_FORMAT), "");
    }

    #[test]
    fn test_summary_line() {
        assert_eq!(summary_line(&[failure("\\A", 1)], "srv01"), "Motash: 1 problem on srv01");
        let two = vec![failure("\\A", 1), failure("\\B", 1)];
        assert_eq!(summary_line(&two, "srv01"), "Motash: 2 problems on srv01");
    }
}
