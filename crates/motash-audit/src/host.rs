//! Host preconditions: OS version and the scheduler service.

use std::process::Command;

/// Minimum Windows major version (Vista).
pub const MIN_OS_MAJOR: u32 = 6;

/// Name of the Windows Task Scheduler service.
pub const SCHEDULER_SERVICE: &str = "Schedule";

/// Boolean preconditions checked before any task is inspected.
pub trait Environment {
    fn os_supported(&self) -> bool;
    fn scheduler_service_running(&self) -> bool;
}

/// Fixed answers. Used when host checks are skipped and in tests.
#[derive(Debug, Clone, Copy)]
pub struct StaticEnvironment {
    pub os_supported: bool,
    pub service_running: bool,
}

impl StaticEnvironment {
    pub fn ready() -> Self {
        Self {
            os_supported: true,
            service_running: true,
        }
    }
}

impl Environment for StaticEnvironment {
    fn os_supported(&self) -> bool {
        self.os_supported
    }

    fn scheduler_service_running(&self) -> bool {
        self.service_running
    }
}

/// Probes the local machine with `ver` and `sc query`.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostEnvironment;

impl Environment for HostEnvironment {
    fn os_supported(&self) -> bool {
        if !cfg!(windows) {
            return false;
        }
        match Command::new("cmd").args(["/C", "ver"]).output() {
            Ok(out) if out.status.success() => {
                let text = String::from_utf8_lossy(&out.stdout);
                match parse_windows_major(&text) {
                    Some(major) => major >= MIN_OS_MAJOR,
                    None => {
                        tracing::warn!("⚠️ Unrecognized version output: {}", text.trim());
                        false
                    }
                }
            }
            Ok(out) => {
                tracing::warn!("⚠️ ver failed: {}", String::from_utf8_lossy(&out.stderr));
                false
            }
            Err(e) => {
                tracing::warn!("⚠️ ver failed: {e}");
                false
            }
        }
    }

    fn scheduler_service_running(&self) -> bool {
        if !cfg!(windows) {
            return false;
        }
        match Command::new("sc").args(["query", SCHEDULER_SERVICE]).output() {
            Ok(out) => service_is_running(&String::from_utf8_lossy(&out.stdout)),
            Err(e) => {
                tracing::warn!("⚠️ sc query {SCHEDULER_SERVICE} failed: {e}");
                false
            }
        }
    }
}

/// `Microsoft Windows [Version 10.0.19045.4046]` → 10
fn parse_windows_major(ver_output: &str) -> Option<u32> {
    let start = ver_output.find("Version ")? + "Version ".len();
    let rest = &ver_output[start..];
    let major: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    major.parse().ok()
}

/// Looks for the `STATE : 4  RUNNING` line of `sc query`.
fn service_is_running(sc_output: &str) -> bool {
    sc_output
        .lines()
        .filter(|line| line.trim_start().starts_with("STATE"))
        .any(|line| line.contains("RUNNING"))
}
