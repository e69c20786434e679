//! Run verdicts and the closing summary

use std::time::Duration;

use colored::Colorize;

/// Process exit code for a clean run
pub const EXIT_OK: i32 = 0;
/// Process exit code for failed cases or a broken environment
pub const EXIT_FAILURE: i32 = 1;
/// Process exit code when the operator interrupts the run
pub const EXIT_INTERRUPTED: i32 = 130;

/// Outcome of one harness run
#[derive(Debug, Default)]
pub struct RunReport {
    /// Main-stage cases scheduled; this is the number the summary reports
    pub scheduled: usize,

    /// Verdict counters, fixture stages included
    pub passed: usize,
    pub failed: usize,

    pub duration: Duration,
}

impl RunReport {
    pub fn new(scheduled: usize) -> Self {
        Self {
            scheduled,
            ..Default::default()
        }
    }

    pub fn succeeded(&self) -> bool {
        self.failed == 0
    }

    pub fn exit_code(&self) -> i32 {
        if self.succeeded() {
            EXIT_OK
        } else {
            EXIT_FAILURE
        }
    }

    /// Print the `Ran N tests` line with the overall verdict after it
    pub fn print_summary(&self) {
        let plural = if self.scheduled > 1 { "s" } else { "" };
        print!(
            "Ran {} test{} in {:.6}s. ",
            self.scheduled,
            plural,
            self.duration.as_secs_f64()
        );
        if self.succeeded() {
            println!("{}", "Succeeded".green());
        } else {
            println!("{}", "Failed".red());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let mut run_report = RunReport::new(3);
        run_report.passed = 3;
        assert!(run_report.succeeded());
        assert_eq!(run_report.exit_code(), EXIT_OK);

        run_report.failed = 1;
        assert!(!run_report.succeeded());
        assert_eq!(run_report.exit_code(), EXIT_FAILURE);
    }

    #[test]
    fn test_fixture_failures_count_against_the_run() {
        // A failed login must fail the run even with zero main-stage failures
        let mut run_report = RunReport::new(2);
        run_report.passed = 2;
        run_report.failed = 1;
        assert_eq!(run_report.exit_code(), EXIT_FAILURE);
    }
}
