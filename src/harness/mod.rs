//! Case scheduling and the run loop
//!
//! A suite schedules named cases into three stages: pre (fixture steps such
//! as logging in), main (the cases the summary counts) and post (cleanup).
//! Stages run in declaration order. An assertion failure is recorded and the
//! run moves on; any other error aborts the run as an infrastructure problem.

pub mod report;
pub mod retry;

use std::io::Write as _;
use std::time::Instant;

use colored::Colorize;
use futures_util::future::BoxFuture;

use crate::common::Result;

pub use report::RunReport;
pub use retry::{Matcher, DEFAULT_ATTEMPTS, POLL_INTERVAL};

/// A scheduled case: borrows the suite context for the duration of one call
pub type CaseFn<C> = fn(&mut C) -> BoxFuture<'_, Result<()>>;

struct Case<C> {
    name: String,
    run: CaseFn<C>,
}

/// Ordered schedule of cases sharing a context of type `C`
pub struct Harness<C> {
    label: String,
    pre: Vec<Case<C>>,
    main: Vec<Case<C>>,
    post: Vec<Case<C>>,
}

impl<C> Harness<C> {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            pre: Vec::new(),
            main: Vec::new(),
            post: Vec::new(),
        }
    }

    /// Human-readable suite name, printed by the runner before connecting
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Schedule a fixture step to run before the main stage
    pub fn schedule_pre(&mut self, name: impl Into<String>, case: CaseFn<C>) {
        self.pre.push(Case {
            name: name.into(),
            run: case,
        });
    }

    /// Schedule a main-stage case
    pub fn schedule(&mut self, name: impl Into<String>, case: CaseFn<C>) {
        self.main.push(Case {
            name: name.into(),
            run: case,
        });
    }

    /// Schedule a cleanup step to run after the main stage
    pub fn schedule_post(&mut self, name: impl Into<String>, case: CaseFn<C>) {
        self.post.push(Case {
            name: name.into(),
            run: case,
        });
    }

    /// Case names in execution order, fixture stages included
    pub fn case_names(&self) -> Vec<&str> {
        self.pre
            .iter()
            .chain(&self.main)
            .chain(&self.post)
            .map(|case| case.name.as_str())
            .collect()
    }

    /// Run every stage in order and report the verdicts
    ///
    /// The report counts main-stage cases as "tests"; pre and post verdicts
    /// still feed the pass/fail counters so a broken fixture is visible.
    pub async fn run(&self, cx: &mut C) -> Result<RunReport> {
        if self.main.is_empty() {
            println!("There is nothing to run since the number of test cases is 0.");
            return Ok(RunReport::new(0));
        }

        let started = Instant::now();
        let mut run_report = RunReport::new(self.main.len());

        for case in self.pre.iter().chain(&self.main).chain(&self.post) {
            print!("Running {}... ", case.name);
            let _ = std::io::stdout().flush();

            match (case.run)(cx).await {
                Ok(()) => {
                    println!("{}", "success".green());
                    run_report.passed += 1;
                }
                Err(e) if e.is_assertion() => {
                    println!("{}", "failed".red());
                    println!("  {}", e.to_string().dimmed());
                    run_report.failed += 1;
                }
                Err(e) => return Err(e),
            }
        }

        run_report.duration = started.elapsed();
        run_report.print_summary();

        Ok(run_report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{ensure, Error};

    #[derive(Default)]
    struct Trace {
        calls: Vec<&'static str>,
    }

    fn pre_step(cx: &mut Trace) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            cx.calls.push("pre");
            Ok(())
        })
    }

    fn first(cx: &mut Trace) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            cx.calls.push("first");
            Ok(())
        })
    }

    fn second(cx: &mut Trace) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            cx.calls.push("second");
            ensure(false, "second always fails")
        })
    }

    fn third(cx: &mut Trace) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            cx.calls.push("third");
            Ok(())
        })
    }

    fn cleanup(cx: &mut Trace) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            cx.calls.push("post");
            Ok(())
        })
    }

    fn broken_infra(cx: &mut Trace) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            cx.calls.push("infra");
            Err(Error::Config("no server".to_string()))
        })
    }

    #[tokio::test]
    async fn test_stages_run_in_declaration_order() {
        let mut harness = Harness::new("order check");
        harness.schedule("first", first);
        harness.schedule_post("cleanup", cleanup);
        harness.schedule_pre("pre", pre_step);
        harness.schedule("third", third);

        let mut cx = Trace::default();
        let run_report = harness.run(&mut cx).await.unwrap();

        assert_eq!(cx.calls, ["pre", "first", "third", "post"]);
        assert_eq!(run_report.scheduled, 2);
        assert_eq!(run_report.passed, 4);
        assert_eq!(run_report.failed, 0);
    }

    #[tokio::test]
    async fn test_assertion_failure_does_not_stop_the_run() {
        let mut harness = Harness::new("assertion check");
        harness.schedule("first", first);
        harness.schedule("second", second);
        harness.schedule("third", third);

        let mut cx = Trace::default();
        let run_report = harness.run(&mut cx).await.unwrap();

        assert_eq!(cx.calls, ["first", "second", "third"]);
        assert_eq!(run_report.passed, 2);
        assert_eq!(run_report.failed, 1);
        assert!(!run_report.succeeded());
    }

    #[tokio::test]
    async fn test_infrastructure_error_aborts_the_run() {
        let mut harness = Harness::new("abort check");
        harness.schedule("infra", broken_infra);
        harness.schedule("third", third);

        let mut cx = Trace::default();
        let err = harness.run(&mut cx).await.unwrap_err();

        assert_eq!(cx.calls, ["infra"]);
        assert!(!err.is_assertion());
    }

    #[tokio::test]
    async fn test_empty_main_stage_runs_nothing() {
        let mut harness = Harness::new("empty check");
        harness.schedule_pre("pre", pre_step);
        harness.schedule_post("cleanup", cleanup);

        let mut cx = Trace::default();
        let run_report = harness.run(&mut cx).await.unwrap();

        assert!(cx.calls.is_empty());
        assert_eq!(run_report.scheduled, 0);
        assert!(run_report.succeeded());
    }

    #[test]
    fn test_case_names_cover_all_stages() {
        let mut harness: Harness<Trace> = Harness::new("names");
        harness.schedule_pre("login", pre_step);
        harness.schedule("first", first);
        harness.schedule_post("cleanup", cleanup);

        assert_eq!(harness.case_names(), ["login", "first", "cleanup"]);
    }
}
