//! Best-effort fan-out: failures are tallied, never aborting.

mod common;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use flowsync::domain::error::{SyncError, SyncResult};
use flowsync::{PropagationTask, Propagator};

/// Test task that records its execution order and fails on demand.
struct RecordingTask {
    name: String,
    fail: bool,
    log: Arc<Mutex<Vec<String>>>,
}

impl RecordingTask {
    fn ok(name: &str, log: &Arc<Mutex<Vec<String>>>) -> Box<dyn PropagationTask> {
        Box::new(Self {
            name: name.to_string(),
            fail: false,
            log: Arc::clone(log),
        })
    }

    fn failing(name: &str, log: &Arc<Mutex<Vec<String>>>) -> Box<dyn PropagationTask> {
        Box::new(Self {
            name: name.to_string(),
            fail: true,
            log: Arc::clone(log),
        })
    }
}

#[async_trait]
impl PropagationTask for RecordingTask {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, _flow_id: &str) -> SyncResult<()> {
        self.log.lock().unwrap().push(self.name.clone());
        if self.fail {
            Err(SyncError::Backend(format!("{} refused", self.name)))
        } else {
            Ok(())
        }
    }
}

#[tokio::test]
async fn all_tasks_succeed() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let propagator = Propagator::new(vec![
        RecordingTask::ok("one", &log),
        RecordingTask::ok("two", &log),
        RecordingTask::ok("three", &log),
    ]);

    let report = propagator.propagate("flow-1").await;

    assert_eq!(report.succeeded, 3);
    assert_eq!(report.total, 3);
    assert!(report.all_succeeded());
    assert!(report.failures.is_empty());
}

#[tokio::test]
async fn failure_does_not_stop_remaining_tasks() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let propagator = Propagator::new(vec![
        RecordingTask::ok("one", &log),
        RecordingTask::failing("two", &log),
        RecordingTask::ok("three", &log),
    ]);

    let report = propagator.propagate("flow-1").await;

    assert_eq!(report.succeeded, 2);
    assert_eq!(report.total, 3);
    assert!(!report.all_succeeded());
    assert_eq!(report.tally(), "2/3");

    // Every task ran, in order, despite the middle failure.
    assert_eq!(
        *log.lock().unwrap(),
        vec!["one".to_string(), "two".to_string(), "three".to_string()]
    );
}

#[tokio::test]
async fn tally_is_independent_of_which_subset_fails() {
    for failing_index in 0..3 {
        let log = Arc::new(Mutex::new(Vec::new()));
        let tasks: Vec<Box<dyn PropagationTask>> = (0..3)
            .map(|i| {
                let name = format!("task-{i}");
                if i == failing_index {
                    RecordingTask::failing(&name, &log)
                } else {
                    RecordingTask::ok(&name, &log)
                }
            })
            .collect();

        let report = Propagator::new(tasks).propagate("flow-1").await;
        assert_eq!(report.succeeded, 2, "failing index {failing_index}");
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, format!("task-{failing_index}"));
    }
}

#[tokio::test]
async fn all_failures_are_named() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let propagator = Propagator::new(vec![
        RecordingTask::failing("alpha", &log),
        RecordingTask::failing("beta", &log),
    ]);

    let report = propagator.propagate("flow-1").await;

    assert_eq!(report.succeeded, 0);
    assert_eq!(report.tally(), "0/2");
    let names: Vec<_> = report.failures.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "beta"]);
}
