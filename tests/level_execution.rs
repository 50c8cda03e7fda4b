// tests/level_execution.rs

use std::time::Duration;

use stagedag::dag::{DagExecutor, WorkNode};
use stagedag_test_utils::recorder::{gap, Recorder};
use stagedag_test_utils::{init_tracing, with_timeout};

const TOLERANCE: Duration = Duration::from_millis(30);
const STEP: Duration = Duration::from_millis(50);

#[tokio::test]
async fn single_node_runs_exactly_once() {
    init_tracing();

    let recorder = Recorder::new();
    let mut dag = DagExecutor::new();
    dag.add_node(WorkNode::new("planning", recorder.succeeding("planning", Duration::ZERO)))
        .unwrap();

    let report = with_timeout(dag.execute()).await.unwrap();

    assert!(report.success);
    assert_eq!(report.execution_order, vec!["planning"]);
    assert_eq!(recorder.calls("planning"), 1);
    assert_eq!(
        report.result("planning").map(String::as_str),
        Some("planning-done")
    );
    assert!(report.errors.is_empty());
}

#[tokio::test]
async fn linear_chain_runs_strictly_in_order() {
    init_tracing();

    let recorder = Recorder::new();
    let mut dag = DagExecutor::new();
    dag.add_node(WorkNode::new("A", recorder.succeeding("A", STEP))).unwrap();
    dag.add_node(WorkNode::new("B", recorder.succeeding("B", STEP)).after("A"))
        .unwrap();
    dag.add_node(WorkNode::new("C", recorder.succeeding("C", STEP)).after("B"))
        .unwrap();

    let report = with_timeout(dag.execute()).await.unwrap();

    assert!(report.success);
    assert_eq!(report.execution_order, vec!["A", "B", "C"]);
    assert_eq!(recorder.start_order(), vec!["A", "B", "C"]);
    assert!(recorder.started("B") >= recorder.finished("A"));
    assert!(recorder.started("C") >= recorder.finished("B"));
}

#[tokio::test]
async fn diamond_runs_middle_branches_concurrently() {
    init_tracing();

    let recorder = Recorder::new();
    let mut dag = DagExecutor::new();
    dag.add_node(WorkNode::new("A", recorder.succeeding("A", STEP))).unwrap();
    dag.add_node(WorkNode::new("B", recorder.succeeding("B", STEP)).after("A"))
        .unwrap();
    dag.add_node(WorkNode::new("C", recorder.succeeding("C", STEP)).after("A"))
        .unwrap();
    dag.add_node(
        WorkNode::new("D", recorder.succeeding("D", STEP))
            .after("B")
            .after("C"),
    )
    .unwrap();

    let report = with_timeout(dag.execute()).await.unwrap();

    assert!(report.success);
    assert_eq!(report.results.len(), 4);
    assert_eq!(recorder.start_order()[0], "A");
    assert!(recorder.started("B") >= recorder.finished("A"));
    assert!(recorder.started("C") >= recorder.finished("A"));
    assert!(gap(recorder.started("B"), recorder.started("C")) < TOLERANCE);
    assert!(recorder.started("D") >= recorder.finished("B"));
    assert!(recorder.started("D") >= recorder.finished("C"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn independent_roots_start_together() {
    init_tracing();

    let recorder = Recorder::new();
    let mut dag = DagExecutor::new();
    dag.add_node(WorkNode::new("left", recorder.succeeding("left", STEP * 2)))
        .unwrap();
    dag.add_node(WorkNode::new("right", recorder.succeeding("right", STEP * 2)))
        .unwrap();

    let started = tokio::time::Instant::now();
    let report = with_timeout(dag.execute()).await.unwrap();
    let elapsed = started.elapsed();

    assert!(report.success);
    assert!(gap(recorder.started("left"), recorder.started("right")) < TOLERANCE);
    // Serial execution would take at least 2 * 100ms.
    assert!(elapsed < STEP * 4 - TOLERANCE, "took {elapsed:?}");
}

#[tokio::test]
async fn failure_is_contained_to_its_own_branch() {
    init_tracing();

    let recorder = Recorder::new();
    let mut dag = DagExecutor::new();
    dag.add_node(WorkNode::new("root", recorder.succeeding("root", Duration::ZERO)))
        .unwrap();
    dag.add_node(
        WorkNode::new("bad", recorder.failing("bad", Duration::from_millis(10), "boom"))
            .after("root"),
    )
    .unwrap();
    dag.add_node(WorkNode::new("good", recorder.succeeding("good", STEP)).after("root"))
        .unwrap();
    dag.add_node(WorkNode::new("after_good", recorder.succeeding("after_good", Duration::ZERO)).after("good"))
        .unwrap();
    dag.add_node(WorkNode::new("island", recorder.succeeding("island", Duration::ZERO)))
        .unwrap();

    let report = with_timeout(dag.execute()).await.unwrap();

    assert!(!report.success);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].stage, "bad");
    assert!(report.errors[0].error.to_string().contains("boom"));
    assert!(report.errors[0].to_string().contains("stage 'bad' failed"));

    for name in ["root", "good", "after_good", "island"] {
        assert_eq!(
            report.result(name).cloned(),
            Some(format!("{name}-done")),
            "{name} should have completed"
        );
    }
    assert!(report.result("bad").is_none());
    assert_eq!(report.failed_stages(), vec!["bad"]);
    assert!(report.unreached().is_empty());
}

#[tokio::test]
async fn dependents_of_a_failed_node_never_run() {
    init_tracing();

    let recorder = Recorder::new();
    let mut dag = DagExecutor::new();
    dag.add_node(WorkNode::new("A", recorder.failing("A", Duration::ZERO, "nope")))
        .unwrap();
    dag.add_node(WorkNode::new("B", recorder.succeeding("B", Duration::ZERO)).after("A"))
        .unwrap();
    dag.add_node(WorkNode::new("C", recorder.succeeding("C", Duration::ZERO)).after("B"))
        .unwrap();
    dag.add_node(WorkNode::new("other", recorder.succeeding("other", Duration::ZERO)))
        .unwrap();
    dag.add_node(
        WorkNode::new("join", recorder.succeeding("join", Duration::ZERO))
            .after("other")
            .after("C"),
    )
    .unwrap();

    let report = with_timeout(dag.execute()).await.unwrap();

    assert!(!report.success);
    assert_eq!(report.execution_order, vec!["A", "other", "B", "C", "join"]);
    assert_eq!(report.failed_stages(), vec!["A"]);
    for name in ["B", "C", "join"] {
        assert_eq!(recorder.calls(name), 0, "{name} must not be invoked");
        assert!(report.result(name).is_none());
    }
    assert_eq!(report.unreached(), vec!["B", "C", "join"]);
    assert_eq!(report.result("other").map(String::as_str), Some("other-done"));
}

#[tokio::test]
async fn siblings_of_a_failed_node_still_complete() {
    init_tracing();

    let recorder = Recorder::new();
    let mut dag = DagExecutor::new();
    dag.add_node(WorkNode::new("fast_fail", recorder.failing("fast_fail", Duration::ZERO, "early")))
        .unwrap();
    dag.add_node(WorkNode::new("slow_ok", recorder.succeeding("slow_ok", STEP)))
        .unwrap();

    let report = with_timeout(dag.execute()).await.unwrap();

    assert!(!report.success);
    assert_eq!(report.failed_stages(), vec!["fast_fail"]);
    assert_eq!(
        report.result("slow_ok").map(String::as_str),
        Some("slow_ok-done")
    );
}

#[tokio::test]
async fn panicking_executor_is_recorded_as_a_stage_error() {
    init_tracing();

    let recorder = Recorder::new();
    let mut dag = DagExecutor::new();
    dag.add_node(WorkNode::new("explodes", recorder.panicking("explodes")))
        .unwrap();
    dag.add_node(WorkNode::new("calm", recorder.succeeding("calm", Duration::from_millis(10))))
        .unwrap();
    dag.add_node(
        WorkNode::new("downstream", recorder.succeeding("downstream", Duration::ZERO))
            .after("explodes"),
    )
    .unwrap();

    let report = with_timeout(dag.execute()).await.unwrap();

    assert!(!report.success);
    assert_eq!(report.failed_stages(), vec!["explodes"]);
    assert!(report.result("calm").is_some());
    assert_eq!(recorder.calls("downstream"), 0);
}

#[tokio::test]
async fn concurrent_panics_are_attributed_to_their_own_stages() {
    let recorder = Recorder::new();
    let mut dag = DagExecutor::new();
    dag.add_node(WorkNode::new("left", recorder.panicking("left")))
        .unwrap();
    dag.add_node(WorkNode::new("right", recorder.panicking("right")))
        .unwrap();
    dag.add_node(WorkNode::new("steady", recorder.succeeding("steady", Duration::ZERO)))
        .unwrap();

    let report = with_timeout(dag.execute()).await.unwrap();

    let mut failed = report.failed_stages();
    failed.sort();
    assert_eq!(failed, vec!["left", "right"]);
    assert!(report.errors.iter().all(|e| !e.stage.is_empty()));
    assert!(report.result("steady").is_some());
}

#[tokio::test]
async fn execute_can_be_repeated_on_the_same_graph() {
    let recorder = Recorder::new();
    let mut dag = DagExecutor::new();
    dag.add_node(WorkNode::new("a", recorder.succeeding("a", Duration::ZERO)))
        .unwrap();

    let first = dag.execute().await.unwrap();
    let second = dag.execute().await.unwrap();

    assert!(first.success && second.success);
    assert_eq!(recorder.calls("a"), 2);
}
