//! End-to-end engine tests
//!
//! The judging pipeline is exercised against a scripted sandbox: the
//! submitted "source code" is a directive telling the fake how to behave,
//! and questions use echo semantics (expected output == test case input) so
//! the fake can answer correctly without knowing the expected output.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use tokio::sync::Semaphore;
use uuid::Uuid;

use codearena::{
    config::JudgeConfig,
    error::AppError,
    intake::SubmissionIntake,
    judge::{JudgeEngine, RunReport, RunRequest, RunStatus, Sandbox, SandboxFailure},
    leaderboard::Leaderboard,
    models::{Contest, Question, SubmissionStatus, TestCase, Verdict},
    registry::ContestRegistry,
    store::SubmissionStore,
};

/// Scripted sandbox: behavior is chosen by the submitted source code.
///
/// Directives:
/// - `ok`            completes with stdout == input
/// - `ok-if:<val>`   correct output only when the trimmed input equals `val`
/// - `wrong`         completes with bogus output
/// - `crash`         completes with a non-zero exit code
/// - `tle`           reports a wall-clock timeout
/// - `compile-error` reports a failed compile step
/// - `infra`         always fails at the infrastructure level
struct FakeSandbox {
    /// When set, every run waits for a permit before responding; lets tests
    /// hold workers busy deliberately
    gate: Option<Arc<Semaphore>>,
    /// Random small delay per run, to shuffle completion order
    jitter: bool,
}

impl FakeSandbox {
    fn new() -> Self {
        Self {
            gate: None,
            jitter: false,
        }
    }

    fn gated(gate: Arc<Semaphore>) -> Self {
        Self {
            gate: Some(gate),
            jitter: false,
        }
    }

    fn jittered() -> Self {
        Self {
            gate: None,
            jitter: true,
        }
    }
}

#[async_trait]
impl Sandbox for FakeSandbox {
    async fn run(&self, request: RunRequest<'_>) -> Result<RunReport, SandboxFailure> {
        if let Some(gate) = &self.gate {
            let permit = gate.acquire().await.expect("gate closed");
            permit.forget();
        }
        if self.jitter {
            let delay: u64 = rand::random_range(0..20);
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        let directive = request.code.trim();
        let report = |status: RunStatus, stdout: String| RunReport {
            status,
            stdout,
            stderr: None,
            compile_log: None,
            wall_time_ms: 5.0,
            memory_kb: 2048,
        };

        if directive == "ok" {
            return Ok(report(
                RunStatus::Completed { exit_code: 0 },
                request.input.to_string(),
            ));
        }
        if let Some(val) = directive.strip_prefix("ok-if:") {
            let stdout = if request.input.trim() == val {
                request.input.to_string()
            } else {
                "garbage".to_string()
            };
            return Ok(report(RunStatus::Completed { exit_code: 0 }, stdout));
        }
        match directive {
            "wrong" => Ok(report(
                RunStatus::Completed { exit_code: 0 },
                "garbage".to_string(),
            )),
            "crash" => Ok(report(
                RunStatus::Completed { exit_code: 139 },
                String::new(),
            )),
            "tle" => Ok(report(RunStatus::TimedOut, String::new())),
            "compile-error" => Ok(RunReport::compile_failed("syntax error".to_string())),
            "infra" => Err(SandboxFailure("docker daemon unreachable".to_string())),
            other => panic!("unknown sandbox directive: {}", other),
        }
    }
}

/// Running engine plus handles to its owned stores
struct World {
    registry: Arc<ContestRegistry>,
    store: Arc<SubmissionStore>,
    leaderboard: Arc<Leaderboard>,
    intake: SubmissionIntake,
    engine: JudgeEngine,
}

fn spawn_world(sandbox: Arc<dyn Sandbox>, config: JudgeConfig) -> World {
    let registry = Arc::new(ContestRegistry::new());
    let store = Arc::new(SubmissionStore::new());
    let leaderboard = Arc::new(Leaderboard::new());

    let engine = JudgeEngine::start(
        config,
        Arc::clone(&registry),
        Arc::clone(&store),
        Arc::clone(&leaderboard),
        sandbox,
    );
    let intake = SubmissionIntake::new(Arc::clone(&registry), Arc::clone(&store), engine.queue());

    World {
        registry,
        store,
        leaderboard,
        intake,
        engine,
    }
}

fn fast_config() -> JudgeConfig {
    JudgeConfig {
        workers: 2,
        queue_capacity: 64,
        sandbox_retries: 1,
        retry_backoff_ms: 1,
        ..JudgeConfig::default()
    }
}

/// Seed a contest whose questions echo their input
fn seed_contest(
    registry: &ContestRegistry,
    id: &str,
    start_offset_secs: i64,
    duration_secs: i64,
    questions: &[(&str, &[(&str, u32)])],
) {
    let contest = Contest {
        id: id.to_string(),
        title: format!("Contest {}", id),
        owner: "organizer".to_string(),
        questions: questions.iter().map(|(qid, _)| qid.to_string()).collect(),
        start_time: Utc::now() + ChronoDuration::seconds(start_offset_secs),
        duration_secs,
        archived: false,
        created_at: Utc::now(),
    };
    let questions = questions
        .iter()
        .map(|(qid, cases)| Question {
            id: qid.to_string(),
            contest_id: id.to_string(),
            statement_ref: format!("statements/{}.md", qid),
            test_cases: cases
                .iter()
                .map(|(input, weight)| TestCase {
                    input: input.to_string(),
                    expected_output: input.to_string(),
                    weight: *weight,
                })
                .collect(),
        })
        .collect();
    registry.insert_contest(contest, questions).unwrap();
}

async fn await_scored(store: &SubmissionStore, id: Uuid) -> codearena::models::Submission {
    tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            let submission = store.get(&id).unwrap();
            if submission.status.is_terminal() {
                return submission;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("submission never reached a terminal state")
}

#[tokio::test]
async fn best_of_scoring_scenario() {
    let world = spawn_world(Arc::new(FakeSandbox::new()), fast_config());
    seed_contest(
        &world.registry,
        "weekly",
        -5,
        60,
        &[("q1", &[("1\n", 50), ("2\n", 50)])],
    );

    // Submission A passes both test cases
    let a = world
        .intake
        .submit("weekly", "q1", "alice", "ok".to_string(), "python")
        .unwrap();
    let a = await_scored(&world.store, a).await;
    assert_eq!(a.status, SubmissionStatus::Scored(Verdict::Accepted));
    assert_eq!(a.score, Some(100));
    assert_eq!(world.leaderboard.entry("weekly", "alice").unwrap().total_score, 100);

    // Submission B passes only the first case: score 50, best-of keeps 100
    let b = world
        .intake
        .submit("weekly", "q1", "alice", "ok-if:1".to_string(), "python")
        .unwrap();
    let b = await_scored(&world.store, b).await;
    assert_eq!(b.status, SubmissionStatus::Scored(Verdict::WrongAnswer));
    assert_eq!(b.score, Some(50));

    let entry = world.leaderboard.entry("weekly", "alice").unwrap();
    assert_eq!(entry.total_score, 100);
    assert_eq!(entry.best_scores["q1"], 100);

    let ranking = world.leaderboard.ranking("weekly");
    assert_eq!(ranking[0].user_handle, "alice");
    assert_eq!(ranking[0].rank, 1);

    world.engine.shutdown().await;
}

#[tokio::test]
async fn late_intake_is_rejected() {
    let world = spawn_world(Arc::new(FakeSandbox::new()), fast_config());
    // contest closed one second ago
    seed_contest(&world.registry, "over", -61, 60, &[("q1", &[("1\n", 100)])]);

    let err = world
        .intake
        .submit("over", "q1", "carol", "ok".to_string(), "python")
        .unwrap_err();
    assert!(matches!(err, AppError::ContestNotActive));

    // nothing was recorded for the rejected submitter
    assert!(world.leaderboard.entry("over", "carol").is_none());

    world.engine.shutdown().await;
}

#[tokio::test]
async fn time_limit_scores_zero_and_releases_worker() {
    let config = JudgeConfig {
        workers: 1,
        ..fast_config()
    };
    let world = spawn_world(Arc::new(FakeSandbox::new()), config);
    seed_contest(
        &world.registry,
        "c1",
        -5,
        600,
        &[("q1", &[("1\n", 50), ("2\n", 50)])],
    );

    let slow = world
        .intake
        .submit("c1", "q1", "dave", "tle".to_string(), "python")
        .unwrap();
    let slow = await_scored(&world.store, slow).await;
    assert_eq!(slow.status, SubmissionStatus::Scored(Verdict::TimeLimitExceeded));
    assert_eq!(slow.score, Some(0));
    assert!(!slow.infra_failure);
    assert!(slow.test_results.iter().all(|r| r.verdict == Verdict::TimeLimitExceeded));

    // the single worker must be back in the pool to judge the next one
    let next = world
        .intake
        .submit("c1", "q1", "dave", "ok".to_string(), "python")
        .unwrap();
    let next = await_scored(&world.store, next).await;
    assert_eq!(next.score, Some(100));

    world.engine.shutdown().await;
}

#[tokio::test]
async fn compile_error_short_circuits_test_cases() {
    let world = spawn_world(Arc::new(FakeSandbox::new()), fast_config());
    seed_contest(
        &world.registry,
        "c1",
        -5,
        600,
        &[("q1", &[("1\n", 50), ("2\n", 50)])],
    );

    let id = world
        .intake
        .submit("c1", "q1", "erin", "compile-error".to_string(), "rust")
        .unwrap();
    let submission = await_scored(&world.store, id).await;

    assert_eq!(submission.status, SubmissionStatus::Scored(Verdict::CompileError));
    assert_eq!(submission.score, Some(0));
    // the second test case was never run
    assert_eq!(submission.test_results.len(), 1);

    world.engine.shutdown().await;
}

#[tokio::test]
async fn crash_is_a_judged_runtime_error() {
    let world = spawn_world(Arc::new(FakeSandbox::new()), fast_config());
    seed_contest(&world.registry, "c1", -5, 600, &[("q1", &[("1\n", 100)])]);

    let id = world
        .intake
        .submit("c1", "q1", "frank", "crash".to_string(), "c")
        .unwrap();
    let submission = await_scored(&world.store, id).await;

    assert_eq!(submission.status, SubmissionStatus::Scored(Verdict::RuntimeError));
    assert_eq!(submission.score, Some(0));
    // a crashing program is a judging outcome, not an infrastructure fault
    assert!(!submission.infra_failure);

    world.engine.shutdown().await;
}

#[tokio::test]
async fn exhausted_sandbox_retries_mark_infra_failure() {
    let world = spawn_world(Arc::new(FakeSandbox::new()), fast_config());
    seed_contest(&world.registry, "c1", -5, 600, &[("q1", &[("1\n", 100)])]);

    let id = world
        .intake
        .submit("c1", "q1", "grace", "infra".to_string(), "go")
        .unwrap();
    let submission = await_scored(&world.store, id).await;

    // never stuck in Running: terminal, flagged, scored zero
    assert_eq!(submission.status, SubmissionStatus::Scored(Verdict::RuntimeError));
    assert!(submission.infra_failure);
    assert_eq!(submission.score, Some(0));
    assert_eq!(world.leaderboard.entry("c1", "grace").unwrap().total_score, 0);

    world.engine.shutdown().await;
}

#[tokio::test]
async fn full_queue_signals_overloaded_and_recovers() {
    let gate = Arc::new(Semaphore::new(0));
    let config = JudgeConfig {
        workers: 1,
        queue_capacity: 1,
        ..fast_config()
    };
    let world = spawn_world(Arc::new(FakeSandbox::gated(Arc::clone(&gate))), config);
    seed_contest(&world.registry, "c1", -5, 600, &[("q1", &[("1\n", 100)])]);

    // first submission is claimed by the worker and parks inside the sandbox
    let first = world
        .intake
        .submit("c1", "q1", "heidi", "ok".to_string(), "python")
        .unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    // second fills the single queue slot, third must be rejected
    let second = world
        .intake
        .submit("c1", "q1", "heidi", "ok".to_string(), "python")
        .unwrap();
    let err = world
        .intake
        .submit("c1", "q1", "heidi", "ok".to_string(), "python")
        .unwrap_err();
    assert!(matches!(err, AppError::Overloaded));

    // release the sandbox; once the queue drains, intake succeeds again
    gate.add_permits(100);
    await_scored(&world.store, first).await;
    await_scored(&world.store, second).await;

    let third = world
        .intake
        .submit("c1", "q1", "heidi", "ok".to_string(), "python")
        .unwrap();
    let third = await_scored(&world.store, third).await;
    assert_eq!(third.score, Some(100));

    world.engine.shutdown().await;
}

#[tokio::test]
async fn concurrent_completion_order_never_corrupts_totals() {
    let config = JudgeConfig {
        workers: 4,
        ..fast_config()
    };
    let world = spawn_world(Arc::new(FakeSandbox::jittered()), config);
    seed_contest(
        &world.registry,
        "c1",
        -5,
        600,
        &[("q1", &[("1\n", 100)]), ("q2", &[("1\n", 100)])],
    );

    // same user, many submissions, shuffled completion order via jitter
    let scripts: &[(&str, &str, u32)] = &[
        ("q1", "wrong", 0),
        ("q1", "ok", 100),
        ("q1", "wrong", 0),
        ("q1", "crash", 0),
        ("q2", "wrong", 0),
        ("q2", "tle", 0),
        ("q2", "ok", 100),
        ("q2", "wrong", 0),
        ("q1", "ok", 100),
        ("q2", "crash", 0),
    ];

    let mut ids = Vec::new();
    for (question, directive, _) in scripts {
        let id = world
            .intake
            .submit("c1", question, "ivan", directive.to_string(), "python")
            .unwrap();
        ids.push(id);
    }
    for id in ids {
        await_scored(&world.store, id).await;
    }

    // regardless of which submission finished first, the entry holds the
    // best score per question and their exact sum
    let entry = world.leaderboard.entry("c1", "ivan").unwrap();
    assert_eq!(entry.best_scores["q1"], 100);
    assert_eq!(entry.best_scores["q2"], 100);
    assert_eq!(entry.total_score, 200);

    let ranking = world.leaderboard.ranking("c1");
    assert_eq!(ranking.len(), 1);
    assert_eq!(ranking[0].total_score, 200);

    world.engine.shutdown().await;
}

#[tokio::test]
async fn in_flight_judging_completes_after_close() {
    let gate = Arc::new(Semaphore::new(0));
    let config = JudgeConfig {
        workers: 1,
        ..fast_config()
    };
    let world = spawn_world(Arc::new(FakeSandbox::gated(Arc::clone(&gate))), config);
    // closes almost immediately after the submission goes in
    seed_contest(&world.registry, "c1", -59, 60, &[("q1", &[("1\n", 100)])]);

    let id = world
        .intake
        .submit("c1", "q1", "judy", "ok".to_string(), "python")
        .unwrap();

    // hold the run until the contest window has certainly expired
    tokio::time::sleep(Duration::from_millis(1100)).await;
    gate.add_permits(100);

    // late judging is not penalized: the submission is scored normally
    let submission = await_scored(&world.store, id).await;
    assert_eq!(submission.status, SubmissionStatus::Scored(Verdict::Accepted));
    assert_eq!(submission.score, Some(100));
    assert_eq!(world.leaderboard.entry("c1", "judy").unwrap().total_score, 100);

    // but new intake is rejected once closed
    let err = world
        .intake
        .submit("c1", "q1", "judy", "ok".to_string(), "python")
        .unwrap_err();
    assert!(matches!(err, AppError::ContestNotActive));

    world.engine.shutdown().await;
}

#[tokio::test]
async fn shutdown_drains_queued_submissions() {
    let world = spawn_world(Arc::new(FakeSandbox::new()), fast_config());
    seed_contest(&world.registry, "c1", -5, 600, &[("q1", &[("1\n", 100)])]);

    let mut ids = Vec::new();
    for _ in 0..8 {
        ids.push(
            world
                .intake
                .submit("c1", "q1", "kim", "ok".to_string(), "python")
                .unwrap(),
        );
    }

    // drop the intake (the only live sender besides the engine's own handle)
    // and wait for the workers to drain everything
    drop(world.intake);
    world.engine.shutdown().await;

    for id in ids {
        let submission = world.store.get(&id).unwrap();
        assert!(submission.status.is_terminal());
        assert_eq!(submission.score, Some(100));
    }
}
