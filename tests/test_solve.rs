use assert_cmd::Command;
use assert_fs::{prelude::FileWriteStr, NamedTempFile};
use predicates::{
    prelude::{predicate, PredicateBooleanExt},
    BoxPredicate,
};

const GO_TO_WORK: &str = r#"
% leaving home takes a single action
fluent(at-home).
operator(go-to-work).
pre(go-to-work, at-home).
eff(go-to-work, -at-home).
init(at-home).
goal(-at-home).
"#;

const ALREADY_HOME: &str = r#"
fluent(at-home).
operator(go-to-work).
pre(go-to-work, at-home).
eff(go-to-work, -at-home).
init(at-home).
goal(at-home).
"#;

const UNREACHABLE_GOAL: &str = r#"
fluent(x).
fluent(y).
operator(op).
pre(op, x).
eff(op, y).
goal(x).
"#;

const PARALLEL_ACTIONS: &str = r#"
fluent(p).
fluent(q).
operator(make-p).
operator(make-q).
eff(make-p, p).
eff(make-q, q).
goal(p).
goal(q).
"#;

fn test_answer_for_instance(
    instance: &str,
    additional_args: &[&str],
    possible_answers: &[&'static str],
) -> Result<(), Box<dyn std::error::Error>> {
    let file = NamedTempFile::new("test_instance.plan")?;
    file.write_str(instance)?;
    let mut cmd = Command::cargo_bin("satplan")?;
    cmd.arg("solve")
        .arg("-f")
        .arg(file.path())
        .arg("--logging-level")
        .arg("off")
        .args(additional_args);
    let mut pred: BoxPredicate<str> = BoxPredicate::new(predicate::never());
    for a in possible_answers {
        pred = BoxPredicate::new(pred.or(predicate::eq(*a)));
    }
    cmd.assert().success().stdout(pred);
    file.close().unwrap();
    Ok(())
}

#[test]
fn test_single_action() -> Result<(), Box<dyn std::error::Error>> {
    test_answer_for_instance(GO_TO_WORK, &[], &["PLAN\n0: go-to-work\n"])
}

#[test]
fn test_goal_holds_initially() -> Result<(), Box<dyn std::error::Error>> {
    test_answer_for_instance(ALREADY_HOME, &[], &["PLAN\n"])
}

#[test]
fn test_unreachable_goal() -> Result<(), Box<dyn std::error::Error>> {
    test_answer_for_instance(UNREACHABLE_GOAL, &["--max-horizon", "4"], &["NO PLAN\n"])
}

#[test]
fn test_parallel_actions() -> Result<(), Box<dyn std::error::Error>> {
    test_answer_for_instance(PARALLEL_ACTIONS, &[], &["PLAN\n0: make-p make-q\n"])
}

#[test]
fn test_horizon_bounds() -> Result<(), Box<dyn std::error::Error>> {
    test_answer_for_instance(
        GO_TO_WORK,
        &["--min-horizon", "0", "--max-horizon", "0"],
        &["NO PLAN\n"],
    )
}

#[test]
fn test_timeouts() -> Result<(), Box<dyn std::error::Error>> {
    test_answer_for_instance(
        GO_TO_WORK,
        &["--timeout", "30", "--attempt-timeout", "10"],
        &["PLAN\n0: go-to-work\n"],
    )
}

#[test]
fn test_explicit_embedded_engine() -> Result<(), Box<dyn std::error::Error>> {
    test_answer_for_instance(
        GO_TO_WORK,
        &["--sat-solver", "cadical"],
        &["PLAN\n0: go-to-work\n"],
    )
}

fn test_failure(instance: &str, additional_args: &[&str]) -> Result<(), Box<dyn std::error::Error>> {
    let file = NamedTempFile::new("test_instance.plan")?;
    file.write_str(instance)?;
    let mut cmd = Command::cargo_bin("satplan")?;
    cmd.arg("solve")
        .arg("-f")
        .arg(file.path())
        .arg("--logging-level")
        .arg("off")
        .args(additional_args);
    cmd.assert().failure().code(1);
    file.close().unwrap();
    Ok(())
}

#[test]
fn test_min_greater_than_max() -> Result<(), Box<dyn std::error::Error>> {
    test_failure(GO_TO_WORK, &["--min-horizon", "3", "--max-horizon", "2"])
}

#[test]
fn test_null_timeout() -> Result<(), Box<dyn std::error::Error>> {
    test_failure(GO_TO_WORK, &["--timeout", "0"])
}

#[test]
fn test_invalid_horizon() -> Result<(), Box<dyn std::error::Error>> {
    test_failure(GO_TO_WORK, &["--max-horizon", "-1"])
}

#[test]
fn test_external_engine_without_solver() -> Result<(), Box<dyn std::error::Error>> {
    test_failure(GO_TO_WORK, &["--sat-solver", "external"])
}

#[test]
fn test_undeclared_fluent() -> Result<(), Box<dyn std::error::Error>> {
    test_failure("fluent(a).\ngoal(b).\n", &[])
}

#[test]
fn test_missing_file() {
    let mut cmd = Command::cargo_bin("satplan").unwrap();
    cmd.arg("solve")
        .arg("-f")
        .arg("/this/file/does/not/exist.plan")
        .arg("--logging-level")
        .arg("off");
    cmd.assert().failure().code(1);
}

#[test]
fn test_missing_external_solver() -> Result<(), Box<dyn std::error::Error>> {
    test_failure(
        GO_TO_WORK,
        &["--external-sat-solver", "/this/solver/does/not/exist"],
    )
}
