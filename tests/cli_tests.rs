// file: tests/cli_tests.rs
// description: end-to-end runs of the binary against the offline sample data

use predicates::prelude::*;
use tempfile::TempDir;

mod common;
use common::{login, unival_cmd};

#[test]
fn test_courses_listing() {
    let home = TempDir::new().unwrap();
    unival_cmd(home.path())
        .arg("courses")
        .assert()
        .success()
        .stdout(predicate::str::contains("CS101"))
        .stdout(predicate::str::contains("Calculus II"))
        .stdout(predicate::str::contains("Physics Fundamentals"));
}

#[test]
fn test_courses_unknown_department_fails() {
    let home = TempDir::new().unwrap();
    unival_cmd(home.path())
        .args(["courses", "--department", "Alchemy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Department not found"));
}

#[test]
fn test_offline_admin_login_and_logout() {
    let home = TempDir::new().unwrap();
    login(home.path(), "admin", "admin123$");
    assert!(home.path().join("session.json").exists());

    unival_cmd(home.path())
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Role:       admin"));

    unival_cmd(home.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out"));
    assert!(!home.path().join("session.json").exists());
}

#[test]
fn test_whoami_requires_login() {
    let home = TempDir::new().unwrap();
    unival_cmd(home.path())
        .arg("whoami")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not logged in"));
}

#[test]
fn test_wrong_password_is_rejected() {
    let home = TempDir::new().unwrap();
    unival_cmd(home.path())
        .args(["login", "grace@unival.edu", "--password", "wrong"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid email or password"));
    assert!(!home.path().join("session.json").exists());
}

#[test]
fn test_faculty_schedules_evaluation() {
    let home = TempDir::new().unwrap();
    login(home.path(), "grace@unival.edu", "faculty123");

    // 2031-03-04 is a Tuesday
    unival_cmd(home.path())
        .args([
            "evaluations", "add", "--title", "Quiz 2", "--date", "2031-03-04", "--start",
            "10:00", "--end", "11:00",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Quiz 2 (1/2)"));
}

#[test]
fn test_weekend_evaluation_is_refused() {
    let home = TempDir::new().unwrap();
    login(home.path(), "grace@unival.edu", "faculty123");

    unival_cmd(home.path())
        .args([
            "evaluations", "add", "--title", "Quiz 2", "--date", "2031-03-08", "--start",
            "10:00", "--end", "11:00",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("weekends"))
        .stderr(predicate::str::contains("Evaluation not scheduled"));
}

#[test]
fn test_students_cannot_schedule() {
    let home = TempDir::new().unwrap();
    login(home.path(), "alan@unival.edu", "student123");

    unival_cmd(home.path())
        .args([
            "evaluations", "add", "--title", "Quiz 2", "--date", "2031-03-04", "--start",
            "10:00", "--end", "11:00",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("only faculty and administrators"));
}

#[test]
fn test_comment_thread_is_rendered() {
    let home = TempDir::new().unwrap();
    unival_cmd(home.path())
        .args(["comments", "show", "e-quiz1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Will the quiz cover recursion?"))
        .stdout(predicate::str::contains("  Grace Hopper • "))
        .stdout(predicate::str::contains("👍 1"));

    unival_cmd(home.path())
        .args(["comments", "show", "e-midsem"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No comments yet. Be the first to comment!",
        ));
}

#[test]
fn test_react_prints_tally() {
    let home = TempDir::new().unwrap();
    login(home.path(), "alan@unival.edu", "student123");

    unival_cmd(home.path())
        .args(["react", "e-quiz1", "heart"])
        .assert()
        .success()
        .stdout(predicate::str::contains("👍 1"))
        .stdout(predicate::str::contains("❤️ 1"));
}

#[test]
fn test_report_requires_admin() {
    let home = TempDir::new().unwrap();
    login(home.path(), "alan@unival.edu", "student123");
    unival_cmd(home.path())
        .args(["report", "user-activity"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not an administrator"));

    login(home.path(), "admin", "admin123$");
    unival_cmd(home.path())
        .args(["report", "course-enrollment"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Course Enrollment Report"))
        .stdout(predicate::str::contains("Introduction to Programming"));
}

#[test]
fn test_unknown_report_kind_is_a_usage_error() {
    let home = TempDir::new().unwrap();
    unival_cmd(home.path())
        .args(["report", "payroll"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown report"));
}

#[test]
fn test_time_options() {
    let home = TempDir::new().unwrap();
    unival_cmd(home.path())
        .args(["evaluations", "times"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("08:00 08:05"))
        .stdout(predicate::str::contains("17:55"));
}

#[test]
fn test_bad_environment_fails_without_config_file() {
    let home = TempDir::new().unwrap();
    unival_cmd(home.path())
        .env("UNIVAL__SCHEDULING__MAX_PER_DAY", "0")
        .args(["--config"])
        .arg(home.path().join("missing.toml"))
        .arg("courses")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"))
        .stdout(predicate::str::contains("CS101").not());
}
