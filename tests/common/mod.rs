// file: tests/common/mod.rs
// description: shared command builder for cli integration tests

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use std::path::Path;

/// Offline, colourless invocation with the session file inside `home`.
pub fn unival_cmd(home: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("unival");
    cmd.env_remove("SUPABASE_URL");
    cmd.env_remove("SUPABASE_KEY");
    cmd.env_remove("UNIVAL_PASSWORD");
    cmd.env_remove("RUST_LOG");
    cmd.env("UNIVAL__SESSION__PATH", home.join("session.json"));
    cmd.args(["--color", "false", "--offline"]);
    cmd
}

pub fn login(home: &Path, email: &str, password: &str) {
    unival_cmd(home)
        .args(["login", email, "--password", password])
        .assert()
        .success();
}
