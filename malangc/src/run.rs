use std::{
    env, fs,
    path::Path,
    process::{self, Command, ExitStatus},
};

use anyhow::{Context, Result};

/// Runs `code` as a Go program with the `go` binary at `go`, inheriting the
/// standard streams. The build directory is removed afterwards.
pub fn go_run(go: &Path, code: &str) -> Result<ExitStatus> {
    let dir = env::temp_dir().join(format!("malang-{}", process::id()));
    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    let result = write_and_run(go, &dir, code);

    if let Err(error) = fs::remove_dir_all(&dir) {
        tracing::warn!(%error, dir = %dir.display(), "failed to remove build directory");
    }
    result
}

fn write_and_run(go: &Path, dir: &Path, code: &str) -> Result<ExitStatus> {
    let main = dir.join("main.go");
    fs::write(&main, code).with_context(|| format!("writing {}", main.display()))?;

    tracing::debug!(go = %go.display(), dir = %dir.display(), "running program");
    Command::new(go)
        .arg("run")
        .arg("main.go")
        .current_dir(dir)
        .status()
        .with_context(|| format!("failed to run {}", go.display()))
}
