
use assert_cmd::Command;
use std::path::Path;

/// `halt` with config discovery pinned to `root`.
pub(crate) fn halt(root: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("halt"));
    cmd.env_remove("HALT_CONFIG_PATH")
        .env_remove("RUST_LOG")
        .arg("--root")
        .arg(root);
    cmd
}
