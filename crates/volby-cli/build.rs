use std::process::Command;

use chrono::Utc;

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn main() {
    let hash = git(&["rev-parse", "--short", "HEAD"]).unwrap_or_else(|| "unknown".to_string());

    // Tracked-file modifications only; untracked files don't count.
    let dirty = Command::new("git")
        .args(["diff", "--quiet", "HEAD"])
        .status()
        .map(|s| !s.success())
        .unwrap_or(false);

    let build_hash = if dirty {
        format!("{hash}-dirty-{}", Utc::now().format("%Y%m%d-%H%M%S"))
    } else {
        hash
    };

    println!("cargo:rustc-env=BUILD_HASH={build_hash}");

    // .git lives at the workspace root
    println!("cargo:rerun-if-changed=../../.git/HEAD");
    println!("cargo:rerun-if-changed=../../.git/index");
}
