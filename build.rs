use std::process::Command;

fn capture(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn main() {
    // Stamp the short commit hash when building from a git checkout; crates.io
    // builds and tarballs simply go without it.
    if let Some(commit) = capture("git", &["rev-parse", "--short", "HEAD"]) {
        println!("cargo:rustc-env=SEXTANT_BUILD_COMMIT={}", commit);
    }
    println!("cargo:rerun-if-changed=.git/HEAD");
}
