//! Embeds the `--version` string.
//!
//! A build from the commit tagged `v<CARGO_PKG_VERSION>` reports the plain
//! package version. Any other build reports `<version>-dev+<short hash>`,
//! with `.dirty` appended when the working tree has uncommitted changes.

use std::process::Command;

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/tags");
    println!("cargo:rerun-if-changed=.git/index");

    let version = std::env::var("CARGO_PKG_VERSION").unwrap_or_default();
    let release_tag = format!("v{version}");

    let tags = git(&["tag", "--points-at", "HEAD"]).unwrap_or_default();
    let is_release = tags.lines().any(|tag| tag == release_tag);

    let build_version = if is_release {
        version
    } else {
        match git(&["rev-parse", "--short", "HEAD"]) {
            Some(hash) if !hash.is_empty() => {
                let dirty = git(&["status", "--porcelain", "--untracked-files=no"])
                    .is_some_and(|status| !status.is_empty());
                let suffix = if dirty { ".dirty" } else { "" };
                format!("{version}-dev+{hash}{suffix}")
            }
            _ => format!("{version}-dev"),
        }
    };

    println!("cargo:rustc-env=WEBVITALS_BUILD_VERSION={build_version}");
}
