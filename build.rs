use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-env-changed=GLYPHRAIN_BUILD");
    println!("cargo:rerun-if-env-changed=GITHUB_SHA");

    let build = env::var("GLYPHRAIN_BUILD")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(target_id);
    println!("cargo:rustc-env=GLYPHRAIN_BUILD={build}");

    let sha = head_sha()
        .or_else(|| env::var("GITHUB_SHA").ok())
        .and_then(|s| short_hex(&s))
        .unwrap_or_default();
    println!("cargo:rustc-env=GLYPHRAIN_GIT_SHA={sha}");
}

fn head_sha() -> Option<String> {
    let out = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
    if !out.status.success() {
        return None;
    }
    String::from_utf8(out.stdout).ok()
}

fn short_hex(s: &str) -> Option<String> {
    let s = s.trim();
    let short = s.get(..s.len().min(7))?;
    if short.is_empty() || !short.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(short.to_ascii_lowercase())
}

// e.g. linux-x86_64, darwin-aarch64
fn target_id() -> String {
    let os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_else(|_| "unknown".into());
    let arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_else(|_| "unknown".into());
    let os = if os == "macos" { "darwin".to_string() } else { os };
    format!("{os}-{arch}")
}
