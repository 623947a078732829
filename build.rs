use std::{
    process::Command,
    time::{SystemTime, UNIX_EPOCH},
};

/// Embeds the crate version into the binary as `RELEASEPAGE_VERSION`.
///
/// The version comes from `git describe`, so tagged builds report the tag
/// and everything else reports the nearest tag plus the commit. The package
/// version in Cargo.toml is only a placeholder.
fn main() {
    // Re-run when the checked out commit or the staged tree changes
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output();

    let version = match output {
        Ok(o) if o.status.success() => {
            let git_output = String::from_utf8(o.stdout)
                .unwrap_or_default()
                .trim()
                .to_string();

            // Strip 'v' prefix if present (e.g., "v1.0.0" -> "1.0.0")
            let version = git_output.strip_prefix('v').unwrap_or(&git_output);

            if version.ends_with("-dirty") || version.is_empty() {
                // Dirty working tree or no output: append timestamp
                format!("{}-{}", version, timestamp())
            } else {
                version.to_string()
            }
        }
        _ => {
            // Git missing or not a checkout (e.g. a source tarball):
            // fall back to the package version plus a timestamp
            format!("{}-unknown-{}", env!("CARGO_PKG_VERSION"), timestamp())
        }
    };

    println!("cargo:rustc-env=RELEASEPAGE_VERSION={}", version);
}

/// Seconds since the Unix epoch, used to tell unreleased builds apart.
fn timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_secs()
}
