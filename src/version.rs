//! Version reporting for `sextant --version`

/// Version line printed by the CLI.
///
/// The base version comes from Cargo; a short commit hash is appended as
/// build metadata when the build script could read one from git.
pub fn version() -> String {
    let base = env!("CARGO_PKG_VERSION");
    match option_env!("SEXTANT_BUILD_COMMIT") {
        Some(commit) => format!("sextant {}+{}", base, commit),
        None => format!("sextant {}", base),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_line_names_tool_and_package_version() {
        let v = version();
        assert!(v.starts_with(&format!("sextant {}", env!("CARGO_PKG_VERSION"))));
    }
}
