//! Integration tests for the invocation driver
//!
//! A shell script stands in for the tailwind binary, so these run on Unix only. The
//! real-binary scenario is `#[ignore]`d because it needs network access.

use std::fs;
use tailwindlab_core::config::Config;
use tailwindlab_tailwind::exec::{BuildFlag, RunOptions, run};
use tailwindlab_testkit::temp_dir_in_workspace;

#[cfg(unix)]
mod fake_binary {
    use super::*;
    use std::path::Path;
    use tailwindlab_tailwind::exec::run_with;
    use tailwindlab_tailwind::install::Installer;
    use tailwindlab_tailwind::{Arch, Os, Platform};
    use tailwindlab_testkit::{MockRelease, write_fake_tailwind};

    const BINARY: &str = "tailwindcss-extra-linux-x86_64";

    /// Mock release whose primary asset is the fake tailwind script
    fn mock_release(scratch: &Path) -> MockRelease {
        let script = fs::read(write_fake_tailwind(scratch, "fake")).unwrap();
        let mut mock = MockRelease::new();
        mock.serve_release(
            None,
            "v2.1.4",
            &[
                (BINARY, script.as_slice()),
                ("default.css", &b"/* default theme */"[..]),
                ("mono.css", &b"/* mono theme */"[..]),
                ("flowbite.min.js", &b"/* flowbite */"[..]),
            ],
            1,
        )
        .serve_asset(BINARY, &script, 1)
        .serve_asset("default.css", b"/* default theme */", 1)
        .serve_asset("mono.css", b"/* mono theme */", 1)
        .serve_asset("flowbite.min.js", b"/* flowbite */", 1);
        mock
    }

    fn config_for(mock: &MockRelease, cache: &Path) -> Config {
        let mut config = Config::default();
        config.release.api_base_url = mock.url();
        config.release.download_base_url = mock.url();
        config.tailwind.cache_dir = Some(cache.to_path_buf());
        config
    }

    #[test]
    fn test_run_builds_output_and_places_side_assets() {
        let temp = temp_dir_in_workspace();
        let mock = mock_release(&temp.path().join("scratch"));
        let config = config_for(&mock, &temp.path().join("cache"));
        let installer =
            Installer::from_config(&config, Platform::new(Os::Linux, Arch::X86_64)).unwrap();

        let input = temp.path().join("app.css");
        fs::write(&input, "@tailwind base;\n.btn { @apply font-bold; }\n").unwrap();
        let output = temp.path().join("public/css/app.css");

        // Stale asset from an earlier release
        let stale = temp.path().join("public/css/flowbite/themes/old.css");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, "old").unwrap();

        let options = RunOptions::from_config(&config)
            .with_flag(BuildFlag::Minify)
            .with_flag(BuildFlag::Custom("--poll".to_string()));
        let report = run_with(&installer, &input, &output, &options).unwrap();

        mock.assert();
        assert!(!report.cached);
        assert_eq!(report.side_assets.len(), 3);

        let css = fs::read_to_string(&output).unwrap();
        assert!(css.contains("--font-weight-bold: 700"));

        let args = fs::read_to_string(temp.path().join("public/css/app.css.args")).unwrap();
        assert!(args.contains("--minify"));
        assert!(args.contains("--poll"));

        let flowbite = temp.path().join("public/css/flowbite");
        assert!(!stale.exists());
        assert!(flowbite.join("themes/default.css").is_file());
        assert!(flowbite.join("themes/mono.css").is_file());
        assert!(flowbite.join("flowbite.min.js").is_file());
    }

    #[test]
    fn test_second_run_uses_cached_binary() {
        let temp = temp_dir_in_workspace();
        let mock = mock_release(&temp.path().join("scratch"));
        let config = config_for(&mock, &temp.path().join("cache"));
        let installer =
            Installer::from_config(&config, Platform::new(Os::Linux, Arch::X86_64)).unwrap();

        let input = temp.path().join("app.css");
        fs::write(&input, "body {}\n").unwrap();
        let options = RunOptions::from_config(&config);

        let first = run_with(&installer, &input, &temp.path().join("a/out.css"), &options).unwrap();
        let second = run_with(&installer, &input, &temp.path().join("b/out.css"), &options).unwrap();

        mock.assert();
        assert!(!first.cached);
        assert!(second.cached);
        assert_eq!(first.binary, second.binary);
        assert!(temp.path().join("b/flowbite/flowbite.min.js").is_file());
    }

    #[test]
    fn test_run_failure_reports_stderr_and_skips_side_assets() {
        let temp = temp_dir_in_workspace();
        let mock = mock_release(&temp.path().join("scratch"));
        let config = config_for(&mock, &temp.path().join("cache"));
        let installer =
            Installer::from_config(&config, Platform::new(Os::Linux, Arch::X86_64)).unwrap();

        let output = temp.path().join("public/app.css");
        let err = run_with(
            &installer,
            &temp.path().join("missing.css"),
            &output,
            &RunOptions::from_config(&config),
        )
        .unwrap_err();

        assert_eq!(err.code(), "EXEC_FAILED");
        assert!(err.to_string().contains("does not exist"));
        assert!(!temp.path().join("public/flowbite").exists());
    }
}

/// Downloads the real release and builds a stylesheet using `@apply font-bold`
#[test]
#[ignore = "requires network access to GitHub releases"]
fn test_real_release_builds_font_weight() {
    let temp = temp_dir_in_workspace();
    let input = temp.path().join("input.css");
    fs::write(
        &input,
        "@import \"tailwindcss\";\n.title { @apply font-bold; }\n",
    )
    .unwrap();
    let output = temp.path().join("dist/output.css");

    let report = run(
        &input,
        &output,
        Some(&temp.path().join("cache")),
        &RunOptions::from_config(&Config::default()),
    )
    .unwrap();

    let css = fs::read_to_string(&report.output).unwrap();
    assert!(css.contains("--font-weight-bold: 700"));
}
