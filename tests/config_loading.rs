use std::path::Path;

use figment::Jail;
use pretty_assertions::assert_eq;

use issue_clip::clipboard::StrategyKind;
use issue_clip::config::{Config, ConfigError};

/// Point the user-level config dir into the jail so a developer's own
/// settings never leak into the tests.
fn isolate(jail: &mut Jail) {
    let config_home = jail.directory().join("xdg");
    jail.set_env("XDG_CONFIG_HOME", config_home.display());
}

#[test]
fn test_env_overrides_defaults() {
    Jail::expect_with(|jail| {
        isolate(jail);
        jail.set_env("ISSUE_CLIP_NORMALIZE__MAX_LENGTH", "300");
        jail.set_env("ISSUE_CLIP_NORMALIZE__INDENT", "\"> \"");

        let config = Config::load().unwrap();
        assert_eq!(config.normalize.max_length, 300);
        assert_eq!(config.normalize.indent, "> ");
        assert_eq!(config.selectors, Config::default().selectors);
        Ok(())
    });
}

#[test]
fn test_quoted_env_indent_keeps_whitespace() {
    Jail::expect_with(|jail| {
        isolate(jail);
        jail.create_file(".issue-clip.toml", "[normalize]\nindent = \"> \"\n")?;
        jail.set_env("ISSUE_CLIP_NORMALIZE__INDENT", "\"    \"");

        let config = Config::load().unwrap();
        assert_eq!(config.normalize.indent, "    ");
        Ok(())
    });
}

#[test]
fn test_local_file_is_picked_up() {
    Jail::expect_with(|jail| {
        isolate(jail);
        jail.create_file(
            ".issue-clip.toml",
            r#"
                [normalize]
                max_length = 80

                [selectors.issue.body]
                primary = ".ticket-body"
                fallback = ".description__e030"
            "#,
        )?;

        let config = Config::load().unwrap();
        assert_eq!(config.normalize.max_length, 80);
        assert_eq!(config.normalize.indent, "  ");
        assert_eq!(config.selectors.issue.body.primary, ".ticket-body");
        assert_eq!(
            config.selectors.issue.body.fallback.as_deref(),
            Some(".description__e030")
        );
        assert_eq!(
            config.selectors.knowledge_base,
            Config::default().selectors.knowledge_base
        );
        Ok(())
    });
}

#[test]
fn test_explicit_file_beats_local_and_env_beats_both() {
    Jail::expect_with(|jail| {
        isolate(jail);
        jail.create_file(".issue-clip.toml", "[normalize]\nmax_length = 80\nindent = \"- \"\n")?;
        jail.create_file(
            "team.toml",
            r#"
                [normalize]
                max_length = 120

                [clipboard]
                strategies = ["command"]
                command = ["wl-copy", "--trim-newline"]
            "#,
        )?;
        jail.set_env("ISSUE_CLIP_NORMALIZE__MAX_LENGTH", "40");

        let config = Config::load_with(Some(Path::new("team.toml"))).unwrap();
        assert_eq!(config.normalize.max_length, 40);
        assert_eq!(config.normalize.indent, "- ");
        assert_eq!(config.clipboard.strategies, vec![StrategyKind::Command]);
        assert_eq!(
            config.clipboard.command,
            Some(vec!["wl-copy".to_string(), "--trim-newline".to_string()])
        );
        Ok(())
    });
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    Jail::expect_with(|jail| {
        isolate(jail);
        let err = Config::load_with(Some(Path::new("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Figment(_)));
        Ok(())
    });
}

#[test]
fn test_invalid_indent_is_rejected() {
    Jail::expect_with(|jail| {
        isolate(jail);
        jail.create_file(".issue-clip.toml", "[normalize]\nindent = \"\\n\"\n")?;

        match Config::load() {
            Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, "normalize.indent"),
            other => panic!("expected InvalidValue, got {:?}", other),
        }
        Ok(())
    });
}

#[test]
fn test_removable_matchers_parse_from_strings() {
    Jail::expect_with(|jail| {
        isolate(jail);
        jail.create_file(
            ".issue-clip.toml",
            "[conversion]\nremovable = [\"a.c_permamlink__aa7\", \"span.hidden\"]\n",
        )?;

        let config = Config::load().unwrap();
        let rendered: Vec<String> = config
            .conversion
            .removable
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(rendered, vec!["a.c_permamlink__aa7", "span.hidden"]);
        Ok(())
    });
}
