//! Qt logging environment for the target process
//!
//! The message pattern makes Qt print `[category] message`, which is the
//! identifier form the line grammar expects.

pub const MESSAGE_PATTERN_VAR: &str = "QT_MESSAGE_PATTERN";
pub const MESSAGE_PATTERN: &str = "[%{category}] %{message}";
pub const LOGGING_RULES_VAR: &str = "QT_LOGGING_RULES";
pub const LOGGING_TO_CONSOLE_VAR: &str = "QT_LOGGING_TO_CONSOLE";

/// Logging rules enabling the categories the built-in recognizers watch
pub const RULES: &[&str] = &[
    "default.debug=true",
    "qt.scenegraph.time.renderloop.debug=true",
];

/// Environment variables for the target, in a stable order
pub fn logging_environment(with_rules: bool, with_console: bool) -> Vec<(&'static str, String)> {
    let mut vars = vec![(MESSAGE_PATTERN_VAR, MESSAGE_PATTERN.to_string())];
    if with_rules {
        vars.push((LOGGING_RULES_VAR, RULES.join(";")));
    }
    if with_console {
        vars.push((LOGGING_TO_CONSOLE_VAR, "1".to_string()));
    }
    vars
}

/// `NAME="value"` lines suitable for a shell or an environment file
pub fn format_environment(vars: &[(&str, String)]) -> String {
    vars.iter()
        .map(|(name, value)| format!("{}=\"{}\"\n", name, value))
        .collect()
}

/// Rules one per line, optionally under a `[Rules]` section title
pub fn format_rules(with_title: bool) -> String {
    let mut out = String::new();
    if with_title {
        out.push_str("[Rules]\n");
    }
    for rule in RULES {
        out.push_str(rule);
        out.push('\n');
    }
    out
}
