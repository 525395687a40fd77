//! Variable interpolation for catalogue values.
//!
//! Commands, check paths and pause messages may reference run
//! configuration with `${variable}` syntax.
//!
//! # Syntax
//!
//! - `${variable_name}` - replaced with variable value
//! - `$${escaped}` - produces literal `${escaped}` in output
//!
//! # Shell commands
//!
//! Values never become part of a command's text. [`resolve_command`]
//! turns each reference into a quoted reference to a `WORKSTRAP_*`
//! environment variable, and [`InterpolationContext::command_env`]
//! supplies the values. A hostname such as `Nick's Mac; rm -rf ~` is
//! therefore passed to the command as one word and never parsed by the
//! shell.
//!
//! ```yaml
//! command: sudo scutil --set HostName ${hostname}
//! # runs: sudo scutil --set HostName "${WORKSTRAP_HOSTNAME}"
//! ```

use crate::config::run_config::{ConfigKey, RunConfiguration};
use crate::error::{Result, WorkstrapError};
use std::collections::{HashMap, HashSet};

/// Built-in variable holding the user's home directory.
pub const HOME_VARIABLE: &str = "home";

/// Prefix of the environment variables that carry values into commands.
pub const ENV_PREFIX: &str = "WORKSTRAP_";

/// Environment variable through which commands see `name`.
pub fn env_name(name: &str) -> String {
    format!("{}{}", ENV_PREFIX, name.to_ascii_uppercase())
}

/// A segment of an interpolated string.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text
    Literal(String),
    /// Variable reference: ${name}
    Variable(String),
}

/// Parse a string containing ${var} interpolations.
pub fn parse_interpolation(input: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut chars = input.chars().peekable();
    let mut current_literal = String::new();

    while let Some(c) = chars.next() {
        if c != '$' {
            current_literal.push(c);
            continue;
        }

        match chars.peek() {
            Some('$') => {
                chars.next();
                if chars.peek() == Some(&'{') {
                    // $${...} -> literal ${...}
                    chars.next();
                    current_literal.push_str("${");
                    for c in chars.by_ref() {
                        current_literal.push(c);
                        if c == '}' {
                            break;
                        }
                    }
                } else {
                    current_literal.push('$');
                }
            }
            Some('{') => {
                chars.next();

                if !current_literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut current_literal)));
                }

                let mut var_name = String::new();
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    var_name.push(c);
                }

                segments.push(Segment::Variable(var_name));
            }
            _ => current_literal.push(c),
        }
    }

    if !current_literal.is_empty() {
        segments.push(Segment::Literal(current_literal));
    }

    segments
}

/// Extract all variable names from an interpolated string.
pub fn extract_variables(input: &str) -> HashSet<String> {
    parse_interpolation(input)
        .into_iter()
        .filter_map(|seg| match seg {
            Segment::Variable(name) => Some(name),
            _ => None,
        })
        .collect()
}

/// Values available to `${...}` references during a run.
#[derive(Default)]
pub struct InterpolationContext {
    values: HashMap<String, String>,
}

// Values may include the token, so only names are printed.
impl std::fmt::Debug for InterpolationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.values.keys().collect();
        names.sort();
        f.debug_struct("InterpolationContext")
            .field("variables", &names)
            .finish()
    }
}

impl InterpolationContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the context for a run: resolved configuration plus `${home}`.
    pub fn from_config(config: &RunConfiguration) -> Self {
        let mut ctx = Self::new();
        for key in ConfigKey::ALL {
            if let Some(value) = config.get(key) {
                ctx.insert(key.as_str(), value);
            }
        }
        if let Some(home) = dirs::home_dir() {
            ctx.insert(HOME_VARIABLE, &home.display().to_string());
        }
        ctx
    }

    /// Set a variable.
    pub fn insert(&mut self, name: &str, value: &str) {
        self.values.insert(name.to_string(), value.to_string());
    }

    /// Resolve a variable name to its value.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Environment for commands produced by [`resolve_command`].
    pub fn command_env(&self) -> HashMap<String, String> {
        self.values
            .iter()
            .map(|(name, value)| (env_name(name), value.clone()))
            .collect()
    }
}

/// Resolve all variables in an interpolated string.
///
/// # Errors
///
/// Returns `ConfigValidationError` if any variable is not found in the context.
pub fn resolve_string(input: &str, context: &InterpolationContext) -> Result<String> {
    let mut result = String::new();

    for segment in parse_interpolation(input) {
        match segment {
            Segment::Literal(text) => result.push_str(&text),
            Segment::Variable(name) => {
                let value = context.resolve(&name).ok_or_else(|| {
                    WorkstrapError::ConfigValidationError {
                        message: format!("Unresolved variable: ${{{}}}", name),
                    }
                })?;
                result.push_str(value);
            }
        }
    }

    Ok(result)
}

/// How the shell reads the text at a given point of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quoting {
    Unquoted,
    Single,
    Double,
}

impl Quoting {
    /// State once the shell has read `text`.
    fn after(self, text: &str) -> Self {
        let mut state = self;
        let mut escaped = false;
        for c in text.chars() {
            if escaped {
                escaped = false;
                continue;
            }
            state = match (state, c) {
                (Quoting::Single, '\'') => Quoting::Unquoted,
                (Quoting::Single, _) => Quoting::Single,
                (_, '\\') => {
                    escaped = true;
                    state
                }
                (Quoting::Unquoted, '\'') => Quoting::Single,
                (Quoting::Unquoted, '"') => Quoting::Double,
                (Quoting::Double, '"') => Quoting::Unquoted,
                (state, _) => state,
            };
        }
        state
    }

    /// A reference to `var` that expands to exactly one word here.
    fn reference(self, var: &str) -> String {
        match self {
            Quoting::Unquoted => format!("\"${{{}}}\"", var),
            Quoting::Double => format!("${{{}}}", var),
            // Close the single quotes, expand, then reopen them.
            Quoting::Single => format!("'\"${{{}}}\"'", var),
        }
    }
}

/// Prepare a shell command: every `${name}` becomes a quoted reference
/// to the variable [`env_name`] gives for it.
///
/// The command must run with [`InterpolationContext::command_env`] in its
/// environment.
///
/// # Errors
///
/// Returns `ConfigValidationError` if any variable is not found in the context.
pub fn resolve_command(input: &str, context: &InterpolationContext) -> Result<String> {
    let mut result = String::new();
    let mut quoting = Quoting::Unquoted;

    for segment in parse_interpolation(input) {
        match segment {
            Segment::Literal(text) => {
                quoting = quoting.after(&text);
                result.push_str(&text);
            }
            Segment::Variable(name) => {
                if context.resolve(&name).is_none() {
                    return Err(WorkstrapError::ConfigValidationError {
                        message: format!("Unresolved variable: ${{{}}}", name),
                    });
                }
                result.push_str(&quoting.reference(&env_name(&name)));
            }
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_literal_only() {
        let result = parse_interpolation("hello world");
        assert_eq!(result, vec![Segment::Literal("hello world".to_string())]);
    }

    #[test]
    fn parse_variable_with_surrounding_text() {
        let result = parse_interpolation("hello ${name}!");
        assert_eq!(
            result,
            vec![
                Segment::Literal("hello ".to_string()),
                Segment::Variable("name".to_string()),
                Segment::Literal("!".to_string()),
            ]
        );
    }

    #[test]
    fn parse_adjacent_variables() {
        let result = parse_interpolation("${a}${b}");
        assert_eq!(
            result,
            vec![
                Segment::Variable("a".to_string()),
                Segment::Variable("b".to_string()),
            ]
        );
    }

    #[test]
    fn parse_escaped_dollar_brace() {
        let result = parse_interpolation("echo '$${PATH}' && ${real}");
        assert_eq!(
            result,
            vec![
                Segment::Literal("echo '${PATH}' && ".to_string()),
                Segment::Variable("real".to_string()),
            ]
        );
    }

    #[test]
    fn parse_plain_shell_variables_untouched() {
        let result = parse_interpolation("echo $HOME $$");
        assert_eq!(result, vec![Segment::Literal("echo $HOME $".to_string())]);
    }

    #[test]
    fn extract_finds_unique_names() {
        let vars = extract_variables("${hostname} ${token} ${hostname}");
        assert_eq!(vars.len(), 2);
        assert!(vars.contains("hostname"));
        assert!(vars.contains("token"));
    }

    #[test]
    fn resolve_uses_run_configuration() {
        let config = RunConfiguration::new(Some("studio".to_string()), None, None);
        let ctx = InterpolationContext::from_config(&config);
        let resolved = resolve_string("scutil --set HostName ${hostname}", &ctx).unwrap();
        assert_eq!(resolved, "scutil --set HostName studio");
    }

    #[test]
    fn resolve_fails_on_unset_variable() {
        let ctx = InterpolationContext::from_config(&RunConfiguration::default());
        let err = resolve_string("pyenv install ${version}", &ctx).unwrap_err();
        assert!(err.to_string().contains("${version}"));
    }

    #[test]
    fn command_references_environment_instead_of_values() {
        let config = RunConfiguration::new(Some("my mac; touch pwned".to_string()), None, None);
        let ctx = InterpolationContext::from_config(&config);

        let command = resolve_command("scutil --set HostName ${hostname}", &ctx).unwrap();

        assert_eq!(command, "scutil --set HostName \"${WORKSTRAP_HOSTNAME}\"");
        assert_eq!(
            ctx.command_env().get("WORKSTRAP_HOSTNAME").map(String::as_str),
            Some("my mac; touch pwned")
        );
    }

    #[test]
    fn command_references_follow_quoting() {
        let config =
            RunConfiguration::new(Some("studio".to_string()), Some("3.12".to_string()), None);
        let ctx = InterpolationContext::from_config(&config);

        assert_eq!(
            resolve_command("echo \"${hostname} ${version}\"", &ctx).unwrap(),
            "echo \"${WORKSTRAP_HOSTNAME} ${WORKSTRAP_VERSION}\""
        );
        assert_eq!(
            resolve_command("echo '${hostname}' \\\"${version}", &ctx).unwrap(),
            "echo ''\"${WORKSTRAP_HOSTNAME}\"'' \\\"\"${WORKSTRAP_VERSION}\""
        );
    }

    #[test]
    fn command_keeps_escaped_references() {
        let ctx = InterpolationContext::from_config(&RunConfiguration::default());
        assert_eq!(resolve_command("echo $${PATH}", &ctx).unwrap(), "echo ${PATH}");
    }

    #[test]
    fn command_fails_on_unset_variable() {
        let ctx = InterpolationContext::from_config(&RunConfiguration::default());
        let err = resolve_command("pyenv install ${version}", &ctx).unwrap_err();
        assert!(err.to_string().contains("${version}"));
    }

    #[test]
    fn context_provides_home() {
        let ctx = InterpolationContext::from_config(&RunConfiguration::default());
        if let Some(home) = dirs::home_dir() {
            assert_eq!(ctx.resolve("home"), Some(home.display().to_string().as_str()));
        }
    }

    #[test]
    fn debug_lists_names_not_values() {
        let config = RunConfiguration::new(None, None, Some("ghp_secret".to_string()));
        let ctx = InterpolationContext::from_config(&config);
        let debug = format!("{:?}", ctx);
        assert!(debug.contains("token"));
        assert!(!debug.contains("ghp_secret"));
    }
}
