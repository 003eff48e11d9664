//! `${var}` substitution
//!
//! Values come from the context's variables first and the process environment
//! second. Unknown names are left as written so shell syntax such as `${HOME:-/}`
//! reaches the interpreter unchanged.

use crate::error::{InterpolationError, InterpolationResult};
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::env;

const VAR_PATTERN: &str = r"\$\{([^}]+)\}";

/// Substitution passes before a value is considered self-referential
const MAX_DEPTH: usize = 32;

fn var_regex() -> InterpolationResult<Regex> {
    Regex::new(VAR_PATTERN).map_err(|e| InterpolationError::InvalidSyntax(e.to_string()))
}

fn lookup(name: &str, vars: &HashMap<String, String>) -> Option<String> {
    vars.get(name).cloned().or_else(|| env::var(name).ok())
}

/// Substitute every known `${name}` in `s`
///
/// Values may themselves reference other variables; substitution repeats
/// until nothing changes.
pub fn interpolate(s: &str, vars: &HashMap<String, String>) -> InterpolationResult<String> {
    let re = var_regex()?;
    let mut current = s.to_string();

    for _ in 0..MAX_DEPTH {
        let mut substituted = false;
        let next = re
            .replace_all(&current, |caps: &Captures| match lookup(&caps[1], vars) {
                Some(value) => {
                    substituted = true;
                    value
                }
                None => caps[0].to_string(),
            })
            .into_owned();

        if !substituted {
            return Ok(next);
        }
        current = next;
    }

    Err(InterpolationError::RecursiveInterpolation)
}

/// Substitute variables in each entry of a list
pub fn interpolate_list(
    list: &[String],
    vars: &HashMap<String, String>,
) -> InterpolationResult<Vec<String>> {
    list.iter().map(|s| interpolate(s, vars)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_substitutes_every_occurrence() {
        let vars = vars(&[("dist", "./dist")]);
        assert_eq!(
            interpolate("rm -rf ${dist}/lib ${dist}/aot", &vars).unwrap(),
            "rm -rf ./dist/lib ./dist/aot"
        );
    }

    #[test]
    fn test_environment_fallback() {
        env::set_var("RUNSEQ_INTERPOLATE_TEST", "from-env");
        let result = interpolate("${RUNSEQ_INTERPOLATE_TEST}", &HashMap::new()).unwrap();
        env::remove_var("RUNSEQ_INTERPOLATE_TEST");

        assert_eq!(result, "from-env");
    }

    #[test]
    fn test_vars_shadow_environment() {
        env::set_var("RUNSEQ_SHADOW_TEST", "from-env");
        let vars = vars(&[("RUNSEQ_SHADOW_TEST", "from-vars")]);
        let result = interpolate("${RUNSEQ_SHADOW_TEST}", &vars).unwrap();
        env::remove_var("RUNSEQ_SHADOW_TEST");

        assert_eq!(result, "from-vars");
    }

    #[test]
    fn test_unknown_variable_left_verbatim() {
        let result = interpolate("echo ${runseq_unset_var:-fallback}", &HashMap::new()).unwrap();
        assert_eq!(result, "echo ${runseq_unset_var:-fallback}");
    }

    #[test]
    fn test_nested_values() {
        let vars = vars(&[("dist", "./dist"), ("lib", "${dist}/lib")]);
        assert_eq!(interpolate("${lib}/index.js", &vars).unwrap(), "./dist/lib/index.js");
    }

    #[test]
    fn test_self_reference_is_an_error() {
        let vars = vars(&[("loop", "x${loop}")]);
        assert!(matches!(
            interpolate("${loop}", &vars),
            Err(InterpolationError::RecursiveInterpolation)
        ));
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(interpolate("tsc -p .", &HashMap::new()).unwrap(), "tsc -p .");
    }

    #[test]
    fn test_interpolate_list() {
        let vars = vars(&[("dist", "out")]);
        let list = vec!["${dist}/**/*.js".to_string(), "README.md".to_string()];
        assert_eq!(
            interpolate_list(&list, &vars).unwrap(),
            vec!["out/**/*.js", "README.md"]
        );
    }
}
