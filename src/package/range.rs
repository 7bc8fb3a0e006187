//! npm-style version ranges evaluated with the `semver` crate.
//!
//! Package manifests declare `engines` ranges in npm syntax, which differs
//! from Cargo's: comparators are separated by whitespace, `||` joins
//! alternatives, `A - B` is an inclusive range, and a bare version means an
//! exact match rather than a caret requirement. Each alternative is rewritten
//! into a Cargo requirement and parsed as a [`VersionReq`].

use anyhow::{Context, Result, bail};
use semver::{Version, VersionReq};
use std::str::FromStr;

const OPERATOR_CHARS: &[char] = &['<', '>', '=', '~', '^'];

/// A parsed compatibility range such as `^0.9.0` or `>=0.8.0 <0.10.0 || 1.x`.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineRange {
    alternatives: Vec<VersionReq>,
}

impl EngineRange {
    /// Whether `version` satisfies any alternative of this range.
    ///
    /// Pre-release versions only match comparators that name the same
    /// `major.minor.patch` with a pre-release tag, as in npm.
    pub fn admits(&self, version: &Version) -> bool {
        self.alternatives.iter().any(|req| req.matches(version))
    }
}

impl FromStr for EngineRange {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let alternatives = s
            .split("||")
            .map(|alt| {
                let cargo_req = to_cargo_requirement(alt)?;
                VersionReq::parse(&cargo_req)
                    .with_context(|| format!("Invalid version range '{}'", s.trim()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(EngineRange { alternatives })
    }
}

/// Rewrite one npm comparator set into Cargo requirement syntax.
fn to_cargo_requirement(set: &str) -> Result<String> {
    let tokens = merge_operators(set.split_whitespace().collect());

    if tokens.is_empty() {
        return Ok("*".to_string());
    }

    if tokens.len() == 3 && tokens[1] == "-" {
        let lower = strip_v(&tokens[0]);
        let upper = strip_v(&tokens[2]);
        return Ok(format!(">={}, <={}", lower, upper));
    }
    if tokens.iter().any(|t| t == "-") {
        bail!("Invalid hyphen range '{}'", set.trim());
    }

    let comparators: Vec<String> = tokens.iter().map(|t| normalize_comparator(t)).collect();
    Ok(comparators.join(", "))
}

/// `>= 1.2.3` is written with a space in the wild; glue the operator back on.
fn merge_operators(tokens: Vec<&str>) -> Vec<String> {
    let mut merged = Vec::with_capacity(tokens.len());
    let mut pending_op: Option<&str> = None;

    for token in tokens {
        if token.chars().all(|c| OPERATOR_CHARS.contains(&c)) {
            pending_op = Some(token);
            continue;
        }
        match pending_op.take() {
            Some(op) => merged.push(format!("{}{}", op, token)),
            None => merged.push(token.to_string()),
        }
    }
    if let Some(op) = pending_op {
        merged.push(op.to_string());
    }
    merged
}

fn normalize_comparator(token: &str) -> String {
    let split_at = token
        .find(|c: char| !OPERATOR_CHARS.contains(&c))
        .unwrap_or(token.len());
    let (op, rest) = token.split_at(split_at);
    let rest = strip_v(rest.trim());

    if !op.is_empty() {
        return format!("{}{}", op, rest);
    }

    if is_wildcard(rest) {
        rest.to_string()
    } else {
        // A bare version is an exact match in npm, but a caret requirement in Cargo.
        format!("={}", rest)
    }
}

fn is_wildcard(version: &str) -> bool {
    version
        .split('.')
        .any(|part| matches!(part, "*" | "x" | "X"))
}

fn strip_v(version: &str) -> &str {
    version
        .strip_prefix('v')
        .or_else(|| version.strip_prefix('V'))
        .unwrap_or(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admits(range: &str, version: &str) -> bool {
        let range: EngineRange = range.parse().unwrap();
        range.admits(&Version::parse(version).unwrap())
    }

    #[test]
    fn test_caret_on_zero_major() {
        assert!(admits("^0.9.0", "0.9.0"));
        assert!(admits("^0.9.0", "0.9.7"));
        assert!(!admits("^0.9.0", "0.10.0"));
        assert!(!admits("^0.8.0", "0.9.0"));
    }

    #[test]
    fn test_tilde() {
        assert!(admits("~0.9.0", "0.9.3"));
        assert!(!admits("~0.9.0", "0.10.0"));
    }

    #[test]
    fn test_whitespace_separated_comparators() {
        assert!(admits(">=0.8.0 <0.10.0", "0.9.0"));
        assert!(!admits(">=0.8.0 <0.9.0", "0.9.0"));
        assert!(admits(">= 0.8.0 < 0.10.0", "0.9.0"));
    }

    #[test]
    fn test_alternatives() {
        assert!(admits("^0.8.0 || ^0.9.0", "0.9.0"));
        assert!(!admits("^0.7.0 || ^0.8.0", "0.9.0"));
    }

    #[test]
    fn test_hyphen_range_is_inclusive() {
        assert!(admits("0.8.0 - 0.9.0", "0.9.0"));
        assert!(admits("0.8.0 - 0.9.0", "0.8.0"));
        assert!(!admits("0.8.0 - 0.9.0", "0.9.1"));
    }

    #[test]
    fn test_bare_version_is_exact() {
        assert!(admits("0.9.0", "0.9.0"));
        assert!(!admits("0.9.0", "0.9.1"));
        assert!(admits("v0.9.0", "0.9.0"));
    }

    #[test]
    fn test_bare_partial_version_is_x_range() {
        assert!(admits("0.9", "0.9.4"));
        assert!(!admits("0.9", "0.10.0"));
    }

    #[test]
    fn test_wildcards() {
        assert!(admits("*", "0.9.0"));
        assert!(admits("", "0.9.0"));
        assert!(admits("0.9.x", "0.9.2"));
        assert!(!admits("0.8.x", "0.9.0"));
    }

    #[test]
    fn test_prerelease_platform_version() {
        assert!(!admits("^0.9.0", "0.10.0-beta.1"));
        assert!(admits(">=0.10.0-beta.1", "0.10.0-beta.1"));
    }

    #[test]
    fn test_invalid_range() {
        assert!("not a range".parse::<EngineRange>().is_err());
        assert!("^0.9.0 - ^1.0.0 - 2".parse::<EngineRange>().is_err());
    }
}
