//! Parsing helpers for links and command-line assignments.

use std::collections::BTreeMap;

use letter_core::limits::TOKEN_QUERY_PARAM;

use crate::errors::CliError;

/// Pull the token out of a full link, or return the input trimmed.
///
/// Accepts `https://host/read?d=<token>`, links with extra query
/// parameters or a fragment, and bare tokens.
pub fn extract_token(input: &str) -> String {
    let input = input.trim();
    let Some((_, query)) = input.split_once('?') else {
        return input.to_string();
    };
    let query = query.split('#').next().unwrap_or_default();

    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == TOKEN_QUERY_PARAM)
        .map(|(_, value)| value.to_string())
        .unwrap_or_default()
}

/// Append a token to the receiver base URL.
pub fn build_link(base_url: &str, token: &str) -> String {
    let separator = if base_url.contains('?') { '&' } else { '?' };
    format!("{}{}{}={}", base_url, separator, TOKEN_QUERY_PARAM, token)
}

/// Parse repeated `INDEX=PASSWORD` values into zero-based indices.
///
/// Indices on the command line are numbered from 1, matching the
/// "Paragraph N" labels shown to the user.
pub fn parse_password_assignments(values: &[String]) -> Result<BTreeMap<usize, String>, CliError> {
    let mut assignments = BTreeMap::new();
    for value in values {
        let (index, password) = value.split_once('=').ok_or_else(|| {
            CliError::invalid_input(format!(
                "Invalid --password value '{}'. Expected INDEX=PASSWORD",
                redact_assignment(value)
            ))
        })?;
        let number: usize = index
            .trim()
            .parse()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| {
                CliError::invalid_input(format!(
                    "Invalid paragraph number '{}'. Paragraphs are numbered from 1",
                    index.trim()
                ))
            })?;
        if assignments.insert(number - 1, password.to_string()).is_some() {
            return Err(CliError::invalid_input(format!(
                "Paragraph {} was given more than one password",
                number
            )));
        }
    }
    Ok(assignments)
}

fn redact_assignment(value: &str) -> String {
    match value.split_once('=') {
        Some((index, _)) => format!("{}=***", index),
        None => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_token_from_link() {
        assert_eq!(extract_token("https://letters.example/read?d=abc_-1"), "abc_-1");
        assert_eq!(extract_token("https://x.test/?lang=en&d=tok#top"), "tok");
        assert_eq!(extract_token("  bare-token \n"), "bare-token");
    }

    #[test]
    fn test_extract_token_missing_param() {
        assert_eq!(extract_token("https://x.test/?lang=en"), "");
    }

    #[test]
    fn test_build_link() {
        assert_eq!(build_link("https://x.test/read", "tok"), "https://x.test/read?d=tok");
        assert_eq!(build_link("https://x.test/?v=2", "tok"), "https://x.test/?v=2&d=tok");
        assert_eq!(extract_token(&build_link("https://x.test/read", "tok")), "tok");
    }

    #[test]
    fn test_parse_password_assignments() {
        let values = vec!["1=alpha".to_string(), "3=with=equals".to_string()];
        let parsed = parse_password_assignments(&values).unwrap();
        assert_eq!(parsed.get(&0).map(String::as_str), Some("alpha"));
        assert_eq!(parsed.get(&2).map(String::as_str), Some("with=equals"));
        assert!(!parsed.contains_key(&1));
    }

    #[test]
    fn test_parse_password_rejects_bad_values() {
        assert!(parse_password_assignments(&["nopassword".to_string()]).is_err());
        assert!(parse_password_assignments(&["0=x".to_string()]).is_err());
        assert!(parse_password_assignments(&["two=x".to_string()]).is_err());
        assert!(parse_password_assignments(&["1=a".to_string(), "1=b".to_string()]).is_err());
    }

    #[test]
    fn test_parse_error_does_not_echo_password() {
        let err = parse_password_assignments(&["x=hunter2".to_string()]).unwrap_err();
        assert!(!err.to_string().contains("hunter2"));
    }
}
