// src/audit/rule.rs

//! Rule primitives.
//!
//! Every rule is a pure function of the [`ConfigSource`]: evaluating it twice
//! against the same source gives the same answer, and nothing is written back.

use std::collections::HashSet;
use std::fmt;

use crate::errors::ValidationError;
use crate::source::ConfigSource;

/// A single declarative constraint over one or more options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// `section:option` must exist.
    Required {
        section: &'static str,
        option: &'static str,
    },

    /// If `section:option` exists, its value must be one of `allowed`
    /// (exact, case-sensitive match).
    Enum {
        section: &'static str,
        option: &'static str,
        allowed: &'static [&'static str],
    },

    /// `first` and `second` are either both set or both unset.
    Paired {
        section: &'static str,
        first: &'static str,
        second: &'static str,
    },

    /// If `controlling` is set to `value`, `required` must exist.
    ConditionalRequired {
        section: &'static str,
        controlling: &'static str,
        value: &'static str,
        required: &'static str,
    },

    /// Every token of `section:option` must also be a token of
    /// `within_section:within_option`.
    Subset {
        section: &'static str,
        option: &'static str,
        within_section: &'static str,
        within_option: &'static str,
    },
}

impl Rule {
    pub const fn required(section: &'static str, option: &'static str) -> Self {
        Rule::Required { section, option }
    }

    pub const fn one_of(
        section: &'static str,
        option: &'static str,
        allowed: &'static [&'static str],
    ) -> Self {
        Rule::Enum {
            section,
            option,
            allowed,
        }
    }

    pub const fn paired(section: &'static str, first: &'static str, second: &'static str) -> Self {
        Rule::Paired {
            section,
            first,
            second,
        }
    }

    pub const fn required_if(
        section: &'static str,
        controlling: &'static str,
        value: &'static str,
        required: &'static str,
    ) -> Self {
        Rule::ConditionalRequired {
            section,
            controlling,
            value,
            required,
        }
    }

    pub const fn subset(
        section: &'static str,
        option: &'static str,
        within_section: &'static str,
        within_option: &'static str,
    ) -> Self {
        Rule::Subset {
            section,
            option,
            within_section,
            within_option,
        }
    }

    /// Check this rule against `src`.
    pub fn evaluate(&self, src: &dyn ConfigSource) -> Result<(), ValidationError> {
        match *self {
            Rule::Required { section, option } => {
                if !src.exists(section, option) {
                    return Err(ValidationError::new(
                        section,
                        Some(option),
                        format!("{section}:{option} should be set."),
                    ));
                }
            }

            Rule::Enum {
                section,
                option,
                allowed,
            } => {
                if let Ok(value) = src.get(section, option) {
                    if !allowed.iter().any(|candidate| *candidate == value) {
                        return Err(ValidationError::new(
                            section,
                            Some(option),
                            format!(
                                "{section}:{option} should be set to {}.",
                                allowed.join(" or ")
                            ),
                        ));
                    }
                }
            }

            Rule::Paired {
                section,
                first,
                second,
            } => {
                if src.exists(section, first) ^ src.exists(section, second) {
                    let missing = if src.exists(section, first) { second } else { first };
                    return Err(ValidationError::new(
                        section,
                        Some(missing),
                        format!(
                            "{section}:{first} and {section}:{second} must be set concurrently."
                        ),
                    ));
                }
            }

            Rule::ConditionalRequired {
                section,
                controlling,
                value,
                required,
            } => {
                let triggered = src.get(section, controlling).is_ok_and(|v| v == value);
                if triggered && !src.exists(section, required) {
                    return Err(ValidationError::new(
                        section,
                        Some(required),
                        format!(
                            "{section}:{required} must be set if '{controlling}' \
                             is set to '{value}'."
                        ),
                    ));
                }
            }

            Rule::Subset {
                section,
                option,
                within_section,
                within_option,
            } => {
                let items = tokens(src.get(section, option).unwrap_or_default());
                let universe: HashSet<&str> =
                    tokens(src.get(within_section, within_option).unwrap_or_default())
                        .into_iter()
                        .collect();

                let mut unknown: Vec<&str> = Vec::new();
                for item in items {
                    if !universe.contains(item) && !unknown.contains(&item) {
                        unknown.push(item);
                    }
                }

                if !unknown.is_empty() {
                    return Err(ValidationError::new(
                        within_section,
                        None,
                        format!(
                            "{section}:{option} is not a subset of \
                             {within_section}:{within_option} (unknown: {}).",
                            unknown.join(", ")
                        ),
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Split a list-valued option into its tokens.
///
/// Commas and whitespace both separate tokens, so `"a,b"`, `"a, b"` and
/// `"a b"` all give `["a", "b"]`. An empty value gives no tokens.
pub fn tokens(value: &str) -> Vec<&str> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect()
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Required { section, option } => write!(f, "{section}:{option} is required"),
            Rule::Enum {
                section,
                option,
                allowed,
            } => write!(f, "{section}:{option}, if set, is one of [{}]", allowed.join(", ")),
            Rule::Paired {
                section,
                first,
                second,
            } => write!(f, "{section}:{first} and {section}:{second} are set together"),
            Rule::ConditionalRequired {
                section,
                controlling,
                value,
                required,
            } => write!(
                f,
                "{section}:{required} is required when {controlling} = {value}"
            ),
            Rule::Subset {
                section,
                option,
                within_section,
                within_option,
            } => write!(f, "{section}:{option} is a subset of {within_section}:{within_option}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    #[test]
    fn required_names_section_and_option() {
        let rule = Rule::required("general", "TAG");
        let err = rule.evaluate(&MemorySource::new()).unwrap_err();

        assert_eq!(err.section, "general");
        assert_eq!(err.option.as_deref(), Some("TAG"));
        assert_eq!(err.message, "general:TAG should be set.");
    }

    #[test]
    fn enum_ignores_absent_option() {
        let rule = Rule::one_of("logs", "level.worker", &["ERROR", "DEBUG"]);
        assert!(rule.evaluate(&MemorySource::new()).is_ok());
    }

    #[test]
    fn enum_is_case_sensitive() {
        let rule = Rule::one_of("workers", "auto_remove", &["true", "false"]);

        let ok = MemorySource::new().with("workers", "auto_remove", "false");
        assert!(rule.evaluate(&ok).is_ok());

        let bad = MemorySource::new().with("workers", "auto_remove", "False");
        let err = rule.evaluate(&bad).unwrap_err();
        assert_eq!(err.message, "workers:auto_remove should be set to true or false.");
    }

    #[test]
    fn paired_reports_the_missing_half() {
        let rule = Rule::paired("store", "mongo_user", "mongo_password");

        let only_user = MemorySource::new().with("store", "mongo_user", "admin");
        let err = rule.evaluate(&only_user).unwrap_err();
        assert_eq!(err.option.as_deref(), Some("mongo_password"));
        assert!(err.message.contains("must be set concurrently"));

        let only_password = MemorySource::new().with("store", "mongo_password", "pw");
        let err = rule.evaluate(&only_password).unwrap_err();
        assert_eq!(err.option.as_deref(), Some("mongo_user"));
    }

    #[test]
    fn conditional_only_fires_on_matching_value() {
        let rule = Rule::required_if("web", "access_control", "jwt", "apim_public_key");

        let none = MemorySource::new().with("web", "access_control", "none");
        assert!(rule.evaluate(&none).is_ok());

        let jwt = MemorySource::new().with("web", "access_control", "jwt");
        let err = rule.evaluate(&jwt).unwrap_err();
        assert_eq!(
            err.message,
            "web:apim_public_key must be set if 'access_control' is set to 'jwt'."
        );

        assert!(rule.evaluate(&MemorySource::new()).is_ok());
    }

    #[test]
    fn subset_lists_unknown_tokens_once() {
        let rule = Rule::subset("spawner", "host_queues", "web", "all_queues");
        let src = MemorySource::new()
            .with("spawner", "host_queues", "q1, q4, q4 q5")
            .with("web", "all_queues", "q1,q2,q3");

        let err = rule.evaluate(&src).unwrap_err();
        assert_eq!(err.section, "web");
        assert_eq!(err.option, None);
        assert_eq!(
            err.message,
            "spawner:host_queues is not a subset of web:all_queues (unknown: q4, q5)."
        );
    }

    #[test]
    fn subset_treats_absent_as_empty() {
        let rule = Rule::subset("spawner", "host_queues", "web", "all_queues");
        assert!(rule.evaluate(&MemorySource::new()).is_ok());

        let only_hosts = MemorySource::new().with("spawner", "host_queues", "default");
        assert!(rule.evaluate(&only_hosts).is_err());
    }

    #[test]
    fn tokens_split_on_commas_and_whitespace() {
        assert_eq!(tokens("a,b"), vec!["a", "b"]);
        assert_eq!(tokens(" a , b\tc\n d,,"), vec!["a", "b", "c", "d"]);
        assert!(tokens("").is_empty());
        assert!(tokens(" , ").is_empty());
    }

    #[test]
    fn display_is_one_line() {
        for rule in [
            Rule::required("rabbit", "uri"),
            Rule::one_of("web", "case", &["camel", "snake"]),
            Rule::paired("store", "mongo_user", "mongo_password"),
            Rule::required_if("web", "access_control", "none", "tenant_name"),
            Rule::subset("spawner", "host_queues", "web", "all_queues"),
        ] {
            assert!(!rule.to_string().contains('\n'));
        }
    }
}
