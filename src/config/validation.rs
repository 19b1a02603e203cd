//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Route names are present and name one pattern each
//! - Patterns parse and build into a conflict-free tree
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system
//! - Repeating an entry verbatim (same name, same canonical pattern) is a
//!   no-op, matching identical re-registration in the tree; one name bound to
//!   two different patterns is an error

use std::collections::HashMap;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::RouterConfig;
use crate::routing::pattern::render_pattern;
use crate::routing::{build_tree, parse_pattern, RegistrationError};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("route #{index} has an empty name")]
    EmptyName { index: usize },

    #[error("route name `{name}` is bound to more than one pattern")]
    DuplicateName { name: String },

    #[error("invalid metrics address `{address}`")]
    MetricsAddress { address: String },

    #[error(transparent)]
    Registration(#[from] RegistrationError),
}

/// Check `config` and report every problem found.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut names: HashMap<&str, String> = HashMap::new();

    for (index, route) in config.routes.iter().enumerate() {
        if route.name.trim().is_empty() {
            errors.push(ValidationError::EmptyName { index });
            continue;
        }
        let pattern = canonical(&route.pattern);
        match names.get(route.name.as_str()) {
            Some(existing) if *existing == pattern => {}
            Some(_) => errors.push(ValidationError::DuplicateName {
                name: route.name.clone(),
            }),
            None => {
                names.insert(route.name.as_str(), pattern);
            }
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress {
            address: config.observability.metrics_address.clone(),
        });
    }

    if let Err(registration) = build_tree(config) {
        errors.extend(registration.into_iter().map(ValidationError::from));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// Unparseable patterns are compared verbatim; the tree build reports them.
fn canonical(pattern: &str) -> String {
    parse_pattern(pattern)
        .map(|segments| render_pattern(&segments))
        .unwrap_or_else(|_| pattern.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RouteConfig;

    fn route(name: &str, pattern: &str) -> RouteConfig {
        RouteConfig {
            name: name.into(),
            pattern: pattern.into(),
        }
    }

    #[test]
    fn test_valid_config() {
        let config = RouterConfig {
            routes: vec![route("users", "/users"), route("images", "/images/{id}")],
            ..Default::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_reports_every_error() {
        let mut config = RouterConfig {
            routes: vec![
                route("", "/a"),
                route("user", "/user/{name}"),
                route("user", "/user/{id}"),
                route("broken", "/x/{}"),
            ],
            ..Default::default()
        };
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = "not-an-address".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert_eq!(errors[0], ValidationError::EmptyName { index: 0 });
        assert_eq!(errors[1], ValidationError::DuplicateName { name: "user".into() });
        assert!(matches!(errors[2], ValidationError::MetricsAddress { .. }));
        assert!(matches!(
            errors[3],
            ValidationError::Registration(RegistrationError::PlaceholderConflict { .. })
        ));
        assert!(matches!(
            errors[4],
            ValidationError::Registration(RegistrationError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_repeated_entry_is_accepted() {
        let config = RouterConfig {
            routes: vec![
                route("user", "/user/{name}"),
                route("user", "user/{name}/"),
                route("images", "/images"),
            ],
            ..Default::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_name_bound_to_two_patterns() {
        let config = RouterConfig {
            routes: vec![route("user", "/user/{name}"), route("user", "/users")],
            ..Default::default()
        };
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::DuplicateName { name: "user".into() }]
        );
    }
}
