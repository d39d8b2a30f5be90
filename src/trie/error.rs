use std::fmt::Display;

use http::Method;

/// A mistake in the route table, found while it is being built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    EmptyPath,
    EmptyParamName {
        path: String,
        segment: String,
    },
    EmptyConstraint {
        path: String,
    },
    InvalidConstraint {
        pattern: String,
        reason: String,
    },
    ParamConflict {
        path: String,
        existing: String,
        requested: String,
    },
    DuplicateMethod {
        path: String,
        method: Option<Method>,
    },
}

impl RouteError {
    pub(crate) fn with_path(self, path: &str) -> Self {
        match self {
            Self::EmptyConstraint { .. } => Self::EmptyConstraint {
                path: path.to_string(),
            },
            other => other,
        }
    }
}

impl Display for RouteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPath => write!(f, "route path must not be empty"),
            Self::EmptyParamName { path, segment } => {
                write!(f, "parameter must have a name: {segment} in {path}")
            }
            Self::EmptyConstraint { path } => write!(f, "no constraint pattern provided in {path}"),
            Self::InvalidConstraint { pattern, reason } => {
                write!(f, "invalid constraint pattern {pattern}: {reason}")
            }
            Self::ParamConflict {
                path,
                existing,
                requested,
            } => write!(
                f,
                "parameter conflict routing {path}: :{requested} collides with :{existing}"
            ),
            Self::DuplicateMethod { path, method } => match method {
                Some(method) => write!(f, "existing method {method} found for path {path}"),
                None => write!(f, "existing any-method handler found for path {path}"),
            },
        }
    }
}

impl std::error::Error for RouteError {}

/// Every error collected by a chained [`RouterBuilder`](super::RouterBuilder).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildError(pub Vec<RouteError>);

impl BuildError {
    pub fn errors(&self) -> &[RouteError] {
        &self.0
    }
}

impl Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "route table has {} error(s)", self.0.len())?;
        for error in &self.0 {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for BuildError {}

impl From<RouteError> for BuildError {
    fn from(value: RouteError) -> Self {
        Self(vec![value])
    }
}
