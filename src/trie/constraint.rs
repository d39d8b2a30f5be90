use std::{collections::HashMap, sync::Arc};

use regex::Regex;

use super::RouteError;

const INT: &str = r"^-?\d+$";
const FLOAT: &str = r"^-?\d+(?:\.\d+)?$";

/// Compiled parameter constraints, keyed by the text written in the route.
#[derive(Debug, Default)]
pub struct RegexCache {
    patterns: HashMap<String, Arc<Regex>>,
}

impl RegexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the compiled form of `pattern`, compiling it on first use.
    ///
    /// `int` and `float` are aliases. Any other pattern is anchored on both
    /// ends so it has to match the whole segment.
    pub fn resolve(&mut self, pattern: &str) -> Result<Arc<Regex>, RouteError> {
        if let Some(regex) = self.patterns.get(pattern) {
            return Ok(regex.clone());
        }
        let regex = Arc::new(compile(pattern)?);
        self.patterns.insert(pattern.to_string(), regex.clone());
        Ok(regex)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

fn compile(pattern: &str) -> Result<Regex, RouteError> {
    let anchored = match pattern {
        "" => {
            return Err(RouteError::EmptyConstraint {
                path: String::new(),
            })
        }
        "int" => INT.to_string(),
        "float" => FLOAT.to_string(),
        custom => {
            let mut anchored = String::with_capacity(custom.len() + 2);
            if !custom.starts_with('^') {
                anchored.push('^');
            }
            anchored.push_str(custom);
            if !custom.ends_with('$') {
                anchored.push('$');
            }
            anchored
        }
    };
    Regex::new(&anchored).map_err(|err| RouteError::InvalidConstraint {
        pattern: pattern.to_string(),
        reason: err.to_string(),
    })
}
