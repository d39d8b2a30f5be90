use std::sync::Arc;

use essentials::{debug, warn};
use http::Method;
use regex::Regex;

use super::{
    node::{Node, RouteMethod, Segment},
    BuildError, RegexCache, RouteError, Router,
};

const PARAM_MARKER: char = ':';
const CONSTRAINT_SEPARATOR: char = '!';

/// Collects routes into a path trie, then freezes it into a [`Router`].
///
/// [`register`](Self::register) fails on the first bad route. The chained
/// helpers ([`route`](Self::route), [`get`](Self::get), ...) keep going and
/// report every collected error from [`build`](Self::build).
#[derive(Debug)]
pub struct RouterBuilder<H> {
    prefix: String,
    root: Node<H>,
    regexes: RegexCache,
    errors: Vec<RouteError>,
}

impl<H> Default for RouterBuilder<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> RouterBuilder<H> {
    pub fn new() -> Self {
        Self::with_prefix("")
    }

    /// Incoming paths must start with `prefix`; it is stripped before matching.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            root: Node::new(Segment::Root),
            regexes: RegexCache::new(),
            errors: Vec::new(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn regexes(&self) -> &RegexCache {
        &self.regexes
    }

    pub fn register(
        &mut self,
        method: impl Into<RouteMethod>,
        path: &str,
        handler: H,
    ) -> Result<(), RouteError> {
        let method = method.into();
        if path.is_empty() {
            return Err(RouteError::EmptyPath);
        }
        let parts = if path == "/" {
            Vec::new()
        } else {
            split(path)
                .map(|part| parse_part(part, path))
                .collect::<Result<Vec<_>, _>>()?
        };
        // Conflicts are checked for the whole path before the trie or the
        // regex cache is touched, a conflicting route leaves neither changed.
        check_params(&self.root, &parts, path)?;
        let parts = parts
            .into_iter()
            .map(|part| part.compile(path, &mut self.regexes))
            .collect::<Result<Vec<_>, _>>()?;

        let mut node = &mut self.root;
        for part in parts {
            node = match part {
                Segment::Static(text) => node
                    .statics
                    .entry(text.clone())
                    .or_insert_with(|| Node::new(Segment::Static(text))),
                param => descend_param(node, param, path),
            };
        }
        node.handlers
            .insert(method.clone(), handler)
            .map_err(|_| RouteError::DuplicateMethod {
                path: path.to_string(),
                method: match &method {
                    RouteMethod::Any => None,
                    RouteMethod::Only(method) => Some(method.clone()),
                },
            })?;
        debug!("Route registered: {} {}", method, path);
        Ok(())
    }

    /// Chained form of [`register`](Self::register).
    pub fn route(mut self, method: impl Into<RouteMethod>, path: &str, handler: H) -> Self {
        if let Err(error) = self.register(method, path, handler) {
            warn!("{}", error);
            self.errors.push(error);
        }
        self
    }

    pub fn get(self, path: &str, handler: H) -> Self {
        self.route(Method::GET, path, handler)
    }

    pub fn post(self, path: &str, handler: H) -> Self {
        self.route(Method::POST, path, handler)
    }

    pub fn put(self, path: &str, handler: H) -> Self {
        self.route(Method::PUT, path, handler)
    }

    pub fn delete(self, path: &str, handler: H) -> Self {
        self.route(Method::DELETE, path, handler)
    }

    pub fn patch(self, path: &str, handler: H) -> Self {
        self.route(Method::PATCH, path, handler)
    }

    pub fn any(self, path: &str, handler: H) -> Self {
        self.route(RouteMethod::Any, path, handler)
    }

    pub fn build(self) -> Result<Router<H>, BuildError> {
        if !self.errors.is_empty() {
            return Err(BuildError(self.errors));
        }
        Ok(Router::new(self.prefix, self.root, self.regexes))
    }
}

fn split(path: &str) -> impl Iterator<Item = &str> {
    path.trim_matches('/').split('/')
}

/// A path segment as written, before its constraint is compiled.
#[derive(Debug, PartialEq, Eq)]
enum Part<'a> {
    Static(&'a str),
    Param {
        name: &'a str,
        pattern: Option<&'a str>,
    },
}

impl Part<'_> {
    fn compile(self, path: &str, regexes: &mut RegexCache) -> Result<Segment, RouteError> {
        Ok(match self {
            Part::Static(text) => Segment::Static(text.to_string()),
            Part::Param { name, pattern } => Segment::Param {
                name: name.to_string(),
                constraint: pattern
                    .map(|pattern| regexes.resolve(pattern))
                    .transpose()
                    .map_err(|err| err.with_path(path))?,
            },
        })
    }
}

fn parse_part<'a>(part: &'a str, path: &str) -> Result<Part<'a>, RouteError> {
    let Some(param) = part.strip_prefix(PARAM_MARKER) else {
        return Ok(Part::Static(part));
    };
    let (name, pattern) = match param.split_once(CONSTRAINT_SEPARATOR) {
        Some((name, pattern)) => (name, Some(pattern)),
        None => (param, None),
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(RouteError::EmptyParamName {
            path: path.to_string(),
            segment: part.to_string(),
        });
    }
    Ok(Part::Param { name, pattern })
}

fn check_params<H>(root: &Node<H>, parts: &[Part<'_>], path: &str) -> Result<(), RouteError> {
    let mut node = Some(root);
    for part in parts {
        let Some(current) = node else {
            return Ok(());
        };
        node = match part {
            Part::Static(text) => current.statics.get(*text),
            Part::Param { name, .. } => match current.param.as_deref() {
                Some(existing) => match existing.segment.param_name() {
                    Some(existing) if existing != *name => {
                        return Err(RouteError::ParamConflict {
                            path: path.to_string(),
                            existing: existing.to_string(),
                            requested: name.to_string(),
                        })
                    }
                    _ => Some(existing),
                },
                None => None,
            },
        };
    }
    Ok(())
}

fn descend_param<'a, H>(node: &'a mut Node<H>, param: Segment, path: &str) -> &'a mut Node<H> {
    if let Some(existing) = node.param.as_deref() {
        if let (Segment::Param { constraint: old, .. }, Segment::Param { constraint: new, .. }) =
            (&existing.segment, &param)
        {
            if !same_constraint(old, new) {
                warn!(
                    path = path,
                    "constraint ignored, parameter slot already defined by an earlier route"
                );
            }
        }
    }
    node.param.get_or_insert_with(|| Box::new(Node::new(param)))
}

fn same_constraint(a: &Option<Arc<Regex>>, b: &Option<Arc<Regex>>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.as_str() == b.as_str(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_part() {
        assert_eq!(parse_part("users", "/users"), Ok(Part::Static("users")));
        assert_eq!(
            parse_part(": n !int", "/x/: n !int"),
            Ok(Part::Param {
                name: "n",
                pattern: Some("int")
            })
        );
        assert!(matches!(
            parse_part(":", "/:"),
            Err(RouteError::EmptyParamName { .. })
        ));
        assert!(matches!(
            parse_part(": !int", "/: !int"),
            Err(RouteError::EmptyParamName { .. })
        ));
    }

    #[test]
    fn test_compile_part() {
        let mut regexes = RegexCache::new();
        match parse_part(":n!int", "/x/:n!int")
            .and_then(|part| part.compile("/x/:n!int", &mut regexes))
            .unwrap()
        {
            Segment::Param { name, constraint } => {
                assert_eq!(name, "n");
                assert_eq!(constraint.unwrap().as_str(), r"^-?\d+$");
            }
            other => panic!("unexpected segment {:?}", other),
        }
        assert_eq!(
            parse_part(":n!", "/x/:n!")
                .and_then(|part| part.compile("/x/:n!", &mut regexes))
                .unwrap_err(),
            RouteError::EmptyConstraint {
                path: "/x/:n!".to_string()
            }
        );
    }

    #[test]
    fn test_literal_with_separator_stays_literal() {
        let mut builder = RouterBuilder::new();
        builder.register(Method::GET, "/wow!", 1).unwrap();
        assert!(builder.root.statics.contains_key("wow!"));
        assert!(builder.regexes().is_empty());
    }

    #[test]
    fn test_rejects_empty_path() {
        let mut builder = RouterBuilder::new();
        assert_eq!(
            builder.register(Method::GET, "", 1),
            Err(RouteError::EmptyPath)
        );
    }

    #[test]
    fn test_param_conflict() {
        let mut builder = RouterBuilder::new();
        builder
            .register(Method::GET, "/authorizations/:id", 1)
            .unwrap();
        assert_eq!(
            builder.register(Method::PUT, "/authorizations/:client_id", 2),
            Err(RouteError::ParamConflict {
                path: "/authorizations/:client_id".to_string(),
                existing: "id".to_string(),
                requested: "client_id".to_string(),
            })
        );
        builder
            .register(Method::PATCH, "/authorizations/:id", 3)
            .unwrap();
    }

    #[test]
    fn test_conflict_deep_in_path_leaves_trie_untouched() {
        let mut builder = RouterBuilder::new();
        builder.register(Method::GET, "/a/:x/b", 1).unwrap();
        assert!(builder.register(Method::GET, "/a/:y/c", 2).is_err());
        let x = builder.root.statics["a"].param.as_deref().unwrap();
        assert!(x.statics.contains_key("b"));
        assert!(!x.statics.contains_key("c"));
    }

    #[test]
    fn test_same_param_name_is_shared() {
        let mut builder = RouterBuilder::new();
        builder.register(Method::GET, "/users/:user", 1).unwrap();
        builder
            .register(Method::GET, "/users/:user/starred", 2)
            .unwrap();
        builder.register(Method::GET, "/users/topusers", 3).unwrap();
        let users = &builder.root.statics["users"];
        assert_eq!(users.statics.len(), 1);
        assert_eq!(
            users.param.as_deref().unwrap().segment.param_name(),
            Some("user")
        );
    }

    #[test]
    fn test_duplicate_method() {
        let mut builder = RouterBuilder::new();
        builder.register(Method::GET, "/x", 1).unwrap();
        builder.register(Method::POST, "/x", 2).unwrap();
        assert_eq!(
            builder.register(Method::GET, "/x/", 3),
            Err(RouteError::DuplicateMethod {
                path: "/x/".to_string(),
                method: Some(Method::GET),
            })
        );
        builder.register(RouteMethod::Any, "/x", 4).unwrap();
        assert!(builder.register(RouteMethod::Any, "x", 5).is_err());
    }

    #[test]
    fn test_root_is_attached_to_root_node() {
        let mut builder = RouterBuilder::new();
        builder.register(Method::GET, "/", 1).unwrap();
        assert!(builder.root.is_leaf());
        assert_eq!(builder.root.handlers.get(&Method::GET), Some(&1));
    }

    #[test]
    fn test_constraint_compiled_once_across_routes() {
        let mut builder = RouterBuilder::new();
        builder.register(Method::GET, "/a/:n!int", 1).unwrap();
        builder.register(Method::GET, "/b/:m!int", 2).unwrap();
        assert_eq!(builder.regexes().len(), 1);
        let constraint = |top: &str| match &builder.root.statics[top]
            .param
            .as_deref()
            .unwrap()
            .segment
        {
            Segment::Param { constraint, .. } => constraint.clone().unwrap(),
            _ => unreachable!(),
        };
        assert!(Arc::ptr_eq(&constraint("a"), &constraint("b")));
    }

    #[test]
    fn test_build_collects_all_errors() {
        let result = RouterBuilder::new()
            .get("/ok", 1)
            .get("", 2)
            .get("/ok", 3)
            .get("/bad/:n!(", 4)
            .build();
        let errors = result.unwrap_err();
        assert_eq!(errors.errors().len(), 3);
        assert_eq!(errors.errors()[0], RouteError::EmptyPath);
        assert!(matches!(
            errors.errors()[2],
            RouteError::InvalidConstraint { .. }
        ));
    }

    #[test]
    fn test_rejected_route_compiles_nothing() {
        let mut builder = RouterBuilder::with_prefix("/api");
        assert_eq!(builder.prefix(), "/api");
        builder.register(Method::GET, "/a/:x", 1).unwrap();
        assert!(builder.register(Method::GET, "/a/:y!int", 2).is_err());
        assert!(builder.regexes().is_empty());
    }

    #[test]
    fn test_first_constraint_on_shared_slot_wins() {
        let mut builder = RouterBuilder::new();
        builder.register(Method::GET, "/a/:n!int", 1).unwrap();
        builder.register(Method::GET, "/a/:n/b", 2).unwrap();
        let router = builder.build().unwrap();
        assert!(router.lookup("/a/x/b").is_none());
        let found = router.lookup("/a/7/b").unwrap();
        assert_eq!(found.handlers.get(&Method::GET), Some(&2));
        assert_eq!(found.variables.get("n"), "7");
    }
}
