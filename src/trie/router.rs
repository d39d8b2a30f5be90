use http::Method;

use super::{
    node::{Handlers, Node, RouteMethod, Segment},
    PathVariables, RegexCache, RouterBuilder,
};

/// A frozen path trie. Lookups only read, so a `Router` can be shared
/// between threads once built.
#[derive(Debug)]
pub struct Router<H> {
    prefix: String,
    root: Node<H>,
    regexes: RegexCache,
}

/// Handlers found for a path along with the variables captured on the way.
#[derive(Debug)]
pub struct Match<'a, H> {
    pub handlers: &'a Handlers<H>,
    pub variables: PathVariables,
}

#[derive(Debug)]
pub enum Resolved<'a, H> {
    Found {
        handler: &'a H,
        variables: PathVariables,
    },
    /// The path exists but nothing answers this method.
    MethodNotAllowed { allowed: Vec<RouteMethod> },
    NotFound,
}

impl<H> Router<H> {
    pub fn builder() -> RouterBuilder<H> {
        RouterBuilder::new()
    }

    pub(crate) fn new(prefix: String, root: Node<H>, regexes: RegexCache) -> Self {
        Self {
            prefix,
            root,
            regexes,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn root(&self) -> &Node<H> {
        &self.root
    }

    pub fn regexes(&self) -> &RegexCache {
        &self.regexes
    }

    /// Walks the trie one segment at a time.
    ///
    /// A literal child is always taken over the parameter child, and the walk
    /// never goes back to try the parameter once a literal was chosen.
    /// Returns `None` when no node matches or the node has no handlers.
    pub fn lookup(&self, path: &str) -> Option<Match<'_, H>> {
        let path = path.strip_prefix(self.prefix.as_str())?;
        let mut variables = PathVariables::new();
        let mut node = &self.root;
        if !path.is_empty() && path != "/" {
            let path = path.strip_prefix('/').unwrap_or(path);
            let path = path.strip_suffix('/').unwrap_or(path);
            for part in path.split('/') {
                node = node.child(part)?;
                if let Segment::Param { name, .. } = &node.segment {
                    variables.insert(name, part);
                }
            }
        }
        if node.handlers.is_empty() {
            return None;
        }
        Some(Match {
            handlers: &node.handlers,
            variables,
        })
    }

    pub fn resolve(&self, method: &Method, path: &str) -> Resolved<'_, H> {
        let Some(Match {
            handlers,
            variables,
        }) = self.lookup(path)
        else {
            return Resolved::NotFound;
        };
        match handlers.get(method) {
            Some(handler) => Resolved::Found { handler, variables },
            None => Resolved::MethodNotAllowed {
                allowed: handlers.methods(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn simple() -> Router<u8> {
        Router::builder()
            .get("/", 1)
            .get("/users", 1)
            .get("/users/:user", 1)
            .get("/users/:user/starred", 1)
            .post("/users/:user/starred", 2)
            .get("/users/topusers", 4)
            .get(r"/regex/integer/:n!\d+", 3)
            .get("/regex/lowercase/:word![a-z]+", 3)
            .put("/regex/lowercase/:word![a-z]+", 3)
            .build()
            .unwrap()
    }

    fn found<H: Copy>(resolved: Resolved<'_, H>) -> Option<(H, PathVariables)> {
        match resolved {
            Resolved::Found { handler, variables } => Some((*handler, variables)),
            _ => None,
        }
    }

    #[test]
    fn test_simple_api() {
        let router = simple();
        let cases: &[(Method, &str, Option<u8>)] = &[
            (Method::GET, "", Some(1)),
            (Method::GET, "/", Some(1)),
            (Method::POST, "/", None),
            (Method::GET, "/users", Some(1)),
            (Method::GET, "/users/", Some(1)),
            (Method::GET, "/users/dave", Some(1)),
            (Method::GET, "/users/bill/starred", Some(1)),
            (Method::POST, "/users/bill/starred", Some(2)),
            (Method::GET, "/users/topusers", Some(4)),
            (Method::DELETE, "/users/topusers/hey", None),
            (Method::GET, "/regex/integer/invalid", None),
            (Method::GET, "/regex/integer/999", Some(3)),
            (Method::GET, "/regex/lowercase/INVALID", None),
            (Method::GET, "/regex/lowercase/a", Some(3)),
            (Method::PUT, "/regex/lowercase/bb", Some(3)),
        ];
        for (method, path, expected) in cases {
            assert_eq!(
                found(router.resolve(method, path)).map(|(h, _)| h),
                *expected,
                "{} {}",
                method,
                path
            );
        }
    }

    #[test]
    fn test_captures_variables() {
        let router = simple();
        let (_, vars) = found(router.resolve(&Method::GET, "/users/dave")).unwrap();
        assert_eq!(vars, PathVariables::from_iter([("user", "dave")]));

        let (_, vars) = found(router.resolve(&Method::GET, "/users/topusers")).unwrap();
        assert!(vars.is_empty());

        let (_, vars) = found(router.resolve(&Method::GET, "/regex/integer/42")).unwrap();
        assert_eq!(vars.int("n"), 42);
    }

    #[test]
    fn test_slash_normalization() {
        let router = simple();
        for path in ["/users/", "/users", "users"] {
            let (handler, vars) = found(router.resolve(&Method::GET, path)).unwrap();
            assert_eq!(handler, 1);
            assert!(vars.is_empty());
        }
        let (_, vars) = found(router.resolve(&Method::GET, "users/dave/")).unwrap();
        assert_eq!(vars.get("user"), "dave");
    }

    #[test]
    fn test_method_not_allowed() {
        let router = simple();
        match router.resolve(&Method::DELETE, "/users/bill/starred") {
            Resolved::MethodNotAllowed { allowed } => assert_eq!(
                allowed,
                vec![
                    RouteMethod::Only(Method::GET),
                    RouteMethod::Only(Method::POST)
                ]
            ),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_intermediate_node_is_not_found() {
        let router = Router::builder().get("/a/b/c", 1).build().unwrap();
        assert!(router.lookup("/a/b").is_none());
        assert!(matches!(
            router.resolve(&Method::GET, "/a"),
            Resolved::NotFound
        ));
        assert!(router.lookup("/a/b/c").is_some());
    }

    #[test]
    fn test_prefix() {
        let router = RouterBuilder::with_prefix("/api")
            .get("/", 0)
            .get("/users/:user", 1)
            .build()
            .unwrap();
        assert_eq!(router.prefix(), "/api");
        assert!(router.lookup("/users/dave").is_none());
        assert!(router.lookup("/api").is_some());
        assert!(router.lookup("/api/").is_some());
        let matched = router.lookup("/api/users/dave").unwrap();
        assert_eq!(matched.variables.get("user"), "dave");
    }

    #[test]
    fn test_any_method() {
        let router = Router::builder()
            .any("/all", 0)
            .any("/mixed", 0)
            .get("/mixed", 1)
            .build()
            .unwrap();
        for method in [Method::GET, Method::POST, Method::OPTIONS] {
            assert_eq!(found(router.resolve(&method, "/all")).unwrap().0, 0);
        }
        assert_eq!(found(router.resolve(&Method::GET, "/mixed")).unwrap().0, 1);
        assert_eq!(found(router.resolve(&Method::PUT, "/mixed")).unwrap().0, 0);
    }

    #[test]
    fn test_no_backtracking_into_parameter() {
        let router = Router::builder()
            .get("/files/latest/info", 1)
            .get("/files/:id", 2)
            .build()
            .unwrap();
        assert_eq!(found(router.resolve(&Method::GET, "/files/7")).unwrap().0, 2);
        assert!(router.lookup("/files/latest").is_none());
        assert!(router.lookup("/files/latest/other").is_none());
    }

    #[test]
    fn test_constraint_failure_is_not_found() {
        let router = Router::builder()
            .get("/price/:amount!float", 1)
            .build()
            .unwrap();
        assert!(found(router.resolve(&Method::GET, "/price/-2.50")).is_some());
        assert!(matches!(
            router.resolve(&Method::GET, "/price/cheap"),
            Resolved::NotFound
        ));
    }
}
