use std::{collections::HashMap, fmt::Display, sync::Arc};

use http::Method;
use regex::Regex;

/// Method a handler is registered for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RouteMethod {
    /// Answers every method not registered explicitly on the same path.
    Any,
    Only(Method),
}

impl From<Method> for RouteMethod {
    fn from(method: Method) -> Self {
        Self::Only(method)
    }
}

impl Display for RouteMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Any => "*".fmt(f),
            Self::Only(method) => method.fmt(f),
        }
    }
}

/// Handlers attached to a trie node, one per method.
#[derive(Debug)]
pub struct Handlers<H> {
    methods: HashMap<Method, H>,
    any: Option<H>,
}

impl<H> Default for Handlers<H> {
    fn default() -> Self {
        Self {
            methods: HashMap::new(),
            any: None,
        }
    }
}

impl<H> Handlers<H> {
    /// Exact method first, then the any-method handler.
    pub fn get(&self, method: &Method) -> Option<&H> {
        self.methods.get(method).or(self.any.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty() && self.any.is_none()
    }

    /// Registered methods, sorted, with [`RouteMethod::Any`] last.
    pub fn methods(&self) -> Vec<RouteMethod> {
        let mut methods = self.methods.keys().cloned().collect::<Vec<_>>();
        methods.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        let mut methods = methods
            .into_iter()
            .map(RouteMethod::Only)
            .collect::<Vec<_>>();
        if self.any.is_some() {
            methods.push(RouteMethod::Any);
        }
        methods
    }

    pub(crate) fn entry(&self, method: &RouteMethod) -> Option<&H> {
        match method {
            RouteMethod::Any => self.any.as_ref(),
            RouteMethod::Only(method) => self.methods.get(method),
        }
    }

    /// Returns the handler back when `method` is already taken.
    pub(crate) fn insert(&mut self, method: RouteMethod, handler: H) -> Result<(), H> {
        match method {
            RouteMethod::Any if self.any.is_some() => Err(handler),
            RouteMethod::Any => {
                self.any = Some(handler);
                Ok(())
            }
            RouteMethod::Only(method) if self.methods.contains_key(&method) => Err(handler),
            RouteMethod::Only(method) => {
                self.methods.insert(method, handler);
                Ok(())
            }
        }
    }
}

/// What a node matches in its parent.
#[derive(Debug, Clone)]
pub enum Segment {
    Root,
    Static(String),
    Param {
        name: String,
        constraint: Option<Arc<Regex>>,
    },
}

impl Segment {
    pub fn param_name(&self) -> Option<&str> {
        match self {
            Self::Param { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// One position in the path trie.
///
/// Literal children and the single parameter child live in separate slots so
/// a literal segment can never be mistaken for the parameter.
#[derive(Debug)]
pub struct Node<H> {
    pub(crate) segment: Segment,
    pub(crate) statics: HashMap<String, Node<H>>,
    pub(crate) param: Option<Box<Node<H>>>,
    pub(crate) handlers: Handlers<H>,
}

impl<H> Node<H> {
    pub(crate) fn new(segment: Segment) -> Self {
        Self {
            segment,
            statics: HashMap::new(),
            param: None,
            handlers: Handlers::default(),
        }
    }

    pub fn segment(&self) -> &Segment {
        &self.segment
    }

    pub fn handlers(&self) -> &Handlers<H> {
        &self.handlers
    }

    pub fn is_leaf(&self) -> bool {
        self.statics.is_empty() && self.param.is_none()
    }

    /// Child for one concrete path segment. Literal children win over the
    /// parameter child; a parameter with a constraint must match the whole
    /// segment.
    pub(crate) fn child(&self, part: &str) -> Option<&Node<H>> {
        if let Some(child) = self.statics.get(part) {
            return Some(child);
        }
        let param = self.param.as_deref()?;
        match &param.segment {
            Segment::Param {
                constraint: Some(regex),
                ..
            } if !regex.is_match(part) => None,
            _ => Some(param),
        }
    }
}
