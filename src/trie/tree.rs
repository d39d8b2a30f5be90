use std::fmt::{self, Display, Formatter};

use super::{
    node::{Node, Segment},
    Router,
};

type Label<'a, H> = dyn Fn(&H) -> String + 'a;

/// Printable view of a router's trie, see [`Router::tree`].
pub struct Tree<'a, H> {
    router: &'a Router<H>,
    label: Option<Box<Label<'a, H>>>,
}

impl<H> Router<H> {
    /// Draws the trie with the methods registered on each node.
    pub fn tree(&self) -> Tree<'_, H> {
        Tree {
            router: self,
            label: None,
        }
    }

    /// Like [`tree`](Self::tree), naming each handler with `label`.
    pub fn tree_with<'a>(&'a self, label: impl Fn(&H) -> String + 'a) -> Tree<'a, H> {
        Tree {
            router: self,
            label: Some(Box::new(label)),
        }
    }
}

impl<H> Display for Tree<'_, H> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = self.router.prefix().trim_start_matches('/');
        self.node(f, "", name, self.router.root(), true)
    }
}

impl<H> Tree<'_, H> {
    fn node(
        &self,
        f: &mut Formatter<'_>,
        indent: &str,
        name: &str,
        node: &Node<H>,
        last: bool,
    ) -> fmt::Result {
        write!(f, "{}{}───{}", indent, if last { "└" } else { "├" }, name)?;
        if let Segment::Param { name, constraint } = node.segment() {
            write!(f, ":{}", name)?;
            if let Some(regex) = constraint {
                write!(f, "!{}", regex.as_str())?;
            }
        }
        for method in node.handlers().methods() {
            write!(f, " {}", method)?;
            if let (Some(label), Some(handler)) = (&self.label, node.handlers().entry(&method)) {
                write!(f, " {}", label(handler))?;
            }
        }
        writeln!(f)?;

        let indent = format!("{}{}", indent, if last { "    " } else { "│    " });
        let mut statics = node.statics.iter().collect::<Vec<_>>();
        statics.sort_by(|a, b| a.0.cmp(b.0));
        let count = statics.len() + usize::from(node.param.is_some());
        for (i, (part, child)) in statics.into_iter().enumerate() {
            self.node(f, &indent, part, child, i + 1 == count)?;
        }
        if let Some(param) = node.param.as_deref() {
            self.node(f, &indent, "", param, true)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::trie::{Router, RouterBuilder};

    #[test]
    fn test_tree() {
        let router = Router::builder()
            .get("/", "index")
            .get("/users", "list")
            .get("/users/topusers", "top")
            .get("/users/:user", "show")
            .post("/users/:user", "update")
            .any("/health", "health")
            .get("/items/:n!int", "item")
            .build()
            .unwrap();
        assert_eq!(
            router.tree().to_string(),
            [
                "└─── GET",
                "    ├───health *",
                "    ├───items",
                r"    │    └───:n!^-?\d+$ GET",
                "    └───users GET",
                "        ├───topusers GET",
                "        └───:user GET POST",
                "",
            ]
            .join("\n")
        );
    }

    #[test]
    fn test_tree_with_labels() {
        let router = RouterBuilder::with_prefix("/api")
            .get("/users", "list")
            .build()
            .unwrap();
        assert_eq!(
            router.tree_with(|h: &&str| h.to_string()).to_string(),
            "└───api\n    └───users GET list\n"
        );
    }
}
