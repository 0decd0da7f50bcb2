//! Generic AST traversal.
//!
//! [`walk`] performs a depth-first, pre-order walk over the arena, calling [`Visitor::enter`] before a node's
//! children and [`Visitor::leave`] after them. Both callbacks receive the parent id (`None` for roots). Children are
//! visited in [`Node::children`] order, i.e. source order.
//!
//! Code generators do not use this module: they match on node variants directly so that an unhandled variant is a
//! compile error. Traversal is for analyses that only care about some node kinds (e.g. collecting every custom type
//! reference of a file).

use crate::ast::{Ast, Node, NodeId, NodeKind, NodeType};

// ============================================================================
// Visitor
// ============================================================================

/// What to do after [`Visitor::enter`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Walk {
    #[default]
    Continue,
    /// Do not descend into this node's children; `leave` is still called.
    SkipChildren,
}

pub trait Visitor {
    fn enter(&mut self, _ast: &Ast, _parent: Option<NodeId>, _node: NodeId) -> Walk {
        Walk::Continue
    }

    fn leave(&mut self, _ast: &Ast, _parent: Option<NodeId>, _node: NodeId) {}
}

/// Walk every subtree rooted at `roots`.
pub fn walk<V: Visitor + ?Sized>(ast: &Ast, visitor: &mut V, roots: &[NodeId]) {
    for root in roots {
        walk_node(ast, visitor, None, *root);
    }
}

/// Walk the subtree rooted at `node`.
pub fn walk_node<V: Visitor + ?Sized>(ast: &Ast, visitor: &mut V, parent: Option<NodeId>, node: NodeId) {
    if visitor.enter(ast, parent, node) == Walk::Continue {
        for child in ast.children(node) {
            walk_node(ast, visitor, Some(node), child);
        }
    }
    visitor.leave(ast, parent, node);
}

// ============================================================================
// Search
// ============================================================================

/// Selects nodes by family or by exact type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeFilter {
    Kind(NodeKind),
    Type(NodeType),
}

impl NodeFilter {
    pub fn matches(self, node: &Node) -> bool {
        match self {
            NodeFilter::Kind(kind) => node.kind() == kind,
            NodeFilter::Type(ty) => node.node_type() == ty,
        }
    }
}

struct Finder {
    filter: NodeFilter,
    found: Vec<(Option<NodeId>, NodeId)>,
}

impl Visitor for Finder {
    fn enter(&mut self, ast: &Ast, parent: Option<NodeId>, node: NodeId) -> Walk {
        if self.filter.matches(ast.node(node)) {
            self.found.push((parent, node));
        }
        Walk::Continue
    }
}

/// Return `(parent, node)` pairs, in pre-order, for every node under `roots` matching `filter`.
pub fn find_nodes(ast: &Ast, roots: &[NodeId], filter: NodeFilter) -> Vec<(Option<NodeId>, NodeId)> {
    let mut finder = Finder {
        filter,
        found: Vec::new(),
    };
    walk(ast, &mut finder, roots);
    finder.found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_source;

    const SOURCE: &str = r#"
package demo
interface Robot
  fn move(pos []Point, speed float32) Status
  emit moved(Point)
end
struct Point
  x float64
end
"#;

    #[test]
    fn test_find_custom_types_with_parents() {
        let ast = parse_source(SOURCE, "demo/robot.qi").unwrap();
        let found = find_nodes(&ast, ast.roots(), NodeFilter::Type(NodeType::CustomType));
        assert_eq!(found.len(), 3);

        // `[]Point` is the parent of the first custom type
        let (parent, _) = found[0];
        assert_eq!(parent.map(|p| ast.node_type(p)), Some(NodeType::ListType));
        // return type and signal parameter hang off their declarations
        assert_eq!(found[1].0.map(|p| ast.node_type(p)), Some(NodeType::FnDecl));
        assert_eq!(found[2].0.map(|p| ast.node_type(p)), Some(NodeType::EmitDecl));
    }

    #[test]
    fn test_find_by_kind() {
        let ast = parse_source(SOURCE, "demo/robot.qi").unwrap();
        let decls = find_nodes(&ast, ast.roots(), NodeFilter::Kind(NodeKind::Decl));
        // interface, fn, emit, struct, field
        assert_eq!(decls.len(), 5);
        assert_eq!(decls[0].0, None);
    }

    #[derive(Default)]
    struct Trace {
        events: Vec<String>,
        skip: Option<NodeType>,
    }

    impl Visitor for Trace {
        fn enter(&mut self, ast: &Ast, _parent: Option<NodeId>, node: NodeId) -> Walk {
            let ty = ast.node_type(node);
            self.events.push(format!("+{:?}", ty));
            if Some(ty) == self.skip {
                Walk::SkipChildren
            } else {
                Walk::Continue
            }
        }

        fn leave(&mut self, ast: &Ast, _parent: Option<NodeId>, node: NodeId) {
            self.events.push(format!("-{:?}", ast.node_type(node)));
        }
    }

    #[test]
    fn test_enter_leave_nesting() {
        let ast = parse_source("typedef []int32 Ints\n", "t.qi").unwrap();
        let mut trace = Trace::default();
        walk(&ast, &mut trace, ast.roots());
        assert_eq!(
            trace.events,
            vec!["+TypeDefDecl", "+ListType", "+BuiltinType", "-BuiltinType", "-ListType", "-TypeDefDecl"]
        );
    }

    #[test]
    fn test_skip_children() {
        let ast = parse_source("typedef []int32 Ints\n", "t.qi").unwrap();
        let mut trace = Trace {
            skip: Some(NodeType::ListType),
            ..Default::default()
        };
        walk(&ast, &mut trace, ast.roots());
        assert_eq!(trace.events, vec!["+TypeDefDecl", "+ListType", "-ListType", "-TypeDefDecl"]);
    }
}
