//! The AST node model.
//!
//! Nodes live in an arena owned by [`Ast`]; identities are [`NodeId`]
//! indices. Every node carries its kind tag, the token that anchors it, an
//! optional parent index and an ordered child list. Parent links are plain
//! indices, so ownership stays with the arena and back-edges cost nothing.
//!
//! Invariants maintained here:
//! - a node appears in at most one parent's child list, exactly once;
//! - a child list is in syntactic order;
//! - `reparent` onto the current parent is a no-op.

use mead_lex::Token;
use mead_util::{define_idx, IndexVec};

define_idx!(
    /// Index of a node in its [`Ast`] arena.
    NodeId
);

/// Discriminant of an AST node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Invalid,

    // Top-level structure
    FunctionPrototype,
    FunctionDeclaration,
    FunctionDefinition,

    // Statements
    Block,
    ExpressionStatement,
    VariableDeclaration,
    VariableDefinition,
    IfStatement,
    ReturnStatement,
    EmptyStatement,

    // Expressions
    Identifier,
    Number,
    String,
    ScopeResolution,
    Binary,
    FunctionCall,
    ConstructorCall,
    Cast,
    Sizeof,
    Subscript,
    AccessMember,
    Deref,
    GetAddress,
    UnaryPlus,
    UnaryMinus,
    LogicalNot,
    BitwiseNot,
    PrefixIncrement,
    PrefixDecrement,
    PostfixIncrement,
    PostfixDecrement,
    SingleNew,
    ArrayNew,
    Delete,
    Assign,
    CompoundAssign,
    ConditionalExpression,
    Comma,

    // Type expressions
    TypeExpression,
    ConstQualifier,
    PointerQualifier,
    ReferenceQualifier,
}

impl NodeKind {
    /// Whether nodes of this kind answer `type_of`/`is_constant`.
    pub fn is_expression(self) -> bool {
        use NodeKind::*;
        matches!(
            self,
            Identifier
                | Number
                | String
                | ScopeResolution
                | Binary
                | FunctionCall
                | ConstructorCall
                | Cast
                | Sizeof
                | Subscript
                | AccessMember
                | Deref
                | GetAddress
                | UnaryPlus
                | UnaryMinus
                | LogicalNot
                | BitwiseNot
                | PrefixIncrement
                | PrefixDecrement
                | PostfixIncrement
                | PostfixDecrement
                | SingleNew
                | ArrayNew
                | Delete
                | Assign
                | CompoundAssign
                | ConditionalExpression
                | Comma
        )
    }

    /// Whether nodes of this kind answer `compile`.
    pub fn is_statement(self) -> bool {
        use NodeKind::*;
        matches!(
            self,
            Block
                | ExpressionStatement
                | VariableDeclaration
                | VariableDefinition
                | IfStatement
                | ReturnStatement
                | EmptyStatement
        )
    }

    /// Whether nodes of this kind answer `to_type`.
    pub fn is_type(self) -> bool {
        matches!(self, NodeKind::TypeExpression)
    }
}

/// One AST node.
#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub token: Token,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// The node arena.
#[derive(Debug, Default)]
pub struct Ast {
    nodes: IndexVec<NodeId, Node>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes allocated so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a parentless node.
    pub fn alloc(&mut self, kind: NodeKind, token: Token) -> NodeId {
        self.nodes.push(Node {
            kind,
            token,
            parent: None,
            children: Vec::new(),
        })
    }

    /// Access a node.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id].kind
    }

    pub fn token(&self, id: NodeId) -> &Token {
        &self.nodes[id].token
    }

    /// The node's children, in syntactic order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    /// The `n`-th child.
    ///
    /// # Panics
    ///
    /// Panics if the child does not exist: an arity violation here means a
    /// parser bug, which is fatal by design.
    pub fn child(&self, id: NodeId, n: usize) -> NodeId {
        let node = &self.nodes[id];
        *node
            .children
            .get(n)
            .unwrap_or_else(|| panic!("{:?} node has no child #{}", node.kind, n))
    }

    /// Detach a node from its parent, if any.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id].parent.take() {
            self.nodes[parent].children.retain(|&child| child != id);
        }
    }

    /// Make `child` the last child of `parent`.
    ///
    /// Idempotent: reparenting onto the current parent keeps the child's
    /// position. Otherwise the child is detached from its previous parent
    /// first, preserving the tree invariant.
    pub fn reparent(&mut self, child: NodeId, parent: NodeId) {
        if self.nodes[child].parent == Some(parent) {
            return;
        }
        self.detach(child);
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
    }

    /// Drop every node allocated at or past `len`.
    ///
    /// Used by the parser to roll back speculative allocations when an
    /// attempt fails. A failed attempt never attaches its nodes to nodes
    /// that predate it, so surviving nodes cannot reference the dropped
    /// tail.
    pub fn truncate(&mut self, len: usize) {
        self.nodes.truncate(len);
    }

    /// Render the subtree rooted at `id` as an indented listing.
    pub fn dump(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.dump_into(id, 0, &mut out);
        out
    }

    fn dump_into(&self, id: NodeId, depth: usize, out: &mut String) {
        let node = &self.nodes[id];
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push_str(&format!("{:?} {}\n", node.kind, node.token));
        for &child in &node.children {
            self.dump_into(child, depth + 1, out);
        }
    }
}
