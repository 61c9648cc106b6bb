//! Role-labelled syntax tree over a document
//!
//! The tree is what the host hands to the highlighting core. Each node has a
//! character range and a name made of space-separated role labels, e.g.
//! `"codeblock codeblock-begin"`. The core only ever looks at the labels in
//! [`roles`]; everything else classifies as plain structure.

/// Role labels understood by the tree walker
pub mod roles {
    /// Delimiter syntax (backtick runs and the like)
    pub const FORMATTING: &str = "formatting";
    /// Backtick run around an inline code span
    pub const FORMATTING_CODE: &str = "formatting-code";
    /// Text of an inline code span, delimiters excluded
    pub const INLINE_CODE: &str = "inline-code";
    /// Any line belonging to a fenced code block
    pub const CODEBLOCK: &str = "codeblock";
    /// Opening fence line
    pub const CODEBLOCK_BEGIN: &str = "codeblock-begin";
    /// Closing fence line
    pub const CODEBLOCK_END: &str = "codeblock-end";
}

/// A node of the syntax tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    name: String,
    from: usize,
    to: usize,
    children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    /// Create a leaf node covering `[from, to)`
    pub fn new(name: impl Into<String>, from: usize, to: usize) -> Self {
        Self {
            name: name.into(),
            from,
            to,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<SyntaxNode>) -> Self {
        self.children = children;
        self
    }

    pub fn push(&mut self, child: SyntaxNode) {
        self.children.push(child);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Iterate the role labels of this node
    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.name.split_whitespace()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles().any(|r| r == role)
    }

    #[inline]
    pub fn from(&self) -> usize {
        self.from
    }

    #[inline]
    pub fn to(&self) -> usize {
        self.to
    }

    pub fn children(&self) -> &[SyntaxNode] {
        &self.children
    }
}

/// Syntax tree for a whole document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTree {
    root: SyntaxNode,
}

impl SyntaxTree {
    pub const ROOT: &'static str = "document";

    pub fn new(root: SyntaxNode) -> Self {
        Self { root }
    }

    /// A tree with nothing but the root node
    pub fn empty(len: usize) -> Self {
        Self::new(SyntaxNode::new(Self::ROOT, 0, len))
    }

    pub fn root(&self) -> &SyntaxNode {
        &self.root
    }

    /// Depth-first, pre-order traversal starting at the root
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![&self.root],
        }
    }
}

/// Pre-order iterator over a [`SyntaxTree`]
pub struct Walk<'a> {
    stack: Vec<&'a SyntaxNode>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a SyntaxNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_is_preorder() {
        let tree = SyntaxTree::new(SyntaxNode::new("document", 0, 10).with_children(vec![
            SyntaxNode::new("paragraph", 0, 5).with_children(vec![
                SyntaxNode::new("text", 0, 2),
                SyntaxNode::new("text", 2, 5),
            ]),
            SyntaxNode::new("paragraph", 6, 10),
        ]));

        let visited: Vec<(usize, usize)> = tree.walk().map(|n| (n.from(), n.to())).collect();
        assert_eq!(visited, vec![(0, 10), (0, 5), (0, 2), (2, 5), (6, 10)]);
    }

    #[test]
    fn test_roles_split_on_whitespace() {
        let node = SyntaxNode::new("codeblock  codeblock-begin", 0, 3);
        assert!(node.has_role(roles::CODEBLOCK));
        assert!(node.has_role(roles::CODEBLOCK_BEGIN));
        assert!(!node.has_role("codeblock-b"));
        assert_eq!(node.roles().count(), 2);
    }
}
