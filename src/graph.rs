use std::{
    collections::HashSet,
    io::{self, Write},
    path::{Path, PathBuf},
};

use crate::include::IncludeDirective;

pub type NodeId = usize;

/// A resolved file together with the files its includes point to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedNode {
    pub path: PathBuf,
    pub includes: Vec<IncludeDirective>,
    /// One entry per include, in the order the includes appear.
    pub children: Vec<NodeId>,
}

/// The include graph of an entry file.
///
/// Nodes are stored in completion order, so every node comes after all of its children
/// and the root is last. A file reached through several includes is stored once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyGraph {
    nodes: Vec<ResolvedNode>,
    root: NodeId,
}

impl DependencyGraph {
    pub(crate) fn new(nodes: Vec<ResolvedNode>, root: NodeId) -> Self {
        DependencyGraph { nodes, root }
    }

    pub fn root(&self) -> &ResolvedNode {
        &self.nodes[self.root]
    }

    pub fn node(&self, id: NodeId) -> &ResolvedNode {
        &self.nodes[id]
    }

    pub fn nodes(&self) -> &[ResolvedNode] {
        &self.nodes
    }

    pub fn find(&self, path: &Path) -> Option<&ResolvedNode> {
        self.nodes.iter().find(|node| node.path == path)
    }

    /// Writes the graph as an indented tree, starting at the root. Subtrees that were
    /// already printed are shown once more with a trailing `(*)` and not expanded.
    pub fn write_tree(&self, writer: &mut impl Write) -> io::Result<()> {
        let mut printed = HashSet::new();
        self.write_subtree(writer, self.root, 0, &mut printed)
    }

    fn write_subtree(
        &self,
        writer: &mut impl Write,
        id: NodeId,
        depth: usize,
        printed: &mut HashSet<NodeId>,
    ) -> io::Result<()> {
        let node = &self.nodes[id];
        let indent = "    ".repeat(depth);

        if !printed.insert(id) {
            return writeln!(writer, "{indent}{} (*)", node.path.display());
        }

        writeln!(writer, "{indent}{}", node.path.display())?;
        for &child in &node.children {
            self.write_subtree(writer, child, depth + 1, printed)?;
        }

        Ok(())
    }
}
