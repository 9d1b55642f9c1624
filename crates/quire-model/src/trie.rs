//! Path trie: dotted data paths merged into one rooted tree.

use serde::Serialize;

use crate::error::{LoopStage, ModelError, ModelResult};

/// Name of the synthetic root node.
pub const ROOT_NAME: &str = "root";

/// Upper bound on descent steps while grafting a path into the trie.
///
/// Independent of the depth bound; exhausting it stops grafting silently.
pub const GRAFT_ITERATION_LIMIT: usize = 99;

/// A trie node. Children are unique by name within a parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathTrieNode {
    pub name: String,
    pub children: Vec<PathTrieNode>,
}

impl PathTrieNode {
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Build a single-branch chain, one node per segment of `path`.
    ///
    /// Each level consumes one unit of `depth`; running out is a potential loop.
    pub fn chain(path: &str, depth: usize) -> ModelResult<Self> {
        chain_with_bound(path, depth, depth)
    }

    pub fn child(&self, name: &str) -> Option<&PathTrieNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

fn chain_with_bound(path: &str, depth: usize, max_depth: usize) -> ModelResult<PathTrieNode> {
    if depth == 0 {
        return Err(ModelError::potential_loop(LoopStage::Trie, max_depth));
    }

    let (name, rest) = match path.split_once('.') {
        Some((name, rest)) => (name, Some(rest)),
        None => (path, None),
    };

    let mut node = PathTrieNode::leaf(name);
    if let Some(rest) = rest {
        node.children.push(chain_with_bound(rest, depth - 1, max_depth)?);
    }
    Ok(node)
}

/// A rooted path trie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathTrie {
    pub root: PathTrieNode,
}

impl PathTrie {
    /// Start a trie whose sole branch is `path`.
    pub fn new(path: &str, max_depth: usize) -> ModelResult<Self> {
        let branch = PathTrieNode::chain(path, max_depth)?;
        Ok(Self {
            root: PathTrieNode {
                name: ROOT_NAME.to_string(),
                children: vec![branch],
            },
        })
    }

    /// An empty trie, for templates without any data bindings.
    pub fn empty() -> Self {
        Self {
            root: PathTrieNode::leaf(ROOT_NAME),
        }
    }

    /// Merge `path` into the trie.
    ///
    /// Walks existing children segment by segment; the remainder of the path
    /// is grafted at the first mismatch. Prefixes of existing branches add
    /// nothing.
    pub fn add_path(&mut self, path: &str, max_depth: usize) -> ModelResult<()> {
        let mut cursor = Some(PathTrieNode::chain(path, max_depth)?);
        let mut parent = &mut self.root;

        for _ in 0..GRAFT_ITERATION_LIMIT {
            let Some(node) = cursor.take() else {
                return Ok(());
            };

            match parent.children.iter().position(|c| c.name == node.name) {
                None => {
                    parent.children.push(node);
                    return Ok(());
                }
                Some(index) => {
                    cursor = node.children.into_iter().next();
                    parent = &mut parent.children[index];
                }
            }
        }

        tracing::trace!(path, "Graft iteration limit reached");
        Ok(())
    }

    /// Top-level branches, in insertion order.
    pub fn branches(&self) -> &[PathTrieNode] {
        &self.root.children
    }

    /// Find the node at a dotted path by walking child by child.
    pub fn find(&self, path: &str) -> Option<&PathTrieNode> {
        path.split('.')
            .try_fold(&self.root, |node, segment| node.child(segment))
    }
}

/// Fold a path list into a trie. The first path seeds the sole initial branch.
pub fn build_trie<S: AsRef<str>>(paths: &[S], max_depth: usize) -> ModelResult<PathTrie> {
    let Some((first, rest)) = paths.split_first() else {
        return Ok(PathTrie::empty());
    };

    let mut trie = PathTrie::new(first.as_ref(), max_depth)?;
    for path in rest {
        trie.add_path(path.as_ref(), max_depth)?;
    }
    Ok(trie)
}
