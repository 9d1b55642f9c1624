//! Metadata model: the path trie decorated with field metadata.
//!
//! Each node is built bottom-up: children are decorated first, then the
//! parent's requiredness is inferred from them when no field says otherwise.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::error::{LoopStage, ModelError, ModelResult};
use crate::field::{Field, FieldBound, FieldOption, FieldType};
use crate::trie::{PathTrie, PathTrieNode};

/// Extra bookkeeping on a metadata node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataExtra {
    /// Fully qualified dotted path of the node.
    pub field_name: String,
}

/// A path trie node decorated with field metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataNode {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub name: String,
    pub label: Option<String>,
    pub hint: Option<String>,
    pub descr: Option<String>,
    pub min: Option<FieldBound>,
    pub max: Option<FieldBound>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub order: Option<i64>,
    pub options: Option<Vec<FieldOption>>,
    pub is_required: bool,
    pub extra: MetadataExtra,
    #[serde(rename = "$")]
    pub children: Vec<MetadataNode>,
}

impl MetadataNode {
    /// Find a descendant by its path relative to this node.
    pub fn find(&self, path: &str) -> Option<&MetadataNode> {
        path.split('.').try_fold(self, |node, segment| {
            node.children.iter().find(|c| c.name == segment)
        })
    }
}

/// Find a node in a model by fully qualified dotted path.
pub fn find_node<'a>(model: &'a [MetadataNode], path: &str) -> Option<&'a MetadataNode> {
    let (head, rest) = match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    };
    let top = model.iter().find(|n| n.name == head)?;
    match rest {
        Some(rest) => top.find(rest),
        None => Some(top),
    }
}

/// Field lookup by fully qualified name. Later declarations of a name win.
struct FieldIndex<'a> {
    by_name: HashMap<&'a str, &'a Field>,
}

impl<'a> FieldIndex<'a> {
    fn new(fields: &'a [Field]) -> Self {
        let by_name = fields.iter().map(|f| (f.name.as_str(), f)).collect();
        Self { by_name }
    }

    fn get(&self, name: &str) -> Option<&'a Field> {
        self.by_name.get(name).copied()
    }
}

/// Compare two optional ranks; a missing rank sorts after any present one.
fn compare_nullable<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => a.cmp(&b),
    }
}

/// Sibling order: explicit order, then declaration order, nulls last. Stable.
fn sort_siblings(nodes: &mut [MetadataNode], index: &FieldIndex<'_>) {
    nodes.sort_by(|a, b| {
        let field_a = index.get(&a.extra.field_name);
        let field_b = index.get(&b.extra.field_name);

        compare_nullable(
            field_a.and_then(|f| f.order),
            field_b.and_then(|f| f.order),
        )
        .then_with(|| {
            compare_nullable(
                field_a.and_then(|f| f.extra.absolute_order),
                field_b.and_then(|f| f.extra.absolute_order),
            )
        })
    });
}

fn decorate(
    node: &PathTrieNode,
    field_name: String,
    index: &FieldIndex<'_>,
    depth: usize,
    max_depth: usize,
) -> ModelResult<MetadataNode> {
    if depth == 0 {
        return Err(ModelError::potential_loop(LoopStage::Metadata, max_depth));
    }

    let mut children = node
        .children
        .iter()
        .map(|child| {
            let child_name = format!("{field_name}.{}", child.name);
            decorate(child, child_name, index, depth - 1, max_depth)
        })
        .collect::<ModelResult<Vec<_>>>()?;
    sort_siblings(&mut children, index);

    let field = index.get(&field_name);
    let field_type = if node.is_leaf() {
        field.map(|f| f.field_type.clone()).unwrap_or_default()
    } else {
        FieldType::Object
    };

    let all_children_required = !children.is_empty() && children.iter().all(|c| c.is_required);
    let is_required = field.is_some_and(|f| f.is_required) || all_children_required;

    Ok(MetadataNode {
        field_type,
        name: node.name.clone(),
        label: field.and_then(|f| f.label.clone()),
        hint: field.and_then(|f| f.hint.clone()),
        descr: field.and_then(|f| f.descr.clone()),
        min: field.and_then(|f| f.min),
        max: field.and_then(|f| f.max),
        min_length: field.and_then(|f| f.min_length),
        max_length: field.and_then(|f| f.max_length),
        order: field.and_then(|f| f.order),
        options: field.and_then(|f| f.options.clone()),
        is_required,
        extra: MetadataExtra { field_name },
        children,
    })
}

/// Decorate every top-level trie branch that is not a registered helper.
///
/// Top-level nodes use the same sibling order as nested ones.
pub fn build_metadata_model(
    trie: &PathTrie,
    fields: &[Field],
    helper_names: &HashSet<String>,
    max_depth: usize,
) -> ModelResult<Vec<MetadataNode>> {
    let index = FieldIndex::new(fields);

    let mut model = trie
        .branches()
        .iter()
        .filter(|branch| !helper_names.contains(&branch.name))
        .map(|branch| decorate(branch, branch.name.clone(), &index, max_depth, max_depth))
        .collect::<ModelResult<Vec<_>>>()?;
    sort_siblings(&mut model, &index);

    Ok(model)
}
