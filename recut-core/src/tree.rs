//! The hierarchy tree of refinement decisions.
//!
//! Nodes are arena-allocated and addressed by integer [`NodeId`]s:
//! children are index lists and the parent is an optional index, so
//! there are no ownership cycles to manage. The tree is append-only and
//! children are always created after their parent, which the traversal
//! helpers rely on.

use serde::{Deserialize, Serialize};

use crate::cluster::ClusterIndex;

/// Arena index of a [`TreeNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the raw arena index.
    #[must_use]
    #[rustfmt::skip]
    pub fn index(self) -> usize { self.0 }
}

/// One decision point in the refinement history.
///
/// The root stands for the host graph, its children for the initial
/// clusters; deeper nodes record prunes (`δ` children), splits (`a`/`b`
/// children plus one node per reclustered subcluster) and terminal
/// decisions. `extant` marks accepted output clusters.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    label: ClusterIndex,
    graph_index: ClusterIndex,
    num_nodes: usize,
    cut_size: Option<usize>,
    validity_threshold: Option<f64>,
    extant: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl TreeNode {
    fn new(index: ClusterIndex, num_nodes: usize, parent: Option<NodeId>) -> Self {
        Self {
            label: index.clone(),
            graph_index: index,
            num_nodes,
            cut_size: None,
            validity_threshold: None,
            extant: false,
            parent,
            children: Vec::new(),
        }
    }

    /// Returns the display label (always equal to the cluster index).
    #[must_use]
    #[rustfmt::skip]
    pub fn label(&self) -> &ClusterIndex { &self.label }

    /// Returns the cluster index this node stands for.
    #[must_use]
    #[rustfmt::skip]
    pub fn graph_index(&self) -> &ClusterIndex { &self.graph_index }

    /// Returns the cluster's node count when this node was created.
    #[must_use]
    #[rustfmt::skip]
    pub fn num_nodes(&self) -> usize { self.num_nodes }

    /// Returns the recorded cut size, when one was recorded.
    #[must_use]
    #[rustfmt::skip]
    pub fn cut_size(&self) -> Option<usize> { self.cut_size }

    /// Returns the recorded validity threshold, when one was recorded.
    #[must_use]
    #[rustfmt::skip]
    pub fn validity_threshold(&self) -> Option<f64> { self.validity_threshold }

    /// Returns whether this node is an accepted output cluster.
    #[must_use]
    #[rustfmt::skip]
    pub fn extant(&self) -> bool { self.extant }

    /// Returns the parent node, `None` for the root.
    #[must_use]
    #[rustfmt::skip]
    pub fn parent(&self) -> Option<NodeId> { self.parent }

    /// Returns the children in creation order.
    #[must_use]
    #[rustfmt::skip]
    pub fn children(&self) -> &[NodeId] { &self.children }
}

/// Append-only arena tree recording every refinement decision.
#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyTree {
    nodes: Vec<TreeNode>,
}

impl HierarchyTree {
    /// Creates a tree whose root stands for the host graph.
    #[must_use]
    pub fn new(graph_nodes: usize) -> Self {
        Self {
            nodes: vec![TreeNode::new(ClusterIndex::root(), graph_nodes, None)],
        }
    }

    /// Returns the root id.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Returns the number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns whether the tree holds only a root. Never true: the root
    /// always exists, so this reports a tree without decisions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Appends a child of `parent` for the given cluster.
    pub fn add_child(&mut self, parent: NodeId, index: &ClusterIndex, num_nodes: usize) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes
            .push(TreeNode::new(index.clone(), num_nodes, Some(parent)));
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Returns the node behind `id`.
    #[must_use]
    pub fn get(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    /// Records the cut size decided at `id`.
    pub fn set_cut_size(&mut self, id: NodeId, cut_size: usize) {
        self.nodes[id.0].cut_size = Some(cut_size);
    }

    /// Records the validity threshold evaluated at `id`.
    pub fn set_validity_threshold(&mut self, id: NodeId, threshold: f64) {
        self.nodes[id.0].validity_threshold = Some(threshold);
    }

    /// Marks whether `id` is an accepted output cluster.
    pub fn set_extant(&mut self, id: NodeId, extant: bool) {
        self.nodes[id.0].extant = extant;
    }

    /// Iterates over all nodes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &TreeNode)> {
        self.nodes.iter().enumerate().map(|(at, node)| (NodeId(at), node))
    }

    /// Clones the tree into its nested serialization form.
    ///
    /// Children are always created after their parent, so one descending
    /// pass assembles every subtree without recursion.
    #[must_use]
    pub fn to_data(&self) -> TreeNodeData {
        let mut built: Vec<Option<TreeNodeData>> = vec![None; self.nodes.len()];
        for at in (0..self.nodes.len()).rev() {
            let node = &self.nodes[at];
            let children = node
                .children
                .iter()
                .filter_map(|child| built[child.0].take())
                .collect();
            built[at] = Some(TreeNodeData {
                label: node.label.clone(),
                graph_index: node.graph_index.clone(),
                num_nodes: node.num_nodes,
                cut_size: node.cut_size,
                validity_threshold: node.validity_threshold,
                extant: node.extant,
                children,
            });
        }
        built[0]
            .take()
            .expect("root is always populated by the preceding pass")
    }

    /// Rebuilds an arena tree from its nested serialization form.
    #[must_use]
    pub fn from_data(root: &TreeNodeData) -> Self {
        let mut tree = Self {
            nodes: vec![root.to_arena_node(None)],
        };
        let mut pending = vec![(NodeId(0), root)];
        while let Some((parent, data)) = pending.pop() {
            for child in &data.children {
                let id = NodeId(tree.nodes.len());
                tree.nodes.push(child.to_arena_node(Some(parent)));
                tree.nodes[parent.0].children.push(id);
                pending.push((id, child));
            }
        }
        tree
    }
}

/// Nested, serde-friendly form of the hierarchy tree.
///
/// This is the shape written to the `.tree.json` output file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNodeData {
    /// Display label (equal to the cluster index).
    pub label: ClusterIndex,
    /// The cluster index this node stands for.
    pub graph_index: ClusterIndex,
    /// The cluster's node count when the node was created.
    pub num_nodes: usize,
    /// The cut size decided at this node, if any.
    pub cut_size: Option<usize>,
    /// The validity threshold evaluated at this node, if any.
    pub validity_threshold: Option<f64>,
    /// Whether this node is an accepted output cluster.
    pub extant: bool,
    /// Child decisions in creation order.
    pub children: Vec<TreeNodeData>,
}

impl TreeNodeData {
    fn to_arena_node(&self, parent: Option<NodeId>) -> TreeNode {
        TreeNode {
            label: self.label.clone(),
            graph_index: self.graph_index.clone(),
            num_nodes: self.num_nodes,
            cut_size: self.cut_size,
            validity_threshold: self.validity_threshold,
            extant: self.extant,
            parent,
            children: Vec::new(),
        }
    }
}
