use std::collections::{BTreeSet, VecDeque};

use super::parse::RawNode;

#[derive(Clone, Debug, Default)]
pub struct NodeData {
    pub name: String,
    pub size: Option<f64>,
    pub author_count: Option<u32>,
    pub fraction_old: Option<f64>,
    pub authors: Option<String>,
}

impl NodeData {
    pub fn author_list(&self) -> Vec<&str> {
        self.authors
            .as_deref()
            .map(|authors| {
                authors
                    .split(',')
                    .map(str::trim)
                    .filter(|author| !author.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// One node of the packed hierarchy. Geometry is in layout (world) units.
#[derive(Clone, Debug)]
pub struct TreeNode {
    pub data: NodeData,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub depth: usize,
    pub value: f64,
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena of nodes in breadth-first order; index 0 is always the root and every
/// child sits at a higher index than its parent.
#[derive(Clone, Debug)]
pub struct Hierarchy {
    nodes: Vec<TreeNode>,
}

impl Hierarchy {
    pub const ROOT: usize = 0;

    pub(super) fn from_raw(raw: RawNode) -> Self {
        let mut nodes: Vec<TreeNode> = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back((raw, None::<usize>, 0usize));

        while let Some((raw, parent, depth)) = queue.pop_front() {
            let index = nodes.len();
            let has_children = raw.has_children();
            let RawNode {
                name,
                size,
                author_count,
                fraction_of_lines_older_6_months,
                authors,
                children,
            } = raw;

            nodes.push(TreeNode {
                data: NodeData {
                    name,
                    size,
                    author_count,
                    fraction_old: fraction_of_lines_older_6_months,
                    authors,
                },
                parent,
                children: Vec::new(),
                depth,
                value: 0.0,
                x: 0.0,
                y: 0.0,
                r: 0.0,
            });

            if let Some(parent) = parent {
                nodes[parent].children.push(index);
            }

            if has_children {
                for child in children.into_iter().flatten() {
                    queue.push_back((child, Some(index), depth + 1));
                }
            }
        }

        let mut hierarchy = Self { nodes };
        hierarchy.sum_values();
        hierarchy
    }

    fn sum_values(&mut self) {
        for index in (0..self.nodes.len()).rev() {
            let value = if self.nodes[index].is_leaf() {
                self.nodes[index]
                    .data
                    .size
                    .filter(|size| size.is_finite())
                    .unwrap_or(0.0)
                    .max(0.0)
            } else {
                self.nodes[index]
                    .children
                    .iter()
                    .map(|&child| self.nodes[child].value)
                    .sum()
            };
            self.nodes[index].value = value;
        }
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub(super) fn nodes_mut(&mut self) -> &mut [TreeNode] {
        &mut self.nodes
    }

    pub fn node(&self, index: usize) -> &TreeNode {
        &self.nodes[index]
    }

    pub fn root(&self) -> &TreeNode {
        &self.nodes[Self::ROOT]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn parent_of(&self, index: usize) -> Option<usize> {
        self.nodes.get(index).and_then(|node| node.parent)
    }

    /// Indices from the root down to `index`, inclusive.
    pub fn ancestry(&self, index: usize) -> Vec<usize> {
        let mut path = vec![index];
        let mut cursor = index;
        while let Some(parent) = self.parent_of(cursor) {
            path.push(parent);
            cursor = parent;
        }
        path.reverse();
        path
    }

    pub fn path_of(&self, index: usize) -> String {
        self.ancestry(index)
            .into_iter()
            .map(|node| self.nodes[node].data.name.as_str())
            .collect::<Vec<_>>()
            .join("/")
    }

    pub fn descendants(&self, index: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack = vec![index];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.nodes[current].children.iter().rev().copied());
        }
        out
    }

    pub fn is_within(&self, index: usize, ancestor: usize) -> bool {
        let mut cursor = Some(index);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent_of(current);
        }
        false
    }

    pub fn subtree_stats(&self, index: usize) -> SubtreeStats {
        let mut stats = SubtreeStats {
            lines: self.nodes[index].value,
            ..SubtreeStats::default()
        };
        let mut authors = BTreeSet::new();

        for node in self.descendants(index) {
            let node = &self.nodes[node];
            if node.is_leaf() {
                stats.files += 1;
                authors.extend(node.data.author_list());
            } else {
                stats.directories += 1;
            }
        }

        stats.distinct_authors = authors.len();
        stats
    }

    pub fn max_depth(&self) -> usize {
        self.nodes.last().map(|node| node.depth).unwrap_or(0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SubtreeStats {
    pub lines: f64,
    pub files: usize,
    pub directories: usize,
    pub distinct_authors: usize,
}
