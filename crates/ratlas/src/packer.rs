//! Rectangle Packing
//!
//! Binary-tree guillotine packer. Every placement splits its node into a
//! `right` strip (same row, remaining width) and a `down` strip (full width,
//! remaining height). The L-shaped leftover is never merged back, trading
//! fill ratio for a simple, fast search.
//!
//! Nodes live in an arena owned by one `Packer`; the whole tree is dropped
//! with it once a sheet is done.

/// Handle to a node inside a packer's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct NodeId(pub u32);

/// Top-left corner of a placed rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: u32,
    pub y: u32,
}

/// Packing tree node
#[derive(Debug, Clone, Copy)]
pub struct PackingNode {
    /// Occupied by a rectangle (and split)
    pub used: bool,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    /// Free strip to the right of the placed rectangle
    pub right: Option<NodeId>,
    /// Free strip below the placed rectangle
    pub down: Option<NodeId>,
}

impl PackingNode {
    fn free(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { used: false, x, y, w, h, right: None, down: None }
    }

    fn can_fit(&self, w: u32, h: u32) -> bool {
        w <= self.w && h <= self.h
    }
}

/// Packing tree for a single sheet
#[derive(Debug)]
pub struct Packer {
    nodes: Vec<PackingNode>,
}

impl Packer {
    /// Root of every tree
    pub const ROOT: NodeId = NodeId(0);

    /// Create a tree covering a `width` x `height` sheet
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            nodes: vec![PackingNode::free(0, 0, width, height)],
        }
    }

    /// Look up a node
    pub fn node(&self, id: NodeId) -> &PackingNode {
        &self.nodes[id.0 as usize]
    }

    /// Number of nodes in the arena
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Only the root exists
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Find a free node under `id` that fits `w` x `h`, right before down
    pub fn find_node(&self, id: NodeId, w: u32, h: u32) -> Option<NodeId> {
        let node = self.node(id);
        if node.used {
            node.right
                .and_then(|right| self.find_node(right, w, h))
                .or_else(|| node.down.and_then(|down| self.find_node(down, w, h)))
        } else if node.can_fit(w, h) {
            Some(id)
        } else {
            None
        }
    }

    /// Occupy the top-left `w` x `h` of node `id` and split off the rest.
    ///
    /// `None` if the node is already used or too small; the tree is unchanged.
    pub fn split_node(&mut self, id: NodeId, w: u32, h: u32) -> Option<Position> {
        let node = *self.node(id);
        if node.used || !node.can_fit(w, h) {
            return None;
        }

        let down = self.alloc(PackingNode::free(node.x, node.y + h, node.w, node.h - h));
        let right = self.alloc(PackingNode::free(node.x + w, node.y, node.w - w, h));

        let slot = &mut self.nodes[id.0 as usize];
        slot.used = true;
        slot.down = Some(down);
        slot.right = Some(right);

        Some(Position { x: node.x, y: node.y })
    }

    /// Place one rectangle, `None` if no free node fits it
    pub fn insert(&mut self, w: u32, h: u32) -> Option<Position> {
        let id = self.find_node(Self::ROOT, w, h)?;
        self.split_node(id, w, h)
    }

    fn alloc(&mut self, node: PackingNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }
}

/// Pack `rects` (width, height) into one `sheet_width` x `sheet_height`
/// sheet.
///
/// Rectangles are tried tallest first (stable, so equal heights keep their
/// input order). The result is indexed like `rects`; `None` marks a rectangle
/// that did not fit and should be retried on another sheet.
pub fn pack(sheet_width: u32, sheet_height: u32, rects: &[(u32, u32)]) -> Vec<Option<Position>> {
    let mut order: Vec<usize> = (0..rects.len()).collect();
    order.sort_by(|&a, &b| rects[b].1.cmp(&rects[a].1));

    let mut packer = Packer::new(sheet_width, sheet_height);
    let mut placements = vec![None; rects.len()];
    for index in order {
        let (w, h) = rects[index];
        placements[index] = packer.insert(w, h);
    }
    placements
}
