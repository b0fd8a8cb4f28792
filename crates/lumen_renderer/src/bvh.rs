//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! The tree is stored flat: nodes live in one array (root at index 0) and
//! leaves point into a reordered array of sphere indices. Construction is a
//! recursive median split on the longest centroid axis; traversal is
//! iterative with a fixed-size stack.

use crate::{HitRecord, Hittable};
use lumen_core::Sphere;
use lumen_math::{Aabb, Interval, Ray, Vec3};

/// Maximum primitives per leaf node before splitting.
pub const LEAF_MAX_SIZE: usize = 4;

/// Traversal stack capacity. Every split halves its range, so the depth is
/// at most log2 of the sphere count and the stack never holds more than
/// depth + 1 entries.
const STACK_SIZE: usize = 64;

/// BVH node - either an interior node with two children or a leaf with primitives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BvhNode {
    /// Internal node; `left` and `right` index into the node array.
    Interior { bbox: Aabb, left: usize, right: usize },
    /// Leaf node; `start..start + count` indexes the ordered primitive array.
    Leaf { bbox: Aabb, start: usize, count: usize },
}

impl BvhNode {
    #[inline]
    pub fn bbox(&self) -> &Aabb {
        match self {
            BvhNode::Interior { bbox, .. } | BvhNode::Leaf { bbox, .. } => bbox,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, BvhNode::Leaf { .. })
    }
}

/// Shape summary of a built tree, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BvhStats {
    pub primitives: usize,
    pub nodes: usize,
    pub leaves: usize,
    pub depth: usize,
}

/// Per-primitive data cached for the duration of a build.
struct BuildPrimitive {
    bbox: Aabb,
    centroid: Vec3,
}

/// Flat BVH over a sphere list.
///
/// The tree is derived from sphere geometry only. It must be rebuilt when any
/// center or radius changes; material edits leave it valid.
#[derive(Debug, Clone, Default)]
pub struct Bvh {
    nodes: Vec<BvhNode>,
    indices: Vec<usize>,
    primitive_count: usize,
}

impl Bvh {
    /// Build a BVH over `spheres`. An empty list gives a tree with no nodes.
    pub fn build(spheres: &[Sphere]) -> Self {
        let n = spheres.len();
        let mut bvh = Bvh {
            nodes: Vec::with_capacity(2 * n.div_ceil(LEAF_MAX_SIZE)),
            indices: Vec::with_capacity(n),
            primitive_count: n,
        };
        if n == 0 {
            return bvh;
        }

        let primitives: Vec<BuildPrimitive> = spheres
            .iter()
            .map(|sphere| {
                let bbox = sphere.bounding_box();
                BuildPrimitive {
                    bbox,
                    centroid: bbox.centroid(),
                }
            })
            .collect();

        let mut work: Vec<usize> = (0..n).collect();
        bvh.build_recursive(&primitives, &mut work);
        bvh
    }

    /// Recursive construction over one range of the working index array.
    ///
    /// Returns the index of the node created for the range. Interior nodes
    /// are pushed before their children so the root ends up at index 0.
    fn build_recursive(&mut self, primitives: &[BuildPrimitive], work: &mut [usize]) -> usize {
        let count = work.len();

        let mut bounds = Aabb::EMPTY;
        let mut centroid_bounds = Aabb::EMPTY;
        for &i in work.iter() {
            bounds.grow(&primitives[i].bbox);
            centroid_bounds.grow_point(primitives[i].centroid);
        }

        let node_index = self.nodes.len();

        // Create leaf for small sets
        if count <= LEAF_MAX_SIZE {
            let start = self.indices.len();
            self.indices.extend_from_slice(work);
            self.nodes.push(BvhNode::Leaf {
                bbox: bounds,
                start,
                count,
            });
            return node_index;
        }

        let axis = centroid_bounds.longest_axis();
        let mid = count / 2;

        if centroid_bounds.extent()[axis] > 0.0 {
            // Median split: only the middle element needs to land in place
            work.select_nth_unstable_by(mid, |&a, &b| {
                primitives[a].centroid[axis].total_cmp(&primitives[b].centroid[axis])
            });
        } else {
            // All centroids coincide; any ordering splits equally well
            work.sort_unstable();
        }

        // Placeholder until the children are known
        self.nodes.push(BvhNode::Leaf {
            bbox: bounds,
            start: 0,
            count: 0,
        });

        let (left_work, right_work) = work.split_at_mut(mid);
        let left = self.build_recursive(primitives, left_work);
        let right = self.build_recursive(primitives, right_work);

        self.nodes[node_index] = BvhNode::Interior {
            bbox: bounds,
            left,
            right,
        };
        node_index
    }

    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    /// Sphere indices in leaf order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Number of spheres the tree was built from.
    pub fn primitive_count(&self) -> usize {
        self.primitive_count
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Bounds of the whole tree.
    pub fn bounding_box(&self) -> Aabb {
        self.nodes.first().map_or(Aabb::EMPTY, |root| *root.bbox())
    }

    /// Nearest sphere hit within `ray_t`.
    pub fn hit(&self, spheres: &[Sphere], ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        self.traverse(spheres, ray, ray_t, false)
    }

    /// True if any sphere is hit within `ray_t`. Stops at the first hit.
    pub fn occluded(&self, spheres: &[Sphere], ray: &Ray, ray_t: Interval) -> bool {
        self.traverse(spheres, ray, ray_t, true).is_some()
    }

    /// Shared traversal for nearest-hit and any-hit queries.
    ///
    /// `closest` starts at `ray_t.max` and shrinks with every accepted hit, so
    /// nodes entirely beyond the best hit so far are never opened.
    fn traverse(
        &self,
        spheres: &[Sphere],
        ray: &Ray,
        ray_t: Interval,
        any_hit: bool,
    ) -> Option<HitRecord> {
        if self.nodes.is_empty() {
            return None;
        }
        debug_assert_eq!(
            spheres.len(),
            self.primitive_count,
            "BVH traversed with a sphere list it was not built from"
        );

        let mut closest = ray_t.max;
        let mut best = None;

        let mut stack = [0usize; STACK_SIZE];
        let mut sp = 1;

        while sp > 0 {
            sp -= 1;
            let node = &self.nodes[stack[sp]];

            if !node.bbox().hit(ray, ray_t.with_max(closest)) {
                continue;
            }

            match *node {
                BvhNode::Leaf { start, count, .. } => {
                    for &i in &self.indices[start..start + count] {
                        if let Some(rec) = spheres[i].hit(ray, ray_t.with_max(closest)) {
                            closest = rec.t;
                            best = Some(rec);
                            if any_hit {
                                return best;
                            }
                        }
                    }
                }
                BvhNode::Interior { left, right, .. } => {
                    // Left is popped first
                    stack[sp] = right;
                    stack[sp + 1] = left;
                    sp += 2;
                }
            }
        }

        best
    }

    /// Node, leaf and depth counts of the tree.
    pub fn stats(&self) -> BvhStats {
        let mut stats = BvhStats {
            primitives: self.primitive_count,
            nodes: self.nodes.len(),
            ..Default::default()
        };
        if self.nodes.is_empty() {
            return stats;
        }

        let mut pending = vec![(0usize, 1usize)];
        while let Some((index, depth)) = pending.pop() {
            stats.depth = stats.depth.max(depth);
            match self.nodes[index] {
                BvhNode::Leaf { .. } => stats.leaves += 1,
                BvhNode::Interior { left, right, .. } => {
                    pending.push((left, depth + 1));
                    pending.push((right, depth + 1));
                }
            }
        }
        stats
    }
}
