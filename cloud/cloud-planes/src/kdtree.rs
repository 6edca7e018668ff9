//! Kd-tree over point handles with slab range queries.
//!
//! The tree stores [`PointId`]s and per-node bounding boxes only. Positions
//! are read through the borrowed [`PointCloud`], so the tree is a read-only
//! snapshot: while it is alive the cloud cannot be mutated, and flags changed
//! after it is dropped require a rebuild to be reflected.

use cloud_types::{Aabb, Point3, PointCloud, PointId, Slab};
use smallvec::SmallVec;

/// Default maximum number of points per leaf.
pub const DEFAULT_LEAF_SIZE: usize = 8;

/// Kd-tree node containing either leaf points or two children.
#[derive(Debug)]
enum KdNode {
    /// Leaf node containing point handles.
    Leaf {
        /// Tight bounding box of the leaf's points.
        bbox: Aabb,
        /// Point handles stored in this leaf.
        points: SmallVec<[PointId; DEFAULT_LEAF_SIZE]>,
    },
    /// Internal node with two children.
    Internal {
        /// Bounding box of every point in this subtree.
        bbox: Aabb,
        /// Number of points in this subtree.
        len: usize,
        /// Lower half along the split axis.
        left: Box<Self>,
        /// Upper half along the split axis.
        right: Box<Self>,
    },
}

impl KdNode {
    const fn bbox(&self) -> &Aabb {
        match self {
            Self::Leaf { bbox, .. } | Self::Internal { bbox, .. } => bbox,
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Leaf { points, .. } => points.len(),
            Self::Internal { len, .. } => *len,
        }
    }
}

fn is_finite(position: &Point3<f64>) -> bool {
    position.coords.iter().all(|c| c.is_finite())
}

/// Structure statistics for a [`PointKdTree`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KdTreeStats {
    /// Number of leaf nodes.
    pub leaf_count: usize,
    /// Number of internal nodes.
    pub internal_count: usize,
    /// Depth of the deepest leaf (root is depth 0).
    pub max_depth: usize,
    /// Largest number of points in one leaf.
    pub max_leaf_size: usize,
    /// Sum of points over all leaves.
    pub total_points_in_leaves: usize,
}

/// Balanced kd-tree over a subset of a point cloud.
///
/// Built by recursive median split along the longest axis of each node's
/// bounding box, in `O(n log n)`.
///
/// # Example
///
/// ```
/// use cloud_planes::PointKdTree;
/// use cloud_types::{PointCloud, Slab};
/// use nalgebra::Point3;
///
/// let mut cloud = PointCloud::new();
/// for i in 0..10 {
///     cloud.push_coords(f64::from(i), 0.0, 0.0);
///     cloud.push_coords(f64::from(i), 0.0, 1.0);
/// }
///
/// let tree = PointKdTree::build_active(&cloud);
/// let floor = Slab::from_three_points(
///     &Point3::new(0.0, 0.0, 0.0),
///     &Point3::new(1.0, 0.0, 0.0),
///     &Point3::new(0.0, 1.0, 0.0),
///     0.1,
/// )
/// .unwrap();
///
/// assert_eq!(tree.len(), 20);
/// assert_eq!(tree.range_query(&floor).len(), 10);
/// ```
#[derive(Debug)]
pub struct PointKdTree<'a> {
    cloud: &'a PointCloud,
    root: Option<KdNode>,
    leaf_size: usize,
}

impl<'a> PointKdTree<'a> {
    /// Builds a tree over the given handles with the default leaf size.
    ///
    /// Duplicate handles are indexed once. Handles that do not belong to the
    /// cloud are ignored, and so are points with a NaN or infinite
    /// coordinate, which no slab can contain.
    #[must_use]
    pub fn build(cloud: &'a PointCloud, ids: impl IntoIterator<Item = PointId>) -> Self {
        Self::with_leaf_size(cloud, ids, DEFAULT_LEAF_SIZE)
    }

    /// Builds a tree over every active point of the cloud.
    #[must_use]
    pub fn build_active(cloud: &'a PointCloud) -> Self {
        Self::build(cloud, cloud.active_ids())
    }

    /// Builds a tree with a custom maximum leaf size (at least 1).
    #[must_use]
    pub fn with_leaf_size(
        cloud: &'a PointCloud,
        ids: impl IntoIterator<Item = PointId>,
        leaf_size: usize,
    ) -> Self {
        let leaf_size = leaf_size.max(1);
        let mut ids: Vec<PointId> = ids
            .into_iter()
            .filter(|&id| cloud.get(id).is_some_and(|p| is_finite(&p.position)))
            .collect();
        ids.sort_unstable();
        ids.dedup();

        let root = if ids.is_empty() {
            None
        } else {
            Some(Self::build_recursive(cloud, &mut ids, leaf_size))
        };

        Self {
            cloud,
            root,
            leaf_size,
        }
    }

    fn build_recursive(cloud: &PointCloud, ids: &mut [PointId], leaf_size: usize) -> KdNode {
        let bbox = Aabb::from_points(ids.iter().map(|&id| cloud.position(id)));

        if ids.len() <= leaf_size {
            return KdNode::Leaf {
                bbox,
                points: ids.iter().copied().collect(),
            };
        }

        // Median split along the longest axis
        let axis = bbox.longest_axis();
        let mid = ids.len() / 2;
        ids.select_nth_unstable_by(mid, |&a, &b| {
            cloud.position(a)[axis].total_cmp(&cloud.position(b)[axis])
        });

        let (lower, upper) = ids.split_at_mut(mid);
        let left = Self::build_recursive(cloud, lower, leaf_size);
        let right = Self::build_recursive(cloud, upper, leaf_size);

        KdNode::Internal {
            bbox,
            len: left.len() + right.len(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// The cloud this tree indexes.
    #[must_use]
    pub const fn cloud(&self) -> &'a PointCloud {
        self.cloud
    }

    /// Number of indexed points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.root.as_ref().map_or(0, KdNode::len)
    }

    /// Returns true if no point is indexed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Maximum points per leaf used at build time.
    #[must_use]
    pub const fn leaf_size(&self) -> usize {
        self.leaf_size
    }

    /// Bounding box of all indexed points.
    #[must_use]
    pub fn root_bounds(&self) -> Option<&Aabb> {
        self.root.as_ref().map(KdNode::bbox)
    }

    /// Returns every indexed point within the slab.
    ///
    /// Subtrees whose box misses the slab are pruned; subtrees whose box lies
    /// entirely inside it are emitted without per-point tests. The result is
    /// identical to [`Self::range_query_linear`] up to ordering, and holds no
    /// duplicates.
    #[must_use]
    pub fn range_query(&self, slab: &Slab) -> Vec<PointId> {
        let mut result = Vec::new();
        if let Some(ref root) = self.root {
            self.query_recursive(root, slab, &mut result);
        }
        result
    }

    /// Number of indexed points within the slab.
    #[must_use]
    pub fn range_count(&self, slab: &Slab) -> usize {
        self.root
            .as_ref()
            .map_or(0, |root| self.count_recursive(root, slab))
    }

    fn query_recursive(&self, node: &KdNode, slab: &Slab, result: &mut Vec<PointId>) {
        if !slab.intersects_aabb(node.bbox()) {
            return;
        }
        if slab.contains_aabb(node.bbox()) {
            Self::collect_all(node, result);
            return;
        }
        match node {
            KdNode::Leaf { points, .. } => {
                result.extend(
                    points
                        .iter()
                        .copied()
                        .filter(|&id| slab.contains(self.cloud.position(id))),
                );
            }
            KdNode::Internal { left, right, .. } => {
                self.query_recursive(left, slab, result);
                self.query_recursive(right, slab, result);
            }
        }
    }

    fn count_recursive(&self, node: &KdNode, slab: &Slab) -> usize {
        if !slab.intersects_aabb(node.bbox()) {
            return 0;
        }
        if slab.contains_aabb(node.bbox()) {
            return node.len();
        }
        match node {
            KdNode::Leaf { points, .. } => points
                .iter()
                .filter(|&&id| slab.contains(self.cloud.position(id)))
                .count(),
            KdNode::Internal { left, right, .. } => {
                self.count_recursive(left, slab) + self.count_recursive(right, slab)
            }
        }
    }

    fn collect_all(node: &KdNode, result: &mut Vec<PointId>) {
        match node {
            KdNode::Leaf { points, .. } => result.extend(points.iter().copied()),
            KdNode::Internal { left, right, .. } => {
                Self::collect_all(left, result);
                Self::collect_all(right, result);
            }
        }
    }

    /// Unpruned scan over every indexed point.
    ///
    /// Reference implementation for [`Self::range_query`].
    #[must_use]
    pub fn range_query_linear(&self, slab: &Slab) -> Vec<PointId> {
        let mut all = Vec::with_capacity(self.len());
        if let Some(ref root) = self.root {
            Self::collect_all(root, &mut all);
        }
        all.retain(|&id| slab.contains(self.cloud.position(id)));
        all
    }

    /// Get statistics about the tree structure.
    #[must_use]
    pub fn stats(&self) -> KdTreeStats {
        let mut stats = KdTreeStats::default();
        if let Some(ref root) = self.root {
            Self::collect_stats(root, 0, &mut stats);
        }
        stats
    }

    fn collect_stats(node: &KdNode, depth: usize, stats: &mut KdTreeStats) {
        stats.max_depth = stats.max_depth.max(depth);
        match node {
            KdNode::Leaf { points, .. } => {
                stats.leaf_count += 1;
                stats.total_points_in_leaves += points.len();
                stats.max_leaf_size = stats.max_leaf_size.max(points.len());
            }
            KdNode::Internal { left, right, .. } => {
                stats.internal_count += 1;
                Self::collect_stats(left, depth + 1, stats);
                Self::collect_stats(right, depth + 1, stats);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cloud_types::Plane;
    use nalgebra::{Point3, Vector3};

    fn grid_cloud(n: u32) -> PointCloud {
        let mut cloud = PointCloud::new();
        for i in 0..n {
            for j in 0..n {
                for k in 0..n {
                    cloud.push_coords(f64::from(i), f64::from(j), f64::from(k));
                }
            }
        }
        cloud
    }

    fn z_slab(z: f64, thickness: f64) -> Slab {
        let plane = Plane::new(Point3::new(0.0, 0.0, z), Vector3::z()).unwrap();
        Slab::new(plane, thickness).unwrap()
    }

    fn sorted(mut ids: Vec<PointId>) -> Vec<PointId> {
        ids.sort_unstable();
        ids
    }

    #[test]
    fn test_empty_tree() {
        let cloud = PointCloud::new();
        let tree = PointKdTree::build_active(&cloud);
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert!(tree.root_bounds().is_none());
        assert!(tree.range_query(&z_slab(0.0, 1.0)).is_empty());
        assert_eq!(tree.range_count(&z_slab(0.0, 1.0)), 0);
        assert_eq!(tree.stats(), KdTreeStats::default());
    }

    #[test]
    fn test_every_point_in_one_leaf() {
        let cloud = grid_cloud(6);
        let tree = PointKdTree::with_leaf_size(&cloud, cloud.ids(), 4);
        let stats = tree.stats();

        assert_eq!(tree.len(), 216);
        assert_eq!(stats.total_points_in_leaves, 216);
        assert!(stats.max_leaf_size <= 4);
        assert_eq!(stats.leaf_count, stats.internal_count + 1);

        let everything = z_slab(0.0, 100.0);
        let all = sorted(tree.range_query(&everything));
        assert_eq!(all, cloud.ids().collect::<Vec<_>>());
    }

    #[test]
    fn test_balanced_depth() {
        let cloud = grid_cloud(8);
        let tree = PointKdTree::with_leaf_size(&cloud, cloud.ids(), 1);
        // 512 points split at the median reach single-point leaves at depth 9.
        assert_eq!(tree.stats().max_depth, 9);
    }

    #[test]
    fn test_layer_query_matches_linear() {
        let cloud = grid_cloud(5);
        let tree = PointKdTree::build_active(&cloud);

        for z in 0..5 {
            let slab = z_slab(f64::from(z), 0.5);
            let hits = sorted(tree.range_query(&slab));
            assert_eq!(hits.len(), 25);
            assert_eq!(hits, sorted(tree.range_query_linear(&slab)));
            assert_eq!(tree.range_count(&slab), 25);
        }
    }

    #[test]
    fn test_oblique_query_matches_linear() {
        let cloud = grid_cloud(7);
        let tree = PointKdTree::build_active(&cloud);
        let plane = Plane::new(Point3::new(3.0, 3.0, 3.0), Vector3::new(1.0, 1.0, 1.0)).unwrap();
        let slab = Slab::new(plane, 1.2).unwrap();

        let hits = sorted(tree.range_query(&slab));
        let expected: Vec<PointId> = cloud
            .iter()
            .filter(|(_, p)| slab.contains(&p.position))
            .map(|(id, _)| id)
            .collect();
        assert_eq!(hits, expected);
        assert!(!hits.is_empty());
    }

    #[test]
    fn test_only_indexes_given_ids() {
        let mut cloud = grid_cloud(3);
        for id in cloud.ids().collect::<Vec<_>>() {
            if id.index() % 2 == 0 {
                cloud.set_active(id, false);
            }
        }
        let tree = PointKdTree::build_active(&cloud);
        assert_eq!(tree.len(), 13);

        let hits = tree.range_query(&z_slab(0.0, 100.0));
        assert_eq!(hits.len(), 13);
        assert!(hits.iter().all(|&id| cloud.is_active(id)));
    }

    #[test]
    fn test_duplicate_and_foreign_ids() {
        let cloud = grid_cloud(2);
        let ids = [
            PointId::new(0),
            PointId::new(0),
            PointId::new(3),
            PointId::new(1000),
        ];
        let tree = PointKdTree::build(&cloud, ids);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.range_query(&z_slab(0.0, 100.0)).len(), 2);
    }

    #[test]
    fn test_coincident_points() {
        let mut cloud = PointCloud::new();
        for _ in 0..50 {
            cloud.push_coords(1.0, 1.0, 1.0);
        }
        let tree = PointKdTree::with_leaf_size(&cloud, cloud.ids(), 2);
        assert_eq!(tree.len(), 50);
        assert_eq!(tree.range_query(&z_slab(1.0, 0.0)).len(), 50);
        assert!(tree.range_query(&z_slab(2.0, 0.5)).is_empty());
    }

    #[test]
    fn test_non_finite_points_are_not_indexed() {
        let mut cloud = PointCloud::new();
        for (x, y) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)] {
            cloud.push_coords(x, y, 0.0);
        }
        let nan = cloud.push_coords(f64::NAN, 0.0, 0.0);
        let inf = cloud.push_coords(0.5, f64::INFINITY, 0.0);

        let tree = PointKdTree::build_active(&cloud);
        assert_eq!(tree.len(), 4);
        assert!(tree.root_bounds().unwrap().is_valid());

        let floor = z_slab(0.0, 1.0);
        let hits = sorted(tree.range_query(&floor));
        assert_eq!(hits.len(), 4);
        assert!(!hits.contains(&nan) && !hits.contains(&inf));
        assert_eq!(hits, sorted(tree.range_query_linear(&floor)));
        assert_eq!(tree.range_count(&floor), 4);
        assert!(!floor.contains(cloud.position(nan)));
    }

    #[test]
    fn test_query_without_duplicates() {
        let cloud = grid_cloud(6);
        let tree = PointKdTree::with_leaf_size(&cloud, cloud.ids(), 3);
        let plane = Plane::new(Point3::new(2.5, 2.5, 2.5), Vector3::new(0.3, -1.0, 0.2)).unwrap();
        let hits = tree.range_query(&Slab::new(plane, 2.0).unwrap());
        let mut deduped = hits.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), hits.len());
    }
}
