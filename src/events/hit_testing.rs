//! Hit testing of screen points against the panel tree
//!
//! A hit test walks the visible part of the tree below the root panel and
//! splits the panels into those whose border box contains the point (hits)
//! and those that do not (misses). Hits are ordered front to back: higher
//! absolute z first, and among equal z the panel drawn later (a child after
//! its parent, a later sibling after an earlier one) first.

use std::cmp::Ordering;
use std::fmt;
use std::time::Instant;

use crate::layout::Point;
use crate::panel::{PanelId, PanelTree};

/// Outcome of one hit test
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HitResult {
    /// Visible and enabled panels containing the point, frontmost first
    pub hits: Vec<PanelId>,
    /// Visible panels not hit, in tree order; disabled panels always land here
    pub misses: Vec<PanelId>,
}

impl HitResult {
    /// The frontmost hit panel
    pub fn top(&self) -> Option<PanelId> {
        self.hits.first().copied()
    }
}

/// Hit testing engine for determining event targets
#[derive(Debug, Default)]
pub struct HitTester {
    /// Performance statistics
    pub stats: HitTestStats,
}

/// Performance statistics for hit testing
#[derive(Debug, Default, Clone)]
pub struct HitTestStats {
    /// Number of hit tests performed
    pub hit_tests: u64,
    /// Time spent in hit testing (microseconds)
    pub hit_test_time_us: u64,
    /// Number of nodes tested in the last hit test
    pub nodes_tested: u32,
    /// Number of hits found in the last hit test
    pub hits_found: u32,
}

struct Candidate {
    id: PanelId,
    z: f32,
    order: usize,
}

impl HitTester {
    /// Create a new hit tester
    pub fn new() -> Self {
        Self::default()
    }

    /// Test `point` against every panel below `root`
    ///
    /// The root panel itself stands for the window and is never a candidate.
    pub fn hit_test(&mut self, tree: &PanelTree, root: PanelId, point: Point) -> HitResult {
        let start_time = Instant::now();
        self.stats.nodes_tested = 0;

        let mut candidates = Vec::new();
        let mut misses = Vec::new();
        let base_z = tree.absolute_z(root);
        for &child in tree.children(root) {
            self.visit(tree, child, base_z, point, &mut candidates, &mut misses);
        }

        candidates.sort_by(|a, b| match b.z.total_cmp(&a.z) {
            Ordering::Equal => b.order.cmp(&a.order),
            other => other,
        });
        let hits: Vec<PanelId> = candidates.into_iter().map(|c| c.id).collect();

        self.stats.hit_tests += 1;
        self.stats.hit_test_time_us += start_time.elapsed().as_micros() as u64;
        self.stats.hits_found = hits.len() as u32;

        HitResult { hits, misses }
    }

    /// Frontmost panel containing `point`, if any
    pub fn hit_test_top(&mut self, tree: &PanelTree, root: PanelId, point: Point) -> Option<PanelId> {
        self.hit_test(tree, root, point).top()
    }

    fn visit(
        &mut self,
        tree: &PanelTree,
        id: PanelId,
        parent_z: f32,
        point: Point,
        candidates: &mut Vec<Candidate>,
        misses: &mut Vec<PanelId>,
    ) {
        let Some(node) = tree.get(id) else {
            return;
        };
        // Invisible panels hide their whole subtree
        if !node.visible() {
            return;
        }
        self.stats.nodes_tested += 1;

        let z = parent_z + node.z();
        if node.enabled() && tree.inside_borders(id, point) {
            candidates.push(Candidate {
                id,
                z,
                order: self.stats.nodes_tested as usize,
            });
        } else {
            misses.push(id);
        }

        for &child in node.children() {
            self.visit(tree, child, z, point, candidates, misses);
        }
    }

    /// Reset hit testing statistics
    pub fn reset_stats(&mut self) {
        self.stats = HitTestStats::default();
    }

    /// Get hit testing statistics
    pub fn get_stats(&self) -> &HitTestStats {
        &self.stats
    }
}

impl fmt::Display for HitTestStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Hit Test Stats: {} tests, {}us total time, {} nodes tested, {} hits found",
            self.hit_tests, self.hit_test_time_us, self.nodes_tested, self.hits_found
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// root (400x300)
    /// ├── left (0,0 200x150)
    /// │   └── nested (50,50 100x50)
    /// └── right (200,150 200x150)
    fn create_test_tree() -> (PanelTree, [PanelId; 4]) {
        let mut tree = PanelTree::new();
        let root = tree.create(400.0, 300.0);
        tree.set_root(root).unwrap();

        let left = tree.create(200.0, 150.0);
        let nested = tree.create(100.0, 50.0);
        tree.get_mut(nested).unwrap().set_position(50.0, 50.0);
        let right = tree.create(200.0, 150.0);
        tree.get_mut(right).unwrap().set_position(200.0, 150.0);

        tree.add_child(root, left).unwrap();
        tree.add_child(left, nested).unwrap();
        tree.add_child(root, right).unwrap();
        (tree, [root, left, nested, right])
    }

    #[test]
    fn test_nested_hit_test() {
        let mut hit_tester = HitTester::new();
        let (tree, [root, left, nested, right]) = create_test_tree();

        let result = hit_tester.hit_test(&tree, root, Point::new(100.0, 75.0));
        assert_eq!(result.hits, vec![nested, left]);
        assert_eq!(result.misses, vec![right]);
        assert_eq!(result.top(), Some(nested));
    }

    #[test]
    fn test_hit_test_miss() {
        let mut hit_tester = HitTester::new();
        let (tree, [root, left, nested, right]) = create_test_tree();

        let result = hit_tester.hit_test(&tree, root, Point::new(500.0, 500.0));
        assert!(result.hits.is_empty());
        assert_eq!(result.misses, vec![left, nested, right]);
        assert_eq!(hit_tester.hit_test_top(&tree, root, Point::new(500.0, 500.0)), None);
    }

    #[test]
    fn test_higher_z_wins_over_tree_order() {
        let mut hit_tester = HitTester::new();
        let (mut tree, [root, left, _nested, _right]) = create_test_tree();

        // Overlaps `left`, added after it but pushed behind
        let behind = tree.create(200.0, 150.0);
        tree.get_mut(behind).unwrap().set_z(-1.0);
        tree.add_child(root, behind).unwrap();
        assert_eq!(hit_tester.hit_test_top(&tree, root, Point::new(10.0, 10.0)), Some(left));

        tree.get_mut(behind).unwrap().set_z(1.0);
        assert_eq!(hit_tester.hit_test_top(&tree, root, Point::new(10.0, 10.0)), Some(behind));
    }

    #[test]
    fn test_invisible_and_disabled_panels() {
        let mut hit_tester = HitTester::new();
        let (mut tree, [root, left, nested, right]) = create_test_tree();

        tree.get_mut(nested).unwrap().enabled = false;
        let result = hit_tester.hit_test(&tree, root, Point::new(100.0, 75.0));
        assert_eq!(result.hits, vec![left]);
        assert!(result.misses.contains(&nested));

        tree.get_mut(left).unwrap().set_visible(false);
        let result = hit_tester.hit_test(&tree, root, Point::new(100.0, 75.0));
        assert!(result.hits.is_empty());
        // Hidden subtrees are not even reported as misses
        assert_eq!(result.misses, vec![right]);
    }

    #[test]
    fn test_hit_test_statistics() {
        let mut hit_tester = HitTester::new();
        let (tree, [root, ..]) = create_test_tree();

        hit_tester.hit_test(&tree, root, Point::new(100.0, 75.0));

        assert_eq!(hit_tester.stats.hit_tests, 1);
        assert_eq!(hit_tester.stats.nodes_tested, 3);
        assert_eq!(hit_tester.stats.hits_found, 2);

        let stats_str = format!("{}", hit_tester.stats);
        assert!(stats_str.contains("1 tests"));
        assert!(stats_str.contains("2 hits found"));

        hit_tester.reset_stats();
        assert_eq!(hit_tester.get_stats().hit_tests, 0);
    }
}
