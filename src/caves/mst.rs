//! Minimum spanning tree over room connections
//!
//! Kruskal's algorithm with a union-find forest (path compression, union by
//! rank). Edge weights are small non-negative integers, so edges are bucket
//! sorted; each bucket keeps enumeration order, which makes tie-breaking
//! deterministic for a given seed.

use crate::caves::connections::RoomConnection;

/// Disjoint-set forest over `0..n`.
#[derive(Clone, Debug)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
    components: usize,
}

impl UnionFind {
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
            components: n,
        }
    }

    /// Representative of `x`'s set, compressing the path on the way.
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    /// Merge the sets of `a` and `b`. Returns false if they were already joined.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        self.components -= 1;
        true
    }

    pub fn connected(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }

    /// Number of disjoint sets remaining.
    pub fn components(&self) -> usize {
        self.components
    }
}

/// Select a minimal set of connections joining all `room_count` rooms.
///
/// Returns `room_count - 1` edges when the connections span every room, and
/// nothing for zero or one room.
pub fn minimum_spanning_tree(room_count: usize, connections: &[RoomConnection]) -> Vec<RoomConnection> {
    if room_count <= 1 {
        return Vec::new();
    }

    let max_distance = connections.iter().map(|c| c.distance).max().unwrap_or(0) as usize;
    let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); max_distance + 1];
    for (idx, conn) in connections.iter().enumerate() {
        buckets[conn.distance as usize].push(idx);
    }

    let mut forest = UnionFind::new(room_count);
    let mut accepted = Vec::with_capacity(room_count - 1);

    'outer: for bucket in &buckets {
        for &idx in bucket {
            let conn = connections[idx];
            if forest.union(conn.room_a, conn.room_b) {
                accepted.push(conn);
                if accepted.len() == room_count - 1 {
                    break 'outer;
                }
            }
        }
    }

    accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caves::connections::room_pairs;
    use crate::tilemap::Coord;

    fn edge(room_a: usize, room_b: usize, distance: u32) -> RoomConnection {
        RoomConnection {
            distance,
            tile_a: Coord::default(),
            tile_b: Coord::default(),
            room_a,
            room_b,
        }
    }

    #[test]
    fn test_union_find_basics() {
        let mut uf = UnionFind::new(5);
        assert_eq!(uf.components(), 5);
        assert!(uf.union(0, 1));
        assert!(uf.union(3, 4));
        assert!(!uf.union(1, 0));
        assert!(uf.connected(0, 1));
        assert!(!uf.connected(1, 3));
        assert!(uf.union(1, 4));
        assert!(uf.connected(0, 3));
        assert_eq!(uf.components(), 2);
    }

    #[test]
    fn test_picks_cheapest_edges() {
        let edges = vec![edge(0, 1, 5), edge(0, 2, 1), edge(1, 2, 2)];
        let tree = minimum_spanning_tree(3, &edges);
        let mut picked: Vec<_> = tree.iter().map(|c| (c.room_a, c.room_b)).collect();
        picked.sort();
        assert_eq!(picked, vec![(0, 2), (1, 2)]);
    }

    #[test]
    fn test_edge_count_for_complete_graphs() {
        for n in 0..12usize {
            let edges: Vec<_> = room_pairs(n)
                .into_iter()
                .map(|(a, b)| edge(a, b, ((a * 7 + b * 3) % 5) as u32))
                .collect();
            let tree = minimum_spanning_tree(n, &edges);
            assert_eq!(tree.len(), n.saturating_sub(1), "rooms: {}", n);

            let mut uf = UnionFind::new(n);
            for conn in &tree {
                assert!(uf.union(conn.room_a, conn.room_b), "tree contains a cycle");
            }
            assert_eq!(uf.components(), n.min(1));
        }
    }

    #[test]
    fn test_ties_follow_enumeration_order() {
        // All weights equal: the first spanning edges in discovery order win.
        let edges: Vec<_> = room_pairs(4).into_iter().map(|(a, b)| edge(a, b, 3)).collect();
        let tree = minimum_spanning_tree(4, &edges);
        let picked: Vec<_> = tree.iter().map(|c| (c.room_a, c.room_b)).collect();
        assert_eq!(picked, vec![(0, 1), (0, 2), (0, 3)]);
    }

    #[test]
    fn test_total_weight_is_minimal() {
        // Brute force over all 3-edge subsets of K4.
        let weights = [4u32, 1, 3, 2, 5, 2];
        let edges: Vec<_> = room_pairs(4)
            .into_iter()
            .zip(weights)
            .map(|((a, b), w)| edge(a, b, w))
            .collect();
        let tree = minimum_spanning_tree(4, &edges);
        let total: u32 = tree.iter().map(|c| c.distance).sum();

        let mut best = u32::MAX;
        for i in 0..edges.len() {
            for j in (i + 1)..edges.len() {
                for k in (j + 1)..edges.len() {
                    let mut uf = UnionFind::new(4);
                    let subset = [edges[i], edges[j], edges[k]];
                    if subset.iter().all(|c| uf.union(c.room_a, c.room_b)) {
                        best = best.min(subset.iter().map(|c| c.distance).sum());
                    }
                }
            }
        }
        assert_eq!(total, best);
    }
}
