/// Union-find over dense node indices.
///
/// Union by rank with path halving; both operations run in amortized
/// near-constant time.
#[derive(Debug, Clone, Default)]
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    /// Creates an empty set with room for `capacity` nodes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            parent: Vec::with_capacity(capacity),
            rank: Vec::with_capacity(capacity),
        }
    }

    /// Adds a singleton node and returns its index.
    pub fn push(&mut self) -> usize {
        let index = self.parent.len();
        self.parent.push(index);
        self.rank.push(0);
        index
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Returns true if no nodes have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Returns the representative of `x`'s set.
    ///
    /// # Panics
    /// Panics if `x` was never pushed.
    pub fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Merges the sets of `a` and `b`. Returns false if they were already one set.
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
                self.rank[ra] = self.rank[ra].saturating_add(1);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singletons_are_disjoint() {
        let mut set = DisjointSet::with_capacity(3);
        let a = set.push();
        let b = set.push();
        assert_ne!(set.find(a), set.find(b));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn union_is_transitive() {
        let mut set = DisjointSet::default();
        let nodes: Vec<usize> = (0..5).map(|_| set.push()).collect();
        assert!(set.union(nodes[0], nodes[1]));
        assert!(set.union(nodes[3], nodes[1]));
        assert!(!set.union(nodes[0], nodes[3]));
        assert_eq!(set.find(nodes[0]), set.find(nodes[3]));
        assert_ne!(set.find(nodes[0]), set.find(nodes[4]));
    }

    #[test]
    fn self_union_is_noop() {
        let mut set = DisjointSet::default();
        let a = set.push();
        assert!(!set.union(a, a));
        assert_eq!(set.find(a), a);
    }
}
