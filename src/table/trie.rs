//! Binary radix trie for IPv4 longest-prefix matching.

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use super::prefix::{address_bit, Ipv4Prefix, ADDRESS_BITS};

/// A stored route: a prefix and the opaque next-hop it forwards to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub prefix: Ipv4Prefix,
    pub next_hop: String,
}

#[derive(Debug, Default)]
struct TrieNode {
    children: [Option<Box<TrieNode>>; 2],
    route: Option<Route>,
}

impl TrieNode {
    fn child(&self, bit: usize) -> Option<&TrieNode> {
        self.children[bit].as_deref()
    }

    fn child_count(&self) -> usize {
        self.children.iter().filter(|c| c.is_some()).count()
    }

    fn is_vacant(&self) -> bool {
        self.route.is_none() && self.child_count() == 0
    }

    fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .flatten()
            .map(|c| c.node_count())
            .sum::<usize>()
    }

    fn collect_routes<'a>(&'a self, out: &mut Vec<&'a Route>) {
        if let Some(route) = &self.route {
            out.push(route);
        }
        for child in self.children.iter().flatten() {
            child.collect_routes(out);
        }
    }
}

/// Binary trie keyed by prefix bits, one level per address bit.
///
/// The root always exists and stands for the zero-length prefix; every other
/// node either carries a route or has at least one child.
#[derive(Debug, Default)]
pub struct RouteTrie {
    root: TrieNode,
    routes: usize,
}

impl RouteTrie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or update the route for `prefix`.
    ///
    /// Returns the route previously stored at that prefix, if any.
    pub fn insert(&mut self, prefix: Ipv4Prefix, next_hop: impl Into<String>) -> Option<Route> {
        let mut current = &mut self.root;
        for depth in 0..prefix.len() {
            current = current.children[prefix.bit(depth)].get_or_insert_with(Box::default);
        }

        let previous = current.route.replace(Route {
            prefix,
            next_hop: next_hop.into(),
        });
        if previous.is_none() {
            self.routes += 1;
        }
        previous
    }

    /// Longest-prefix match for `addr`.
    pub fn longest_match(&self, addr: Ipv4Addr) -> Option<&Route> {
        let value = u32::from(addr);
        let mut current = &self.root;
        let mut best = current.route.as_ref();

        for depth in 0..ADDRESS_BITS {
            match current.child(address_bit(value, depth)) {
                Some(next) => current = next,
                None => break,
            }
            if let Some(route) = &current.route {
                best = Some(route);
            }
        }
        best
    }

    /// Exact-match read of the route stored at `prefix`.
    pub fn get(&self, prefix: &Ipv4Prefix) -> Option<&Route> {
        self.node(prefix)?.route.as_ref()
    }

    /// Remove the route stored at exactly `prefix`, pruning nodes left empty.
    ///
    /// Returns `None` without touching the trie if the path is missing or ends
    /// at a node without a route.
    pub fn remove(&mut self, prefix: &Ipv4Prefix) -> Option<Route> {
        // Depth of the deepest ancestor that must survive the removal: the
        // root, or any node on the path holding a route or a second child.
        let mut anchor = 0;
        let mut current = &self.root;
        for depth in 0..prefix.len() {
            if current.route.is_some() || current.child_count() > 1 {
                anchor = depth;
            }
            current = current.child(prefix.bit(depth))?;
        }
        current.route.as_ref()?;

        let target = self.node_mut(prefix, prefix.len());
        let removed = target.route.take()?;
        let prune = prefix.len() > 0 && target.is_vacant();
        self.routes -= 1;

        if prune {
            self.node_mut(prefix, anchor).children[prefix.bit(anchor)] = None;
        }
        Some(removed)
    }

    /// All routes, ordered by their canonical text form.
    pub fn routes(&self) -> Vec<&Route> {
        let mut out = Vec::with_capacity(self.routes);
        self.root.collect_routes(&mut out);
        out.sort_by_cached_key(|r| r.prefix.to_string());
        out
    }

    /// Number of stored routes.
    pub fn len(&self) -> usize {
        self.routes
    }

    pub fn is_empty(&self) -> bool {
        self.routes == 0
    }

    /// Number of allocated nodes, root included.
    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    fn node(&self, prefix: &Ipv4Prefix) -> Option<&TrieNode> {
        let mut current = &self.root;
        for depth in 0..prefix.len() {
            current = current.child(prefix.bit(depth))?;
        }
        Some(current)
    }

    // Callers must have confirmed the path exists down to `depth`.
    fn node_mut(&mut self, prefix: &Ipv4Prefix, depth: u8) -> &mut TrieNode {
        let mut current = &mut self.root;
        for d in 0..depth {
            current = current.children[prefix.bit(d)].get_or_insert_with(Box::default);
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> Ipv4Prefix {
        s.parse().unwrap()
    }

    fn ip(s: &str) -> Ipv4Addr {
        s.parse().unwrap()
    }

    fn hop(trie: &RouteTrie, addr: &str) -> Option<String> {
        trie.longest_match(ip(addr)).map(|r| r.next_hop.clone())
    }

    #[test]
    fn test_empty_trie_has_only_root() {
        let trie = RouteTrie::new();
        assert!(trie.is_empty());
        assert_eq!(trie.node_count(), 1);
        assert!(trie.longest_match(ip("1.2.3.4")).is_none());
    }

    #[test]
    fn test_insert_creates_one_node_per_bit() {
        let mut trie = RouteTrie::new();
        trie.insert(p("10.0.0.0/8"), "A");
        assert_eq!(trie.node_count(), 1 + 8);

        // Shares the first 8 levels.
        trie.insert(p("10.1.0.0/16"), "B");
        assert_eq!(trie.node_count(), 1 + 16);
    }

    #[test]
    fn test_longest_prefix_wins() {
        let mut trie = RouteTrie::new();
        trie.insert(p("10.0.0.0/8"), "A");
        trie.insert(p("10.1.0.0/16"), "B");

        let hit = trie.longest_match(ip("10.1.2.3")).unwrap();
        assert_eq!(hit.prefix, p("10.1.0.0/16"));
        assert_eq!(hit.next_hop, "B");
        assert_eq!(hop(&trie, "10.2.2.3").as_deref(), Some("A"));
        assert_eq!(hop(&trie, "11.0.0.1"), None);
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let mut trie = RouteTrie::new();
        trie.insert(p("10.1.0.0/16"), "B");
        trie.insert(p("10.0.0.0/8"), "A");
        assert_eq!(hop(&trie, "10.1.2.3").as_deref(), Some("B"));
        assert_eq!(hop(&trie, "10.200.0.1").as_deref(), Some("A"));
    }

    #[test]
    fn test_default_route_fallback() {
        let mut trie = RouteTrie::new();
        trie.insert(p("0.0.0.0/0"), "G");
        assert_eq!(trie.node_count(), 1);
        assert_eq!(hop(&trie, "8.8.8.8").as_deref(), Some("G"));

        trie.insert(p("8.0.0.0/8"), "L");
        assert_eq!(hop(&trie, "8.8.8.8").as_deref(), Some("L"));
        assert_eq!(hop(&trie, "9.9.9.9").as_deref(), Some("G"));
    }

    #[test]
    fn test_host_route_uses_all_32_bits() {
        let mut trie = RouteTrie::new();
        trie.insert(p("192.168.1.1/32"), "H");
        trie.insert(p("192.168.1.0/24"), "N");
        assert_eq!(hop(&trie, "192.168.1.1").as_deref(), Some("H"));
        assert_eq!(hop(&trie, "192.168.1.2").as_deref(), Some("N"));
    }

    #[test]
    fn test_reinsert_updates_in_place() {
        let mut trie = RouteTrie::new();
        assert!(trie.insert(p("10.0.0.0/8"), "A").is_none());
        let nodes = trie.node_count();

        let previous = trie.insert(p("10.0.0.0/8"), "B").unwrap();
        assert_eq!(previous.next_hop, "A");
        assert_eq!(trie.len(), 1);
        assert_eq!(trie.node_count(), nodes);
        assert_eq!(trie.get(&p("10.0.0.0/8")).unwrap().next_hop, "B");
    }

    #[test]
    fn test_remove_then_lookup_misses() {
        let mut trie = RouteTrie::new();
        trie.insert(p("192.168.0.0/16"), "X");
        let removed = trie.remove(&p("192.168.0.0/16")).unwrap();
        assert_eq!(removed.next_hop, "X");
        assert!(trie.longest_match(ip("192.168.1.1")).is_none());
        assert!(trie.is_empty());
    }

    #[test]
    fn test_remove_prunes_back_to_previous_shape() {
        let mut trie = RouteTrie::new();
        trie.insert(p("10.0.0.0/8"), "A");
        let before = trie.node_count();

        trie.insert(p("10.128.0.0/9"), "B");
        trie.insert(p("10.1.2.0/24"), "C");
        trie.remove(&p("10.1.2.0/24")).unwrap();
        trie.remove(&p("10.128.0.0/9")).unwrap();
        assert_eq!(trie.node_count(), before);

        trie.remove(&p("10.0.0.0/8")).unwrap();
        assert_eq!(trie.node_count(), 1);
    }

    #[test]
    fn test_remove_stops_at_branching_ancestor() {
        let mut trie = RouteTrie::new();
        // Diverge at bit 7: 10.0.0.0 vs 11.0.0.0.
        trie.insert(p("10.0.0.0/16"), "A");
        trie.insert(p("11.0.0.0/16"), "B");
        assert_eq!(trie.node_count(), 1 + 7 + 9 + 9);

        trie.remove(&p("11.0.0.0/16")).unwrap();
        assert_eq!(trie.node_count(), 1 + 16);
        assert_eq!(hop(&trie, "10.0.1.1").as_deref(), Some("A"));
    }

    #[test]
    fn test_remove_keeps_descendants() {
        let mut trie = RouteTrie::new();
        trie.insert(p("10.0.0.0/8"), "A");
        trie.insert(p("10.1.0.0/16"), "B");
        let nodes = trie.node_count();

        trie.remove(&p("10.0.0.0/8")).unwrap();
        assert_eq!(trie.node_count(), nodes);
        assert_eq!(hop(&trie, "10.1.0.1").as_deref(), Some("B"));
        assert_eq!(hop(&trie, "10.2.0.1"), None);
    }

    #[test]
    fn test_remove_default_route_keeps_root() {
        let mut trie = RouteTrie::new();
        trie.insert(p("0.0.0.0/0"), "G");
        assert!(trie.remove(&p("0.0.0.0/0")).is_some());
        assert_eq!(trie.node_count(), 1);
        assert!(trie.remove(&p("0.0.0.0/0")).is_none());
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut trie = RouteTrie::new();
        trie.insert(p("10.1.0.0/16"), "B");
        let nodes = trie.node_count();

        assert!(trie.remove(&p("172.16.0.0/12")).is_none());
        // Branch point on the path to 10.1.0.0/16, never inserted itself.
        assert!(trie.remove(&p("10.0.0.0/8")).is_none());
        // Path runs past the stored route.
        assert!(trie.remove(&p("10.1.1.0/24")).is_none());

        assert_eq!(trie.node_count(), nodes);
        assert_eq!(trie.len(), 1);
    }

    #[test]
    fn test_routes_in_text_order() {
        let mut trie = RouteTrie::new();
        trie.insert(p("2.0.0.0/8"), "C");
        trie.insert(p("10.0.0.0/8"), "B");
        trie.insert(p("1.0.0.0/8"), "A");

        let listed: Vec<String> = trie.routes().iter().map(|r| r.prefix.to_string()).collect();
        assert_eq!(listed, ["1.0.0.0/8", "10.0.0.0/8", "2.0.0.0/8"]);
    }
}
