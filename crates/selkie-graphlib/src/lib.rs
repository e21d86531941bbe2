//! Graph container APIs used by `selkie`.
//!
//! An insertion-ordered, string-keyed graph. All iteration (`nodes`, `edges`,
//! `node_edges`, `neighbors`) follows insertion order, so algorithms built on
//! top stay deterministic independent of hash state.

use rustc_hash::FxBuildHasher;
use std::cell::RefCell;
use std::hash::{Hash, Hasher};

pub mod alg;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

#[derive(Debug, Clone, Copy)]
pub struct GraphOptions {
    pub multigraph: bool,
    pub directed: bool,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            multigraph: false,
            directed: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EdgeKey {
    pub v: String,
    pub w: String,
    pub name: Option<String>,
}

impl EdgeKey {
    pub fn new(
        v: impl Into<String>,
        w: impl Into<String>,
        name: Option<impl Into<String>>,
    ) -> Self {
        Self {
            v: v.into(),
            w: w.into(),
            name: name.map(Into::into),
        }
    }

    /// The endpoint that is not `v`, or `None` if `v` is not an endpoint.
    /// For a self-loop, returns the node itself.
    pub fn opposite<'a>(&'a self, v: &str) -> Option<&'a str> {
        if self.v == v {
            Some(&self.w)
        } else if self.w == v {
            Some(&self.v)
        } else {
            None
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.v == self.w
    }
}

impl PartialEq for EdgeKey {
    fn eq(&self, other: &Self) -> bool {
        self.v == other.v && self.w == other.w && self.name == other.name
    }
}

impl Eq for EdgeKey {}

impl Hash for EdgeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.v.hash(state);
        self.w.hash(state);
        self.name.hash(state);
    }
}

#[derive(Clone, Copy, Hash)]
struct EdgeKeyView<'a> {
    v: &'a str,
    w: &'a str,
    name: Option<&'a str>,
}

impl<'a> hashbrown::Equivalent<EdgeKey> for EdgeKeyView<'a> {
    fn equivalent(&self, key: &EdgeKey) -> bool {
        key.v == self.v && key.w == self.w && key.name.as_deref() == self.name
    }
}

#[derive(Debug, Clone)]
struct NodeEntry<N> {
    id: String,
    label: N,
}

#[derive(Debug, Clone)]
struct EdgeEntry<E> {
    key: EdgeKey,
    label: E,
}

// `node_edges`/`neighbors` are hot in layout inner loops. Scanning `self.edges`
// per query is O(E) and dominates runtime for large graphs, so we keep a lazily
// rebuilt incidence cache (edge indices per node index).
//
// Note: interior mutability keeps query APIs on `&self`.
#[derive(Debug, Clone)]
struct IncidenceCache {
    generation: u64,
    incident: Vec<Vec<usize>>,
}

pub struct Graph<N, E, G>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    options: GraphOptions,

    graph_label: G,
    default_node_label: Box<dyn Fn() -> N + Send + Sync>,
    default_edge_label: Box<dyn Fn() -> E + Send + Sync>,

    nodes: Vec<NodeEntry<N>>,
    node_index: HashMap<String, usize>,

    edges: Vec<EdgeEntry<E>>,
    edge_index: HashMap<EdgeKey, usize>,

    incidence_gen: u64,
    incidence_cache: RefCell<Option<IncidenceCache>>,
}

impl<N, E, G> std::fmt::Debug for Graph<N, E, G>
where
    N: Default + std::fmt::Debug + 'static,
    E: Default + std::fmt::Debug + 'static,
    G: Default + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("options", &self.options)
            .field("nodes", &self.nodes.len())
            .field("edges", &self.edges.len())
            .finish()
    }
}

impl<N, E, G> Default for Graph<N, E, G>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    fn default() -> Self {
        Self::new(GraphOptions::default())
    }
}

impl<N, E, G> Graph<N, E, G>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    pub fn new(options: GraphOptions) -> Self {
        Self {
            options,
            graph_label: G::default(),
            default_node_label: Box::new(N::default),
            default_edge_label: Box::new(E::default),
            nodes: Vec::new(),
            node_index: HashMap::default(),
            edges: Vec::new(),
            edge_index: HashMap::default(),
            incidence_gen: 0,
            incidence_cache: RefCell::new(None),
        }
    }

    pub fn options(&self) -> GraphOptions {
        self.options
    }

    pub fn is_multigraph(&self) -> bool {
        self.options.multigraph
    }

    pub fn is_directed(&self) -> bool {
        self.options.directed
    }

    pub fn set_graph(&mut self, label: G) -> &mut Self {
        self.graph_label = label;
        self
    }

    pub fn graph(&self) -> &G {
        &self.graph_label
    }

    pub fn graph_mut(&mut self) -> &mut G {
        &mut self.graph_label
    }

    pub fn set_default_node_label<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn() -> N + Send + Sync + 'static,
    {
        self.default_node_label = Box::new(f);
        self
    }

    pub fn set_default_edge_label<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn() -> E + Send + Sync + 'static,
    {
        self.default_edge_label = Box::new(f);
        self
    }

    fn invalidate_incidence(&mut self) {
        self.incidence_gen = self.incidence_gen.wrapping_add(1);
        *self.incidence_cache.get_mut() = None;
    }

    fn ensure_incidence<'a>(&'a self) -> std::cell::RefMut<'a, IncidenceCache> {
        let generation = self.incidence_gen;
        let mut cache = self.incidence_cache.borrow_mut();
        let stale = cache
            .as_ref()
            .map(|c| c.generation != generation)
            .unwrap_or(true);
        if stale {
            let mut incident: Vec<Vec<usize>> = vec![Vec::new(); self.nodes.len()];
            for (ei, entry) in self.edges.iter().enumerate() {
                let vi = self.node_index[&entry.key.v];
                incident[vi].push(ei);
                if entry.key.v != entry.key.w {
                    let wi = self.node_index[&entry.key.w];
                    incident[wi].push(ei);
                }
            }
            *cache = Some(IncidenceCache {
                generation,
                incident,
            });
        }
        std::cell::RefMut::map(cache, |c| c.as_mut().unwrap())
    }

    // In an undirected graph, (v, w) and (w, v) name the same edge. Keys are
    // stored with endpoints in lexicographic order so both spellings hit the
    // same entry.
    fn canonical<'a>(&self, v: &'a str, w: &'a str) -> (&'a str, &'a str) {
        if self.options.directed || v <= w {
            (v, w)
        } else {
            (w, v)
        }
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn set_node(&mut self, id: impl Into<String>, label: N) -> &mut Self {
        let id = id.into();
        match self.node_index.get(&id) {
            Some(&i) => self.nodes[i].label = label,
            None => {
                self.node_index.insert(id.clone(), self.nodes.len());
                self.nodes.push(NodeEntry { id, label });
                self.invalidate_incidence();
            }
        }
        self
    }

    pub fn ensure_node(&mut self, id: impl Into<String>) -> &mut Self {
        let id = id.into();
        if !self.node_index.contains_key(&id) {
            let label = (self.default_node_label)();
            self.set_node(id, label);
        }
        self
    }

    pub fn node(&self, id: &str) -> Option<&N> {
        self.node_index.get(id).map(|&i| &self.nodes[i].label)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut N> {
        match self.node_index.get(id) {
            Some(&i) => Some(&mut self.nodes[i].label),
            None => None,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.id.as_str())
    }

    pub fn node_ids(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.id.clone()).collect()
    }

    pub fn for_each_node<F>(&self, mut f: F)
    where
        F: FnMut(&str, &N),
    {
        for n in &self.nodes {
            f(&n.id, &n.label);
        }
    }

    pub fn for_each_node_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&str, &mut N),
    {
        for n in &mut self.nodes {
            f(&n.id, &mut n.label);
        }
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> impl Iterator<Item = &EdgeKey> {
        self.edges.iter().map(|e| &e.key)
    }

    pub fn edge_keys(&self) -> Vec<EdgeKey> {
        self.edges.iter().map(|e| e.key.clone()).collect()
    }

    pub fn for_each_edge<F>(&self, mut f: F)
    where
        F: FnMut(&EdgeKey, &E),
    {
        for e in &self.edges {
            f(&e.key, &e.label);
        }
    }

    pub fn for_each_edge_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&EdgeKey, &mut E),
    {
        for e in &mut self.edges {
            f(&e.key, &mut e.label);
        }
    }

    pub fn set_edge(&mut self, v: impl Into<String>, w: impl Into<String>) -> &mut Self {
        let label = (self.default_edge_label)();
        self.set_edge_with_label(v, w, label)
    }

    pub fn set_edge_with_label(
        &mut self,
        v: impl Into<String>,
        w: impl Into<String>,
        label: E,
    ) -> &mut Self {
        let (v, w) = (v.into(), w.into());
        let (v, w) = {
            let (a, b) = self.canonical(&v, &w);
            (a.to_string(), b.to_string())
        };
        self.set_edge_key(EdgeKey::new(v, w, None::<String>), label)
    }

    pub fn set_edge_named(
        &mut self,
        v: impl Into<String>,
        w: impl Into<String>,
        name: impl Into<String>,
        label: E,
    ) -> &mut Self {
        debug_assert!(self.options.multigraph, "named edges need a multigraph");
        let (v, w) = (v.into(), w.into());
        let (v, w) = {
            let (a, b) = self.canonical(&v, &w);
            (a.to_string(), b.to_string())
        };
        self.set_edge_key(EdgeKey::new(v, w, Some(name)), label)
    }

    pub fn set_edge_key(&mut self, key: EdgeKey, label: E) -> &mut Self {
        self.ensure_node(key.v.clone());
        self.ensure_node(key.w.clone());
        match self.edge_index.get(&key) {
            Some(&i) => self.edges[i].label = label,
            None => {
                self.edge_index.insert(key.clone(), self.edges.len());
                self.edges.push(EdgeEntry { key, label });
                self.invalidate_incidence();
            }
        }
        self
    }

    pub fn set_path(&mut self, nodes: &[&str]) -> &mut Self {
        for pair in nodes.windows(2) {
            self.set_edge(pair[0], pair[1]);
        }
        self
    }

    fn edge_slot(&self, v: &str, w: &str, name: Option<&str>) -> Option<usize> {
        let (v, w) = self.canonical(v, w);
        self.edge_index
            .get(&EdgeKeyView { v, w, name })
            .copied()
    }

    pub fn has_edge(&self, v: &str, w: &str, name: Option<&str>) -> bool {
        self.edge_slot(v, w, name).is_some()
    }

    pub fn edge(&self, v: &str, w: &str, name: Option<&str>) -> Option<&E> {
        self.edge_slot(v, w, name).map(|i| &self.edges[i].label)
    }

    pub fn edge_mut(&mut self, v: &str, w: &str, name: Option<&str>) -> Option<&mut E> {
        match self.edge_slot(v, w, name) {
            Some(i) => Some(&mut self.edges[i].label),
            None => None,
        }
    }

    pub fn edge_by_key(&self, key: &EdgeKey) -> Option<&E> {
        self.edge(&key.v, &key.w, key.name.as_deref())
    }

    pub fn edge_mut_by_key(&mut self, key: &EdgeKey) -> Option<&mut E> {
        self.edge_mut(&key.v, &key.w, key.name.as_deref())
    }

    pub fn remove_edge(&mut self, v: &str, w: &str, name: Option<&str>) -> bool {
        let Some(i) = self.edge_slot(v, w, name) else {
            return false;
        };
        let entry = self.edges.remove(i);
        self.edge_index.remove(&entry.key);
        for slot in self.edge_index.values_mut() {
            if *slot > i {
                *slot -= 1;
            }
        }
        self.invalidate_incidence();
        true
    }

    pub fn remove_node(&mut self, id: &str) -> bool {
        let Some(&i) = self.node_index.get(id) else {
            return false;
        };
        let keys: Vec<EdgeKey> = self
            .edges
            .iter()
            .filter(|e| e.key.v == id || e.key.w == id)
            .map(|e| e.key.clone())
            .collect();
        for k in keys {
            self.remove_edge(&k.v, &k.w, k.name.as_deref());
        }
        self.nodes.remove(i);
        self.node_index.remove(id);
        for slot in self.node_index.values_mut() {
            if *slot > i {
                *slot -= 1;
            }
        }
        self.invalidate_incidence();
        true
    }

    /// Edges incident to `v`, in insertion order. Self-loops appear once.
    pub fn node_edges(&self, v: &str) -> Vec<EdgeKey> {
        let Some(&vi) = self.node_index.get(v) else {
            return Vec::new();
        };
        let cache = self.ensure_incidence();
        cache.incident[vi]
            .iter()
            .map(|&ei| self.edges[ei].key.clone())
            .collect()
    }

    pub fn for_each_node_edge<F>(&self, v: &str, mut f: F)
    where
        F: FnMut(&EdgeKey, &E),
    {
        let Some(&vi) = self.node_index.get(v) else {
            return;
        };
        let cache = self.ensure_incidence();
        for &ei in &cache.incident[vi] {
            f(&self.edges[ei].key, &self.edges[ei].label);
        }
    }

    /// Distinct neighbors of `v`, in first-seen edge order. `v` itself is
    /// included only when it has a self-loop.
    pub fn neighbors(&self, v: &str) -> Vec<&str> {
        let Some(&vi) = self.node_index.get(v) else {
            return Vec::new();
        };
        let cache = self.ensure_incidence();
        let mut seen: HashMap<&str, ()> = HashMap::default();
        let mut out = Vec::new();
        for &ei in &cache.incident[vi] {
            let key = &self.edges[ei].key;
            let other = if key.v == v { &key.w } else { &key.v };
            if seen.insert(other.as_str(), ()).is_none() {
                out.push(other.as_str());
            }
        }
        out
    }

    /// Number of incident edges, counting parallels; self-loops count once.
    pub fn degree(&self, v: &str) -> usize {
        let Some(&vi) = self.node_index.get(v) else {
            return 0;
        };
        self.ensure_incidence().incident[vi].len()
    }

    /// True when the graph has no self-loops and no parallel edges.
    pub fn is_simple(&self) -> bool {
        if self.edges.iter().any(|e| e.key.is_self_loop()) {
            return false;
        }
        if !self.options.multigraph {
            return true;
        }
        let mut seen: hashbrown::HashSet<(&str, &str), FxBuildHasher> =
            hashbrown::HashSet::default();
        for e in &self.edges {
            let (a, b) = self.canonical(&e.key.v, &e.key.w);
            if !seen.insert((a, b)) {
                return false;
            }
        }
        true
    }
}
