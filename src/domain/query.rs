//! Query engine: a [`Filter`] selects a seed set, a [`Complementer`] expands it
//!
//! Results are [`Selection`]s that borrow components from the resolved
//! [`Components`] collection. The only owned entries are placeholders for
//! dependency targets that are not in the collection.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use super::component::{Component, Components};
use super::id::ComponentId;

/// Insertion-ordered result set of a query
#[derive(Debug, Clone, Default)]
pub struct Selection<'a> {
    entries: Vec<Cow<'a, Component>>,
    index: HashMap<ComponentId, usize>,
}

impl<'a> Selection<'a> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Inserts or overwrites a component, keeping its first-seen position
    ///
    /// Returns false if the component's ID is nil.
    pub fn add(&mut self, component: Cow<'a, Component>) -> bool {
        if component.id().is_nil() {
            return false;
        }
        match self.index.get(component.id()) {
            Some(&pos) => self.entries[pos] = component,
            None => {
                self.index.insert(component.id().clone(), self.entries.len());
                self.entries.push(component);
            }
        }
        true
    }

    pub fn get(&self, id: &ComponentId) -> Option<&Component> {
        self.index.get(id).map(|&pos| self.entries[pos].as_ref())
    }

    pub fn contains(&self, id: &ComponentId) -> bool {
        self.index.contains_key(id)
    }

    /// Returns the IDs in insertion order
    pub fn ids(&self) -> impl Iterator<Item = &ComponentId> {
        self.entries.iter().map(|c| c.id())
    }

    /// Iterates over the components in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.entries.iter().map(|c| c.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Selects the seed set of a query
pub trait Filter {
    /// Returns true if `target` belongs to the seed set
    fn pass(&self, target: &Component) -> bool;

    /// Applies [`Filter::pass`] to every component, preserving order
    fn filter<'a>(&self, target: &'a Components) -> Selection<'a> {
        let mut result = Selection::new();
        for component in target.iter() {
            if self.pass(component) {
                result.add(Cow::Borrowed(component));
            }
        }
        result
    }
}

/// Passes every component that is not hidden
#[derive(Debug, Clone, Copy, Default)]
pub struct AllPassFilter;

impl Filter for AllPassFilter {
    fn pass(&self, target: &Component) -> bool {
        !target.is_hidden()
    }
}

/// Passes visible components carrying every one of the given labels
#[derive(Debug, Clone, Default)]
pub struct LabelsFilter {
    pub labels: BTreeMap<String, String>,
}

impl LabelsFilter {
    pub fn new(labels: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            labels: labels.into_iter().collect(),
        }
    }
}

impl Filter for LabelsFilter {
    fn pass(&self, target: &Component) -> bool {
        if target.is_hidden() {
            return false;
        }
        self.labels
            .iter()
            .all(|(key, value)| target.label(key) == Some(value.as_str()))
    }
}

/// How far a complementer walks from the seed set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    Unbounded,
    Limited(usize),
}

impl Depth {
    /// Returns true if a component `depth` edges away from the seed is kept
    pub fn allows(self, depth: usize) -> bool {
        match self {
            Depth::Unbounded => true,
            Depth::Limited(limit) => depth <= limit,
        }
    }
}

impl From<i64> for Depth {
    /// Negative values mean unbounded
    fn from(value: i64) -> Self {
        usize::try_from(value).map_or(Depth::Unbounded, Depth::Limited)
    }
}

/// Expands a seed set along graph edges
pub trait Complementer<'a> {
    fn complement(&self, seed: &Selection<'a>) -> Selection<'a>;
}

/// Follows dependency edges (component -> what it depends on)
#[derive(Debug, Clone, Copy)]
pub struct DependenciesComplementer<'a> {
    pub all_components: &'a Components,
    pub depth: Depth,
}

impl<'a> DependenciesComplementer<'a> {
    pub fn new(all_components: &'a Components, depth: Depth) -> Self {
        Self {
            all_components,
            depth,
        }
    }

    fn visit(&self, depth: usize, pivot: Cow<'a, Component>, acc: &mut Selection<'a>) {
        if !self.depth.allows(depth) || acc.contains(pivot.id()) {
            return;
        }

        let next: Vec<Cow<'a, Component>> = match &pivot {
            Cow::Borrowed(component) => (*component)
                .dependencies()
                .ids()
                .map(|id| lookup(self.all_components, id))
                .collect(),
            Cow::Owned(_) => Vec::new(),
        };

        acc.add(pivot);
        for dependency in next {
            self.visit(depth + 1, dependency, acc);
        }
    }
}

impl<'a> Complementer<'a> for DependenciesComplementer<'a> {
    fn complement(&self, seed: &Selection<'a>) -> Selection<'a> {
        let mut result = Selection::new();
        for start in &seed.entries {
            self.visit(0, start.clone(), &mut result);
        }
        result
    }
}

/// Follows dependency edges backwards (component -> what depends on it)
#[derive(Debug, Clone, Copy)]
pub struct ReverseDependenciesComplementer<'a> {
    pub all_components: &'a Components,
    pub depth: Depth,
}

/// Dependents of each component, in collection order
type ReverseIndex<'a> = HashMap<&'a ComponentId, Vec<&'a Component>>;

impl<'a> ReverseDependenciesComplementer<'a> {
    pub fn new(all_components: &'a Components, depth: Depth) -> Self {
        Self {
            all_components,
            depth,
        }
    }

    fn reverse_index(&self) -> ReverseIndex<'a> {
        let mut index: ReverseIndex<'a> = HashMap::new();
        for component in self.all_components.iter() {
            for dependency in component.dependencies().ids() {
                index.entry(dependency).or_default().push(component);
            }
        }
        index
    }

    fn visit(
        &self,
        index: &ReverseIndex<'a>,
        depth: usize,
        pivot: Cow<'a, Component>,
        acc: &mut Selection<'a>,
    ) {
        if !self.depth.allows(depth) || acc.contains(pivot.id()) {
            return;
        }

        let dependents = index.get(pivot.id()).cloned().unwrap_or_default();

        acc.add(pivot);
        for dependent in dependents {
            self.visit(index, depth + 1, Cow::Borrowed(dependent), acc);
        }
    }
}

impl<'a> Complementer<'a> for ReverseDependenciesComplementer<'a> {
    fn complement(&self, seed: &Selection<'a>) -> Selection<'a> {
        let index = self.reverse_index();
        let mut result = Selection::new();
        for start in &seed.entries {
            self.visit(&index, 0, start.clone(), &mut result);
        }
        result
    }
}

/// Resolves a traversal target, substituting a placeholder for unknown IDs
fn lookup<'a>(all_components: &'a Components, id: &ComponentId) -> Cow<'a, Component> {
    match all_components.get(id) {
        Some(component) => Cow::Borrowed(component),
        None => Cow::Owned(Component::undefined(id.clone())),
    }
}

/// A filter followed by an optional complementer
pub struct Query<'a> {
    pub components: &'a Components,
    pub filter: Box<dyn Filter + 'a>,
    pub complementer: Option<Box<dyn Complementer<'a> + 'a>>,
}

impl<'a> Query<'a> {
    pub fn new(components: &'a Components, filter: Box<dyn Filter + 'a>) -> Self {
        Self {
            components,
            filter,
            complementer: None,
        }
    }

    pub fn with_complementer(mut self, complementer: Box<dyn Complementer<'a> + 'a>) -> Self {
        self.complementer = Some(complementer);
        self
    }

    /// Filters the collection, then expands the seed set if a complementer is set
    pub fn run(&self) -> Selection<'a> {
        let seed = self.filter.filter(self.components);
        match &self.complementer {
            Some(complementer) => complementer.complement(&seed),
            None => seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Relation;
    use proptest::prelude::*;

    fn id(s: &str) -> ComponentId {
        ComponentId::new(s)
    }

    /// Builds a resolved collection from `(id, dependencies)` pairs
    fn graph(edges: &[(&str, &[&str])]) -> Components {
        let mut cs = Components::new();
        for (name, deps) in edges {
            let mut c = Component::new(None, id(name));
            for dep in *deps {
                c.depend_on(id(dep), Relation::default());
            }
            cs.add(c);
        }
        cs.complement().unwrap();
        cs
    }

    fn seed<'a>(cs: &'a Components, names: &[&str]) -> Selection<'a> {
        let mut selection = Selection::new();
        for name in names {
            selection.add(Cow::Borrowed(cs.get(&id(name)).unwrap()));
        }
        selection
    }

    fn names(selection: &Selection<'_>) -> Vec<String> {
        selection.ids().map(|id| id.to_string()).collect()
    }

    #[test]
    fn depth_from_signed_integer() {
        assert_eq!(Depth::from(-1), Depth::Unbounded);
        assert_eq!(Depth::from(0), Depth::Limited(0));
        assert_eq!(Depth::from(3), Depth::Limited(3));
        assert!(Depth::Limited(0).allows(0));
        assert!(!Depth::Limited(0).allows(1));
        assert!(Depth::Unbounded.allows(usize::MAX));
    }

    #[test]
    fn all_pass_filter_skips_hidden_components() {
        let mut cs = Components::new();
        cs.add(Component::new(None, id("a")));
        let mut hidden = Component::new(None, id("b"));
        hidden.hide();
        cs.add(hidden);
        cs.add(Component::new(None, id("c")));

        let result = AllPassFilter.filter(&cs);
        assert_eq!(names(&result), vec!["a", "c"]);
    }

    #[test]
    fn labels_filter_requires_exact_match() {
        let mut cs = Components::new();
        let mut prod = Component::new(None, id("prod"));
        prod.add_label("env", "prod");
        prod.add_label("team", "web");
        let mut staging = Component::new(None, id("staging"));
        staging.add_label("env", "staging");
        cs.add(prod);
        cs.add(staging);
        cs.add(Component::new(None, id("unlabelled")));

        let filter = LabelsFilter::new([("env".to_string(), "prod".to_string())]);
        assert_eq!(names(&filter.filter(&cs)), vec!["prod"]);
    }

    #[test]
    fn labels_filter_is_a_conjunction() {
        let mut cs = Components::new();
        let mut both = Component::new(None, id("both"));
        both.add_label("env", "prod");
        both.add_label("tier", "db");
        let mut one = Component::new(None, id("one"));
        one.add_label("env", "prod");
        cs.add(both);
        cs.add(one);

        let filter = LabelsFilter::new([
            ("env".to_string(), "prod".to_string()),
            ("tier".to_string(), "db".to_string()),
        ]);
        assert_eq!(names(&filter.filter(&cs)), vec!["both"]);
    }

    #[test]
    fn labels_filter_skips_hidden_matches() {
        let mut cs = Components::new();
        let mut hidden = Component::new(None, id("hidden"));
        hidden.add_label("env", "prod");
        hidden.hide();
        cs.add(hidden);

        let filter = LabelsFilter::new([("env".to_string(), "prod".to_string())]);
        assert!(filter.filter(&cs).is_empty());
    }

    #[test]
    fn dependencies_depth_one_stops_after_direct_dependencies() {
        let cs = graph(&[("a", &["b"]), ("b", &["c"]), ("c", &[])]);
        let complementer = DependenciesComplementer::new(&cs, Depth::Limited(1));

        let result = complementer.complement(&seed(&cs, &["a"]));
        assert_eq!(names(&result), vec!["a", "b"]);
    }

    #[test]
    fn dependencies_depth_zero_is_seed_only() {
        let cs = graph(&[("a", &["b"]), ("b", &[])]);
        let complementer = DependenciesComplementer::new(&cs, Depth::Limited(0));

        let result = complementer.complement(&seed(&cs, &["a"]));
        assert_eq!(names(&result), vec!["a"]);
    }

    #[test]
    fn dependencies_unbounded_reaches_everything() {
        let cs = graph(&[("a", &["b"]), ("b", &["c"]), ("c", &[])]);
        let complementer = DependenciesComplementer::new(&cs, Depth::from(-1));

        let result = complementer.complement(&seed(&cs, &["a"]));
        assert_eq!(names(&result), vec!["a", "b", "c"]);
    }

    #[test]
    fn dependency_cycle_terminates_without_duplicates() {
        let cs = graph(&[("a", &["b"]), ("b", &["a"])]);
        let complementer = DependenciesComplementer::new(&cs, Depth::Unbounded);

        let result = complementer.complement(&seed(&cs, &["a"]));
        assert_eq!(names(&result), vec!["a", "b"]);
    }

    #[test]
    fn diamond_visits_shared_dependency_once() {
        let cs = graph(&[
            ("top", &["left", "right"]),
            ("left", &["bottom"]),
            ("right", &["bottom"]),
            ("bottom", &[]),
        ]);
        let complementer = DependenciesComplementer::new(&cs, Depth::Unbounded);

        let result = complementer.complement(&seed(&cs, &["top"]));
        assert_eq!(names(&result), vec!["top", "left", "bottom", "right"]);
    }

    #[test]
    fn unknown_dependency_becomes_placeholder() {
        let cs = graph(&[("a", &["ghost"])]);
        let complementer = DependenciesComplementer::new(&cs, Depth::Unbounded);

        let result = complementer.complement(&seed(&cs, &["a"]));
        assert_eq!(names(&result), vec!["a", "ghost"]);
        assert!(result.get(&id("ghost")).unwrap().is_undefined());
        assert!(!result.get(&id("a")).unwrap().is_undefined());
    }

    #[test]
    fn reverse_dependencies_depth_one() {
        let cs = graph(&[("a", &["c"]), ("b", &["a"]), ("c", &[])]);
        let complementer = ReverseDependenciesComplementer::new(&cs, Depth::Limited(1));

        let result = complementer.complement(&seed(&cs, &["c"]));
        assert_eq!(names(&result), vec!["c", "a"]);
    }

    #[test]
    fn reverse_dependencies_unbounded() {
        let cs = graph(&[("a", &["c"]), ("b", &["a"]), ("c", &[])]);
        let complementer = ReverseDependenciesComplementer::new(&cs, Depth::Unbounded);

        let result = complementer.complement(&seed(&cs, &["c"]));
        assert_eq!(names(&result), vec!["c", "a", "b"]);
    }

    #[test]
    fn reverse_dependencies_follow_collection_order() {
        let cs = graph(&[("x", &["base"]), ("y", &["base"]), ("base", &[])]);
        let complementer = ReverseDependenciesComplementer::new(&cs, Depth::Unbounded);

        let result = complementer.complement(&seed(&cs, &["base"]));
        assert_eq!(names(&result), vec!["base", "x", "y"]);
    }

    #[test]
    fn reverse_dependency_cycle_terminates() {
        let cs = graph(&[("a", &["b"]), ("b", &["a"])]);
        let complementer = ReverseDependenciesComplementer::new(&cs, Depth::Unbounded);

        let result = complementer.complement(&seed(&cs, &["a"]));
        assert_eq!(names(&result), vec!["a", "b"]);
    }

    #[test]
    fn query_without_complementer_returns_seed() {
        let cs = graph(&[("a", &["b"]), ("b", &[])]);
        let query = Query::new(&cs, Box::new(AllPassFilter));

        assert_eq!(names(&query.run()), vec!["a", "b"]);
    }

    #[test]
    fn query_expands_filtered_seed() {
        let mut cs = Components::new();
        let mut web = Component::new(None, id("web"));
        web.add_label("tier", "front");
        web.depend_on(id("db"), Relation::new("reads"));
        let mut db = Component::new(None, id("db"));
        db.hide();
        cs.add(web);
        cs.add(db);
        cs.add(Component::new(None, id("batch")));
        cs.complement().unwrap();

        let query = Query::new(
            &cs,
            Box::new(LabelsFilter::new([("tier".to_string(), "front".to_string())])),
        )
        .with_complementer(Box::new(DependenciesComplementer::new(&cs, Depth::Unbounded)));

        let result = query.run();
        assert_eq!(names(&result), vec!["web", "db"]);
        assert!(result.get(&id("db")).unwrap().is_hidden());
    }

    #[test]
    fn results_share_components_with_collection() {
        let cs = graph(&[("a", &[])]);
        let result = AllPassFilter.filter(&cs);

        let original: *const Component = cs.get(&id("a")).unwrap();
        let selected: *const Component = result.get(&id("a")).unwrap();
        assert_eq!(original, selected);
    }

    proptest! {
        #[test]
        fn all_pass_filter_drops_exactly_hidden(hidden in proptest::collection::vec(any::<bool>(), 0..20)) {
            let mut cs = Components::new();
            for (i, is_hidden) in hidden.iter().enumerate() {
                let mut c = Component::new(None, id(&format!("c{i}")));
                if *is_hidden {
                    c.hide();
                }
                cs.add(c);
            }

            let result = AllPassFilter.filter(&cs);
            let expected: Vec<String> = hidden
                .iter()
                .enumerate()
                .filter(|(_, h)| !**h)
                .map(|(i, _)| format!("c{i}"))
                .collect();
            prop_assert_eq!(names(&result), expected);
        }
    }
}
