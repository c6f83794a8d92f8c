//! The dependency graph: every target mymake has heard of, keyed by name.
//!
//! Edges are stored as [TargetName]s rather than links between nodes. A rule
//! may name a dependency long before (or without ever) giving that
//! dependency a rule of its own, so names are only resolved to nodes when
//! the graph is walked.

use crate::types::Map;
use crate::TargetName;
use string_interner::DefaultStringInterner as StringInterner;

/// A single node in the graph.
#[derive(Clone, Debug, PartialEq)]
pub struct Target {
    name: TargetName,
    /// Dependency names, in the order they were declared. Duplicates are kept
    dependencies: Vec<TargetName>,
    /// Recipe lines with their command prefix stripped
    commands: Vec<String>,
}

impl Target {
    fn new(name: TargetName) -> Self {
        Target {
            name,
            dependencies: Vec::new(),
            commands: Vec::new(),
        }
    }

    /// The name of this target
    pub fn name(&self) -> TargetName {
        self.name
    }

    /// Names of everything this target depends on, in declaration order
    pub fn dependencies(&self) -> &[TargetName] {
        &self.dependencies
    }

    /// The commands that build this target, in declaration order
    pub fn commands(&self) -> &[String] {
        &self.commands
    }
}

/// Name-keyed store of targets.
/// There is at most one [Target] per distinct name.
#[derive(Clone, Debug, Default)]
pub struct DependencyGraph {
    /// All the names seen so far, including ones that never got a node
    names: StringInterner,
    /// Nodes, in creation order
    targets: Vec<Target>,
    /// Maps a name to its slot in `targets`
    index: Map<TargetName, usize>,
}

impl DependencyGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Default::default()
    }

    /// Intern a name without creating a node for it.
    /// Dependencies added with a name that never gets a node are skipped when
    /// the graph is walked.
    pub fn intern_name(&mut self, name: &str) -> TargetName {
        let sym = self.names.get_or_intern(name);
        trace!("Intern target name {:?} as {:?}", name, sym);
        TargetName(sym)
    }

    /// Look up the node for `name`, creating an empty one if there isn't one
    /// yet.
    pub fn find_or_create(&mut self, name: &str) -> TargetName {
        let target_name = self.intern_name(name);
        if !self.index.contains_key(&target_name) {
            debug!("New target {:?}", name);
            self.index.insert(target_name, self.targets.len());
            self.targets.push(Target::new(target_name));
        }

        target_name
    }

    /// Get the node for an interned name, if it has one
    pub fn target(&self, name: TargetName) -> Option<&Target> {
        self.index.get(&name).map(|&slot| &self.targets[slot])
    }

    /// Get the node for a name, if it has one
    pub fn lookup(&self, name: &str) -> Option<&Target> {
        self.names
            .get(name)
            .and_then(|sym| self.target(TargetName(sym)))
    }

    /// Get the string behind an interned name
    pub fn resolve_name(&self, name: TargetName) -> Option<&str> {
        self.names.resolve(name.0)
    }

    /// Append `dependency` to the dependency list of `target`.
    /// Does nothing if `target` has no node.
    pub fn add_dependency(&mut self, target: TargetName, dependency: TargetName) {
        match self.target_mut(target) {
            Some(t) => t.dependencies.push(dependency),
            None => warn!("Dropping dependency for unknown target {:?}", target),
        }
    }

    /// Append a command to the recipe of `target`.
    /// Does nothing if `target` has no node.
    pub fn add_command(&mut self, target: TargetName, command: String) {
        match self.target_mut(target) {
            Some(t) => t.commands.push(command),
            None => warn!("Dropping command for unknown target {:?}", target),
        }
    }

    /// Iterate over all the targets in the order they were created
    pub fn targets(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter()
    }

    /// Number of targets in the graph
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// True if no target has been created yet
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    fn target_mut(&mut self, name: TargetName) -> Option<&mut Target> {
        let slot = *self.index.get(&name)?;
        self.targets.get_mut(slot)
    }
}
