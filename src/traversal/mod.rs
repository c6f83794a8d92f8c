//! Postorder walk over a [DependencyGraph].
//!
//! Every target reachable from the root is emitted exactly once, after all of
//! its dependencies, followed by its own commands.

use crate::types::Set;
use crate::{DependencyGraph, MakefileError, TargetName};
use std::io;
use std::io::prelude::*;

#[cfg(test)]
mod test;

/// What the walk does when a target turns out to (transitively) depend on
/// itself
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CyclePolicy {
    /// The edge that closes the cycle points at a target that is already
    /// marked visited, so it is skipped like any other visited target. The
    /// walk terminates and each target is still emitted once.
    Ignore,
    /// Stop the walk with [MakefileError::DependencyCycle]
    Reject,
}

impl Default for CyclePolicy {
    fn default() -> Self {
        CyclePolicy::Ignore
    }
}

/// One target in build order, together with the commands that build it
#[derive(Clone, Debug, PartialEq)]
pub struct BuildStep {
    /// Name of the target
    pub target: String,
    /// The target's commands, in declaration order
    pub commands: Vec<String>,
}

/// A postorder walk over a graph.
/// The set of visited targets lives here rather than in the graph, so the
/// same graph can be walked any number of times.
pub struct Postorder<'g> {
    graph: &'g DependencyGraph,
    /// Targets that have already been entered
    visited: Set<TargetName>,
    /// Targets whose dependencies are currently being walked, outermost first
    path: Vec<TargetName>,
    policy: CyclePolicy,
}

impl<'g> Postorder<'g> {
    /// Start a walk over `graph` with nothing visited yet
    pub fn new(graph: &'g DependencyGraph) -> Self {
        Postorder {
            graph,
            visited: Default::default(),
            path: Vec::new(),
            policy: CyclePolicy::default(),
        }
    }

    /// Set the cycle policy
    pub fn cycle_policy(mut self, policy: CyclePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Forget which targets have been visited
    pub fn reset(&mut self) {
        self.visited = Default::default();
        self.path.clear();
    }

    /// Walk from `root`, returning the build steps in order.
    /// Targets already visited by an earlier call on this walker are not
    /// emitted again.
    pub fn visit(&mut self, root: &str) -> Result<Vec<BuildStep>, MakefileError> {
        let root = match self.graph.lookup(root) {
            Some(target) => target.name(),
            None => return Err(MakefileError::TargetNotFound(root.to_owned())),
        };

        info!("Walking dependencies of {:?}", self.name(root));
        let mut steps = Vec::new();
        self.visit_target(root, &mut steps)?;
        Ok(steps)
    }

    fn visit_target(
        &mut self,
        name: TargetName,
        steps: &mut Vec<BuildStep>,
    ) -> Result<(), MakefileError> {
        if self.visited.contains(&name) {
            if self.policy == CyclePolicy::Reject && self.path.contains(&name) {
                return Err(self.cycle_error(name));
            }
            trace!("Already visited {:?}", self.name(name));
            return Ok(());
        }
        self.visited.insert(name);

        let graph = self.graph;
        let target = match graph.target(name) {
            Some(target) => target,
            None => return Ok(()),
        };

        self.path.push(name);
        for &dep in target.dependencies() {
            if graph.target(dep).is_some() {
                self.visit_target(dep, steps)?;
            } else {
                // Every name the parser records gets a node, so this only
                // happens for hand-built graphs
                debug!("Skipping unresolved dependency {:?}", self.name(dep));
            }
        }
        self.path.pop();

        debug!("Emit {:?}", self.name(name));
        steps.push(BuildStep {
            target: self.name(name).to_owned(),
            commands: target.commands().to_vec(),
        });

        Ok(())
    }

    fn cycle_error(&self, closing: TargetName) -> MakefileError {
        let start = self
            .path
            .iter()
            .position(|&n| n == closing)
            .unwrap_or(0);
        let mut cycle: Vec<String> = self.path[start..]
            .iter()
            .map(|&n| self.name(n).to_owned())
            .collect();
        cycle.push(self.name(closing).to_owned());
        warn!("Dependency cycle {:?}", cycle);

        MakefileError::DependencyCycle(cycle)
    }

    fn name(&self, name: TargetName) -> &'g str {
        let graph: &'g DependencyGraph = self.graph;
        graph.resolve_name(name).unwrap_or("<unknown>")
    }
}

/// Walk `graph` from `start_name` with the default settings and return the
/// build steps in order.
pub fn traverse(graph: &DependencyGraph, start_name: &str) -> Result<Vec<BuildStep>, MakefileError> {
    Postorder::new(graph).visit(start_name)
}

/// Write build steps to `out`: the target name on its own line, then each of
/// its commands indented by two spaces.
pub fn print_steps<W: Write>(steps: &[BuildStep], out: &mut W) -> io::Result<()> {
    for step in steps {
        writeln!(out, "{}", step.target)?;
        for command in &step.commands {
            writeln!(out, "  {}", command)?;
        }
    }

    out.flush()
}
