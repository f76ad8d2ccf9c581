//! Migration report: relocation commands grouped by node.
//!
//! Nodes keep the order in which they were first visited. A node that was
//! visited but needs no move is still listed, with an empty command list.

pub mod format;

use crate::types::{NodeName, RelocationCommand};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::HashMap;

/// Commands for one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeCommands {
    pub node: NodeName,
    pub commands: Vec<RelocationCommand>,
}

/// Insertion-ordered mapping of node to relocation commands.
#[derive(Debug, Clone, Default)]
pub struct MigrationReport {
    groups: Vec<NodeCommands>,
    index: HashMap<NodeName, usize>,
}

impl MigrationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `node` without adding a command; keeps its first-seen position.
    pub fn visit(&mut self, node: &str) -> &mut Vec<RelocationCommand> {
        let at = match self.index.get(node) {
            Some(at) => *at,
            None => {
                self.groups.push(NodeCommands {
                    node: node.to_string(),
                    commands: Vec::new(),
                });
                let at = self.groups.len() - 1;
                self.index.insert(node.to_string(), at);
                at
            }
        };
        &mut self.groups[at].commands
    }

    /// Append a command under its node.
    pub fn push(&mut self, command: RelocationCommand) {
        let node = command.node.clone();
        self.visit(&node).push(command);
    }

    pub fn get(&self, node: &str) -> Option<&[RelocationCommand]> {
        self.index
            .get(node)
            .map(|at| self.groups[*at].commands.as_slice())
    }

    /// Node groups in first-seen order.
    pub fn groups(&self) -> &[NodeCommands] {
        &self.groups
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.node.as_str())
    }

    pub fn commands(&self) -> impl Iterator<Item = &RelocationCommand> {
        self.groups.iter().flat_map(|g| g.commands.iter())
    }

    pub fn command_count(&self) -> usize {
        self.groups.iter().map(|g| g.commands.len()).sum()
    }

    pub fn has_commands(&self) -> bool {
        self.groups.iter().any(|g| !g.commands.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl PartialEq for MigrationReport {
    fn eq(&self, other: &Self) -> bool {
        self.groups == other.groups
    }
}

impl Eq for MigrationReport {}

/// Serializes as an ordered `{node: ["mv ...", ...]}` object.
impl Serialize for MigrationReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for group in &self.groups {
            let rendered: Vec<String> = group.commands.iter().map(|c| c.to_string()).collect();
            map.serialize_entry(&group.node, &rendered)?;
        }
        map.end()
    }
}

/// Outcome of one analyzer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub migration_required: bool,
    pub report: MigrationReport,
}

impl Analysis {
    pub fn compliant(report: MigrationReport) -> Self {
        Self {
            migration_required: false,
            report,
        }
    }

    pub fn from_report(report: MigrationReport) -> Self {
        Self {
            migration_required: report.has_commands(),
            report,
        }
    }
}
