//! The immutable result of pattern compilation.

use rustc_hash::FxHashMap;

use crate::ast::{Ast, AstKind, NodeId};
use crate::options::RegexOptions;

/// A parsed pattern together with its group tables and option flags.
///
/// The tables are built during parsing and never change afterwards, so a
/// `CompiledPattern` can be shared freely across threads; every match
/// invocation builds its own mutable context.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pattern: String,
    ast: Ast,
    root: NodeId,
    /// 1-based group number → capture node, at `groups[number - 1]`.
    groups: Vec<NodeId>,
    /// Group name → group number.
    names: FxHashMap<String, u32>,
    options: RegexOptions,
    may_delegate: bool,
}

impl CompiledPattern {
    /// Assemble a compiled pattern. Called by the parser once the tree and
    /// tables are complete.
    pub fn new(
        pattern: String,
        ast: Ast,
        root: NodeId,
        groups: Vec<NodeId>,
        names: FxHashMap<String, u32>,
        options: RegexOptions,
        may_delegate: bool,
    ) -> Self {
        CompiledPattern { pattern, ast, root, groups, names, options, may_delegate }
    }

    /// The original pattern text.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The node arena.
    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    /// Root node of the pattern.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The option flags the pattern was compiled with.
    pub fn options(&self) -> RegexOptions {
        self.options
    }

    /// Whether the pattern stays within the subset a host-native regex
    /// facility could evaluate. Advisory only; the engine never delegates.
    pub fn may_delegate(&self) -> bool {
        self.may_delegate
    }

    /// Number of capturing groups, excluding group 0.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// The capture node of 1-based group `number`.
    pub fn group_node(&self, number: u32) -> Option<NodeId> {
        if number == 0 {
            return None;
        }
        self.groups.get(number as usize - 1).copied()
    }

    /// The *body* of 1-based group `number`, the node a subroutine call
    /// re-executes.
    pub fn group_body(&self, number: u32) -> Option<NodeId> {
        let node = self.group_node(number)?;
        match self.ast.node(node) {
            AstKind::Capture { child, .. } => Some(*child),
            _ => None,
        }
    }

    /// Resolve a group name to its number.
    pub fn group_index(&self, name: &str) -> Option<u32> {
        self.names.get(name).copied()
    }

    /// Group names in group-number order.
    pub fn group_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.groups.iter().filter_map(|&id| match self.ast.node(id) {
            AstKind::Capture { name: Some(name), .. } => Some(name.as_str()),
            _ => None,
        })
    }

    /// The name of 1-based group `number`, if it has one.
    pub fn group_name(&self, number: u32) -> Option<&str> {
        let node = self.group_node(number)?;
        match self.ast.node(node) {
            AstKind::Capture { name: Some(name), .. } => Some(name.as_str()),
            _ => None,
        }
    }
}
