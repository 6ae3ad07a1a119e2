//! Search plans
//!
//! A read-only account of what the locator examines for one target, used to
//! explain why a given backup was (or was not) chosen.

use std::path::PathBuf;

use serde::Serialize;

/// One same-directory probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbedPath {
    pub path: PathBuf,
    pub exists: bool,
}

/// One ancestor directory examined by the fallback phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AncestorProbe {
    /// 1 for the target's own directory, 2 for its parent, ...
    pub level: usize,
    pub directory: PathBuf,
    /// Recognized files in this directory, in tie-break order
    pub matches: Vec<PathBuf>,
}

/// Everything examined for a target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchPlan {
    pub target: PathBuf,
    pub same_directory: Vec<ProbedPath>,
    pub ancestors: Vec<AncestorProbe>,
}

impl SearchPlan {
    /// The path `locate` returns for this plan
    pub fn winner(&self) -> Option<&PathBuf> {
        if let Some(probe) = self.same_directory.iter().find(|p| p.exists) {
            return Some(&probe.path);
        }
        self.ancestors.iter().find_map(|a| a.matches.first())
    }

    /// Level at which the winner was found; 0 for the same-directory phase
    pub fn winning_level(&self) -> Option<usize> {
        if self.same_directory.iter().any(|p| p.exists) {
            return Some(0);
        }
        self.ancestors
            .iter()
            .find(|a| !a.matches.is_empty())
            .map(|a| a.level)
    }
}
