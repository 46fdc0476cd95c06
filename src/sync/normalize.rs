// SPDX-FileCopyrightText: 2026 flowlink contributors
// SPDX-License-Identifier: LicenseRef-Flowlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of flowlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Raw diagram node id → canonical step id.
//!
//! Renderers are free to decorate node identifiers, so resolution runs an explicit, ordered list
//! of rules against the set of known step ids. There is deliberately no similarity matching: a
//! raw id either maps to a known step through one of the rules, or it does not map at all.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use smallvec::SmallVec;
use smol_str::SmolStr;

use crate::model::StepId;

/// Anything that can answer "is this a step id of the current workflow?".
pub trait KnownSteps {
    fn lookup(&self, id: &str) -> Option<&StepId>;
}

impl KnownSteps for BTreeSet<StepId> {
    fn lookup(&self, id: &str) -> Option<&StepId> {
        self.get(id)
    }
}

impl KnownSteps for HashSet<StepId> {
    fn lookup(&self, id: &str) -> Option<&StepId> {
        self.get(id)
    }
}

impl KnownSteps for [StepId] {
    fn lookup(&self, id: &str) -> Option<&StepId> {
        self.iter().find(|known| known.as_str() == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NormalizeRule {
    /// The raw id is a step id verbatim.
    Exact,
    /// The raw id is a step id behind a structural prefix.
    StripPrefix(SmolStr),
}

impl fmt::Display for NormalizeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => f.write_str("exact"),
            Self::StripPrefix(prefix) => write!(f, "strip-prefix {prefix:?}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub step_id: StepId,
    pub rule: NormalizeRule,
}

pub type Candidates = SmallVec<[Candidate; 2]>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierNormalizer {
    rules: Vec<NormalizeRule>,
}

impl Default for IdentifierNormalizer {
    fn default() -> Self {
        Self::with_prefixes(["node_"])
    }
}

impl IdentifierNormalizer {
    pub fn new(rules: Vec<NormalizeRule>) -> Self {
        Self { rules }
    }

    /// `Exact` first, then one `StripPrefix` rule per non-empty prefix, in order.
    ///
    /// Prefixes containing whitespace are skipped: the trigger and end nodes carry raw ids with
    /// whitespace, and stripping such a prefix could leave a remainder that is a step id.
    pub fn with_prefixes<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rules = vec![NormalizeRule::Exact];
        for prefix in prefixes {
            let prefix = prefix.as_ref();
            if prefix.is_empty() || prefix.chars().any(char::is_whitespace) {
                continue;
            }
            let rule = NormalizeRule::StripPrefix(SmolStr::new(prefix));
            if !rules.contains(&rule) {
                rules.push(rule);
            }
        }
        Self { rules }
    }

    pub fn rules(&self) -> &[NormalizeRule] {
        &self.rules
    }

    /// Candidate step ids for `raw`, most likely first. Empty when no rule matches.
    pub fn normalize<K>(&self, raw: &str, known: &K) -> Candidates
    where
        K: KnownSteps + ?Sized,
    {
        let mut candidates = Candidates::new();
        for rule in &self.rules {
            let stripped = match rule {
                NormalizeRule::Exact => Some(raw),
                NormalizeRule::StripPrefix(prefix) => {
                    raw.strip_prefix(prefix.as_str()).filter(|rest| !rest.is_empty())
                }
            };
            let Some(step_id) = stripped.and_then(|id| known.lookup(id)) else {
                continue;
            };
            if candidates.iter().any(|c| &c.step_id == step_id) {
                continue;
            }
            candidates.push(Candidate {
                step_id: step_id.clone(),
                rule: rule.clone(),
            });
        }
        candidates
    }
}
