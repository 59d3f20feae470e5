// Program Transform Record
//
// Side table of which program transforms each Program's lineage has seen.
// Keyed by ProgramId so the Program type itself stays untouched.

use std::collections::{HashMap, HashSet};
use std::rc::{Rc, Weak};

use tracing::trace;
use ts::{Diagnostic, Program, ProgramId};

use crate::plugins::config::TransformIdentity;

#[derive(Debug)]
struct LineageEntry {
    program: Weak<Program>,
    /// Root names of the Program the lineage started from.
    origin_root_names: Rc<[String]>,
    applied: HashSet<TransformIdentity>,
    /// Diagnostics program transforms reported along the lineage.
    diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Default)]
pub struct ProgramTransformRecord {
    entries: HashMap<ProgramId, LineageEntry>,
}

impl ProgramTransformRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_applied(&self, program: ProgramId, identity: &TransformIdentity) -> bool {
        self.entries
            .get(&program)
            .is_some_and(|entry| entry.applied.contains(identity))
    }

    pub fn applied_count(&self, program: ProgramId) -> usize {
        self.entries
            .get(&program)
            .map_or(0, |entry| entry.applied.len())
    }

    pub fn origin_root_names(&self, program: &Program) -> Rc<[String]> {
        self.entries
            .get(&program.id())
            .map(|entry| Rc::clone(&entry.origin_root_names))
            .unwrap_or_else(|| program.get_root_file_names().into())
    }

    pub fn diagnostics(&self, program: ProgramId) -> &[Diagnostic] {
        self.entries
            .get(&program)
            .map(|entry| entry.diagnostics.as_slice())
            .unwrap_or(&[])
    }

    /// Makes `child` part of `parent`'s lineage, adding `extra` identities.
    ///
    /// Entries already held by `child` are kept; inheritance only adds.
    /// Lineage diagnostics are copied once, when `child` first joins.
    pub fn inherit(
        &mut self,
        parent: &Program,
        child: &Rc<Program>,
        extra: impl IntoIterator<Item = TransformIdentity>,
    ) {
        let (origin, mut applied, diagnostics) = match self.entries.get(&parent.id()) {
            Some(entry) => (
                Rc::clone(&entry.origin_root_names),
                entry.applied.clone(),
                entry.diagnostics.clone(),
            ),
            None => (
                Rc::from(parent.get_root_file_names()),
                HashSet::new(),
                Vec::new(),
            ),
        };
        applied.extend(extra);

        // A child that already has an entry joined the lineage through a
        // derived Program and carries the parent's diagnostics already.
        let joined = self.entries.contains_key(&child.id());
        let entry = self.entry(child);
        if !joined && child.id() != parent.id() {
            entry.origin_root_names = origin;
            entry.diagnostics.extend(diagnostics);
        }
        entry.applied.extend(applied);
        trace!(
            parent = %parent.id(),
            child = %child.id(),
            applied = entry.applied.len(),
            "recorded program lineage"
        );
    }

    pub fn add_diagnostic(&mut self, program: &Rc<Program>, diagnostic: Diagnostic) {
        self.entry(program).diagnostics.push(diagnostic);
    }

    /// Drops entries whose Program no longer exists. Returns how many were removed.
    pub fn prune(&mut self) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| entry.program.strong_count() > 0);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&mut self, program: &Rc<Program>) -> &mut LineageEntry {
        self.entries
            .entry(program.id())
            .or_insert_with(|| LineageEntry {
                program: Rc::downgrade(program),
                origin_root_names: program.get_root_file_names().into(),
                applied: HashSet::new(),
                diagnostics: Vec::new(),
            })
    }
}
