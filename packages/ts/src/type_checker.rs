use std::rc::Rc;

use crate::program::ProgramId;

/// Handle to the checker of one program.
///
/// Type queries belong to the host compiler; checker-aware transformers get
/// this handle so they can tell which program they run against.
#[derive(Debug, Clone)]
pub struct TypeChecker {
    program: ProgramId,
    file_names: Rc<[String]>,
}

impl TypeChecker {
    pub(crate) fn new(program: ProgramId, file_names: Vec<String>) -> Self {
        Self {
            program,
            file_names: file_names.into(),
        }
    }

    pub fn program_id(&self) -> ProgramId {
        self.program
    }

    pub fn get_source_file_names(&self) -> &[String] {
        &self.file_names
    }
}
