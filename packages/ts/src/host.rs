// Compiler Host
//
// Supplies file contents to program creation.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::source_file::SourceFile;
use crate::ScriptTarget;

pub trait CompilerHost {
    /// Gets the source file for the given path.
    fn get_source_file(&self, file_name: &str, language_version: ScriptTarget)
        -> Option<SourceFile>;

    /// Checks if a file exists.
    fn file_exists(&self, file_name: &str) -> bool;

    /// Reads a file.
    fn read_file(&self, file_name: &str) -> Option<String>;

    /// Gets the current directory.
    fn get_current_directory(&self) -> String;

    /// Checks if file names are case-sensitive.
    fn use_case_sensitive_file_names(&self) -> bool {
        true
    }

    /// Gets the canonical file name.
    fn get_canonical_file_name(&self, file_name: &str) -> String {
        if self.use_case_sensitive_file_names() {
            file_name.to_string()
        } else {
            file_name.to_lowercase()
        }
    }

    /// Gets the new line character.
    fn get_new_line(&self) -> String {
        "\n".to_string()
    }
}

/// Host backed by an in-memory file table, optionally layered over another host.
///
/// Files written here shadow the fallback host, which is how program
/// transforms inject synthetic source files.
pub struct InMemoryCompilerHost {
    files: RefCell<IndexMap<String, String>>,
    fallback: Option<Rc<dyn CompilerHost>>,
    current_directory: String,
}

impl InMemoryCompilerHost {
    pub fn new(current_directory: &str) -> Self {
        Self {
            files: RefCell::new(IndexMap::new()),
            fallback: None,
            current_directory: current_directory.to_string(),
        }
    }

    /// Creates an overlay whose misses are answered by `fallback`.
    pub fn overlay(fallback: Rc<dyn CompilerHost>) -> Self {
        let current_directory = fallback.get_current_directory();
        Self {
            files: RefCell::new(IndexMap::new()),
            fallback: Some(fallback),
            current_directory,
        }
    }

    pub fn with_file(self, file_name: &str, text: &str) -> Self {
        self.write_file(file_name, text);
        self
    }

    /// Adds or replaces a file.
    pub fn write_file(&self, file_name: &str, text: &str) {
        self.files
            .borrow_mut()
            .insert(file_name.to_string(), text.to_string());
    }

    /// Names of files held directly by this host, in insertion order.
    pub fn file_names(&self) -> Vec<String> {
        self.files.borrow().keys().cloned().collect()
    }
}

impl CompilerHost for InMemoryCompilerHost {
    fn get_source_file(
        &self,
        file_name: &str,
        language_version: ScriptTarget,
    ) -> Option<SourceFile> {
        if let Some(text) = self.files.borrow().get(file_name) {
            return Some(SourceFile::new(file_name, text.as_str(), language_version));
        }
        self.fallback
            .as_ref()
            .and_then(|host| host.get_source_file(file_name, language_version))
    }

    fn file_exists(&self, file_name: &str) -> bool {
        self.files.borrow().contains_key(file_name)
            || self
                .fallback
                .as_ref()
                .is_some_and(|host| host.file_exists(file_name))
    }

    fn read_file(&self, file_name: &str) -> Option<String> {
        if let Some(text) = self.files.borrow().get(file_name) {
            return Some(text.clone());
        }
        self.fallback
            .as_ref()
            .and_then(|host| host.read_file(file_name))
    }

    fn get_current_directory(&self) -> String {
        self.current_directory.clone()
    }
}
