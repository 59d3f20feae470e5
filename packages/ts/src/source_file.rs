use crate::ScriptTarget;

/// A parsed compilation unit as handed to transformers.
///
/// The host compiler owns the real syntax tree; transformers in this layer
/// see the file name and full text and return a (possibly rewritten) file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    file_name: String,
    text: String,
    language_version: ScriptTarget,
}

impl SourceFile {
    pub fn new(
        file_name: impl Into<String>,
        text: impl Into<String>,
        language_version: ScriptTarget,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            text: text.into(),
            language_version,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn language_version(&self) -> ScriptTarget {
        self.language_version
    }

    pub fn is_declaration_file(&self) -> bool {
        self.file_name.ends_with(".d.ts")
            || self.file_name.ends_with(".d.mts")
            || self.file_name.ends_with(".d.cts")
    }

    /// Returns a copy of this file with its text replaced.
    pub fn update(&self, text: impl Into<String>) -> Self {
        Self {
            file_name: self.file_name.clone(),
            text: text.into(),
            language_version: self.language_version,
        }
    }

    pub fn with_file_name(&self, file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            text: self.text.clone(),
            language_version: self.language_version,
        }
    }
}

pub fn create_source_file(
    file_name: &str,
    source_text: &str,
    language_version: ScriptTarget,
) -> SourceFile {
    SourceFile::new(file_name, source_text, language_version)
}
