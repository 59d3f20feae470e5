//! TypeScript-compatible interfaces and types for the transformer plugin engine.
//! This crate serves as a shared compatibility layer over the host compiler.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub mod emitter;
pub mod host;
pub mod program;
pub mod source_file;
pub mod transformer;
pub mod type_checker;

pub use emitter::*;
pub use host::*;
pub use program::*;
pub use source_file::*;
pub use transformer::*;
pub use type_checker::*;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScriptTarget {
    ES3,
    #[default]
    ES5,
    ES2015,
    ES2016,
    ES2017,
    ES2018,
    ES2019,
    ES2020,
    ES2021,
    ES2022,
    ESNext,
    JSON,
    Latest,
}

impl ScriptTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScriptTarget::ES3 => "es3",
            ScriptTarget::ES5 => "es5",
            ScriptTarget::ES2015 => "es2015",
            ScriptTarget::ES2016 => "es2016",
            ScriptTarget::ES2017 => "es2017",
            ScriptTarget::ES2018 => "es2018",
            ScriptTarget::ES2019 => "es2019",
            ScriptTarget::ES2020 => "es2020",
            ScriptTarget::ES2021 => "es2021",
            ScriptTarget::ES2022 => "es2022",
            ScriptTarget::ESNext => "esnext",
            ScriptTarget::JSON => "json",
            ScriptTarget::Latest => "latest",
        }
    }
}

impl FromStr for ScriptTarget {
    type Err = String;

    /// Target names are matched case-insensitively, the way tsconfig files spell them.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let target = match s.trim().to_ascii_lowercase().as_str() {
            "es3" => ScriptTarget::ES3,
            "es5" => ScriptTarget::ES5,
            "es6" | "es2015" => ScriptTarget::ES2015,
            "es2016" => ScriptTarget::ES2016,
            "es2017" => ScriptTarget::ES2017,
            "es2018" => ScriptTarget::ES2018,
            "es2019" => ScriptTarget::ES2019,
            "es2020" => ScriptTarget::ES2020,
            "es2021" => ScriptTarget::ES2021,
            "es2022" => ScriptTarget::ES2022,
            "esnext" => ScriptTarget::ESNext,
            "json" => ScriptTarget::JSON,
            "latest" => ScriptTarget::Latest,
            _ => return Err(format!("unknown script target '{}'", s)),
        };
        Ok(target)
    }
}

impl Serialize for ScriptTarget {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ScriptTarget {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Suggestion,
    Message,
}

// --- Diagnostic Structures ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticMessageChain {
    String(String),
    Chain {
        message_text: String,
        category: DiagnosticCategory,
        code: i32,
        next: Option<Vec<DiagnosticMessageChain>>,
    },
}

impl DiagnosticMessageChain {
    pub fn new(message: impl Into<String>) -> Self {
        Self::String(message.into())
    }

    /// Head message of the chain.
    pub fn head(&self) -> &str {
        match self {
            DiagnosticMessageChain::String(s) => s,
            DiagnosticMessageChain::Chain { message_text, .. } => message_text,
        }
    }

    /// Flattens the chain into indented lines, the way the CLI reporter prints it.
    pub fn flatten(&self) -> String {
        let mut out = String::new();
        self.flatten_into(&mut out, 0);
        out
    }

    fn flatten_into(&self, out: &mut String, depth: usize) {
        if depth > 0 {
            out.push('\n');
            out.push_str(&"  ".repeat(depth));
        }
        out.push_str(self.head());
        if let DiagnosticMessageChain::Chain {
            next: Some(next), ..
        } = self
        {
            for child in next {
                child.flatten_into(out, depth + 1);
            }
        }
    }
}

impl From<String> for DiagnosticMessageChain {
    fn from(s: String) -> Self {
        DiagnosticMessageChain::String(s)
    }
}

impl From<&str> for DiagnosticMessageChain {
    fn from(s: &str) -> Self {
        DiagnosticMessageChain::String(s.to_string())
    }
}

impl fmt::Display for DiagnosticMessageChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.head())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: i32,
    pub file: Option<String>,
    pub start: Option<usize>,
    pub length: Option<usize>,
    pub message_text: DiagnosticMessageChain,
}

impl Diagnostic {
    pub fn new(
        category: DiagnosticCategory,
        code: i32,
        message_text: impl Into<DiagnosticMessageChain>,
    ) -> Self {
        Self {
            category,
            code,
            file: None,
            start: None,
            length: None,
            message_text: message_text.into(),
        }
    }

    pub fn error(code: i32, message_text: impl Into<DiagnosticMessageChain>) -> Self {
        Self::new(DiagnosticCategory::Error, code, message_text)
    }

    pub fn with_location(mut self, file: impl Into<String>, start: usize, length: usize) -> Self {
        self.file = Some(file.into());
        self.start = Some(start);
        self.length = Some(length);
        self
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let category = match self.category {
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Suggestion => "suggestion",
            DiagnosticCategory::Message => "message",
        };
        if let Some(file) = &self.file {
            write!(f, "{}", file)?;
            if let Some(start) = self.start {
                write!(f, ":{}", start)?;
            }
            write!(f, " - ")?;
        }
        write!(
            f,
            "{} TS{}: {}",
            category,
            self.code,
            self.message_text.flatten()
        )
    }
}
