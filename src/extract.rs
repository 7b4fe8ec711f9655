//! Fenced code-block extraction from model responses.
//!
//! A single pass over the lines with an inside-fence flag. The opening
//! fence header names the language and, optionally, the file; files without
//! names fall back to a per-language default built from a configurable
//! stem. Prose outside fences is dropped, except that callers can recover
//! the text before the first fence to synthesize a README.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// One extracted file: resolved name plus the body between the fences.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedFile {
    pub name: String,
    pub content: String,
}

/// Insertion-ordered name → content collection. Re-extracting a name
/// overwrites in place: the last block wins.
#[derive(Debug, Default)]
pub struct ExtractedFiles {
    files: Vec<ExtractedFile>,
}

impl ExtractedFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<String>) {
        let name = name.into();
        let content = content.into();
        match self.files.iter_mut().find(|f| f.name == name) {
            Some(existing) => existing.content = content,
            None => self.files.push(ExtractedFile { name, content }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.content.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.files.iter().any(|f| f.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|f| f.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Merge another collection into this one, overwriting clashes.
    pub fn merge(&mut self, other: ExtractedFiles) {
        for file in other.files {
            self.insert(file.name, file.content);
        }
    }

    /// Write every file under `dir`, creating the directory and any nested
    /// parents. Existing files are overwritten silently. Returns the paths
    /// written, in insertion order.
    pub fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory {}", dir.display()))?;

        let mut written = Vec::with_capacity(self.files.len());
        for file in &self.files {
            let path = dir.join(&file.name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, &file.content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            written.push(path);
        }
        Ok(written)
    }
}

/// Scans response text for fenced code blocks and resolves file names.
pub struct CodeExtractor {
    default_stem: String,
}

impl Default for CodeExtractor {
    fn default() -> Self {
        Self::new("Component")
    }
}

impl CodeExtractor {
    pub fn new(default_stem: impl Into<String>) -> Self {
        Self {
            default_stem: default_stem.into(),
        }
    }

    /// One pass over the lines. Blocks whose header yields no usable file
    /// name, and blocks with no body, are dropped.
    pub fn extract(&self, text: &str) -> ExtractedFiles {
        let mut files = ExtractedFiles::new();
        let mut in_block = false;
        let mut current_name: Option<String> = None;
        let mut current_code: Vec<&str> = Vec::new();

        for line in text.lines() {
            let trimmed = line.trim();

            if !in_block && trimmed.starts_with("```") {
                in_block = true;
                current_name = self.resolve_name(trimmed);
                continue;
            }

            if in_block && trimmed == "```" {
                in_block = false;
                if let Some(name) = current_name.take() {
                    if !current_code.is_empty() {
                        files.insert(name, current_code.join("\n"));
                    }
                }
                current_code.clear();
                continue;
            }

            if in_block {
                current_code.push(line);
            }
        }

        files
    }

    /// Resolves the header of an opening fence to a file name.
    ///
    /// The remainder after the backticks is `<tag>` optionally followed by
    /// `:` or whitespace and a file name. A name without a dot gets the
    /// tag's extension appended; a missing name falls back to the default
    /// table (None for tags with no default).
    fn resolve_name(&self, header: &str) -> Option<String> {
        let rest = header.trim_start_matches('`').trim();
        if rest.is_empty() {
            return None;
        }

        let (tag, name) = if let Some((tag, name)) = rest.split_once(':') {
            (tag.trim(), Some(name.trim()))
        } else if let Some((tag, name)) = rest.split_once(|c: char| c.is_whitespace()) {
            (tag.trim(), Some(name.trim()))
        } else {
            (rest, None)
        };
        let tag = tag.to_lowercase();

        match name {
            Some(name) if !name.is_empty() => {
                if name.contains('.') {
                    Some(name.to_string())
                } else {
                    Some(format!("{name}{}", extension_for(&tag)))
                }
            }
            _ => self.default_name(&tag),
        }
    }

    fn default_name(&self, tag: &str) -> Option<String> {
        match tag {
            "jsx" | "js" | "javascript" => Some(format!("{}.jsx", self.default_stem)),
            "css" => Some(format!("{}.css", self.default_stem)),
            "html" | "tsx" | "typescript" => Some(format!("{}.{tag}", self.default_stem)),
            _ => None,
        }
    }
}

fn extension_for(tag: &str) -> String {
    match tag {
        "jsx" => ".jsx".to_string(),
        "js" | "javascript" => ".js".to_string(),
        "css" => ".css".to_string(),
        "html" => ".html".to_string(),
        "tsx" => ".tsx".to_string(),
        "typescript" => ".ts".to_string(),
        other => format!(".{other}"),
    }
}

/// Everything before the first fence, used as README prose when a response
/// contains no explicit README block.
pub fn leading_prose(text: &str) -> &str {
    text.split("```").next().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = "\
Here is the component you asked for.

```jsx TodoList.jsx
import React from 'react';

const TodoList = () => <ul />;

export default TodoList;
```

And the styles:

```css
.todo-list { margin: 0; }
```
";

    #[test]
    fn named_block_round_trips_exactly() {
        let files = CodeExtractor::default().extract(RESPONSE);

        let body = files.get("TodoList.jsx").expect("TodoList.jsx extracted");
        assert_eq!(
            body,
            "import React from 'react';\n\nconst TodoList = () => <ul />;\n\nexport default TodoList;"
        );
        assert!(!body.contains("```"));
    }

    #[test]
    fn unnamed_block_uses_the_configured_default_stem() {
        let files = CodeExtractor::new("TodoComponent").extract(RESPONSE);

        assert_eq!(
            files.get("TodoComponent.css"),
            Some(".todo-list { margin: 0; }")
        );
    }

    #[test]
    fn prose_outside_fences_is_discarded() {
        let files = CodeExtractor::default().extract(RESPONSE);
        assert_eq!(files.len(), 2);
        assert!(files.names().all(|n| !n.contains("Here is")));
    }

    #[test]
    fn colon_separated_header_names_the_file() {
        let text = "```jsx: AddTodo.jsx\nconst AddTodo = () => null;\n```\n";
        let files = CodeExtractor::default().extract(text);
        assert_eq!(files.get("AddTodo.jsx"), Some("const AddTodo = () => null;"));
    }

    #[test]
    fn missing_extension_is_appended_from_the_language() {
        let text = "```typescript useTodos\nexport const useTodos = () => [];\n```\n";
        let files = CodeExtractor::default().extract(text);
        assert!(files.contains("useTodos.ts"));
    }

    #[test]
    fn repeated_name_keeps_the_last_block() {
        let text = "```jsx App.jsx\nfirst\n```\n\n```jsx App.jsx\nsecond\n```\n";
        let files = CodeExtractor::default().extract(text);
        assert_eq!(files.len(), 1);
        assert_eq!(files.get("App.jsx"), Some("second"));
    }

    #[test]
    fn unknown_tag_without_name_is_skipped() {
        let text = "```mermaid\ngraph TD;\n```\n";
        let files = CodeExtractor::default().extract(text);
        assert!(files.is_empty());
    }

    #[test]
    fn empty_block_is_not_committed() {
        let text = "```css Empty.css\n```\n";
        let files = CodeExtractor::default().extract(text);
        assert!(files.is_empty());
    }

    #[test]
    fn leading_prose_stops_at_the_first_fence() {
        assert_eq!(
            leading_prose(RESPONSE),
            "Here is the component you asked for.\n\n"
        );
        assert_eq!(leading_prose("no fences at all"), "no fences at all");
    }

    #[test]
    fn write_to_creates_nested_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut files = ExtractedFiles::new();
        files.insert("src/components/TodoList.jsx", "content");
        files.insert("README.md", "# Todo");

        let written = files.write_to(dir.path()).expect("write succeeds");

        assert_eq!(written.len(), 2);
        let nested = dir.path().join("src/components/TodoList.jsx");
        assert_eq!(std::fs::read_to_string(nested).unwrap(), "content");
        assert_eq!(
            std::fs::read_to_string(dir.path().join("README.md")).unwrap(),
            "# Todo"
        );
    }

    #[test]
    fn write_to_overwrites_existing_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("App.jsx"), "old").unwrap();

        let mut files = ExtractedFiles::new();
        files.insert("App.jsx", "new");
        files.write_to(dir.path()).expect("write succeeds");

        assert_eq!(
            std::fs::read_to_string(dir.path().join("App.jsx")).unwrap(),
            "new"
        );
    }
}
