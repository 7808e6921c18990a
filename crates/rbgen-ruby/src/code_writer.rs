use rbgen_core::transform::name_normalizer::file_stem;

/// Append-only line buffer with a stack of indentation units.
#[derive(Debug, Clone)]
pub struct CodeWriter {
    lines: Vec<String>,
    indent_unit: String,
    indentations: Vec<String>,
}

impl CodeWriter {
    pub fn new(indent_unit: impl Into<String>) -> Self {
        Self {
            lines: Vec::new(),
            indent_unit: indent_unit.into(),
            indentations: Vec::new(),
        }
    }

    pub fn indent(&mut self) {
        self.indentations.push(self.indent_unit.clone());
    }

    /// Pop one level; a no-op at the left margin.
    pub fn outdent(&mut self) {
        self.indentations.pop();
    }

    pub fn depth(&self) -> usize {
        self.indentations.len()
    }

    pub fn indent_unit(&self) -> &str {
        &self.indent_unit
    }

    /// Append `line` at the current indentation. An empty line is written
    /// without indentation.
    pub fn write_line(&mut self, line: impl AsRef<str>) {
        let line = line.as_ref();
        if line.is_empty() {
            self.lines.push(String::new());
        } else {
            self.lines.push(format!("{}{}", self.indentations.concat(), line));
        }
    }

    pub fn blank_line(&mut self) {
        self.lines.push(String::new());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// All lines joined with `\n`.
    pub fn data(&self) -> String {
        self.lines.join("\n")
    }

    /// File stem for a class or module name.
    pub fn file_name(identifier: &str) -> String {
        file_stem(identifier)
    }
}

/// Writes blocks separated by exactly one blank line.
#[derive(Debug, Default)]
pub(crate) struct Separated {
    started: bool,
}

impl Separated {
    /// Call before writing each block.
    pub(crate) fn next(&mut self, out: &mut CodeWriter) {
        if self.started {
            out.blank_line();
        }
        self.started = true;
    }
}
