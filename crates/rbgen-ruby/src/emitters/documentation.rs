use rbgen_core::config::GenerationOptions;

use crate::code_writer::CodeWriter;

/// Write `text` as `#` comments when documentation is enabled.
///
/// One line becomes `# text`. Several lines become a bare `#` followed by one
/// comment line per source line, indented by one indent unit.
pub fn write_documentation(out: &mut CodeWriter, text: &str, options: &GenerationOptions) {
    let text = text.trim();
    if !options.documentation || text.is_empty() {
        return;
    }

    let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    if let [single] = lines.as_slice() {
        out.write_line(format!("# {single}"));
        return;
    }

    let unit = out.indent_unit().to_string();
    out.write_line("#");
    for line in lines {
        if line.is_empty() {
            out.write_line("#");
        } else {
            out.write_line(format!("# {unit}{line}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(text: &str, documentation: bool) -> String {
        let options = GenerationOptions {
            documentation,
            ..GenerationOptions::default()
        };
        let mut out = CodeWriter::new(options.indent_unit());
        write_documentation(&mut out, text, &options);
        out.data()
    }

    #[test]
    fn test_single_line() {
        assert_eq!(render("  A shopping cart. \n", true), "# A shopping cart.");
    }

    #[test]
    fn test_multi_line() {
        assert_eq!(
            render("First line.\n\nThird line.", true),
            "#\n#   First line.\n#\n#   Third line."
        );
    }

    #[test]
    fn test_disabled_or_blank() {
        assert_eq!(render("Hidden.", false), "");
        assert_eq!(render("   \n ", true), "");
    }
}
