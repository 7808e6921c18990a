use rbgen_core::classify::package_segments_of;
use rbgen_core::model::ElementId;

use super::{FILE_EXTENSION, RenderContext};
use crate::code_writer::CodeWriter;

/// Path of `to`'s file relative to the directory holding `from`'s file.
///
/// Each package below the generation root is one directory level, so
/// siblings resolve to `stem.rb` and other packages go through `../`.
pub fn require_path(ctx: &RenderContext<'_>, from: ElementId, to: ElementId) -> String {
    let from_dirs = package_segments_of(ctx.model, from, ctx.root);
    let to_dirs = package_segments_of(ctx.model, to, ctx.root);
    let common = from_dirs
        .iter()
        .zip(&to_dirs)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = vec!["..".to_string(); from_dirs.len() - common];
    parts.extend(to_dirs[common..].iter().cloned());
    parts.push(format!(
        "{}.{}",
        CodeWriter::file_name(&ctx.model.element(to).name),
        FILE_EXTENSION
    ));
    parts.join("/")
}

pub fn require_line(ctx: &RenderContext<'_>, from: ElementId, to: ElementId) -> String {
    format!("require_relative '{}'", require_path(ctx, from, to))
}
