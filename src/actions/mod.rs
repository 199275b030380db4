//! Action executors.
//!
//! One module per action kind, each exposing an [`Executor`] handler triple
//! (validate, execute, describe) registered in the dispatcher's table. The
//! execute functions validate their config first and fail fast when the
//! dispatcher routed the wrong kind to them.

pub mod archive;
pub mod complete;
pub mod delete;
pub mod duplicate;
pub mod keep;
pub mod mv;

use crate::board::{insert_task_into_section, BoardDocument};
use crate::dispatch::ExecutionContext;
use crate::error::{Error, Result};
use crate::locate::FlatDocument;

/// Today's date in the `YYYY-MM-DD` form used by line annotations.
pub(crate) fn today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}

fn is_board_path(path: &str) -> bool {
    path.ends_with(".canvas")
}

fn is_heading(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

/// Insert a task line into a flat-text document, optionally under a section
/// heading. A missing heading is appended together with the line at the end.
pub(crate) fn insert_line_into_flat(
    document: &mut FlatDocument,
    line: &str,
    section: Option<&str>,
) {
    let Some(section) = section else {
        document.append_line(line);
        return;
    };

    let heading = (0..document.line_count()).find(|&index| {
        document
            .line(index)
            .map(|candidate| is_heading(candidate) && candidate.contains(section))
            .unwrap_or(false)
    });

    match heading {
        Some(index) => document.insert_line(index + 1, line),
        None => {
            document.append_line(&format!("## {}", section));
            document.append_line(line);
        }
    }
}

/// Find or create the target document and insert a task line into it.
///
/// This is the target half of move/archive/duplicate. It runs before any
/// source mutation: a creation failure here must leave the source untouched,
/// so callers sequence it first. `.canvas` targets go through the board
/// section manager; everything else is flat text.
pub(crate) fn write_line_to_target(
    ctx: ExecutionContext<'_>,
    target_file: &str,
    line: &str,
    section: Option<&str>,
) -> Result<()> {
    if !ctx.docs.exists(target_file) {
        ctx.docs
            .create(target_file, "")
            .map_err(|_| Error::TargetFileCreation(target_file.to_string()))?;
    }

    if is_board_path(target_file) {
        let content = ctx.docs.read(target_file)?;
        let mut board = if content.trim().is_empty() {
            BoardDocument::default()
        } else {
            BoardDocument::parse(&content, target_file)?
        };
        let index = board.find_or_create_text_node(None, section, &ctx.config.board)?;
        let text = board.nodes[index].text.take().unwrap_or_default();
        board.nodes[index].text = Some(insert_task_into_section(&text, line, section));
        ctx.docs.write(target_file, &board.render()?)
    } else {
        let mut document = FlatDocument::parse(&ctx.docs.read(target_file)?);
        insert_line_into_flat(&mut document, line, section);
        ctx.docs.write(target_file, &document.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_into_flat_appends_without_section() {
        let mut document = FlatDocument::parse("existing\n");
        insert_line_into_flat(&mut document, "- [ ] new", None);
        assert_eq!(document.render(), "existing\n- [ ] new\n");
    }

    #[test]
    fn insert_into_flat_lands_after_heading() {
        let mut document = FlatDocument::parse("# Top\n## Done\n- [x] old\n");
        insert_line_into_flat(&mut document, "- [x] new", Some("Done"));
        assert_eq!(document.render(), "# Top\n## Done\n- [x] new\n- [x] old\n");
    }

    #[test]
    fn insert_into_flat_creates_missing_section() {
        let mut document = FlatDocument::parse("intro\n");
        insert_line_into_flat(&mut document, "- [x] new", Some("Done"));
        assert_eq!(document.render(), "intro\n## Done\n- [x] new\n");
    }
}
