//! Canvas board documents.
//!
//! A board is a JSON node graph. Task lines live inside nodes of type
//! `"text"`, whose `text` field is one free-form multi-line blob. This
//! module models the document (preserving fields it does not understand) and
//! manages named sections inside text nodes: finding the node that holds a
//! section heading, synthesizing one when absent and inserting task lines
//! under a heading.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::config::BoardConfig;
use crate::error::{Error, Result};

/// One node in a board graph. Non-text nodes are carried through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub x: i64,
    #[serde(default)]
    pub y: i64,
    #[serde(default)]
    pub width: i64,
    #[serde(default)]
    pub height: i64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl BoardNode {
    pub fn is_text(&self) -> bool {
        self.node_type == "text"
    }
}

/// A parsed board document. Edges and unknown top-level fields pass through
/// serialization unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardDocument {
    #[serde(default)]
    pub nodes: Vec<BoardNode>,
    #[serde(default)]
    pub edges: Vec<Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl BoardDocument {
    /// Parse board JSON; `path` is only used for error reporting.
    pub fn parse(content: &str, path: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|_| Error::NotABoard(path.to_string()))
    }

    pub fn render(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn node_index(&self, node_id: &str) -> Option<usize> {
        self.nodes.iter().position(|node| node.id == node_id)
    }

    /// Find the text node that holds a heading containing `section_name`,
    /// or the node with an explicit id, or synthesize a new node.
    ///
    /// Resolution order:
    /// 1. Explicit `node_id`: a miss is a hard failure, no fallback.
    /// 2. `section_name`: first text node whose content has a matching
    ///    heading line wins; otherwise a new node is created to the right
    ///    of the existing ones with the heading as its initial text.
    /// 3. Neither: first text node, or one empty node at the origin when
    ///    the board is empty.
    ///
    /// Returns the index of the chosen node.
    pub fn find_or_create_text_node(
        &mut self,
        node_id: Option<&str>,
        section_name: Option<&str>,
        layout: &BoardConfig,
    ) -> Result<usize> {
        if let Some(id) = node_id {
            return self
                .node_index(id)
                .ok_or_else(|| Error::NodeNotFound(id.to_string()));
        }

        if let Some(section) = section_name {
            let found = self.nodes.iter().position(|node| {
                node.is_text()
                    && node
                        .text
                        .as_deref()
                        .map(|text| find_heading(text, section).is_some())
                        .unwrap_or(false)
            });
            if let Some(index) = found {
                return Ok(index);
            }
            return Ok(self.push_text_node(format!("## {}\n", section), layout));
        }

        if let Some(index) = self.nodes.iter().position(BoardNode::is_text) {
            return Ok(index);
        }
        Ok(self.push_text_node(String::new(), layout))
    }

    fn push_text_node(&mut self, text: String, layout: &BoardConfig) -> usize {
        let x = self.nodes.len() as i64 * layout.node_spacing;
        self.nodes.push(BoardNode {
            id: Uuid::new_v4().to_string(),
            node_type: "text".to_string(),
            text: Some(text),
            x,
            y: 0,
            width: layout.node_width,
            height: layout.node_height,
            extra: serde_json::Map::new(),
        });
        self.nodes.len() - 1
    }
}

fn is_heading(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

/// Index of the heading line containing `section_name`, if any.
fn find_heading(text: &str, section_name: &str) -> Option<usize> {
    text.lines()
        .position(|line| is_heading(line) && line.contains(section_name))
}

/// Insert a task line into a node's text under a section heading.
///
/// With a section: the line lands directly after the heading, before the
/// next heading or end of text; an absent heading is appended as a new
/// `## <section>` block. Without a section the line is appended to the
/// existing text, or replaces empty text outright.
pub fn insert_task_into_section(
    node_text: &str,
    task_line: &str,
    section_name: Option<&str>,
) -> String {
    let Some(section) = section_name else {
        if node_text.trim().is_empty() {
            return task_line.to_string();
        }
        let mut out = node_text.trim_end_matches('\n').to_string();
        out.push('\n');
        out.push_str(task_line);
        return out;
    };

    let mut lines: Vec<&str> = node_text.lines().collect();
    match find_heading(node_text, section) {
        Some(heading_index) => {
            lines.insert(heading_index + 1, task_line);
            let mut out = lines.join("\n");
            if node_text.ends_with('\n') {
                out.push('\n');
            }
            out
        }
        None => {
            let mut out = node_text.trim_end_matches('\n').to_string();
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("## {}\n{}", section, task_line));
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with_text(id: &str, text: &str) -> BoardDocument {
        BoardDocument {
            nodes: vec![BoardNode {
                id: id.to_string(),
                node_type: "text".to_string(),
                text: Some(text.to_string()),
                x: 0,
                y: 0,
                width: 250,
                height: 280,
                extra: serde_json::Map::new(),
            }],
            edges: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn explicit_node_id_miss_is_hard_failure() {
        let mut board = board_with_text("n1", "## Tasks\n");
        let err = board
            .find_or_create_text_node(Some("missing"), Some("Tasks"), &BoardConfig::default())
            .unwrap_err();
        assert!(matches!(err, Error::NodeNotFound(_)));
    }

    #[test]
    fn section_scan_finds_first_matching_node() {
        let mut board = board_with_text("n1", "notes only\n");
        board.nodes.push(BoardNode {
            id: "n2".to_string(),
            text: Some("## Completed Tasks\n- [x] old\n".to_string()),
            ..board.nodes[0].clone()
        });
        let index = board
            .find_or_create_text_node(None, Some("Completed Tasks"), &BoardConfig::default())
            .expect("node");
        assert_eq!(board.nodes[index].id, "n2");
    }

    #[test]
    fn missing_section_synthesizes_offset_node() {
        let mut board = board_with_text("n1", "notes\n");
        let layout = BoardConfig::default();
        let index = board
            .find_or_create_text_node(None, Some("Done"), &layout)
            .expect("node");
        let node = &board.nodes[index];
        assert_eq!(node.x, layout.node_spacing);
        assert_eq!(node.y, 0);
        assert_eq!(node.text.as_deref(), Some("## Done\n"));
    }

    #[test]
    fn empty_board_without_hints_gets_origin_node() {
        let mut board = BoardDocument::default();
        let index = board
            .find_or_create_text_node(None, None, &BoardConfig::default())
            .expect("node");
        assert_eq!(board.nodes[index].x, 0);
        assert_eq!(board.nodes[index].text.as_deref(), Some(""));
    }

    #[test]
    fn insert_lands_directly_after_heading() {
        let text = "## Done\n- [x] first\n## Later\n- [ ] other";
        let updated = insert_task_into_section(text, "- [x] new", Some("Done"));
        assert_eq!(updated, "## Done\n- [x] new\n- [x] first\n## Later\n- [ ] other");
    }

    #[test]
    fn insert_appends_new_section_block() {
        let updated = insert_task_into_section("notes", "- [x] new", Some("Done"));
        assert_eq!(updated, "notes\n## Done\n- [x] new");
    }

    #[test]
    fn insert_without_section_appends_or_replaces() {
        assert_eq!(insert_task_into_section("", "- [x] new", None), "- [x] new");
        assert_eq!(
            insert_task_into_section("text\n", "- [x] new", None),
            "text\n- [x] new"
        );
    }

    #[test]
    fn unknown_board_fields_survive_round_trip() {
        let raw = r#"{"nodes":[{"id":"n","type":"text","text":"hi","x":1,"y":2,"width":3,"height":4,"color":"5"}],"edges":[{"id":"e"}],"metadata":{"v":1}}"#;
        let board = BoardDocument::parse(raw, "b.canvas").expect("parse");
        let rendered = board.render().expect("render");
        let reparsed = BoardDocument::parse(&rendered, "b.canvas").expect("reparse");
        assert_eq!(reparsed.nodes[0].extra.get("color"), board.nodes[0].extra.get("color"));
        assert_eq!(reparsed.extra.get("metadata"), board.extra.get("metadata"));
    }
}
