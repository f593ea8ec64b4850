//! Parser for the indentation-based infographic syntax.
//!
//! The parser never fails: the model's reply is rendered while it is still
//! streaming, so truncated lines, missing blocks and unknown keys are all
//! accepted and simply contribute less to the document.

/// Parsed infographic description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    /// Template named on the `infographic` line.
    pub template: Option<String>,
    pub title: Option<String>,
    pub desc: Option<String>,
    pub items: Vec<Item>,
    /// Colours from `theme.palette`.
    pub palette: Vec<String>,
}

impl Document {
    /// Whether the document has anything worth drawing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.template.is_none() && self.title.is_none() && self.items.is_empty()
    }
}

/// One entry of `data.items` (or of an item's `children`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Item {
    pub label: Option<String>,
    pub value: Option<f64>,
    pub desc: Option<String>,
    pub icon: Option<String>,
    pub time: Option<String>,
    pub children: Vec<Item>,
}

/// Intermediate tree node: `key value` with nested lines.
#[derive(Debug, Default)]
struct Node {
    key: String,
    value: String,
    children: Vec<usize>,
}

/// Node key used for `- ` list entries.
const LIST_ENTRY: &str = "-";

/// Strip a fenced code block from a model reply.
///
/// Returns the fence body if the reply contains a fence (even one that is
/// not closed yet), otherwise the trimmed reply.
#[must_use]
pub fn extract_syntax(reply: &str) -> &str {
    let Some(open) = reply.find("```") else {
        return reply.trim();
    };

    // Skip the info string (`plain`) up to the end of the fence line
    let after_open = &reply[open + 3..];
    let Some(body_start) = after_open.find('\n') else {
        return "";
    };
    let body = &after_open[body_start + 1..];

    match body.find("```") {
        Some(close) => body[..close].trim_end(),
        None => body.trim_end(),
    }
}

/// Parse syntax text into a [`Document`].
#[must_use]
pub fn parse(text: &str) -> Document {
    let (nodes, roots) = build_tree(text);
    let mut doc = Document::default();

    for &root in &roots {
        let node = &nodes[root];
        match node.key.as_str() {
            "infographic" if !node.value.is_empty() => doc.template = Some(node.value.clone()),
            "data" => {
                for &child in &node.children {
                    let field = &nodes[child];
                    match field.key.as_str() {
                        "title" => doc.title = non_empty(&field.value),
                        "desc" => doc.desc = non_empty(&field.value),
                        "items" => doc.items = collect_items(&nodes, field),
                        _ => {}
                    }
                }
            }
            "theme" => {
                for &child in &node.children {
                    let field = &nodes[child];
                    if field.key == "palette" {
                        doc.palette = field.value.split_whitespace().map(str::to_string).collect();
                    }
                }
            }
            _ => {}
        }
    }

    doc
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn collect_items(nodes: &[Node], parent: &Node) -> Vec<Item> {
    parent
        .children
        .iter()
        .map(|&idx| &nodes[idx])
        .filter(|node| node.key == LIST_ENTRY)
        .map(|entry| {
            let mut item = Item::default();
            for &idx in &entry.children {
                let field = &nodes[idx];
                match field.key.as_str() {
                    "label" => item.label = non_empty(&field.value),
                    "value" => item.value = field.value.parse().ok(),
                    "desc" => item.desc = non_empty(&field.value),
                    "icon" => item.icon = non_empty(&field.value),
                    "time" => item.time = non_empty(&field.value),
                    "children" => item.children = collect_items(nodes, field),
                    _ => {}
                }
            }
            item
        })
        .collect()
}

/// Build the indentation tree. Returns the node arena and the root indices.
fn build_tree(text: &str) -> (Vec<Node>, Vec<usize>) {
    let mut nodes: Vec<Node> = Vec::new();
    let mut roots = Vec::new();
    // (indent, node index) of the currently open ancestors
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for raw in text.lines() {
        let trimmed = raw.trim_start();
        if trimmed.trim().is_empty() {
            continue;
        }
        let indent = raw.len() - trimmed.len();
        let trimmed = trimmed.trim_end();

        while stack.last().is_some_and(|&(open, _)| open >= indent) {
            stack.pop();
        }

        let (entry_indent, text) = match trimmed.strip_prefix('-') {
            Some(rest) if rest.is_empty() || rest.starts_with(' ') => {
                let entry = nodes.len();
                nodes.push(Node {
                    key: LIST_ENTRY.to_string(),
                    ..Node::default()
                });
                attach(&mut nodes, &mut roots, &stack, entry);
                stack.push((indent, entry));
                (indent + 2, rest.trim_start())
            }
            _ => (indent, trimmed),
        };

        if text.is_empty() {
            continue;
        }

        let (key, value) = match text.split_once(char::is_whitespace) {
            Some((key, value)) => (key, value.trim()),
            None => (text, ""),
        };
        let idx = nodes.len();
        nodes.push(Node {
            key: key.to_string(),
            value: value.to_string(),
            children: Vec::new(),
        });
        attach(&mut nodes, &mut roots, &stack, idx);
        stack.push((entry_indent, idx));
    }

    (nodes, roots)
}

fn attach(nodes: &mut [Node], roots: &mut Vec<usize>, stack: &[(usize, usize)], idx: usize) {
    match stack.last() {
        Some(&(_, parent)) => nodes[parent].children.push(idx),
        None => roots.push(idx),
    }
}
