//! Template catalog and prompt hint toggling.
//!
//! Choosing a template appends a one-line hint to the prompt; choosing "let
//! the model decide" strips it again. The hint is always the last line, so
//! toggling never touches the user's own text.

use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Prefix of the hint line appended to prompts.
pub const HINT_PREFIX: &str = "Use template: ";

/// Matches a trailing hint on its own line, with the newlines before it.
static HINT_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?:\n+|\A)Use template: ([A-Za-z0-9_-]+)\s*\z").ok());

/// One selectable template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    /// Identifier used in the syntax's first line. Empty for "model decides".
    pub id: &'static str,

    /// Human readable label.
    pub label: &'static str,

    /// Listed in the system prompt.
    pub in_prompt: bool,
}

const fn t(id: &'static str, label: &'static str, in_prompt: bool) -> Template {
    Template {
        id,
        label,
        in_prompt,
    }
}

/// All known templates. The first entry lets the model decide.
pub const TEMPLATES: &[Template] = &[
    t("", "Let the model decide", false),
    // sequence
    t("sequence-zigzag-steps-underline-text", "Sequence - zigzag steps - underlined text", true),
    t("sequence-horizontal-zigzag-underline-text", "Sequence - horizontal zigzag - underlined text", true),
    t("sequence-horizontal-zigzag-simple-illus", "Sequence - horizontal zigzag - simple illustration", false),
    t("sequence-circular-simple", "Sequence - circular - simple", true),
    t("sequence-filter-mesh-simple", "Sequence - filter mesh - simple", true),
    t("sequence-mountain-underline-text", "Sequence - mountains - underlined text", true),
    t("sequence-cylinders-3d-simple", "Sequence - 3D cylinders - simple", true),
    t("sequence-color-snake-steps-horizontal-icon-line", "Sequence - coloured snake steps - horizontal icon line", true),
    t("sequence-pyramid-simple", "Sequence - pyramid - simple", true),
    t("sequence-roadmap-vertical-simple", "Sequence - vertical roadmap - simple", true),
    t("sequence-roadmap-vertical-plain-text", "Sequence - vertical roadmap - plain text", false),
    t("sequence-zigzag-pucks-3d-simple", "Sequence - zigzag pucks - 3D simple", true),
    t("sequence-ascending-steps", "Sequence - ascending steps", true),
    t("sequence-ascending-stairs-3d-underline-text", "Sequence - 3D ascending stairs - underlined text", true),
    t("sequence-snake-steps-compact-card", "Sequence - snake steps - compact card", false),
    t("sequence-snake-steps-underline-text", "Sequence - snake steps - underlined text", false),
    t("sequence-snake-steps-simple", "Sequence - snake steps - simple", false),
    t("sequence-stairs-front-compact-card", "Sequence - front stairs - compact card", false),
    t("sequence-stairs-front-pill-badge", "Sequence - front stairs - pill badge", false),
    t("sequence-timeline-simple", "Sequence - timeline - simple", false),
    t("sequence-timeline-rounded-rect-node", "Sequence - timeline - rounded nodes", false),
    t("sequence-timeline-simple-illus", "Sequence - timeline - simple illustration", false),
    // compare
    t("compare-binary-horizontal-simple-fold", "Compare - binary horizontal - simple fold", true),
    t("compare-hierarchy-left-right-circle-node-pill-badge", "Compare - left/right hierarchy - circle node pill badge", true),
    t("compare-swot", "Compare - SWOT", true),
    t("compare-binary-horizontal-badge-card-arrow", "Compare - binary horizontal - badge card arrow", true),
    t("compare-binary-horizontal-underline-text-vs", "Compare - binary horizontal - underlined text VS", true),
    // quadrant
    t("quadrant-quarter-simple-card", "Quadrant - quarters - simple card", true),
    t("quadrant-quarter-circular", "Quadrant - quarters - circular", true),
    t("quadrant-simple-illus", "Quadrant - simple illustration", false),
    // relation
    t("relation-circle-icon-badge", "Relation - circle - icon badge", true),
    t("relation-circle-circular-progress", "Relation - circle - circular progress", false),
    // hierarchy
    t("hierarchy-tree-tech-style-capsule-item", "Hierarchy tree - tech style - capsule item", true),
    t("hierarchy-tree-curved-line-rounded-rect-node", "Hierarchy tree - curved lines - rounded nodes", true),
    t("hierarchy-tree-tech-style-badge-card", "Hierarchy tree - tech style - badge card", true),
    t("hierarchy-structure", "Hierarchy - structure", false),
    // chart
    t("chart-column-simple", "Chart - column - simple", true),
    t("chart-bar-plain-text", "Chart - bar - plain text", true),
    t("chart-line-plain-text", "Chart - line - plain text", true),
    t("chart-pie-plain-text", "Chart - pie - plain text", true),
    t("chart-pie-compact-card", "Chart - pie - compact card", true),
    t("chart-pie-donut-plain-text", "Chart - donut - plain text", true),
    t("chart-pie-donut-pill-badge", "Chart - donut - pill badge", true),
    t("chart-wordcloud", "Chart - word cloud", false),
    // list
    t("list-grid-badge-card", "List - grid - badge card", true),
    t("list-grid-candy-card-lite", "List - grid - candy card lite", true),
    t("list-grid-ribbon-card", "List - grid - ribbon card", true),
    t("list-row-horizontal-icon-arrow", "List - horizontal row - icon arrow", true),
    t("list-row-simple-illus", "List - row - simple illustration", false),
    t("list-sector-plain-text", "List - sectors - plain text", true),
    t("list-column-done-list", "List - column - done list", false),
    t("list-column-vertical-icon-arrow", "List - column - vertical icon arrow", false),
    t("list-column-simple-vertical-arrow", "List - column - simple vertical arrow", false),
    t("list-zigzag-down-compact-card", "List - zigzag down - compact card", false),
    t("list-zigzag-down-simple", "List - zigzag down - simple", false),
    t("list-zigzag-up-compact-card", "List - zigzag up - compact card", false),
    t("list-zigzag-up-simple", "List - zigzag up - simple", false),
];

/// Look up a template by id.
#[must_use]
pub fn find(id: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|t| t.id == id)
}

/// Whether `id` names a catalog template (the empty id counts).
#[must_use]
pub fn is_known(id: &str) -> bool {
    find(id).is_some()
}

/// Validate a template id chosen by the user.
///
/// An empty id means "let the model decide" and maps to `None`.
///
/// # Errors
///
/// Returns [`Error::InvalidTemplate`] if the id is not in the catalog.
pub fn resolve(id: &str) -> Result<Option<&'static Template>> {
    let id = id.trim();
    if id.is_empty() {
        return Ok(None);
    }
    find(id)
        .map(Some)
        .ok_or_else(|| Error::InvalidTemplate(id.to_string()))
}

/// The hint appended for `id`.
#[must_use]
pub fn hint(id: &str) -> String {
    format!("\n\n{HINT_PREFIX}{id}")
}

/// Template id currently hinted at the end of `prompt`, if any.
#[must_use]
pub fn current_template(prompt: &str) -> Option<&str> {
    HINT_RE
        .as_ref()?
        .captures(prompt)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Remove a trailing template hint, leaving everything before it untouched.
#[must_use]
pub fn strip_hint(prompt: &str) -> &str {
    let Some(re) = HINT_RE.as_ref() else {
        return prompt;
    };
    match re.find(prompt) {
        Some(m) => &prompt[..m.start()],
        None => prompt,
    }
}

/// Set the template hint of `prompt`.
///
/// `Some(id)` appends the hint unless the prompt already ends with it; a hint
/// for a different template is replaced. `None` or an empty id removes any
/// existing hint.
#[must_use]
pub fn apply_template(prompt: &str, template: Option<&str>) -> String {
    let base = strip_hint(prompt);
    match template.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => format!("{base}{}", hint(id)),
        None => base.to_string(),
    }
}
