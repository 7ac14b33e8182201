//! UI hierarchy attributes exposed by the `source` step.

/// Node attributes included when the hierarchy is serialized to XML.
pub const XML_EXPOSABLE_ATTRIBUTES: &[&str] = &[
    "index",
    "package",
    "class",
    "text",
    "original-text",
    "resource-id",
    "content-desc",
    "checkable",
    "checked",
    "clickable",
    "enabled",
    "focusable",
    "focused",
    "long-clickable",
    "password",
    "scrollable",
    "selected",
    "bounds",
    "displayed",
    "hint",
];
