//! The fixed screen layout shown by the virtual device.

use std::fmt::Write;

use cadence_domain::gesture::{Locator, Offset};

/// Element rectangle in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Bounds {
    /// The rectangle's center.
    #[must_use]
    pub fn center(&self) -> Offset {
        Offset {
            x: f64::midpoint(self.left, self.right),
            y: f64::midpoint(self.top, self.bottom),
        }
    }

    /// The absolute point at `offset` from the top-left corner.
    #[must_use]
    pub fn relative(&self, offset: Offset) -> Offset {
        Offset {
            x: self.left + offset.x,
            y: self.top + offset.y,
        }
    }
}

/// One node of the simulated UI tree.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualElement {
    /// Element reference handed out to clients.
    pub id: &'static str,
    pub class: &'static str,
    pub resource_id: &'static str,
    pub text: &'static str,
    pub content_desc: &'static str,
    pub clickable: bool,
    pub bounds: Bounds,
}

impl VirtualElement {
    /// Whether `locator` selects this element.
    ///
    /// Supports the `id`, `accessibility id` and `class name` strategies.
    #[must_use]
    pub fn matches(&self, locator: &Locator) -> bool {
        match locator.strategy.as_str() {
            "id" => {
                self.resource_id == locator.selector
                    || self
                        .resource_id
                        .rsplit_once(":id/")
                        .is_some_and(|(_, short)| short == locator.selector)
            }
            "accessibility id" => self.content_desc == locator.selector,
            "class name" => self.class == locator.selector,
            _ => false,
        }
    }

    /// Render the node as an XML element, exposing only `attributes`.
    pub(crate) fn write_xml(&self, out: &mut String, index: usize, attributes: &[&str]) {
        let values = [
            ("index", index.to_string()),
            ("package", crate::PACKAGE.to_string()),
            ("class", self.class.to_string()),
            ("text", self.text.to_string()),
            ("resource-id", self.resource_id.to_string()),
            ("content-desc", self.content_desc.to_string()),
            ("clickable", self.clickable.to_string()),
            ("enabled", "true".to_string()),
            ("displayed", "true".to_string()),
            (
                "bounds",
                format!(
                    "[{},{}][{},{}]",
                    self.bounds.left, self.bounds.top, self.bounds.right, self.bounds.bottom
                ),
            ),
        ];

        let _ = write!(out, "<{}", self.class);
        for (name, value) in values.iter().filter(|(name, _)| attributes.contains(name)) {
            let _ = write!(out, " {name}=\"{}\"", escape(value));
        }
        out.push_str("/>");
    }
}

/// Default layout for a screen of `width` x `height` pixels: a title and
/// two buttons.
pub(crate) fn default_layout(width: u32, height: u32) -> Vec<VirtualElement> {
    let width = f64::from(width);
    let height = f64::from(height);
    vec![
        VirtualElement {
            id: "title",
            class: "android.widget.TextView",
            resource_id: "io.cadence.virtual:id/title",
            text: "Virtual device",
            content_desc: "",
            clickable: false,
            bounds: Bounds {
                left: 0.0,
                top: 0.0,
                right: width,
                bottom: height / 10.0,
            },
        },
        VirtualElement {
            id: "ok",
            class: "android.widget.Button",
            resource_id: "io.cadence.virtual:id/ok_button",
            text: "OK",
            content_desc: "confirm",
            clickable: true,
            bounds: Bounds {
                left: width / 4.0,
                top: height / 2.0,
                right: width * 3.0 / 4.0,
                bottom: height / 2.0 + height / 10.0,
            },
        },
        VirtualElement {
            id: "cancel",
            class: "android.widget.Button",
            resource_id: "io.cadence.virtual:id/cancel_button",
            text: "Cancel & close",
            content_desc: "cancel",
            clickable: true,
            bounds: Bounds {
                left: width / 4.0,
                top: height * 3.0 / 4.0,
                right: width * 3.0 / 4.0,
                bottom: height * 3.0 / 4.0 + height / 10.0,
            },
        },
    ]
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locator(strategy: &str, selector: &str) -> Locator {
        Locator {
            strategy: strategy.to_string(),
            selector: selector.to_string(),
            context: None,
        }
    }

    #[test]
    fn should_match_full_and_short_resource_ids() {
        let layout = default_layout(1080, 1920);
        let ok = &layout[1];
        assert!(ok.matches(&locator("id", "io.cadence.virtual:id/ok_button")));
        assert!(ok.matches(&locator("id", "ok_button")));
        assert!(ok.matches(&locator("accessibility id", "confirm")));
        assert!(!ok.matches(&locator("xpath", "//*")));
    }

    #[test]
    fn should_expose_only_allowed_attributes_and_escape_values() {
        let layout = default_layout(1080, 1920);
        let mut out = String::new();
        layout[2].write_xml(&mut out, 2, &["text", "index"]);
        assert_eq!(
            out,
            "<android.widget.Button index=\"2\" text=\"Cancel &amp; close\"/>"
        );
    }

    #[test]
    fn should_compute_center_and_relative_points() {
        let bounds = Bounds {
            left: 10.0,
            top: 20.0,
            right: 30.0,
            bottom: 60.0,
        };
        assert_eq!(bounds.center(), Offset { x: 20.0, y: 40.0 });
        assert_eq!(bounds.relative(Offset { x: 1.0, y: 2.0 }), Offset { x: 11.0, y: 22.0 });
    }
}
