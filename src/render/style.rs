//! Node and link styles, and their resolution per page kind.

use serde::{Deserialize, Serialize};

use crate::model::Page;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrokeStyle {
    Solid,
    Dashed,
    Dotted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FillStyle {
    Solid,
    Hachure,
    CrossHatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Arrowhead {
    Arrow,
    Triangle,
    Dot,
    Bar,
}

/// What the canvas needs to draw the next element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleContext {
    pub stroke_color: String,
    pub background_color: String,
    pub stroke_width: f64,
    pub stroke_style: StrokeStyle,
    pub fill_style: FillStyle,
    pub font_size: f64,
    pub font_family: String,
}

impl Default for StyleContext {
    fn default() -> Self {
        Self {
            stroke_color: "#1e1e1e".into(),
            background_color: "transparent".into(),
            stroke_width: 1.0,
            stroke_style: StrokeStyle::Solid,
            fill_style: FillStyle::Solid,
            font_size: 20.0,
            font_family: "Virgil".into(),
        }
    }
}

/// Fully resolved node style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeStyle {
    pub prefix: String,
    pub text_color: String,
    pub background_color: String,
    pub border_color: String,
    pub stroke_width: f64,
    pub stroke_style: StrokeStyle,
    pub fill_style: FillStyle,
    pub font_size: f64,
    pub font_family: String,
    pub padding: f64,
    pub gate_radius: f64,
    pub gate_color: String,
    pub max_label_length: usize,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            text_color: "#ffffffff".into(),
            background_color: "#00000066".into(),
            border_color: "#00000000".into(),
            stroke_width: 1.0,
            stroke_style: StrokeStyle::Solid,
            fill_style: FillStyle::Solid,
            font_size: 20.0,
            font_family: "Virgil".into(),
            padding: 10.0,
            gate_radius: 5.0,
            gate_color: "#ffffffff".into(),
            max_label_length: 30,
        }
    }
}

impl NodeStyle {
    /// Prefix plus title, truncated to `max_label_length` characters.
    pub fn label_for(&self, title: &str) -> String {
        let label = format!("{}{}", self.prefix, title);
        if label.chars().count() > self.max_label_length {
            let mut short: String = label.chars().take(self.max_label_length.saturating_sub(1)).collect();
            short.push('…');
            short
        } else {
            label
        }
    }

    pub fn text_context(&self) -> StyleContext {
        StyleContext {
            stroke_color: self.text_color.clone(),
            background_color: self.background_color.clone(),
            stroke_width: self.stroke_width,
            stroke_style: self.stroke_style,
            fill_style: self.fill_style,
            font_size: self.font_size,
            font_family: self.font_family.clone(),
        }
    }

    /// Gates are filled when the node has neighbours of that kind.
    pub fn gate_context(&self, filled: bool) -> StyleContext {
        StyleContext {
            stroke_color: self.gate_color.clone(),
            background_color: if filled { self.gate_color.clone() } else { "transparent".into() },
            stroke_width: self.stroke_width,
            stroke_style: StrokeStyle::Solid,
            fill_style: FillStyle::Solid,
            font_size: self.font_size,
            font_family: self.font_family.clone(),
        }
    }
}

/// Partial node style layered over the base style.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeStyleOverride {
    pub prefix: Option<String>,
    pub text_color: Option<String>,
    pub background_color: Option<String>,
    pub border_color: Option<String>,
    pub stroke_style: Option<StrokeStyle>,
    pub fill_style: Option<FillStyle>,
    pub font_size: Option<f64>,
    pub gate_color: Option<String>,
}

impl NodeStyleOverride {
    pub fn apply(&self, style: &mut NodeStyle) {
        if let Some(v) = &self.prefix { style.prefix = v.clone(); }
        if let Some(v) = &self.text_color { style.text_color = v.clone(); }
        if let Some(v) = &self.background_color { style.background_color = v.clone(); }
        if let Some(v) = &self.border_color { style.border_color = v.clone(); }
        if let Some(v) = self.stroke_style { style.stroke_style = v; }
        if let Some(v) = self.fill_style { style.fill_style = v; }
        if let Some(v) = self.font_size { style.font_size = v; }
        if let Some(v) = &self.gate_color { style.gate_color = v.clone(); }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkStyle {
    pub stroke_color: String,
    pub stroke_width: f64,
    pub stroke_style: StrokeStyle,
    pub start_arrowhead: Option<Arrowhead>,
    pub end_arrowhead: Option<Arrowhead>,
}

impl Default for LinkStyle {
    fn default() -> Self {
        Self {
            stroke_color: "#ffffffff".into(),
            stroke_width: 1.0,
            stroke_style: StrokeStyle::Solid,
            start_arrowhead: None,
            end_arrowhead: None,
        }
    }
}

impl LinkStyle {
    pub fn context(&self) -> StyleContext {
        StyleContext {
            stroke_color: self.stroke_color.clone(),
            stroke_width: self.stroke_width,
            stroke_style: self.stroke_style,
            ..StyleContext::default()
        }
    }
}

/// Style configuration: a base node style plus per-kind overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleSettings {
    pub base: NodeStyle,
    pub virtual_node: NodeStyleOverride,
    pub attachment: NodeStyleOverride,
    pub folder: NodeStyleOverride,
    pub tag: NodeStyleOverride,
    pub inferred: NodeStyleOverride,
    pub sibling: NodeStyleOverride,
    pub central: NodeStyleOverride,
    pub link: LinkStyle,
    pub inferred_link: LinkStyle,
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            base: NodeStyle::default(),
            virtual_node: NodeStyleOverride {
                background_color: Some("#ff000066".into()),
                fill_style: Some(FillStyle::Hachure),
                ..Default::default()
            },
            attachment: NodeStyleOverride {
                prefix: Some("📎 ".into()),
                ..Default::default()
            },
            folder: NodeStyleOverride {
                prefix: Some("📂 ".into()),
                ..Default::default()
            },
            tag: NodeStyleOverride {
                prefix: Some("🏷 ".into()),
                ..Default::default()
            },
            inferred: NodeStyleOverride {
                background_color: Some("#000005b3".into()),
                text_color: Some("#95c7f3ff".into()),
                ..Default::default()
            },
            sibling: NodeStyleOverride {
                text_color: Some("#868e96ff".into()),
                ..Default::default()
            },
            central: NodeStyleOverride {
                background_color: Some("#c49a13ff".into()),
                text_color: Some("#000000ff".into()),
                font_size: Some(30.0),
                ..Default::default()
            },
            link: LinkStyle::default(),
            inferred_link: LinkStyle {
                stroke_style: StrokeStyle::Dashed,
                ..LinkStyle::default()
            },
        }
    }
}

impl StyleSettings {
    /// Base, then page kind, then inferred, then sibling, then central.
    pub fn node_style(&self, page: &Page, is_inferred: bool, is_sibling: bool, is_central: bool) -> NodeStyle {
        let mut style = self.base.clone();
        if page.is_virtual { self.virtual_node.apply(&mut style); }
        if page.is_attachment { self.attachment.apply(&mut style); }
        if page.is_folder { self.folder.apply(&mut style); }
        if page.is_tag { self.tag.apply(&mut style); }
        if is_inferred { self.inferred.apply(&mut style); }
        if is_sibling { self.sibling.apply(&mut style); }
        if is_central { self.central.apply(&mut style); }
        style
    }

    pub fn link_style(&self, is_inferred: bool) -> LinkStyle {
        if is_inferred { self.inferred_link.clone() } else { self.link.clone() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_labels_are_truncated() {
        let style = NodeStyle { max_label_length: 5, ..NodeStyle::default() };
        assert_eq!(style.label_for("Hello"), "Hello");
        assert_eq!(style.label_for("Hello world"), "Hell…");
    }

    #[test]
    fn overrides_layer_in_order() {
        let styles = StyleSettings::default();
        let page = Page::folder("notes");
        let style = styles.node_style(&page, true, false, true);
        assert_eq!(style.prefix, "📂 ");
        assert_eq!(style.font_size, 30.0);
        assert_eq!(style.text_color, "#000000ff");
    }
}
