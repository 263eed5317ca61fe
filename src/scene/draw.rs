//! Drawing an assembled neighbourhood onto the canvas.

use hashbrown::HashMap;
use tracing::debug;

use crate::layout::{Layout, LayoutMode, LayoutSpecification};
use crate::model::{Node, Point, Size};
use crate::render::{ArrowOptions, CanvasRenderer, ElementId, TextOptions};
use crate::settings::Settings;
use crate::{Error, Result};
use super::{region_specs, Metrics, Neighbourhood};

/// What one frame put on the canvas.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawnScene {
    /// page path → text element
    pub nodes: HashMap<String, ElementId>,
    pub arrows: Vec<ElementId>,
    /// Published z-order, bottom first.
    pub order: Vec<ElementId>,
}

/// Measure, lay out and draw `scene`, then publish it with arrows under
/// the nodes. The previous frame is replaced only when publishing succeeds.
pub fn draw<R>(renderer: &mut R, scene: &mut Neighbourhood, settings: &Settings) -> Result<DrawnScene>
where
    R: CanvasRenderer + ?Sized,
{
    if !renderer.is_ready() {
        return Err(Error::RendererUnavailable("canvas is not ready".into()));
    }

    let metrics = Metrics::measure(renderer, &settings.styles.base);
    for node in scene.nodes_mut() {
        renderer.set_style(&node.style.text_context());
        node.label_width = renderer.measure_text(&node.label).width;
    }

    let mode = if settings.compact_view {
        LayoutMode::Compact(settings.compact_tuning)
    } else {
        LayoutMode::Grid
    };
    let specs = region_specs(scene, metrics);
    place(specs.center, std::slice::from_mut(&mut scene.central), mode);
    place(specs.children, &mut scene.children, mode);
    place(specs.left_friends, &mut scene.left_friends, mode);
    place(specs.right_friends, &mut scene.right_friends, mode);
    place(specs.parents, &mut scene.parents, mode);
    place(specs.siblings, &mut scene.siblings, mode);

    let mut drawn = DrawnScene::default();
    let mut node_elements = Vec::new();
    for node in scene.nodes() {
        let (text, mut ids) = draw_node(renderer, node);
        drawn.nodes.insert(node.path.clone(), text);
        node_elements.append(&mut ids);
    }

    for link in &scene.links {
        let (Some(from), Some(to)) = (drawn.nodes.get(&link.source), drawn.nodes.get(&link.target)) else {
            continue;
        };
        renderer.set_style(&link.style.context());
        let options = ArrowOptions {
            start_arrowhead: link.style.start_arrowhead,
            end_arrowhead: link.style.end_arrowhead,
        };
        drawn.arrows.push(renderer.connect(from, to, &options));
    }

    drawn.order = drawn.arrows.iter().cloned().chain(node_elements).collect();
    let published = renderer.update_scene(&drawn.order);
    renderer.clear();
    published?;
    debug!(
        nodes = drawn.nodes.len(),
        arrows = drawn.arrows.len(),
        compact = settings.compact_view,
        "scene published"
    );
    Ok(drawn)
}

fn place(spec: LayoutSpecification, nodes: &mut [Node], mode: LayoutMode) {
    Layout::new(spec).render(nodes, mode);
}

/// Text box plus gates, grouped. Returns the text element and every element
/// of the node.
fn draw_node<R>(renderer: &mut R, node: &Node) -> (ElementId, Vec<ElementId>)
where
    R: CanvasRenderer + ?Sized,
{
    let style = &node.style;
    renderer.set_style(&style.text_context());
    let text = renderer.measure_text(&node.label);
    let width = text.width + 2.0 * style.padding;
    let height = text.height + 2.0 * style.padding;
    let top_left = node.center.offset(-width / 2.0, -height / 2.0);

    let options = TextOptions {
        box_padding: style.padding,
        link: Some(node.path.clone()),
    };
    let text_id = renderer.add_text_box(top_left, &node.label, &options);

    let r = style.gate_radius;
    let (cx, cy) = (node.center.x, node.center.y);
    let mut gates = vec![
        (Point::new(cx, top_left.y), node.gates.parents),
        (Point::new(cx, top_left.y + height), node.gates.children),
    ];
    let left = Point::new(top_left.x, cy);
    let right = Point::new(top_left.x + width, cy);
    if node.is_central {
        gates.push((left, node.gates.friends));
        gates.push((right, node.gates.friends));
    } else if node.friend_gate_on_left {
        gates.push((left, node.gates.friends));
    } else {
        gates.push((right, node.gates.friends));
    }

    let mut ids = vec![text_id.clone()];
    for (center, filled) in gates {
        renderer.set_style(&style.gate_context(filled));
        ids.push(renderer.add_ellipse(center.offset(-r, -r), Size::new(2.0 * r, 2.0 * r)));
    }
    renderer.group(&ids);
    (text_id, ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Page;
    use crate::render::{Element, ElementKind, NodeStyle, RecordingCanvas};

    fn node(path: &str) -> Node {
        Node::new(&Page::file(path), NodeStyle::default())
    }

    fn small_scene() -> Neighbourhood {
        let mut central = node("Center.md");
        central.is_central = true;
        Neighbourhood {
            central,
            parents: vec![node("Up.md")],
            children: vec![node("Down.md")],
            left_friends: Vec::new(),
            right_friends: Vec::new(),
            siblings: Vec::new(),
            links: Vec::new(),
        }
    }

    #[test]
    fn node_is_grouped_with_its_gates() {
        let mut canvas = RecordingCanvas::new();
        let mut scene = small_scene();
        let drawn = draw(&mut canvas, &mut scene, &Settings::default()).unwrap();

        // central: text + 4 gates, others: text + 3 gates
        assert_eq!(drawn.order.len(), 5 + 4 + 4);
        let text = canvas.text_by_label("Center").unwrap();
        let group = text.group.clone().unwrap();
        let members = canvas.scene().into_iter().filter(|e| e.group.as_deref() == Some(group.as_str())).count();
        assert_eq!(members, 5);
        assert_eq!(text.link.as_deref(), Some("Center.md"));
    }

    #[test]
    fn parents_above_children_below() {
        let mut canvas = RecordingCanvas::new();
        let mut scene = small_scene();
        draw(&mut canvas, &mut scene, &Settings::default()).unwrap();

        let y = |label: &str| canvas.text_by_label(label).unwrap().center().y;
        assert!(y("Up") < y("Center"));
        assert!(y("Center") < y("Down"));
        assert_eq!(canvas.text_by_label("Center").unwrap().center(), Point::ORIGIN);
    }

    #[test]
    fn rejected_frame_keeps_the_previous_one() {
        let mut canvas = RecordingCanvas::new();
        draw(&mut canvas, &mut small_scene(), &Settings::default()).unwrap();
        let before: Vec<Element> = canvas.scene().into_iter().cloned().collect();
        let held = canvas.element_count();

        let mut other = small_scene();
        other.children.push(node("Extra.md"));
        canvas.set_reject_publish(true);
        assert!(draw(&mut canvas, &mut other, &Settings::default()).is_err());

        let after: Vec<Element> = canvas.scene().into_iter().cloned().collect();
        assert_eq!(after, before);
        assert_eq!(canvas.element_count(), held);
        assert!(canvas.text_by_label("Extra").is_none());
        assert_eq!(canvas.frames(), 1);
    }

    #[test]
    fn unready_canvas_is_left_alone() {
        let mut canvas = RecordingCanvas::new();
        canvas.set_ready(false);
        let err = draw(&mut canvas, &mut small_scene(), &Settings::default()).unwrap_err();
        assert!(matches!(err, Error::RendererUnavailable(_)));
        assert_eq!(canvas.frames(), 0);
        assert!(!canvas.scene().iter().any(|e| matches!(e.kind, ElementKind::Text { .. })));
    }
}
