mod error;
mod text;
pub(crate) mod types;
pub use error::LayoutError;
pub use text::{CalibratedMetrics, FixedMetrics, FontMetrics, TextExtent, TextMetrics, TextStyle};
pub use types::*;

use crate::config::LayoutConfig;
use crate::ir::{Dataset, PersonId, PersonRecord};
use crate::relations::Relations;
use crate::theme::Theme;
use std::collections::HashSet;

/// Picks the metrics provider requested by the layout config.
pub fn metrics_for(config: &LayoutConfig) -> Box<dyn TextMetrics> {
    if config.fast_text_metrics {
        Box::new(CalibratedMetrics)
    } else {
        Box::new(FontMetrics)
    }
}

/// Lays the tree out from `dataset.root`, ascendants left and descendants
/// stacked to the right.
///
/// Fails without emitting anything when the root is missing or the parent
/// links contain a cycle.
pub fn compute_layout<M: TextMetrics + ?Sized>(
    dataset: &Dataset,
    metrics: &M,
    theme: &Theme,
    config: &LayoutConfig,
) -> Result<Layout, LayoutError> {
    let Some(root) = dataset.root_person() else {
        log::error!(root = dataset.root; "Root person not found");
        return Err(LayoutError::MissingRoot(dataset.root));
    };

    let mut engine = TreeLayout {
        relations: Relations::new(dataset),
        metrics,
        style: TextStyle::new(theme, config),
        config,
        commands: Vec::new(),
        path: HashSet::new(),
    };
    engine.place(
        root,
        config.horizontal_spacing,
        config.header + config.vertical_spacing,
        0,
    )?;

    let mut layout = Layout {
        commands: engine.commands,
        width: 0.0,
        height: 0.0,
    };
    layout.fit_to_content(config.horizontal_spacing, config.vertical_spacing);
    log::info!(
        commands = layout.commands.len(),
        width = layout.width,
        height = layout.height;
        "Layout computed"
    );
    Ok(layout)
}

/// What a subtree reports back to its parent.
#[derive(Debug, Clone, Copy)]
struct LayoutFrame {
    /// Vertical space consumed by the whole subtree.
    height: f32,
    /// Where the parent's corner connector meets this subtree.
    connector_y: f32,
}

struct TreeLayout<'a, M: ?Sized> {
    relations: Relations<'a>,
    metrics: &'a M,
    style: TextStyle,
    config: &'a LayoutConfig,
    commands: Vec<DrawCommand>,
    /// Ids on the current recursion path.
    path: HashSet<PersonId>,
}

impl<'a, M: TextMetrics + ?Sized> TreeLayout<'a, M> {
    fn place(
        &mut self,
        person: &'a PersonRecord,
        x: f32,
        y: f32,
        depth: usize,
    ) -> Result<LayoutFrame, LayoutError> {
        if depth > self.config.max_depth {
            return Err(LayoutError::DepthLimit {
                id: person.id,
                limit: self.config.max_depth,
            });
        }
        if !self.path.insert(person.id) {
            log::error!(person = person.id; "Cyclic ancestry");
            return Err(LayoutError::CyclicAncestry(person.id));
        }

        let partner = self.relations.find_partner(person);
        let children = self.relations.find_children(person, partner);
        let cfg = self.config;

        let first = self.measure(person);
        let (top, width, height) = match partner {
            Some(partner) => {
                self.emit_person(person, x, y, first);
                let second = self.measure(partner);
                self.emit_person(partner, x, y + first.height + cfg.spouse_distance, second);
                let width = first.width.max(second.width);
                let height = first.height + cfg.spouse_distance + second.height;
                (y, width, height)
            }
            None => {
                // A lone person sits in the partner row; the block keeps the
                // couple's two-row shape so connectors line up across generations.
                self.emit_person(person, x, y + first.height, first);
                let top = y - (first.height - cfg.spouse_distance);
                (top, first.width, first.height * 2.0 + cfg.spouse_distance)
            }
        };

        let connector_y = top + height / 2.0 - cfg.baseline_offset;
        let junction_x = x + width + cfg.after_ascendant_spacing;
        if partner.is_some() {
            self.commands.push(DrawCommand::Line(LineSegment {
                x1: x + width / 2.0,
                y1: connector_y,
                x2: junction_x,
                y2: connector_y,
            }));
        }

        if children.is_empty() {
            self.path.remove(&person.id);
            return Ok(LayoutFrame {
                height,
                connector_y,
            });
        }

        self.commands.push(DrawCommand::Junction(Junction {
            x: junction_x,
            y: connector_y,
            r: cfg.junction_radius,
        }));

        let child_x = junction_x + cfg.before_descendant_spacing;
        let mut children_height = 0.0f32;
        for (idx, child) in children.into_iter().enumerate() {
            if idx > 0 {
                children_height += cfg.sibling_distance;
            }
            let frame = self.place(child, child_x, top + children_height, depth + 1)?;
            self.commands.push(DrawCommand::CornerLine(CornerLine {
                x1: junction_x,
                y1: connector_y,
                x2: child_x,
                y2: frame.connector_y,
            }));
            children_height += frame.height;
        }

        self.path.remove(&person.id);
        Ok(LayoutFrame {
            height: height.max(children_height),
            connector_y,
        })
    }

    fn measure(&self, person: &PersonRecord) -> TextExtent {
        let label = PersonLabel::for_person(person);
        let extent = self.metrics.measure(&label, &self.style).sanitized();
        if extent.width == 0.0 && extent.height == 0.0 && label.char_count() > 0 {
            log::warn!(person = person.id; "Text measured as empty, using a zero-sized block");
        }
        extent
    }

    fn emit_person(&mut self, person: &PersonRecord, x: f32, y: f32, extent: TextExtent) {
        log::debug!(person = person.id, name = person.name.as_str(), x, y; "Drawing person");
        self.commands.push(DrawCommand::Person(PersonBlock {
            id: person.id,
            x,
            y,
            width: extent.width,
            height: extent.height,
            label: PersonLabel::for_person(person),
        }));
    }
}
