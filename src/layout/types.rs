use serde::Serialize;

use crate::ir::{PersonId, PersonRecord};

/// The two text runs drawn for a person: a bold name and plain years.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonLabel {
    pub name: String,
    pub years: Option<String>,
}

impl PersonLabel {
    pub fn for_person(person: &PersonRecord) -> Self {
        Self {
            name: person.name.clone(),
            years: person.years_label(),
        }
    }

    pub fn char_count(&self) -> usize {
        self.name.chars().count() + self.years.as_deref().map_or(0, |y| y.chars().count())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonBlock {
    pub id: PersonId,
    /// Left edge of the text.
    pub x: f32,
    /// Top edge of the text (hanging baseline).
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub label: PersonLabel,
}

impl PersonBlock {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Junction {
    pub x: f32,
    pub y: f32,
    pub r: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineSegment {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

/// Vertical run from `(x1, y1)` to `(x1, y2)`, then horizontal to `(x2, y2)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CornerLine {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl CornerLine {
    pub fn segments(&self) -> [LineSegment; 2] {
        [
            LineSegment {
                x1: self.x1,
                y1: self.y1,
                x2: self.x1,
                y2: self.y2,
            },
            LineSegment {
                x1: self.x1,
                y1: self.y2,
                x2: self.x2,
                y2: self.y2,
            },
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    Person(PersonBlock),
    Junction(Junction),
    Line(LineSegment),
    CornerLine(CornerLine),
}

impl DrawCommand {
    /// `(min_x, min_y, max_x, max_y)` covered by this command.
    pub fn bounds(&self) -> (f32, f32, f32, f32) {
        match self {
            DrawCommand::Person(block) => {
                (block.x, block.y, block.x + block.width, block.y + block.height)
            }
            DrawCommand::Junction(c) => (c.x - c.r, c.y - c.r, c.x + c.r, c.y + c.r),
            DrawCommand::Line(l) => (l.x1.min(l.x2), l.y1.min(l.y2), l.x1.max(l.x2), l.y1.max(l.y2)),
            DrawCommand::CornerLine(l) => {
                (l.x1.min(l.x2), l.y1.min(l.y2), l.x1.max(l.x2), l.y1.max(l.y2))
            }
        }
    }
}

/// Ordered draw commands for one tree, plus the drawing's natural size.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    pub commands: Vec<DrawCommand>,
    pub width: f32,
    pub height: f32,
}

impl Layout {
    pub fn persons(&self) -> impl Iterator<Item = &PersonBlock> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Person(block) => Some(block),
            _ => None,
        })
    }

    pub fn junctions(&self) -> impl Iterator<Item = &Junction> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Junction(junction) => Some(junction),
            _ => None,
        })
    }

    pub fn lines(&self) -> impl Iterator<Item = &LineSegment> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Line(line) => Some(line),
            _ => None,
        })
    }

    pub fn corner_lines(&self) -> impl Iterator<Item = &CornerLine> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::CornerLine(line) => Some(line),
            _ => None,
        })
    }

    pub fn person_block(&self, id: PersonId) -> Option<&PersonBlock> {
        self.persons().find(|block| block.id == id)
    }

    /// Person whose text block contains the drawing-space point, if any.
    /// Later blocks win, matching paint order.
    pub fn person_at(&self, x: f32, y: f32) -> Option<PersonId> {
        self.persons()
            .filter(|block| block.contains(x, y))
            .last()
            .map(|block| block.id)
    }

    pub(crate) fn fit_to_content(&mut self, margin_x: f32, margin_y: f32) {
        let (max_x, max_y) = self
            .commands
            .iter()
            .map(DrawCommand::bounds)
            .fold((0.0f32, 0.0f32), |(mx, my), (_, _, x, y)| (mx.max(x), my.max(y)));
        self.width = max_x + margin_x;
        self.height = max_y + margin_y;
    }
}
