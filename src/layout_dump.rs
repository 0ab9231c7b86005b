use crate::ir::{Dataset, PersonId};
use crate::layout::{DrawCommand, Layout};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump<'a> {
    pub root: PersonId,
    pub width: f32,
    pub height: f32,
    pub persons: usize,
    pub junctions: usize,
    pub connectors: usize,
    pub commands: &'a [DrawCommand],
}

impl<'a> LayoutDump<'a> {
    pub fn from_layout(layout: &'a Layout, dataset: &Dataset) -> Self {
        LayoutDump {
            root: dataset.root,
            width: layout.width,
            height: layout.height,
            persons: layout.persons().count(),
            junctions: layout.junctions().count(),
            connectors: layout.lines().count() + layout.corner_lines().count(),
            commands: &layout.commands,
        }
    }
}

pub fn layout_dump_json(layout: &Layout, dataset: &Dataset) -> anyhow::Result<String> {
    let dump = LayoutDump::from_layout(layout, dataset);
    Ok(serde_json::to_string_pretty(&dump)?)
}

pub fn write_layout_dump(path: &Path, layout: &Layout, dataset: &Dataset) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout, dataset);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
