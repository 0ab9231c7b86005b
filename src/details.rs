//! Per-person detail records for the click/tap detail view.

use crate::ir::{Dataset, Gender, PersonId, PersonRecord};
use crate::layout::Layout;
use crate::relations::Relations;
use crate::view::ViewTransform;
use serde::Serialize;
use std::fmt;

/// `"Name born - died"`, or just the name when no year is known.
pub fn inline_summary(person: &PersonRecord) -> String {
    let born = person.born.as_deref().filter(|s| !s.is_empty());
    let died = person.died.as_deref().filter(|s| !s.is_empty());
    match (born, died) {
        (None, None) => person.name.clone(),
        (Some(born), None) => format!("{} {born}", person.name),
        (None, Some(died)) => format!("{} - {died}", person.name),
        (Some(born), Some(died)) => format!("{} {born} - {died}", person.name),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PersonDetails<'a> {
    pub person: &'a PersonRecord,
    pub father: Option<&'a PersonRecord>,
    pub mother: Option<&'a PersonRecord>,
    pub partner: Option<&'a PersonRecord>,
    /// Every child naming this person as a parent, by ascending id.
    pub children: Vec<&'a PersonRecord>,
}

impl<'a> PersonDetails<'a> {
    pub fn collect(dataset: &'a Dataset, id: PersonId) -> Option<Self> {
        let person = dataset.person(id)?;
        let relations = Relations::new(dataset);
        Some(Self {
            person,
            father: person.fid.and_then(|fid| dataset.person(fid)),
            mother: person.mid.and_then(|mid| dataset.person(mid)),
            partner: relations.find_partner(person),
            children: relations.all_children(person),
        })
    }

    pub fn title(&self) -> String {
        inline_summary(self.person)
    }

    /// Maiden name is only shown for women.
    pub fn maiden_name(&self) -> Option<&'a str> {
        match self.person.gender {
            Some(Gender::Female) => self.person.maiden.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for PersonDetails<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title())?;
        writeln!(f, "ID: {}", self.person.id)?;
        if let Some(born) = &self.person.born {
            writeln!(f, "Born: {born}")?;
        }
        if let Some(died) = &self.person.died {
            writeln!(f, "Died: {died}")?;
        }
        if let Some(gender) = self.person.gender {
            let text = match gender {
                Gender::Male => "male",
                Gender::Female => "female",
            };
            writeln!(f, "Gender: {text}")?;
        }
        if let Some(maiden) = self.maiden_name() {
            writeln!(f, "Maiden name: {maiden}")?;
        }
        if let Some(father) = self.father {
            writeln!(f, "Father: {}", inline_summary(father))?;
        }
        if let Some(mother) = self.mother {
            writeln!(f, "Mother: {}", inline_summary(mother))?;
        }
        if let Some(partner) = self.partner {
            let label = match self.person.gender {
                Some(Gender::Male) => "Wife",
                Some(Gender::Female) => "Husband",
                None => "Partner",
            };
            writeln!(f, "{label}: {}", inline_summary(partner))?;
        }
        if !self.children.is_empty() {
            writeln!(f, "Children:")?;
            for child in &self.children {
                writeln!(f, "  - {}", inline_summary(child))?;
            }
        }
        Ok(())
    }
}

/// Resolves a click or tap at a viewport point to the person drawn there.
pub fn pick_person<'a>(
    dataset: &'a Dataset,
    layout: &Layout,
    view: &ViewTransform,
    x: f32,
    y: f32,
) -> Option<&'a PersonRecord> {
    let (dx, dy) = view.to_drawing(x, y);
    let id = layout.person_at(dx, dy)?;
    dataset.person(id)
}
