use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub type PersonId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub id: PersonId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub born: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub died: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maiden: Option<String>,
    /// Father id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fid: Option<PersonId>,
    /// Mother id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mid: Option<PersonId>,
    /// Partner ids, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pids: Vec<PersonId>,
}

impl PersonRecord {
    pub fn new(id: PersonId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            born: None,
            died: None,
            gender: None,
            maiden: None,
            fid: None,
            mid: None,
            pids: Vec::new(),
        }
    }

    /// The plain run drawn after the bold name, e.g. `" 1901 1968"`.
    ///
    /// `None` when neither year is known.
    pub fn years_label(&self) -> Option<String> {
        let parts: Vec<&str> = [self.born.as_deref(), self.died.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect();
        if parts.is_empty() {
            return None;
        }
        Some(format!(" {}", parts.join(" ")))
    }

    pub fn has_parent(&self, id: PersonId) -> bool {
        self.fid == Some(id) || self.mid == Some(id)
    }
}

/// The tree input: a root id plus a flat list of person records.
///
/// Extra top-level keys in a data file (page titles, label tables) are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RawDataset")]
pub struct Dataset {
    pub root: PersonId,
    nodes: Vec<PersonRecord>,
    #[serde(skip)]
    index: HashMap<PersonId, usize>,
}

impl Dataset {
    pub fn new(root: PersonId, nodes: Vec<PersonRecord>) -> Self {
        let mut dataset = Self {
            root,
            nodes,
            index: HashMap::new(),
        };
        dataset.reindex();
        dataset
    }

    pub fn nodes(&self) -> &[PersonRecord] {
        &self.nodes
    }

    /// Appends a record. An id already present keeps resolving to its first record.
    pub fn push(&mut self, record: PersonRecord) {
        self.index.entry(record.id).or_insert(self.nodes.len());
        self.nodes.push(record);
    }

    /// Looks a record up by id. The first record wins when ids repeat.
    pub fn person(&self, id: PersonId) -> Option<&PersonRecord> {
        self.index.get(&id).and_then(|&idx| self.nodes.get(idx))
    }

    pub fn root_person(&self) -> Option<&PersonRecord> {
        self.person(self.root)
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (idx, node) in self.nodes.iter().enumerate() {
            self.index.entry(node.id).or_insert(idx);
        }
    }
}

#[derive(Deserialize)]
struct RawDataset {
    root: PersonId,
    nodes: Vec<PersonRecord>,
}

impl From<RawDataset> for Dataset {
    fn from(raw: RawDataset) -> Self {
        Dataset::new(raw.root, raw.nodes)
    }
}

pub fn parse_dataset(input: &str) -> anyhow::Result<Dataset> {
    Ok(serde_json::from_str(input)?)
}

pub fn load_dataset(path: &Path) -> anyhow::Result<Dataset> {
    let contents = std::fs::read_to_string(path)?;
    parse_dataset(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_records_and_ignores_page_metadata() {
        let input = r#"{
            "title": "Family",
            "labels": {"born": "Born"},
            "root": 1,
            "nodes": [
                {"id": 1, "name": "Ana", "born": "1901", "gender": "female", "pids": [2]},
                {"id": 2, "name": "Bojan", "gender": "male"},
                {"id": 3, "name": "Ceca", "fid": 2, "mid": 1}
            ]
        }"#;
        let dataset = parse_dataset(input).unwrap();
        assert_eq!(dataset.root, 1);
        assert_eq!(dataset.nodes().len(), 3);
        let ana = dataset.person(1).unwrap();
        assert_eq!(ana.gender, Some(Gender::Female));
        assert_eq!(ana.pids, vec![2]);
        assert_eq!(dataset.person(3).unwrap().fid, Some(2));
        assert!(dataset.person(4).is_none());
    }

    #[test]
    fn years_label_joins_known_years() {
        let mut person = PersonRecord::new(1, "Ana");
        assert_eq!(person.years_label(), None);
        person.born = Some("1901".to_string());
        assert_eq!(person.years_label().as_deref(), Some(" 1901"));
        person.died = Some("1968".to_string());
        assert_eq!(person.years_label().as_deref(), Some(" 1901 1968"));
        person.born = None;
        assert_eq!(person.years_label().as_deref(), Some(" 1968"));
    }

    #[test]
    fn empty_years_are_treated_as_absent() {
        let mut person = PersonRecord::new(1, "Ana");
        person.born = Some(String::new());
        assert_eq!(person.years_label(), None);
    }

    #[test]
    fn duplicate_ids_resolve_to_first_record() {
        let dataset = Dataset::new(
            1,
            vec![PersonRecord::new(1, "First"), PersonRecord::new(1, "Second")],
        );
        assert_eq!(dataset.person(1).unwrap().name, "First");
    }

    #[test]
    fn pushed_records_are_indexed() {
        let mut dataset = Dataset::new(1, vec![PersonRecord::new(1, "Ana")]);
        dataset.push(PersonRecord::new(2, "Bojan"));
        dataset.push(PersonRecord::new(1, "Duplicate"));
        assert_eq!(dataset.nodes().len(), 3);
        assert_eq!(dataset.person(2).map(|p| p.name.as_str()), Some("Bojan"));
        assert_eq!(dataset.person(1).map(|p| p.name.as_str()), Some("Ana"));
        assert!(dataset.person(3).is_none());
    }

    #[test]
    fn deserialized_dataset_round_trips_its_index() {
        let dataset = Dataset::new(5, vec![PersonRecord::new(5, "Ana")]);
        let json = serde_json::to_string(&dataset).unwrap();
        let restored = parse_dataset(&json).unwrap();
        assert_eq!(restored.nodes(), dataset.nodes());
        assert_eq!(restored.root_person().map(|p| p.id), Some(5));
    }
}
