use crate::ir::{Dataset, PersonId, PersonRecord};
use std::collections::HashMap;

/// Partner and child lookups over a [`Dataset`].
///
/// Children are indexed by parent id once, so repeated lookups during layout
/// do not rescan the node list.
pub struct Relations<'a> {
    dataset: &'a Dataset,
    children_by_parent: HashMap<PersonId, Vec<usize>>,
}

impl<'a> Relations<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        let mut children_by_parent: HashMap<PersonId, Vec<usize>> = HashMap::new();
        for (idx, node) in dataset.nodes().iter().enumerate() {
            let parents = [node.fid, node.mid];
            for parent in parents.into_iter().flatten() {
                let slot = children_by_parent.entry(parent).or_default();
                // A record listing the same id as both father and mother is one child.
                if slot.last() != Some(&idx) {
                    slot.push(idx);
                }
            }
        }
        Self {
            dataset,
            children_by_parent,
        }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Only the first partner id is honored; further entries are ignored.
    pub fn find_partner(&self, person: &PersonRecord) -> Option<&'a PersonRecord> {
        let partner_id = person.pids.first()?;
        self.dataset.person(*partner_id)
    }

    /// Children of `a` together with `b` (either parent slot), or every child
    /// of `a` when there is no partner. Sorted by ascending id.
    pub fn find_children(
        &self,
        a: &PersonRecord,
        b: Option<&PersonRecord>,
    ) -> Vec<&'a PersonRecord> {
        let Some(candidates) = self.children_by_parent.get(&a.id) else {
            return Vec::new();
        };
        let mut children: Vec<&'a PersonRecord> = candidates
            .iter()
            .map(|&idx| &self.dataset.nodes()[idx])
            .filter(|node| match b {
                Some(b) => {
                    (node.fid == Some(a.id) && node.mid == Some(b.id))
                        || (node.fid == Some(b.id) && node.mid == Some(a.id))
                }
                None => node.has_parent(a.id),
            })
            .collect();
        children.sort_by_key(|node| node.id);
        log::trace!(person = a.id, count = children.len(); "Found children");
        children
    }

    /// Every node naming `person` as father or mother, regardless of partner.
    pub fn all_children(&self, person: &PersonRecord) -> Vec<&'a PersonRecord> {
        self.find_children(person, None)
    }
}
