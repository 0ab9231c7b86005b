use thiserror::Error;

use crate::ir::PersonId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("root person {0} not found")]
    MissingRoot(PersonId),

    #[error("person {0} is their own ancestor")]
    CyclicAncestry(PersonId),

    #[error("tree deeper than {limit} generations at person {id}")]
    DepthLimit { id: PersonId, limit: usize },
}
