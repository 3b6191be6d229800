//! Global node index space.
//!
//! Per-type local index spaces are laid end to end in a fixed order:
//!
//! ```text
//!   global:  0 .. drug_count | .. + disease_count | .. + gene_count
//!            [    drug     ) [     disease      ) [     gene     )
//! ```
//!
//! `global = offset(type) + local`, where `offset(type)` is the summed size of
//! every block before it. Changing the order changes every index, so the
//! assigner and the triple builder must share one [`GlobalIndex`].

use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::entity::EntityType;

/// One type's contiguous block of global indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeBlock {
    pub entity_type: EntityType,
    pub offset: usize,
    pub count: usize,
}

impl NodeBlock {
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.count
    }

    pub fn contains(&self, global: usize) -> bool {
        self.range().contains(&global)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalIndex {
    blocks: Vec<NodeBlock>,
    origins: Vec<(EntityType, usize)>,
}

impl GlobalIndex {
    /// Lay out blocks for `sizes` in the given order.
    ///
    /// Each type is expected once; a repeated type gets a second block, but
    /// [`GlobalIndex::offset`] only ever reports the first.
    pub fn assign(sizes: &[(EntityType, usize)]) -> Self {
        let total: usize = sizes.iter().map(|(_, n)| n).sum();
        let mut blocks = Vec::with_capacity(sizes.len());
        let mut origins = Vec::with_capacity(total);

        let mut cursor = 0usize;
        for &(entity_type, count) in sizes {
            blocks.push(NodeBlock {
                entity_type,
                offset: cursor,
                count,
            });
            origins.extend((0..count).map(|local| (entity_type, local)));
            cursor += count;
        }

        Self { blocks, origins }
    }

    pub fn node_count(&self) -> usize {
        self.origins.len()
    }

    pub fn blocks(&self) -> &[NodeBlock] {
        &self.blocks
    }

    pub fn block(&self, entity_type: EntityType) -> Option<&NodeBlock> {
        self.blocks.iter().find(|b| b.entity_type == entity_type)
    }

    pub fn offset(&self, entity_type: EntityType) -> Option<usize> {
        self.block(entity_type).map(|b| b.offset)
    }

    /// Bounds-checked forward mapping.
    pub fn to_global(&self, entity_type: EntityType, local: usize) -> Option<usize> {
        let block = self.block(entity_type)?;
        (local < block.count).then(|| block.offset + local)
    }

    /// Reverse lookup: the `(type, local)` origin of a global index.
    pub fn locate(&self, global: usize) -> Option<(EntityType, usize)> {
        self.origins.get(global).copied()
    }

    pub fn origins(&self) -> &[(EntityType, usize)] {
        &self.origins
    }
}
