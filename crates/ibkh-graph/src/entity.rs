use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity types of the hub, in global block order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Drug,
    Disease,
    Gene,
}

impl EntityType {
    /// Fixed block order of the global index space.
    pub const ALL: [EntityType; 3] = [EntityType::Drug, EntityType::Disease, EntityType::Gene];

    pub const fn as_str(self) -> &'static str {
        match self {
            EntityType::Drug => "drug",
            EntityType::Disease => "disease",
            EntityType::Gene => "gene",
        }
    }

    /// Position in [`EntityType::ALL`].
    pub const fn ordinal(self) -> usize {
        match self {
            EntityType::Drug => 0,
            EntityType::Disease => 1,
            EntityType::Gene => 2,
        }
    }

    pub const fn default_vocab_file(self) -> &'static str {
        match self {
            EntityType::Drug => "drug_vocab.csv",
            EntityType::Disease => "disease_vocab.csv",
            EntityType::Gene => "gene_vocab.csv",
        }
    }

    /// Column holding the canonical (join) name: drug name, ICD-9 code, gene symbol.
    pub const fn default_canonical_column(self) -> &'static str {
        match self {
            EntityType::Drug => "name",
            EntityType::Disease => "icd_9",
            EntityType::Gene => "symbol",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals_follow_block_order() {
        for (i, ty) in EntityType::ALL.iter().enumerate() {
            assert_eq!(ty.ordinal(), i);
        }
    }

    #[test]
    fn serializes_snake_case() {
        let json = serde_json::to_string(&EntityType::Disease).unwrap();
        assert_eq!(json, "\"disease\"");
        let back: EntityType = serde_json::from_str("\"gene\"").unwrap();
        assert_eq!(back, EntityType::Gene);
    }
}
