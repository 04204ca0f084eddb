use std::collections::BTreeSet;

use crate::mode::RuleMode;
use crate::roster::{MatchupRecord, Side};

/// Lookup sets derived from the declared matchups, rebuilt on every recompute.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchupIndex {
    pub names_a: BTreeSet<String>,
    pub names_b: BTreeSet<String>,
    pub types_a: BTreeSet<String>,
    pub types_b: BTreeSet<String>,
}

impl MatchupIndex {
    pub fn build(matchups: &[MatchupRecord], mode: RuleMode) -> Self {
        let mut index = Self::default();
        for record in matchups {
            for side in [Side::A, Side::B] {
                let declared = record.side(side);
                let (names, types) = match side {
                    Side::A => (&mut index.names_a, &mut index.types_a),
                    Side::B => (&mut index.names_b, &mut index.types_b),
                };
                names.insert(declared.name.to_string());
                insert_type(types, declared.type1);
                if mode.uses_secondary_types() {
                    insert_type(types, declared.type2);
                }
            }
        }
        index
    }

    pub fn names(&self, side: Side) -> &BTreeSet<String> {
        match side {
            Side::A => &self.names_a,
            Side::B => &self.names_b,
        }
    }

    pub fn types(&self, side: Side) -> &BTreeSet<String> {
        match side {
            Side::A => &self.types_a,
            Side::B => &self.types_b,
        }
    }
}

fn insert_type(types: &mut BTreeSet<String>, value: &str) {
    if !value.is_empty() {
        types.insert(value.to_string());
    }
}
