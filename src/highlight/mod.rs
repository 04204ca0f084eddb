//! Matchup highlighting: classify every roster entry against the declared
//! matchups and reorder both teams for display.
//!
//! The pipeline is index -> classify (per team) -> cross-flag -> resequence
//! (per team). It is a pure function of the rosters, the matchups and the
//! rule mode, and is always run from scratch.

pub mod classify;
pub mod cross_flag;
pub mod index;
pub mod resequence;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::mode::RuleMode;
use crate::roster::{MatchupRecord, RosterEntry, Side};

pub use classify::{classify, classify_entry, TierLists};
pub use cross_flag::apply_cross_flags;
pub use index::MatchupIndex;
pub use resequence::{locale_cmp, resequence};

/// Priority bucket, declared in display order.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum Tier {
    DirectMatch,
    TypeConflict,
    #[default]
    Neutral,
}

impl Tier {
    pub fn label(self) -> &'static str {
        match self {
            Tier::DirectMatch => "direct match",
            Tier::TypeConflict => "type conflict",
            Tier::Neutral => "neutral",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TaggedEntry {
    pub entry: RosterEntry,
    pub tier: Tier,
    /// Only ever set on neutral entries.
    pub cross_flag: bool,
}

impl TaggedEntry {
    pub fn new(entry: RosterEntry, tier: Tier) -> Self {
        Self {
            entry,
            tier,
            cross_flag: false,
        }
    }
}

/// Both teams in display order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HighlightView {
    pub team_a: Vec<TaggedEntry>,
    pub team_b: Vec<TaggedEntry>,
}

impl HighlightView {
    pub fn team(&self, side: Side) -> &[TaggedEntry] {
        match side {
            Side::A => &self.team_a,
            Side::B => &self.team_b,
        }
    }

    pub fn tier_of(&self, side: Side, dex_num: &str) -> Option<Tier> {
        self.team(side)
            .iter()
            .find(|tagged| tagged.entry.dex_num == dex_num)
            .map(|tagged| tagged.tier)
    }
}

pub fn recompute_and_resequence(
    team_a: &[RosterEntry],
    team_b: &[RosterEntry],
    matchups: &[MatchupRecord],
    mode: RuleMode,
) -> HighlightView {
    let index = MatchupIndex::build(matchups, mode);
    let mut lists_a = classify(team_a, Side::A, &index, mode);
    let mut lists_b = classify(team_b, Side::B, &index, mode);
    apply_cross_flags(&mut lists_a, &mut lists_b);

    tracing::debug!(
        mode = mode.label(),
        matchups = matchups.len(),
        a_direct = lists_a.direct_match.len(),
        a_conflict = lists_a.type_conflict.len(),
        b_direct = lists_b.direct_match.len(),
        b_conflict = lists_b.type_conflict.len(),
        "recomputed highlights"
    );

    HighlightView {
        team_a: resequence(lists_a),
        team_b: resequence(lists_b),
    }
}
