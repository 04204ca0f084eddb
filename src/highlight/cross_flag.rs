use super::classify::TierLists;

/// Soft-flag neutral entries whose name mirrors a classified entry on the other team.
///
/// Must run after both teams are classified. Tier membership is left alone.
pub fn apply_cross_flags(team_a: &mut TierLists, team_b: &mut TierLists) {
    let classified_a = team_a.classified_names();
    let classified_b = team_b.classified_names();

    for tagged in &mut team_b.neutral {
        tagged.cross_flag = classified_a.contains(&tagged.entry.name);
    }
    for tagged in &mut team_a.neutral {
        tagged.cross_flag = classified_b.contains(&tagged.entry.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::{TaggedEntry, Tier};
    use crate::roster::RosterEntry;

    fn tagged(name: &str, tier: Tier) -> TaggedEntry {
        TaggedEntry::new(RosterEntry::new(name, "Normal", "", "0001"), tier)
    }

    #[test]
    fn flags_only_neutral_mirrors() {
        let mut a = TierLists {
            direct_match: vec![tagged("Eevee", Tier::DirectMatch)],
            neutral: vec![tagged("Snorlax", Tier::Neutral)],
            ..Default::default()
        };
        let mut b = TierLists {
            type_conflict: vec![tagged("Snorlax", Tier::TypeConflict)],
            neutral: vec![tagged("Eevee", Tier::Neutral), tagged("Ditto", Tier::Neutral)],
            ..Default::default()
        };

        apply_cross_flags(&mut a, &mut b);

        assert!(b.neutral[0].cross_flag);
        assert!(!b.neutral[1].cross_flag);
        assert!(a.neutral[0].cross_flag);
        assert!(!a.direct_match[0].cross_flag);
        assert!(!b.type_conflict[0].cross_flag);
    }
}
