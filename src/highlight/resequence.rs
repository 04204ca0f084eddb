use std::cmp::Ordering;

use super::classify::TierLists;
use super::TaggedEntry;

/// Flatten tier lists into display order: direct-match, type-conflict, neutral,
/// each sorted by name. The sort is stable so identical names keep roster order.
pub fn resequence(lists: TierLists) -> Vec<TaggedEntry> {
    let TierLists {
        direct_match,
        type_conflict,
        neutral,
    } = lists;

    let mut ordered = Vec::with_capacity(direct_match.len() + type_conflict.len() + neutral.len());
    for mut tier in [direct_match, type_conflict, neutral] {
        tier.sort_by(|a, b| locale_cmp(&a.entry.name, &b.entry.name));
        ordered.extend(tier);
    }
    ordered
}

/// Dictionary order for display names.
///
/// Letters compare without regard to case or Latin-1 accents first, then
/// unaccented before accented, then lowercase before uppercase.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    fold_key(a)
        .cmp(fold_key(b))
        .then_with(|| accent_key(a).cmp(accent_key(b)))
        .then_with(|| case_key(a).cmp(case_key(b)))
        .then_with(|| a.cmp(b))
}

fn fold_key(value: &str) -> impl Iterator<Item = char> + '_ {
    value.chars().flat_map(char::to_lowercase).map(strip_accent)
}

fn accent_key(value: &str) -> impl Iterator<Item = bool> + '_ {
    value
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| strip_accent(c) != c)
}

fn case_key(value: &str) -> impl Iterator<Item = bool> + '_ {
    value.chars().map(char::is_uppercase)
}

fn strip_accent(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::Tier;
    use crate::roster::RosterEntry;
    use pretty_assertions::assert_eq;

    fn tagged(name: &str, tier: Tier) -> TaggedEntry {
        TaggedEntry::new(RosterEntry::new(name, "Normal", "", "0001"), tier)
    }

    fn names(entries: &[TaggedEntry]) -> Vec<&str> {
        entries.iter().map(|t| t.entry.name.as_str()).collect()
    }

    #[test]
    fn locale_order_ignores_case_and_accents_first() {
        assert_eq!(locale_cmp("abra", "Bulbasaur"), Ordering::Less);
        assert_eq!(locale_cmp("Flabébé", "Flabebe"), Ordering::Greater);
        assert_eq!(locale_cmp("Flabébé", "Flabecz"), Ordering::Less);
        assert_eq!(locale_cmp("eevee", "Eevee"), Ordering::Less);
        assert_eq!(locale_cmp("Eevee", "Eevee"), Ordering::Equal);
    }

    #[test]
    fn tiers_come_in_fixed_order() {
        let lists = TierLists {
            direct_match: vec![tagged("Zubat", Tier::DirectMatch)],
            type_conflict: vec![tagged("Onix", Tier::TypeConflict), tagged("Geodude", Tier::TypeConflict)],
            neutral: vec![tagged("Abra", Tier::Neutral)],
        };
        let ordered = resequence(lists);
        assert_eq!(names(&ordered), vec!["Zubat", "Geodude", "Onix", "Abra"]);
    }

    #[test]
    fn case_variants_sort_lowercase_first() {
        let lists = TierLists {
            neutral: vec![tagged("Mew", Tier::Neutral), tagged("mew", Tier::Neutral), tagged("Ditto", Tier::Neutral)],
            ..Default::default()
        };
        let ordered = resequence(lists);
        assert_eq!(names(&ordered), vec!["Ditto", "mew", "Mew"]);
    }
}
