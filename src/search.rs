//! In-memory column search: case-folded substring containment on one field.
//!
use crate::member::{Member, MemberField};

/// True when `member`'s `field` contains `needle` ignoring case.
///
/// `needle` must already be lowercased; see [`collect_matches`].
pub fn field_contains(member: &Member, field: MemberField, needle: &str) -> bool {
    member.field(field).to_lowercase().contains(needle)
}

/// Collect the keys of every item whose `field` contains `term`, in input order.
pub fn collect_matches<'a, K, I>(items: I, term: &str, field: MemberField) -> Vec<K>
where
    I: IntoIterator<Item = (K, &'a Member)>,
{
    let q = term.to_lowercase();
    items
        .into_iter()
        .filter(|(_, m)| field_contains(m, field, &q))
        .map(|(k, _)| k)
        .collect()
}
