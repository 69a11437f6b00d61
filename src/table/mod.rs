//! View-state core for the member table.
//!
//! [`MemberTable`] owns the loaded records and every piece of ephemeral view
//! state (current page, selection, edit slot, active search). Each user action
//! maps to exactly one transition method; everything the UI displays (visible
//! list, page slice, page-number window, prev/next availability) is derived on
//! demand from that state so it can never drift from the records.
//!
//! Invariants held after every transition:
//! - the selection only contains records in the visible (possibly filtered) list;
//! - at most one record is being edited;
//! - the current page lies in `[1, max(1, max_page)]`.
//!
use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use crate::member::{Member, MemberField};
use crate::search::collect_matches;

/// Fixed number of rows per page.
pub const PAGE_SIZE: usize = 10;
/// Maximum number of numbered page buttons shown at once.
pub const PAGE_WINDOW: usize = 3;

/// Stable identity of a loaded record. Unlike `Member::id` it survives deletes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowKey(u64);

#[derive(Clone, Debug)]
struct Row {
    key: RowKey,
    member: Member,
}

/// A submitted search. The match set is fixed when the search is submitted.
#[derive(Clone, Debug)]
pub struct ActiveSearch {
    pub term: String,
    pub field: MemberField,
    matches: BTreeSet<RowKey>,
}

/// Working copy of the record being edited.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditDraft {
    key: RowKey,
    pub member: Member,
}

/// One rendered row of the current page.
#[derive(Clone, Copy, Debug)]
pub struct PageRow<'a> {
    pub key: RowKey,
    pub member: &'a Member,
    pub selected: bool,
    pub editing: bool,
}

#[derive(Clone, Debug)]
pub struct MemberTable {
    rows: Vec<Row>,
    current_page: usize,
    selected: BTreeSet<RowKey>,
    editing: Option<EditDraft>,
    search: Option<ActiveSearch>,
}

impl MemberTable {
    /// Build the initial state from freshly loaded records. Source ids are kept as-is
    /// until the first delete recompacts them.
    pub fn new(members: Vec<Member>) -> Self {
        let rows = members
            .into_iter()
            .enumerate()
            .map(|(i, member)| Row {
                key: RowKey(i as u64),
                member,
            })
            .collect();
        Self {
            rows,
            current_page: 1,
            selected: BTreeSet::new(),
            editing: None,
            search: None,
        }
    }

    /// Total number of records, ignoring any search.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Every record in list order, ignoring any search.
    pub fn members(&self) -> impl Iterator<Item = &Member> + '_ {
        self.rows.iter().map(|r| &r.member)
    }

    fn visible_rows(&self) -> impl Iterator<Item = &Row> + '_ {
        self.rows.iter().filter(move |r| {
            self.search
                .as_ref()
                .is_none_or(|s| s.matches.contains(&r.key))
        })
    }

    fn visible_key(&self, id: u32) -> Option<RowKey> {
        self.visible_rows().find(|r| r.member.id == id).map(|r| r.key)
    }

    fn visible_row(&self, key: RowKey) -> Option<&Row> {
        self.visible_rows().find(|r| r.key == key)
    }

    /// Records currently in view: the search matches if a search is active, else all.
    pub fn visible(&self) -> Vec<&Member> {
        self.visible_rows().map(|r| &r.member).collect()
    }

    pub fn visible_count(&self) -> usize {
        self.visible_rows().count()
    }

    /// `ceil(visible_count / PAGE_SIZE)`; zero when nothing is visible.
    pub fn max_page(&self) -> usize {
        self.visible_count().div_ceil(PAGE_SIZE)
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// The slice of the visible list shown on the current page.
    pub fn page_rows(&self) -> Vec<PageRow<'_>> {
        let edit_key = self.editing.as_ref().map(|d| d.key);
        self.visible_rows()
            .skip((self.current_page - 1) * PAGE_SIZE)
            .take(PAGE_SIZE)
            .map(|r| PageRow {
                key: r.key,
                member: &r.member,
                selected: self.selected.contains(&r.key),
                editing: edit_key == Some(r.key),
            })
            .collect()
    }

    /// Up to [`PAGE_WINDOW`] consecutive page numbers starting one before the
    /// current page, clamped to `[1, max_page]`.
    pub fn page_window(&self) -> Vec<usize> {
        let max = self.max_page();
        let start = self.current_page.saturating_sub(1).max(1);
        let end = (start + PAGE_WINDOW - 1).min(max);
        (start..=end).collect()
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        !self.page_rows().is_empty() && self.current_page < self.max_page()
    }

    /// Move to page `n`. Out-of-range requests are ignored and return `false`.
    pub fn go_to_page(&mut self, n: usize) -> bool {
        let max = self.max_page();
        if n < 1 || n > max {
            debug!(requested = n, max_page = max, "page change ignored");
            return false;
        }
        self.current_page = n;
        self.selected.clear();
        debug!(page = n, max_page = max, "page changed");
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.has_next() && self.go_to_page(self.current_page + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        self.has_prev() && self.go_to_page(self.current_page - 1)
    }

    pub fn first_page(&mut self) -> bool {
        self.go_to_page(1)
    }

    pub fn last_page(&mut self) -> bool {
        let max = self.max_page();
        self.go_to_page(max)
    }

    /// Flip the selection of the first visible record with display id `id`.
    ///
    /// Returns `false` when no visible record carries that id.
    pub fn toggle_select(&mut self, id: u32) -> bool {
        match self.visible_key(id) {
            Some(key) => self.toggle_select_key(key),
            None => {
                debug!(id, "toggle on a record that is not visible");
                false
            }
        }
    }

    /// Flip the selection of one visible record.
    pub fn toggle_select_key(&mut self, key: RowKey) -> bool {
        if self.visible_row(key).is_none() {
            debug!(?key, "toggle on a record that is not visible");
            return false;
        }
        if !self.selected.remove(&key) {
            self.selected.insert(key);
        }
        true
    }

    pub fn is_selected(&self, id: u32) -> bool {
        self.rows
            .iter()
            .any(|r| r.member.id == id && self.selected.contains(&r.key))
    }

    /// Display ids of the selected records, in list order.
    pub fn selected_ids(&self) -> Vec<u32> {
        self.rows
            .iter()
            .filter(|r| self.selected.contains(&r.key))
            .map(|r| r.member.id)
            .collect()
    }

    pub fn selection_count(&self) -> usize {
        self.selected.len()
    }

    /// "Selected N rows out of T", where T is the unfiltered record count.
    pub fn selection_summary(&self) -> String {
        let n = self.selected.len();
        let noun = if n == 1 { "row" } else { "rows" };
        format!("Selected {n} {noun} out of {}", self.rows.len())
    }

    /// Submit a search of `term` against `field` over the full list.
    ///
    /// An empty term deactivates the search. The page goes back to 1 and the
    /// selection is pruned to what is still visible.
    pub fn search(&mut self, term: &str, field: MemberField) {
        if term.is_empty() {
            self.search = None;
        } else {
            let matches = collect_matches(self.rows.iter().map(|r| (r.key, &r.member)), term, field)
                .into_iter()
                .collect();
            self.search = Some(ActiveSearch {
                term: term.to_string(),
                field,
                matches,
            });
        }
        self.current_page = 1;
        let visible: BTreeSet<RowKey> = self.visible_rows().map(|r| r.key).collect();
        self.selected.retain(|k| visible.contains(k));
        info!(
            term,
            field = field.label(),
            visible = visible.len(),
            "search applied"
        );
    }

    pub fn active_search(&self) -> Option<&ActiveSearch> {
        self.search.as_ref()
    }

    /// Start editing the first visible record with display id `id`, dropping
    /// any unsaved draft.
    pub fn begin_edit(&mut self, id: u32) -> bool {
        match self.visible_key(id) {
            Some(key) => self.begin_edit_key(key),
            None => {
                debug!(id, "edit requested for a record that is not visible");
                false
            }
        }
    }

    pub fn begin_edit_key(&mut self, key: RowKey) -> bool {
        let Some(row) = self.visible_row(key) else {
            debug!(?key, "edit requested for a record that is not visible");
            return false;
        };
        let draft = EditDraft {
            key: row.key,
            member: row.member.clone(),
        };
        if let Some(prev) = self.editing.replace(draft) {
            debug!(id = prev.member.id, "discarding unsaved edit");
        }
        true
    }

    pub fn editing(&self) -> Option<&EditDraft> {
        self.editing.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Mutable access to the draft's fields. The draft's id is informational only.
    pub fn draft_mut(&mut self) -> Option<&mut Member> {
        self.editing.as_mut().map(|d| &mut d.member)
    }

    /// Merge the draft's name, email and role into its record.
    ///
    /// Edit mode ends whether or not the record is still present.
    pub fn save_edit(&mut self) -> bool {
        let Some(draft) = self.editing.take() else {
            return false;
        };
        match self.rows.iter_mut().find(|r| r.key == draft.key) {
            Some(row) => {
                let EditDraft { member, .. } = draft;
                row.member.name = member.name;
                row.member.email = member.email;
                row.member.role = member.role;
                info!(id = row.member.id, "member updated");
                true
            }
            None => {
                warn!(id = draft.member.id, "edited member no longer exists");
                false
            }
        }
    }

    /// Throw away the draft. Returns whether an edit was in progress.
    pub fn cancel_edit(&mut self) -> bool {
        self.editing.take().is_some()
    }

    /// Delete every record with display id `id`, then recompact ids.
    pub fn delete_one(&mut self, id: u32) -> bool {
        let removed = self.remove_where(|r| r.member.id == id);
        info!(id, removed, remaining = self.rows.len(), "delete");
        removed > 0
    }

    /// Delete exactly one record, then recompact ids.
    pub fn delete_key(&mut self, key: RowKey) -> bool {
        let removed = self.remove_where(|r| r.key == key);
        info!(?key, removed, remaining = self.rows.len(), "delete");
        removed > 0
    }

    /// Delete every selected record, then recompact ids. Returns the count removed.
    pub fn delete_selected(&mut self) -> usize {
        let doomed = std::mem::take(&mut self.selected);
        let removed = self.remove_where(|r| doomed.contains(&r.key));
        info!(removed, remaining = self.rows.len(), "batch delete");
        removed
    }

    fn remove_where<F>(&mut self, pred: F) -> usize
    where
        F: Fn(&Row) -> bool,
    {
        let before = self.rows.len();
        self.rows.retain(|r| !pred(r));
        for (i, row) in self.rows.iter_mut().enumerate() {
            row.member.id = (i + 1) as u32;
        }
        self.selected.clear();

        let live: BTreeSet<RowKey> = self.rows.iter().map(|r| r.key).collect();
        if let Some(search) = self.search.as_mut() {
            search.matches.retain(|k| live.contains(k));
        }
        let edited = self.editing.as_ref().map(|d| d.key);
        if let Some(key) = edited {
            match self.rows.iter().find(|r| r.key == key) {
                Some(row) => {
                    let id = row.member.id;
                    if let Some(draft) = self.editing.as_mut() {
                        draft.member.id = id;
                    }
                }
                None => {
                    debug!("edited member was deleted; leaving edit mode");
                    self.editing = None;
                }
            }
        }

        self.clamp_page();
        before - self.rows.len()
    }

    fn clamp_page(&mut self) {
        let max = self.max_page().max(1);
        if self.current_page > max {
            debug!(from = self.current_page, to = max, "clamping page");
            self.current_page = max;
        }
    }
}

impl Default for MemberTable {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(n: u32) -> Vec<Member> {
        (1..=n)
            .map(|i| {
                let role = if i % 5 == 0 { "admin" } else { "member" };
                Member::new(i, format!("User {i}"), format!("user{i}@example.com"), role)
            })
            .collect()
    }

    fn ids(table: &MemberTable) -> Vec<u32> {
        table.members().map(|m| m.id).collect()
    }

    #[test]
    fn twenty_five_records_make_three_pages() {
        let mut t = MemberTable::new(seed(25));
        assert_eq!(t.max_page(), 3);
        assert!(!t.go_to_page(4));
        assert!(!t.go_to_page(0));
        assert_eq!(t.current_page(), 1);

        assert!(t.go_to_page(2));
        assert!(t.toggle_select(12));
        assert!(t.delete_one(15));
        assert_eq!(t.selection_count(), 0);
        assert_eq!(t.len(), 24);
        assert_eq!(ids(&t), (1..=24).collect::<Vec<_>>());
        assert_eq!(t.max_page(), 3);
        assert_eq!(t.current_page(), 2);
        // record that used to be #16 is now #15
        assert_eq!(t.members().nth(14).unwrap().name, "User 16");
    }

    #[test]
    fn ids_stay_dense_across_delete_sequences() {
        let mut t = MemberTable::new(seed(17));
        t.delete_one(1);
        t.delete_one(16);
        t.delete_one(8);
        t.toggle_select(2);
        t.toggle_select(3);
        t.delete_selected();
        assert_eq!(ids(&t), (1..=12).collect::<Vec<_>>());
        let names: Vec<_> = t.members().map(|m| m.name.clone()).collect();
        assert_eq!(names[0], "User 2");
        assert_eq!(names[1], "User 5");
        assert_eq!(names.last().unwrap(), "User 16");
    }

    #[test]
    fn deleting_last_page_clamps_current_page() {
        let mut t = MemberTable::new(seed(21));
        assert!(t.go_to_page(3));
        assert_eq!(t.page_rows().len(), 1);
        assert!(t.toggle_select(21));
        assert_eq!(t.delete_selected(), 1);
        assert_eq!(t.max_page(), 2);
        assert_eq!(t.current_page(), 2);
        assert!(t.selected_ids().is_empty());
    }

    #[test]
    fn deleting_everything_leaves_page_one() {
        let mut t = MemberTable::new(seed(3));
        for id in [1, 2, 3] {
            assert!(t.toggle_select(id));
        }
        assert_eq!(t.delete_selected(), 3);
        assert!(t.is_empty());
        assert_eq!(t.max_page(), 0);
        assert_eq!(t.current_page(), 1);
        assert!(!t.has_next());
        assert!(!t.has_prev());
    }

    #[test]
    fn page_change_clears_selection() {
        let mut t = MemberTable::new(seed(25));
        t.toggle_select(1);
        t.toggle_select(2);
        assert_eq!(t.selected_ids(), vec![1, 2]);
        assert!(t.next_page());
        assert!(t.selected_ids().is_empty());
        t.toggle_select(11);
        assert!(t.prev_page());
        assert_eq!(t.selection_count(), 0);
    }

    #[test]
    fn toggle_twice_deselects_and_unknown_id_is_ignored() {
        let mut t = MemberTable::new(seed(5));
        assert!(t.toggle_select(3));
        assert!(t.is_selected(3));
        assert!(t.toggle_select(3));
        assert!(!t.is_selected(3));
        assert!(!t.toggle_select(99));
        assert_eq!(t.selection_summary(), "Selected 0 rows out of 5");
        t.toggle_select(4);
        assert_eq!(t.selection_summary(), "Selected 1 row out of 5");
    }

    #[test]
    fn page_window_is_clamped() {
        let mut t = MemberTable::new(seed(55));
        assert_eq!(t.page_window(), vec![1, 2, 3]);
        t.go_to_page(4);
        assert_eq!(t.page_window(), vec![3, 4, 5]);
        t.go_to_page(6);
        assert_eq!(t.page_window(), vec![5, 6]);

        let small = MemberTable::new(seed(8));
        assert_eq!(small.page_window(), vec![1]);
    }

    #[test]
    fn next_is_disabled_on_last_page() {
        let mut t = MemberTable::new(seed(20));
        assert!(t.has_next());
        assert!(t.last_page());
        assert_eq!(t.current_page(), 2);
        assert!(!t.has_next());
        assert!(!t.next_page());
        assert!(t.first_page());
        assert!(!t.has_prev());
    }

    #[test]
    fn zero_match_search_is_empty_first_page() {
        let mut t = MemberTable::new(seed(25));
        t.go_to_page(3);
        t.search("nobody-matches-this", MemberField::Name);
        assert_eq!(t.current_page(), 1);
        assert_eq!(t.visible_count(), 0);
        assert_eq!(t.max_page(), 0);
        assert!(t.page_rows().is_empty());
        assert!(!t.has_next());
        assert!(t.page_window().is_empty());
        assert!(!t.go_to_page(1));
    }

    #[test]
    fn role_search_matches_any_case() {
        let members = vec![
            Member::new(1, "A", "a@x.io", "Admin"),
            Member::new(2, "B", "b@x.io", "member"),
            Member::new(3, "C", "c@x.io", "ADMIN"),
            Member::new(4, "D", "d@x.io", "administrator"),
        ];
        let mut t = MemberTable::new(members);
        t.search("admin", MemberField::Role);
        let visible: Vec<u32> = t.visible().iter().map(|m| m.id).collect();
        assert_eq!(visible, vec![1, 3, 4]);
        assert_eq!(t.active_search().unwrap().field, MemberField::Role);
    }

    #[test]
    fn search_uses_filtered_count_for_pagination() {
        let mut t = MemberTable::new(seed(100));
        t.search("admin", MemberField::Role);
        assert_eq!(t.visible_count(), 20);
        assert_eq!(t.max_page(), 2);
        assert!(!t.go_to_page(3));
        assert!(t.go_to_page(2));
        assert_eq!(t.page_rows()[0].member.id, 55);
    }

    #[test]
    fn empty_search_restores_full_list() {
        let mut t = MemberTable::new(seed(25));
        t.search("admin", MemberField::Role);
        assert_eq!(t.visible_count(), 5);
        t.search("", MemberField::Role);
        assert!(t.active_search().is_none());
        assert_eq!(t.visible_count(), 25);
        assert_eq!(t.max_page(), 3);
    }

    #[test]
    fn search_prunes_selection_to_visible_rows() {
        let mut t = MemberTable::new(seed(10));
        t.toggle_select(1);
        t.toggle_select(5);
        t.search("admin", MemberField::Role);
        assert_eq!(t.selected_ids(), vec![5]);
        // not visible under the filter
        assert!(!t.toggle_select(2));
    }

    #[test]
    fn deleted_rows_leave_filtered_view() {
        let mut t = MemberTable::new(seed(25));
        t.search("admin", MemberField::Role);
        let first = t.visible()[0].id;
        assert_eq!(first, 5);
        t.delete_one(first);
        assert_eq!(t.visible_count(), 4);
        let visible: Vec<u32> = t.visible().iter().map(|m| m.id).collect();
        assert_eq!(visible, vec![9, 14, 19, 24]);
    }

    #[test]
    fn duplicate_source_ids_are_addressed_by_row() {
        let members = vec![
            Member::new(5, "first", "f@x.io", "member"),
            Member::new(5, "second", "s@x.io", "member"),
            Member::new(6, "third", "t@x.io", "member"),
        ];
        let mut t = MemberTable::new(members);
        let second = t.page_rows()[1].key;

        assert!(t.toggle_select_key(second));
        let marks: Vec<(&str, bool)> = t
            .page_rows()
            .iter()
            .map(|r| (r.member.name.as_str(), r.selected))
            .collect();
        assert_eq!(marks, vec![("first", false), ("second", true), ("third", false)]);

        assert!(t.begin_edit_key(second));
        let editing: Vec<bool> = t.page_rows().iter().map(|r| r.editing).collect();
        assert_eq!(editing, vec![false, true, false]);
        assert_eq!(t.editing().unwrap().member.name, "second");
        t.cancel_edit();

        assert!(t.delete_key(second));
        let names: Vec<_> = t.members().map(|m| m.name.clone()).collect();
        assert_eq!(names, vec!["first", "third"]);
        assert_eq!(ids(&t), vec![1, 2]);
        assert!(!t.delete_key(second));
    }

    #[test]
    fn switching_edit_discards_previous_draft() {
        let mut t = MemberTable::new(seed(5));
        assert!(t.begin_edit(1));
        t.draft_mut().unwrap().name = "Changed".into();
        assert!(t.begin_edit(2));
        assert_eq!(t.editing().unwrap().member.id, 2);
        assert!(t.save_edit());
        assert_eq!(t.members().next().unwrap().name, "User 1");
        assert!(!t.is_editing());
    }

    #[test]
    fn save_merges_fields_and_cancel_does_not() {
        let mut t = MemberTable::new(seed(5));
        t.begin_edit(3);
        {
            let d = t.draft_mut().unwrap();
            d.name = "Third".into();
            d.email = String::new();
            d.role = "admin".into();
        }
        assert!(t.save_edit());
        let m = t.members().nth(2).unwrap();
        assert_eq!((m.name.as_str(), m.email.as_str(), m.role.as_str()), ("Third", "", "admin"));

        t.begin_edit(4);
        t.draft_mut().unwrap().name = "Nope".into();
        assert!(t.cancel_edit());
        assert_eq!(t.members().nth(3).unwrap().name, "User 4");
        assert!(!t.cancel_edit());
        assert!(!t.save_edit());
    }

    #[test]
    fn edit_survives_unrelated_delete_and_follows_its_record() {
        let mut t = MemberTable::new(seed(5));
        t.begin_edit(4);
        t.draft_mut().unwrap().role = "owner".into();
        t.delete_one(1);
        assert_eq!(t.editing().unwrap().member.id, 3);
        assert!(t.save_edit());
        assert_eq!(t.members().nth(2).unwrap().name, "User 4");
        assert_eq!(t.members().nth(2).unwrap().role, "owner");
    }

    #[test]
    fn deleting_edited_record_ends_edit() {
        let mut t = MemberTable::new(seed(5));
        t.begin_edit(2);
        t.delete_one(2);
        assert!(!t.is_editing());
        assert!(t.page_rows().iter().all(|r| !r.editing));
    }

    #[test]
    fn page_rows_flag_selected_and_editing() {
        let mut t = MemberTable::new(seed(3));
        t.toggle_select(2);
        t.begin_edit(3);
        let rows = t.page_rows();
        assert!(!rows[0].selected && rows[1].selected);
        assert!(rows[2].editing && !rows[1].editing);
    }

    #[test]
    fn source_ids_are_kept_until_first_delete() {
        let members = vec![
            Member::new(10, "a", "a", "a"),
            Member::new(20, "b", "b", "b"),
            Member::new(30, "c", "c", "c"),
        ];
        let mut t = MemberTable::new(members);
        assert_eq!(ids(&t), vec![10, 20, 30]);
        assert!(t.delete_one(20));
        assert_eq!(ids(&t), vec![1, 2]);
    }

    #[test]
    fn delete_of_unknown_id_still_clears_selection() {
        let mut t = MemberTable::new(seed(4));
        t.toggle_select(1);
        assert!(!t.delete_one(42));
        assert_eq!(t.selection_count(), 0);
        assert_eq!(t.len(), 4);
    }
}
