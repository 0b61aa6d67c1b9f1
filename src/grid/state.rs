//! Selection and blackout state for one schedule view, plus the bulk
//! row/column editors.

use std::collections::BTreeSet;

use super::slot::{Slot, DAY_COUNT, HOUR_COUNT};

/// Which set the view's edits land in. A single flag per view, set from
/// owner capability when the schedule loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    Selection,
    Blackout,
}

/// The view's editable state: the acting participant's selections and the
/// owner's blackouts. The two sets stay disjoint through every operation.
#[derive(Debug, Clone, Default)]
pub struct GridState {
    mode: EditMode,
    selected: BTreeSet<Slot>,
    blackouts: BTreeSet<Slot>,
}

impl GridState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: EditMode) {
        self.mode = mode;
    }

    pub fn is_selected(&self, slot: Slot) -> bool {
        self.selected.contains(&slot)
    }

    pub fn is_blackout(&self, slot: Slot) -> bool {
        self.blackouts.contains(&slot)
    }

    pub fn selected(&self) -> &BTreeSet<Slot> {
        &self.selected
    }

    pub fn blackouts(&self) -> &BTreeSet<Slot> {
        &self.blackouts
    }

    /// Wire keys of the active set, for persistence.
    pub fn active_keys(&self) -> Vec<String> {
        self.active().iter().map(Slot::key).collect()
    }

    fn active(&self) -> &BTreeSet<Slot> {
        match self.mode {
            EditMode::Selection => &self.selected,
            EditMode::Blackout => &self.blackouts,
        }
    }

    /// Replace the selection set wholesale (fetch reconciliation). Slots
    /// blacked out here are dropped to keep the sets disjoint.
    pub fn load_selections(&mut self, slots: BTreeSet<Slot>) {
        self.selected = &slots - &self.blackouts;
    }

    /// Replace the blackout set wholesale, evicting colliding selections.
    pub fn load_blackouts(&mut self, slots: BTreeSet<Slot>) {
        self.selected.retain(|slot| !slots.contains(slot));
        self.blackouts = slots;
    }

    /// Flip one slot in the active set. Returns whether anything changed;
    /// selecting a blacked-out slot is a no-op.
    pub fn toggle(&mut self, slot: Slot) -> bool {
        match self.mode {
            EditMode::Selection => {
                if self.blackouts.contains(&slot) {
                    return false;
                }
                if !self.selected.remove(&slot) {
                    self.selected.insert(slot);
                }
                true
            }
            EditMode::Blackout => {
                if !self.blackouts.remove(&slot) {
                    self.blackouts.insert(slot);
                    self.selected.remove(&slot);
                }
                true
            }
        }
    }

    /// Bulk-toggle an hour row: if any slot in the row is set, clear them
    /// all; otherwise set them all.
    pub fn toggle_row(&mut self, hour: usize) -> bool {
        if hour >= HOUR_COUNT {
            return false;
        }
        let row: Vec<Slot> = Slot::all().filter(|slot| slot.hour == hour).collect();
        self.toggle_group(&row)
    }

    /// Bulk-toggle a day column with the same any-set-clears-all policy.
    pub fn toggle_column(&mut self, day: usize) -> bool {
        if day >= DAY_COUNT {
            return false;
        }
        let column: Vec<Slot> = Slot::all().filter(|slot| slot.day == day).collect();
        self.toggle_group(&column)
    }

    fn toggle_group(&mut self, slots: &[Slot]) -> bool {
        let any_set = slots.iter().any(|slot| self.active().contains(slot));
        let mut changed = false;
        for slot in slots {
            changed |= if any_set {
                self.remove_active(*slot)
            } else {
                self.insert_active(*slot)
            };
        }
        changed
    }

    /// Copy column `from` onto column `from + 1`, replacing the target
    /// column's state wholesale. No-op for the last day.
    pub fn copy_column(&mut self, from: usize) -> bool {
        if from + 1 >= DAY_COUNT {
            return false;
        }
        let mut changed = false;
        for hour in 0..HOUR_COUNT {
            let source = Slot { day: from, hour };
            let target = Slot { day: from + 1, hour };
            changed |= if self.active().contains(&source) {
                self.insert_active(target)
            } else {
                self.remove_active(target)
            };
        }
        changed
    }

    fn insert_active(&mut self, slot: Slot) -> bool {
        match self.mode {
            EditMode::Selection => {
                if self.blackouts.contains(&slot) {
                    false
                } else {
                    self.selected.insert(slot)
                }
            }
            EditMode::Blackout => {
                self.selected.remove(&slot);
                self.blackouts.insert(slot)
            }
        }
    }

    fn remove_active(&mut self, slot: Slot) -> bool {
        match self.mode {
            EditMode::Selection => self.selected.remove(&slot),
            EditMode::Blackout => self.blackouts.remove(&slot),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(key: &str) -> Slot {
        Slot::parse(key).unwrap()
    }

    fn keys(state: &BTreeSet<Slot>) -> Vec<String> {
        state.iter().map(Slot::key).collect()
    }

    #[test]
    fn test_toggle_is_an_involution() {
        let mut grid = GridState::new();
        grid.toggle(slot("W12"));
        assert!(grid.is_selected(slot("W12")));
        grid.toggle(slot("W12"));
        assert!(!grid.is_selected(slot("W12")));
        assert!(grid.selected().is_empty());
    }

    #[test]
    fn test_toggle_skips_blacked_out_slot() {
        let mut grid = GridState::new();
        grid.load_blackouts([slot("M08")].into_iter().collect());
        assert!(!grid.toggle(slot("M08")));
        assert!(!grid.is_selected(slot("M08")));
    }

    #[test]
    fn test_row_toggle_from_mixed_state_clears_all() {
        let mut grid = GridState::new();
        grid.toggle(slot("M08"));
        grid.toggle(slot("R08"));
        assert!(grid.toggle_row(0));
        for day in 0..DAY_COUNT {
            assert!(!grid.is_selected(Slot { day, hour: 0 }));
        }
    }

    #[test]
    fn test_row_toggle_from_empty_sets_all_then_reverts() {
        let mut grid = GridState::new();
        assert!(grid.toggle_row(3));
        for day in 0..DAY_COUNT {
            assert!(grid.is_selected(Slot { day, hour: 3 }));
        }
        assert!(grid.toggle_row(3));
        assert!(grid.selected().is_empty());
    }

    #[test]
    fn test_column_toggle_all_or_nothing() {
        let mut grid = GridState::new();
        grid.toggle(slot("T10"));
        assert!(grid.toggle_column(1));
        let selected_in_column = (0..HOUR_COUNT)
            .filter(|hour| grid.is_selected(Slot { day: 1, hour: *hour }))
            .count();
        // Never a partial column: one call either fills or empties it.
        assert_eq!(selected_in_column, 0);
        assert!(grid.toggle_column(1));
        let selected_in_column = (0..HOUR_COUNT)
            .filter(|hour| grid.is_selected(Slot { day: 1, hour: *hour }))
            .count();
        assert_eq!(selected_in_column, HOUR_COUNT);
    }

    #[test]
    fn test_bulk_set_all_skips_blackouts() {
        let mut grid = GridState::new();
        grid.load_blackouts([slot("M08"), slot("T08")].into_iter().collect());
        grid.toggle_row(0);
        assert!(!grid.is_selected(slot("M08")));
        assert!(!grid.is_selected(slot("T08")));
        assert!(grid.is_selected(slot("W08")));
    }

    #[test]
    fn test_copy_column_replaces_target_exactly() {
        let mut grid = GridState::new();
        grid.toggle(slot("M08"));
        grid.toggle(slot("M12"));
        grid.toggle(slot("T15"));
        assert!(grid.copy_column(0));

        let source: BTreeSet<Slot> = grid
            .selected()
            .iter()
            .filter(|s| s.day == 0)
            .copied()
            .collect();
        let target: BTreeSet<Slot> = grid
            .selected()
            .iter()
            .filter(|s| s.day == 1)
            .copied()
            .collect();
        assert_eq!(
            source.iter().map(|s| s.hour).collect::<Vec<_>>(),
            target.iter().map(|s| s.hour).collect::<Vec<_>>()
        );
        assert!(!grid.is_selected(slot("T15")));
    }

    #[test]
    fn test_copy_column_last_day_is_noop() {
        let mut grid = GridState::new();
        grid.toggle(slot("U10"));
        assert!(!grid.copy_column(DAY_COUNT - 1));
        assert_eq!(keys(grid.selected()), vec!["U10".to_string()]);
    }

    #[test]
    fn test_blackout_mode_operates_on_blackout_set() {
        let mut grid = GridState::new();
        grid.set_mode(EditMode::Blackout);
        grid.toggle(slot("F18"));
        assert!(grid.is_blackout(slot("F18")));
        assert!(grid.selected().is_empty());
        grid.toggle_column(4);
        // Column had one blackout, so the bulk toggle clears it.
        assert!(grid.blackouts().is_empty());
    }

    #[test]
    fn test_blackout_edit_evicts_selection() {
        let mut grid = GridState::new();
        grid.toggle(slot("S09"));
        grid.set_mode(EditMode::Blackout);
        grid.toggle(slot("S09"));
        assert!(grid.is_blackout(slot("S09")));
        assert!(!grid.is_selected(slot("S09")));
    }

    #[test]
    fn test_sets_stay_disjoint_through_operation_sequences() {
        let mut grid = GridState::new();
        grid.toggle_row(2);
        grid.toggle_column(3);
        grid.set_mode(EditMode::Blackout);
        grid.toggle_row(2);
        grid.copy_column(2);
        grid.set_mode(EditMode::Selection);
        grid.toggle_column(5);
        grid.copy_column(4);
        assert!(grid.selected().is_disjoint(grid.blackouts()));
    }

    #[test]
    fn test_load_selections_drops_blacked_out_keys() {
        let mut grid = GridState::new();
        grid.load_blackouts([slot("M08")].into_iter().collect());
        grid.load_selections([slot("M08"), slot("T09")].into_iter().collect());
        assert_eq!(keys(grid.selected()), vec!["T09".to_string()]);
    }

    #[test]
    fn test_noop_operations_report_unchanged() {
        let mut grid = GridState::new();
        grid.load_blackouts([slot("M08")].into_iter().collect());
        assert!(!grid.toggle(slot("M08")));
        assert!(!grid.copy_column(DAY_COUNT - 1));
    }
}
