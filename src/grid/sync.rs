//! Dirty/clean lifecycle for the save control.

/// Lifecycle of one editable set's save control:
/// `Clean -> Dirty -> Saving -> Clean`, with failures returning to Dirty
/// so the user can retry manually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncPhase {
    #[default]
    Clean,
    Dirty,
    Saving,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SyncState {
    phase: SyncPhase,
}

impl SyncState {
    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    /// A local mutation happened. Mid-save edits land here too: the machine
    /// goes Dirty and stays there even if the in-flight save succeeds,
    /// since the saved snapshot predates the edit.
    pub fn mark_dirty(&mut self) {
        self.phase = SyncPhase::Dirty;
    }

    /// Fresh persisted state was loaded; nothing left to save.
    pub fn reset(&mut self) {
        self.phase = SyncPhase::Clean;
    }

    pub fn can_save(&self) -> bool {
        self.phase == SyncPhase::Dirty
    }

    pub fn is_saving(&self) -> bool {
        self.phase == SyncPhase::Saving
    }

    /// Move Dirty to Saving. Returns false from any other phase.
    pub fn begin_save(&mut self) -> bool {
        if self.phase == SyncPhase::Dirty {
            self.phase = SyncPhase::Saving;
            true
        } else {
            false
        }
    }

    /// Resolve an in-flight save. Ignored when an edit already moved the
    /// machine back to Dirty.
    pub fn finish_save(&mut self, ok: bool) {
        if self.phase == SyncPhase::Saving {
            self.phase = if ok { SyncPhase::Clean } else { SyncPhase::Dirty };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_until_marked_dirty() {
        let mut sync = SyncState::default();
        assert_eq!(sync.phase(), SyncPhase::Clean);
        assert!(!sync.can_save());
        assert!(!sync.begin_save());
        sync.mark_dirty();
        assert!(sync.can_save());
    }

    #[test]
    fn test_successful_save_returns_to_clean() {
        let mut sync = SyncState::default();
        sync.mark_dirty();
        assert!(sync.begin_save());
        assert!(sync.is_saving());
        sync.finish_save(true);
        assert_eq!(sync.phase(), SyncPhase::Clean);
    }

    #[test]
    fn test_failed_save_returns_to_dirty() {
        let mut sync = SyncState::default();
        sync.mark_dirty();
        assert!(sync.begin_save());
        sync.finish_save(false);
        assert_eq!(sync.phase(), SyncPhase::Dirty);
        // Manual retry goes through begin_save again.
        assert!(sync.begin_save());
    }

    #[test]
    fn test_edit_during_save_pins_dirty() {
        let mut sync = SyncState::default();
        sync.mark_dirty();
        assert!(sync.begin_save());
        sync.mark_dirty();
        sync.finish_save(true);
        assert_eq!(sync.phase(), SyncPhase::Dirty);
    }

    #[test]
    fn test_reset_clears_pending_state() {
        let mut sync = SyncState::default();
        sync.mark_dirty();
        sync.reset();
        assert_eq!(sync.phase(), SyncPhase::Clean);
    }
}
