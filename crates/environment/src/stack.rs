use crate::config::SaveDiscipline;
use crate::state::MachineSnapshot;

/// Snapshots created by `save()` and consumed by `load()`.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStack {
    discipline: SaveDiscipline,
    snapshots: Vec<MachineSnapshot>,
}

impl SnapshotStack {
    pub fn new(discipline: SaveDiscipline) -> Self {
        Self {
            discipline,
            snapshots: Vec::new(),
        }
    }

    pub fn discipline(&self) -> SaveDiscipline {
        self.discipline
    }

    pub fn save(&mut self, snapshot: MachineSnapshot) {
        if self.discipline == SaveDiscipline::LegacySingleton {
            self.snapshots.clear();
        }
        self.snapshots.push(snapshot);
    }

    /// Snapshot to restore on `load()`, or `None` when nothing was saved.
    ///
    /// Stacked mode pops it; legacy mode leaves it in place for reuse.
    pub fn take_for_load(&mut self) -> Option<MachineSnapshot> {
        match self.discipline {
            SaveDiscipline::Stacked => self.snapshots.pop(),
            SaveDiscipline::LegacySingleton => self.snapshots.last().cloned(),
        }
    }

    pub fn top(&self) -> Option<&MachineSnapshot> {
        self.snapshots.last()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ControllerState;

    fn snapshot(frames: u64) -> MachineSnapshot {
        let mut controllers = ControllerState::new();
        controllers.increment_frames(frames);
        MachineSnapshot::new(controllers, "md5".into(), Vec::new())
    }

    #[test]
    fn test_stacked_is_lifo() {
        let mut stack = SnapshotStack::new(SaveDiscipline::Stacked);
        stack.save(snapshot(1));
        stack.save(snapshot(2));
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.take_for_load().unwrap().frame_number(), 2);
        assert_eq!(stack.take_for_load().unwrap().frame_number(), 1);
        assert!(stack.take_for_load().is_none());
        assert!(stack.is_empty());
    }

    #[test]
    fn test_legacy_keeps_single_snapshot() {
        let mut stack = SnapshotStack::new(SaveDiscipline::LegacySingleton);
        stack.save(snapshot(1));
        stack.save(snapshot(2));
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.take_for_load().unwrap().frame_number(), 2);
        assert_eq!(stack.take_for_load().unwrap().frame_number(), 2);
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.top().map(|s| s.frame_number()), Some(2));
    }

    #[test]
    fn test_empty_stack_loads_nothing() {
        let mut stack = SnapshotStack::default();
        assert_eq!(stack.discipline(), SaveDiscipline::Stacked);
        assert!(stack.take_for_load().is_none());
    }
}
