use crate::evaluation::Snapshot;

/// Ordered snapshots of an estimator over a replayed stream.
#[derive(Debug, Default, Clone)]
pub struct EstimateCurve {
    entries: Vec<Snapshot>,
}

impl EstimateCurve {
    pub fn push(&mut self, snapshot: Snapshot) {
        self.entries.push(snapshot)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<Snapshot> {
        self.entries.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.entries.iter()
    }
}
