use std::collections::HashMap;

use crate::{ProbeCount, ProbeData};

/// Occurrences of each distinct record, ordered by first appearance.
#[derive(Debug, Default)]
pub(crate) struct ProbeTally {
    index: HashMap<ProbeData, usize>,
    counts: Vec<ProbeCount>,
}

impl ProbeTally {
    pub(crate) fn record(&mut self, frame: u64, probe: &ProbeData) {
        if let Some(entry) = self
            .index
            .get(probe)
            .and_then(|idx| self.counts.get_mut(*idx))
        {
            entry.count += 1;
            return;
        }
        self.index.insert(*probe, self.counts.len());
        self.counts.push(ProbeCount {
            count: 1,
            first_frame: frame,
            probe: *probe,
        });
    }

    pub(crate) fn into_counts(self) -> Vec<ProbeCount> {
        self.counts
    }
}
