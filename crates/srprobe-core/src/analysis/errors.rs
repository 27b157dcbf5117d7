use std::collections::BTreeMap;

use crate::ErrorSummary;
use crate::decode::DecodeError;

/// Examples kept per layer in the report.
const MAX_EXAMPLES: usize = 3;

#[derive(Debug, Default)]
struct LayerTally {
    count: u64,
    examples: Vec<String>,
}

/// Per-layer decode failure counts, ordered by layer name.
#[derive(Debug, Default)]
pub(crate) struct ErrorTally {
    layers: BTreeMap<&'static str, LayerTally>,
}

impl ErrorTally {
    pub(crate) fn record(&mut self, frame: u64, err: &DecodeError) {
        let entry = self.layers.entry(err.layer()).or_default();
        entry.count += 1;
        if entry.examples.len() < MAX_EXAMPLES {
            entry.examples.push(format!("frame {frame}: {err}"));
        }
    }

    pub(crate) fn into_summaries(self) -> Vec<ErrorSummary> {
        self.layers
            .into_iter()
            .map(|(layer, tally)| ErrorSummary {
                layer: layer.to_string(),
                count: tally.count,
                examples: tally.examples,
            })
            .collect()
    }
}
