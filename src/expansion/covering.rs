use std::collections::HashMap;

/// Noisy renderings that start at one phrase position, each with its
/// accumulated log-probability.
///
/// Every rendering is a sequence of targets, each followed by one space, so
/// the number of spaces is the number of phrase tokens it has consumed.
/// Re-inserting a rendering overwrites its score but keeps its original slot.
#[derive(Debug, Clone, Default)]
pub struct PartialCovering {
    renderings: Vec<(String, f64)>,
    lookup: HashMap<String, usize>,
}

impl PartialCovering {
    pub fn insert(&mut self, rendering: String, log_prob: f64) {
        match self.lookup.get(&rendering) {
            Some(&idx) => self.renderings[idx].1 = log_prob,
            None => {
                self.lookup.insert(rendering.clone(), self.renderings.len());
                self.renderings.push((rendering, log_prob));
            }
        }
    }

    pub fn get(&self, rendering: &str) -> Option<f64> {
        self.lookup.get(rendering).map(|&idx| self.renderings[idx].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.renderings.iter().map(|(r, lp)| (r.as_str(), *lp))
    }

    /// Highest score first; equal scores keep insertion order.
    pub fn ranked(&self) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(&str, f64)> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }

    pub fn len(&self) -> usize {
        self.renderings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderings.is_empty()
    }
}

/// All coverings of one phrase, indexed by start position.
#[derive(Debug, Clone, Default)]
pub struct PhraseCoverings {
    by_start: Vec<PartialCovering>,
}

impl PhraseCoverings {
    pub fn new(phrase_len: usize) -> Self {
        Self {
            by_start: vec![PartialCovering::default(); phrase_len],
        }
    }

    pub fn at(&self, start: usize) -> Option<&PartialCovering> {
        self.by_start.get(start)
    }

    pub(crate) fn at_mut(&mut self, start: usize) -> &mut PartialCovering {
        &mut self.by_start[start]
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &PartialCovering)> {
        self.by_start.iter().enumerate()
    }

    pub fn rendering_count(&self) -> usize {
        self.by_start.iter().map(PartialCovering::len).sum()
    }
}

pub fn consumed_tokens(rendering: &str) -> usize {
    rendering.matches(' ').count()
}
