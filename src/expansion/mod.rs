use crate::config::ExpansionLimits;
use crate::types::{DELETE_MARKER, DELETE_PLACEHOLDER};
use crate::vocab::ReplacementTable;

mod covering;

pub use covering::{consumed_tokens, PartialCovering, PhraseCoverings};

/// Bounded covering search over one tokenized phrase.
///
/// Windows of 1..=`max_window_tokens` tokens are visited in increasing
/// `begin` order, so coverings starting before `begin` already hold every
/// rendering that can reach it. Each table candidate for a window either
/// extends such a rendering or starts a fresh one at `begin`; both must score
/// strictly above `min_log_prob`.
pub fn expand_phrase(
    tokens: &[&str],
    table: &ReplacementTable,
    limits: &ExpansionLimits,
) -> PhraseCoverings {
    let n = tokens.len();
    let mut coverings = PhraseCoverings::new(n);

    for begin in 0..n {
        let last = n.min(begin + limits.max_window_tokens);
        for end in begin + 1..=last {
            let source = tokens[begin..end].join(" ");
            let Some(candidates) = table.candidates(&source) else {
                continue;
            };

            for candidate in candidates {
                let lp = candidate.probability.ln();
                let Some(target) = rendering_target(&candidate.target) else {
                    continue;
                };
                let target_chars = target.chars().count();

                for start in end.saturating_sub(limits.lookback_positions)..end {
                    let covering = coverings.at_mut(start);
                    let extensions: Vec<(String, f64)> = covering
                        .iter()
                        .filter_map(|(rendering, lp_prev)| {
                            let reaches_begin = start + consumed_tokens(rendering) == begin;
                            let fits = rendering.chars().count() + target_chars
                                <= limits.max_rendering_chars;
                            let score = lp_prev + lp;
                            (reaches_begin && fits && score > limits.min_log_prob)
                                .then(|| (format!("{rendering}{target} "), score))
                        })
                        .collect();
                    for (rendering, score) in extensions {
                        covering.insert(rendering, score);
                    }
                }

                if lp > limits.min_log_prob {
                    coverings.at_mut(begin).insert(format!("{target} "), lp);
                }
            }
        }
    }

    tracing::trace!(
        tokens = n,
        renderings = coverings.rendering_count(),
        "expansion: phrase expanded"
    );
    coverings
}

/// Rewrites deletion markers to a placeholder so a dropped token still spans
/// its position; `None` when the rewritten target is blank.
pub fn rendering_target(target: &str) -> Option<String> {
    let rendering = target.replace(DELETE_MARKER, &DELETE_PLACEHOLDER.to_string());
    if rendering.trim().is_empty() {
        return None;
    }
    Some(rendering)
}
