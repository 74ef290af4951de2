//! Convergence loop
//!
//! Drives repeated analyzer passes through normalization and patching until
//! the document reaches a textual fixed point or the depth limit fires. The
//! loop is an explicit state machine with an iteration counter — the
//! recursive "keep fixing until done" shape, made bounded.

use crate::error::EngineError;
use crate::infra::oracle::Oracle;
use crate::models::diagnostic::collect_fix_edits;
use crate::models::oracle::OracleConfig;
use crate::models::text::TextEdit;

use super::normalize::disjoint_edits;
use super::patch::apply_edits;

/// Result of a converged run: the settled text, every applied batch in
/// application order, and the iteration index at which the text stabilized.
#[derive(Debug, Clone)]
pub struct Convergence {
    pub text: String,
    pub batches: Vec<Vec<TextEdit>>,
    pub iterations: u32,
}

enum LoopState {
    Running { iteration: u32, text: String },
    Converged { iteration: u32, text: String },
}

/// Run every config (in order) against the working text once per iteration,
/// repeating until an iteration changes nothing.
///
/// Termination is textual equality of the whole document, not edit count: a
/// real change may unlock further fixes (an added import triggers the sort
/// pass), so it must be chased again. The ordering of `configs` within an
/// iteration is preserved — required-import insertion has to precede
/// unused-import removal to avoid most oscillation.
///
/// Edits applied by earlier configs of a failing iteration remain applied;
/// the error reports that the operation did not fully succeed.
pub fn run(
    oracle: &dyn Oracle,
    text: &str,
    configs: &[OracleConfig],
    depth_limit: u32,
) -> Result<Convergence, EngineError> {
    let mut batches: Vec<Vec<TextEdit>> = Vec::new();
    let mut state = LoopState::Running {
        iteration: 0,
        text: text.to_string(),
    };

    loop {
        match state {
            LoopState::Converged { iteration, text } => {
                tracing::debug!(iterations = iteration, batches = batches.len(), "converged");
                return Ok(Convergence {
                    text,
                    batches,
                    iterations: iteration,
                });
            }
            LoopState::Running { iteration, text } => {
                if iteration > depth_limit {
                    return Err(EngineError::DepthLimitExceeded { limit: depth_limit });
                }

                let prev = text.clone();
                let mut current = text;
                for config in configs {
                    let diagnostics = oracle.check(&current, config)?;
                    let edits = disjoint_edits(collect_fix_edits(&diagnostics));
                    if edits.is_empty() {
                        continue;
                    }
                    tracing::debug!(iteration, edits = edits.len(), "applying fix batch");
                    current = apply_edits(&current, &edits);
                    batches.push(edits);
                }

                state = if current == prev {
                    LoopState::Converged {
                        iteration,
                        text: current,
                    }
                } else {
                    LoopState::Running {
                        iteration: iteration + 1,
                        text: current,
                    }
                };
            }
        }
    }
}
