use pik_core::{Completion, EvalResult, EvaluationError, Interrupt};

/// How a driven loop ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopSummary {
    /// Iterations whose body ran to the end.
    pub completed: usize,
    /// Iterations cut short by `ContinueIteration`.
    pub skipped: usize,
    /// Whether `BreakLoop` ended the loop early.
    pub broken: bool,
}

/// Runs `body` once per item.
///
/// `ContinueIteration` moves on to the next item, `BreakLoop` stops the loop as
/// if it had finished, and an error stops it and is returned as is.
pub fn drive_loop<I, F>(items: I, mut body: F) -> Result<LoopSummary, EvaluationError>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> EvalResult,
{
    let mut summary = LoopSummary::default();
    for item in items {
        match body(item)? {
            Completion::Value(_) => summary.completed += 1,
            Completion::Interrupt(Interrupt::ContinueIteration) => summary.skipped += 1,
            Completion::Interrupt(Interrupt::BreakLoop) => {
                summary.broken = true;
                break;
            }
        }
    }
    Ok(summary)
}

/// `start, start + step, ...` while below `start + len`.
pub fn stepped_range(
    start: f64,
    len: f64,
    step: f64,
) -> Result<impl Iterator<Item = f64>, EvaluationError> {
    if step <= 0.0 || !step.is_finite() {
        return Err(EvaluationError::invalid_argument(format!(
            "Loop step must be a positive number, got {}.",
            step
        )));
    }
    let end = start + len;
    let count = if len > 0.0 {
        (len / step).ceil() as usize
    } else {
        0
    };
    Ok((0..count)
        .map(move |index| start + step * index as f64)
        .filter(move |value| *value < end))
}
