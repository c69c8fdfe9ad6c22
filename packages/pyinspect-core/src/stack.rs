//! Walking a fault's frame chain and choosing which frames to show.

use std::rc::Rc;

use crate::error::Result;
use crate::value::{InspectValue, SyntheticValue};

/// A live activation record, borrowed from the runtime for the duration of
/// one hook invocation.
pub trait FrameView: Sized {
    type Value: InspectValue;

    fn filename(&self) -> String;

    /// One-based line currently executing.
    fn lineno(&self) -> usize;

    fn function_name(&self) -> String;

    /// Local bindings. Fails when the host cannot read the frame's locals.
    fn locals(&self) -> Result<Vec<(String, Self::Value)>>;

    /// The calling frame.
    fn back(&self) -> Option<Self>;
}

/// A node of the trace attached to a raised error.
pub trait TraceNode: Sized {
    type Frame: FrameView;

    fn frame(&self) -> Self::Frame;

    /// The node one level closer to the fault.
    fn next(&self) -> Option<Self>;
}

/// Frames ordered root-first; the last one raised the fault.
#[derive(Debug, Clone)]
pub struct FrameChain<F> {
    frames: Vec<F>,
}

impl<F: FrameView> FrameChain<F> {
    /// Follows the trace to its innermost node, then the caller links back
    /// to the root.
    pub fn from_trace<T>(trace: T) -> Self
    where
        T: TraceNode<Frame = F>,
    {
        let mut node = trace;
        while let Some(next) = node.next() {
            node = next;
        }

        let mut frames = vec![node.frame()];
        while let Some(caller) = frames.last().and_then(|frame| frame.back()) {
            frames.push(caller);
        }
        frames.reverse();
        FrameChain { frames }
    }
}

impl<F> FrameChain<F> {
    pub fn from_frames(frames: Vec<F>) -> Self {
        FrameChain { frames }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[F] {
        &self.frames
    }

    pub fn fault_frame(&self) -> Option<&F> {
        self.frames.last()
    }

    /// Applies the keep policy, see [`selected_indices`].
    pub fn select(self, keep_frames: i64) -> Vec<F> {
        let keep = selected_indices(self.frames.len(), keep_frames);
        self.frames
            .into_iter()
            .enumerate()
            .filter(|(i, _)| keep.contains(i))
            .map(|(_, f)| f)
            .collect()
    }
}

/// Indices of the frames kept out of a chain of `len` frames.
///
/// - `keep_frames > 1`: the root frame plus the last `keep_frames` frames
///   (every frame when the chain is no longer than `keep_frames + 1`).
/// - `keep_frames <= 1`: the fault frame only.
pub fn selected_indices(len: usize, keep_frames: i64) -> Vec<usize> {
    if len == 0 {
        return Vec::new();
    }
    if keep_frames <= 1 {
        return vec![len - 1];
    }

    let keep = usize::try_from(keep_frames).unwrap_or(usize::MAX);
    if len <= keep.saturating_add(1) {
        return (0..len).collect();
    }
    std::iter::once(0).chain(len - keep..len).collect()
}

/// One frame of a [`SyntheticStack`].
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRecord {
    pub filename: String,
    pub lineno: usize,
    pub function: String,
    pub locals: Vec<(String, SyntheticValue)>,
}

impl FrameRecord {
    pub fn new(filename: &str, lineno: usize, function: &str) -> Self {
        FrameRecord {
            filename: filename.to_string(),
            lineno,
            function: function.to_string(),
            locals: Vec::new(),
        }
    }

    pub fn with_local(mut self, name: &str, value: SyntheticValue) -> Self {
        self.locals.push((name.to_string(), value));
        self
    }
}

/// An in-memory call stack, root-first, usable both as a frame chain and as
/// a trace.
#[derive(Debug, Clone)]
pub struct SyntheticStack {
    records: Rc<[FrameRecord]>,
}

impl SyntheticStack {
    pub fn new(records: Vec<FrameRecord>) -> Self {
        SyntheticStack {
            records: records.into(),
        }
    }

    /// Trace rooted at the outermost frame. `None` for an empty stack.
    pub fn trace(&self) -> Option<SyntheticTrace> {
        if self.records.is_empty() {
            return None;
        }
        Some(SyntheticTrace {
            records: Rc::clone(&self.records),
            index: 0,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SyntheticFrame {
    records: Rc<[FrameRecord]>,
    index: usize,
}

impl SyntheticFrame {
    pub fn record(&self) -> &FrameRecord {
        &self.records[self.index]
    }
}

impl FrameView for SyntheticFrame {
    type Value = SyntheticValue;

    fn filename(&self) -> String {
        self.record().filename.clone()
    }

    fn lineno(&self) -> usize {
        self.record().lineno
    }

    fn function_name(&self) -> String {
        self.record().function.clone()
    }

    fn locals(&self) -> Result<Vec<(String, SyntheticValue)>> {
        Ok(self.record().locals.clone())
    }

    fn back(&self) -> Option<Self> {
        let index = self.index.checked_sub(1)?;
        Some(SyntheticFrame {
            records: Rc::clone(&self.records),
            index,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SyntheticTrace {
    records: Rc<[FrameRecord]>,
    index: usize,
}

impl TraceNode for SyntheticTrace {
    type Frame = SyntheticFrame;

    fn frame(&self) -> SyntheticFrame {
        SyntheticFrame {
            records: Rc::clone(&self.records),
            index: self.index,
        }
    }

    fn next(&self) -> Option<Self> {
        let index = self.index + 1;
        if index >= self.records.len() {
            return None;
        }
        Some(SyntheticTrace {
            records: Rc::clone(&self.records),
            index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack(n: usize) -> SyntheticStack {
        SyntheticStack::new(
            (0..n)
                .map(|i| FrameRecord::new("main.py", i + 1, &format!("f{}", i)))
                .collect(),
        )
    }

    fn functions(frames: &[SyntheticFrame]) -> Vec<String> {
        frames.iter().map(|f| f.function_name()).collect()
    }

    #[test]
    fn test_chain_is_root_first() {
        let chain = FrameChain::from_trace(stack(3).trace().unwrap());
        assert_eq!(chain.len(), 3);
        assert_eq!(functions(chain.frames()), vec!["f0", "f1", "f2"]);
        assert_eq!(chain.fault_frame().unwrap().function_name(), "f2");
    }

    #[test]
    fn test_root_plus_last_two() {
        let chain = FrameChain::from_trace(stack(5).trace().unwrap());
        let selected = chain.select(2);
        assert_eq!(functions(&selected), vec!["f0", "f3", "f4"]);
    }

    #[test]
    fn test_keep_one_is_fault_frame() {
        for n in 1..8 {
            let selected = FrameChain::from_trace(stack(n).trace().unwrap()).select(1);
            assert_eq!(functions(&selected), vec![format!("f{}", n - 1)]);
        }
    }

    #[test]
    fn test_non_positive_keep_is_fault_frame() {
        for keep in [0, -1, -10] {
            let selected = FrameChain::from_trace(stack(4).trace().unwrap()).select(keep);
            assert_eq!(functions(&selected), vec!["f3"]);
        }
    }

    #[test]
    fn test_single_frame_chain() {
        for keep in [-1, 0, 1, 2, 5] {
            assert_eq!(selected_indices(1, keep), vec![0]);
        }
    }

    #[test]
    fn test_selection_sizes() {
        for keep in 2..6i64 {
            for n in 1..12usize {
                let indices = selected_indices(n, keep);
                let k = keep as usize;
                if n <= k + 1 {
                    assert_eq!(indices, (0..n).collect::<Vec<_>>());
                } else {
                    assert_eq!(indices.len(), k + 1);
                    assert_eq!(indices[0], 0);
                    assert_eq!(&indices[1..], &(n - k..n).collect::<Vec<_>>()[..]);
                }
                assert_eq!(*indices.last().unwrap(), n - 1);
            }
        }
    }

    #[test]
    fn test_empty_chain() {
        assert!(selected_indices(0, 2).is_empty());
        assert!(SyntheticStack::new(Vec::new()).trace().is_none());
    }
}
