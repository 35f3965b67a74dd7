//! Network topology: series run, optional parallel split, series run.
//!
//! ```text
//! pump ──[before]──┬──[branch 1]──┬──[after]──> discharge
//!                  ├──[branch 2]──┤
//!                  └──[branch n]──┘
//! ```
//!
//! The topology is an immutable value. Every edit returns a new topology and
//! leaves the receiver untouched; whoever owns the "current" network decides
//! what to keep.

use crate::error::{ComponentError, ComponentResult};
use crate::segment::{Fitting, PipeSegment};
use pn_core::SegmentId;

/// One path between the split and the junction.
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub name: String,
    pub segments: Vec<PipeSegment>,
}

impl Branch {
    pub fn new(name: impl Into<String>, segments: Vec<PipeSegment>) -> Self {
        Self {
            name: name.into(),
            segments,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkTopology {
    pub before: Vec<PipeSegment>,
    /// Parallel branches, in insertion order. Names are unique.
    parallel: Vec<Branch>,
    pub after: Vec<PipeSegment>,
}

impl NetworkTopology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from parts, rejecting duplicate branch names.
    pub fn from_parts(
        before: Vec<PipeSegment>,
        parallel: Vec<Branch>,
        after: Vec<PipeSegment>,
    ) -> ComponentResult<Self> {
        let mut topology = Self {
            before,
            parallel: Vec::with_capacity(parallel.len()),
            after,
        };
        for branch in parallel {
            topology.push_branch(branch)?;
        }
        Ok(topology)
    }

    fn push_branch(&mut self, branch: Branch) -> ComponentResult<()> {
        if self.parallel.iter().any(|b| b.name == branch.name) {
            return Err(ComponentError::DuplicateBranch { name: branch.name });
        }
        self.parallel.push(branch);
        Ok(())
    }

    /// All declared branches, even if fewer than two.
    pub fn branches(&self) -> &[Branch] {
        &self.parallel
    }

    /// Branches that form an actual split. A single branch is not a split
    /// and is ignored by the hydraulics.
    pub fn active_branches(&self) -> &[Branch] {
        if self.parallel.len() >= 2 {
            &self.parallel
        } else {
            &[]
        }
    }

    pub fn has_split(&self) -> bool {
        self.parallel.len() >= 2
    }

    /// Every segment in the network, branches included.
    pub fn segments(&self) -> impl Iterator<Item = &PipeSegment> {
        self.before
            .iter()
            .chain(self.parallel.iter().flat_map(|b| b.segments.iter()))
            .chain(self.after.iter())
    }

    /// True when there is no segment anywhere, not even in a lone branch.
    pub fn is_empty(&self) -> bool {
        self.segments().next().is_none()
    }

    /// Name the UI would give the next branch ("Branch 3" after two).
    pub fn next_branch_name(&self) -> String {
        let mut n = self.parallel.len() + 1;
        loop {
            let name = format!("Branch {n}");
            if !self.parallel.iter().any(|b| b.name == name) {
                return name;
            }
            n += 1;
        }
    }

    pub fn with_before_segment(&self, segment: PipeSegment) -> Self {
        let mut next = self.clone();
        next.before.push(segment);
        next
    }

    pub fn without_last_before(&self) -> Self {
        let mut next = self.clone();
        next.before.pop();
        next
    }

    pub fn with_after_segment(&self, segment: PipeSegment) -> Self {
        let mut next = self.clone();
        next.after.push(segment);
        next
    }

    pub fn without_last_after(&self) -> Self {
        let mut next = self.clone();
        next.after.pop();
        next
    }

    pub fn with_branch(&self, branch: Branch) -> ComponentResult<Self> {
        let mut next = self.clone();
        next.push_branch(branch)?;
        Ok(next)
    }

    /// Append a segment to an existing branch.
    pub fn with_branch_segment(&self, name: &str, segment: PipeSegment) -> ComponentResult<Self> {
        let mut next = self.clone();
        let branch = next
            .parallel
            .iter_mut()
            .find(|b| b.name == name)
            .ok_or(ComponentError::InvalidArg {
                what: "no branch with that name",
            })?;
        branch.segments.push(segment);
        Ok(next)
    }

    /// Drop the most recently added branch. The last remaining branch is kept.
    pub fn without_last_branch(&self) -> Self {
        let mut next = self.clone();
        if next.parallel.len() > 1 {
            next.parallel.pop();
        }
        next
    }

    /// Attach a fitting to the segment with the given id, wherever it lives.
    pub fn with_fitting(&self, id: SegmentId, fitting: Fitting) -> ComponentResult<Self> {
        self.map_segment(id, |segment| segment.fittings.push(fitting))
    }

    /// Remove the fitting at `index` from the segment with the given id.
    pub fn without_fitting(&self, id: SegmentId, index: usize) -> ComponentResult<Self> {
        let mut next = self.clone();
        let segment = next
            .segment_mut(id)
            .ok_or_else(|| ComponentError::UnknownSegment { id: id.to_string() })?;
        if index >= segment.fittings.len() {
            return Err(ComponentError::InvalidArg {
                what: "fitting index out of range",
            });
        }
        segment.fittings.remove(index);
        Ok(next)
    }

    /// Copy with every diameter multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        let scale = |segments: &[PipeSegment]| -> Vec<PipeSegment> {
            segments
                .iter()
                .map(|s| s.scaled_diameter(factor))
                .collect()
        };
        Self {
            before: scale(&self.before),
            parallel: self
                .parallel
                .iter()
                .map(|b| Branch::new(b.name.clone(), scale(&b.segments)))
                .collect(),
            after: scale(&self.after),
        }
    }

    fn map_segment(
        &self,
        id: SegmentId,
        edit: impl FnOnce(&mut PipeSegment),
    ) -> ComponentResult<Self> {
        let mut next = self.clone();
        let segment = next
            .segment_mut(id)
            .ok_or_else(|| ComponentError::UnknownSegment { id: id.to_string() })?;
        edit(segment);
        Ok(next)
    }

    fn segment_mut(&mut self, id: SegmentId) -> Option<&mut PipeSegment> {
        self.before
            .iter_mut()
            .chain(self.parallel.iter_mut().flat_map(|b| b.segments.iter_mut()))
            .chain(self.after.iter_mut())
            .find(|s| s.id == id)
    }
}
