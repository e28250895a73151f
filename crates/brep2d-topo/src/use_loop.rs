//! Use-loop layer: cycle classification and the per-loop forest.

use serde::{Deserialize, Serialize};

use crate::id::{HalfEdgeId, LoopId, UseLoopId};
use crate::store::IncidenceStore;
use crate::{Result, TopoError};

/// Classification of a boundary cycle, derived from its structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UseLoopKind {
    /// An isolated vertex, no edges.
    Point,
    /// Edges whose both sides lie on this cycle: encloses no area.
    Chain,
    /// At least one edge separates this cycle from another one.
    Area,
}

impl UseLoopKind {
    /// Numeric type code: 0 point, 1 chain, 2 area.
    pub fn code(self) -> u8 {
        match self {
            UseLoopKind::Point => 0,
            UseLoopKind::Chain => 1,
            UseLoopKind::Area => 2,
        }
    }
}

impl IncidenceStore {
    /// Classify a use-loop by walking its cycle.
    pub fn use_loop_kind(&self, ul: UseLoopId) -> Result<UseLoopKind> {
        let start = self.use_loop(ul)?.half_edge;
        if self.half_edge(start)?.is_point() {
            return Ok(UseLoopKind::Point);
        }
        self.cycle_kind(&self.cycle(start)?, ul)
    }

    /// Classify an explicit list of half-edges as if they formed cycle `ul`.
    ///
    /// Used to judge cycle fragments before they are relinked.
    pub fn cycle_kind(&self, cycle: &[HalfEdgeId], ul: UseLoopId) -> Result<UseLoopKind> {
        if let [only] = cycle {
            if self.half_edge(*only)?.is_point() {
                return Ok(UseLoopKind::Point);
            }
        }
        for &h in cycle {
            let opposite = self.half_edge(h)?.opposite;
            if self.half_edge(opposite)?.use_loop != ul && !cycle.contains(&opposite) {
                return Ok(UseLoopKind::Area);
            }
        }
        Ok(UseLoopKind::Chain)
    }

    /// Whether `ul` is the outer boundary of its loop.
    pub fn is_root(&self, ul: UseLoopId) -> Result<bool> {
        Ok(self.use_loop(ul)?.parent == Some(ul))
    }

    /// Child use-loops chained under `root`, in chain order.
    pub fn children(&self, root: UseLoopId) -> Result<Vec<UseLoopId>> {
        let limit = self.use_loops.len();
        let mut out = Vec::new();
        let mut current = self.use_loop(root)?.child;
        while let Some(ul) = current {
            if ul == root || out.len() > limit {
                return Err(TopoError::ForestCycle(root));
            }
            out.push(ul);
            current = self.use_loop(ul)?.child;
        }
        Ok(out)
    }

    /// Root followed by every child of loop `l`.
    pub fn loop_use_loops(&self, l: LoopId) -> Result<Vec<UseLoopId>> {
        let root = self.face(l)?.use_loop;
        let mut out = vec![root];
        out.extend(self.children(root)?);
        Ok(out)
    }

    /// Place a detached use-loop in a region: at the end of the child chain of
    /// a bounded loop, or in the void.
    pub fn attach(&mut self, ul: UseLoopId, region: Option<LoopId>) -> Result<()> {
        let parent = match region {
            Some(l) => {
                let root = self.face(l)?.use_loop;
                let last = self.children(root)?.last().copied().unwrap_or(root);
                self.use_loop_mut(last)?.child = Some(ul);
                Some(root)
            }
            None => None,
        };
        let record = self.use_loop_mut(ul)?;
        record.loop_id = region;
        record.parent = parent;
        record.child = None;
        Ok(())
    }

    /// Take a child or void use-loop out of its forest.
    ///
    /// Roots cannot be detached; their loop would lose its boundary.
    pub fn detach(&mut self, ul: UseLoopId) -> Result<()> {
        let record = *self.use_loop(ul)?;
        if let Some(root) = record.parent {
            if root == ul {
                return Err(TopoError::RootDetach(ul));
            }
            let mut current = root;
            loop {
                let next = self.use_loop(current)?.child;
                match next {
                    Some(c) if c == ul => {
                        self.use_loop_mut(current)?.child = record.child;
                        break;
                    }
                    Some(c) => current = c,
                    None => return Err(TopoError::ForestCycle(root)),
                }
            }
        }
        let record = self.use_loop_mut(ul)?;
        record.loop_id = None;
        record.parent = None;
        record.child = None;
        Ok(())
    }

    /// Make `ul` own the whole cycle through `start`, anchored at `start`.
    pub fn assign_cycle(&mut self, start: HalfEdgeId, ul: UseLoopId) -> Result<()> {
        for h in self.cycle(start)? {
            self.half_edge_mut(h)?.use_loop = ul;
        }
        self.use_loop_mut(ul)?.half_edge = start;
        Ok(())
    }

    /// Like [`assign_cycle`](Self::assign_cycle), but keeps the current anchor
    /// of `ul` when it lies on the cycle.
    pub fn adopt_cycle(&mut self, start: HalfEdgeId, ul: UseLoopId) -> Result<()> {
        let anchor = self.use_loop(ul)?.half_edge;
        let cycle = self.cycle(start)?;
        let keep = if cycle.contains(&anchor) { anchor } else { start };
        for h in cycle {
            self.half_edge_mut(h)?.use_loop = ul;
        }
        self.use_loop_mut(ul)?.half_edge = keep;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Loop, UseLoop};

    fn forest() -> (IncidenceStore, LoopId, UseLoopId) {
        let mut store = IncidenceStore::new();
        let root = store.insert_use_loop(UseLoop::detached(HalfEdgeId(1)));
        let l = store.insert_loop(Loop { use_loop: root });
        let r = store.use_loop_mut(root).unwrap();
        r.loop_id = Some(l);
        r.parent = Some(root);
        (store, l, root)
    }

    #[test]
    fn test_attach_appends_to_chain() {
        let (mut store, l, root) = forest();
        let a = store.insert_use_loop(UseLoop::detached(HalfEdgeId(2)));
        let b = store.insert_use_loop(UseLoop::detached(HalfEdgeId(3)));
        store.attach(a, Some(l)).unwrap();
        store.attach(b, Some(l)).unwrap();

        assert_eq!(store.children(root).unwrap(), vec![a, b]);
        assert_eq!(store.loop_use_loops(l).unwrap(), vec![root, a, b]);
        assert_eq!(store.use_loop(b).unwrap().parent, Some(root));
        assert!(store.is_root(root).unwrap());
        assert!(!store.is_root(a).unwrap());
    }

    #[test]
    fn test_detach_middle_child() {
        let (mut store, l, root) = forest();
        let ids: Vec<UseLoopId> = (2..5)
            .map(|h| store.insert_use_loop(UseLoop::detached(HalfEdgeId(h))))
            .collect();
        for &ul in &ids {
            store.attach(ul, Some(l)).unwrap();
        }
        store.detach(ids[1]).unwrap();
        assert_eq!(store.children(root).unwrap(), vec![ids[0], ids[2]]);
        assert_eq!(store.use_loop(ids[1]).unwrap().loop_id, None);
    }

    #[test]
    fn test_detach_root_refused() {
        let (mut store, _, root) = forest();
        assert_eq!(store.detach(root), Err(TopoError::RootDetach(root)));
    }

    #[test]
    fn test_void_attach_has_no_forest() {
        let (mut store, _, _) = forest();
        let ul = store.insert_use_loop(UseLoop::detached(HalfEdgeId(7)));
        store.attach(ul, None).unwrap();
        let record = store.use_loop(ul).unwrap();
        assert_eq!((record.loop_id, record.parent, record.child), (None, None, None));
        store.detach(ul).unwrap();
    }

    #[test]
    fn test_kind_codes() {
        assert_eq!(UseLoopKind::Point.code(), 0);
        assert_eq!(UseLoopKind::Chain.code(), 1);
        assert_eq!(UseLoopKind::Area.code(), 2);
    }
}
