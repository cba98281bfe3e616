//! Stable numbering of predicate-parameter occurrences
//!
//! Formatting layers refer to a closure by number instead of printing it
//! inline at every segment. Register every predicate that will be rendered
//! with [`PredicateRegistry::process_hpred`], then call
//! [`PredicateRegistry::iter`] once; it consumes the registry.
//!
//! Closures are identified structurally (instrumentation ignored), so two
//! segments over equal parameters share a number. Singly and doubly linked
//! parameters are numbered independently, both from 1.

use super::domain::{Hpara, HparaDll, Hpred};
use rustc_hash::FxHashMap;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct PredicateRegistry {
    hparas: Vec<Arc<Hpara>>,
    hpara_ids: FxHashMap<Arc<Hpara>, usize>,
    hpara_dlls: Vec<Arc<HparaDll>>,
    hpara_dll_ids: FxHashMap<Arc<HparaDll>, usize>,
}

impl PredicateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.hparas.is_empty() && self.hpara_dlls.is_empty()
    }

    /// Register the closure of a segment; points-to predicates carry none
    pub fn process_hpred(&mut self, hpred: &Hpred) {
        match hpred {
            Hpred::PointsTo { .. } => {}
            Hpred::Lseg { para, .. } => {
                if !self.hpara_ids.contains_key(para.as_ref()) {
                    let id = self.hparas.len() + 1;
                    self.hpara_ids.insert(Arc::clone(para), id);
                    self.hparas.push(Arc::clone(para));
                }
            }
            Hpred::Dllseg { para, .. } => {
                if !self.hpara_dll_ids.contains_key(para.as_ref()) {
                    let id = self.hpara_dlls.len() + 1;
                    self.hpara_dll_ids.insert(Arc::clone(para), id);
                    self.hpara_dlls.push(Arc::clone(para));
                }
            }
        }
    }

    pub fn hpara_id(&self, para: &Hpara) -> Option<usize> {
        self.hpara_ids.get(para).copied()
    }

    pub fn hpara_dll_id(&self, para: &HparaDll) -> Option<usize> {
        self.hpara_dll_ids.get(para).copied()
    }

    /// Visit every registered closure once with its number, in registration
    /// order. Closures nested in the bodies of visited ones are registered
    /// and visited as well.
    pub fn iter(mut self, mut on_hpara: impl FnMut(usize, &Hpara), mut on_hpara_dll: impl FnMut(usize, &HparaDll)) {
        let (mut next_sll, mut next_dll) = (0, 0);
        loop {
            if next_sll < self.hparas.len() {
                let para = Arc::clone(&self.hparas[next_sll]);
                next_sll += 1;
                on_hpara(next_sll, &para);
                para.body.iter().for_each(|h| self.process_hpred(h));
            } else if next_dll < self.hpara_dlls.len() {
                let para = Arc::clone(&self.hpara_dlls[next_dll]);
                next_dll += 1;
                on_hpara_dll(next_dll, &para);
                para.body.iter().for_each(|h| self.process_hpred(h));
            } else {
                break;
            }
        }
    }
}
