//! Structural Compaction (hash-consing)
//!
//! A [`SharingEnv`] maps every structured value, heap predicate and closure
//! seen during one pass to a canonical `Arc`. Terms are canonicalized
//! bottom-up (structured-value children first, then closure bodies, then the
//! outer node), so independently built equal sub-terms end up as one shared
//! instance and `Arc::ptr_eq` becomes a valid equality shortcut.
//!
//! Keys compare instrumentation exactly: two values that differ only in
//! their tags are never merged, since the tags carry diagnostics.
//!
//! One env per pass. It is `&mut`-scoped and must not be shared between
//! concurrently running passes.

use super::domain::{Hpara, HparaDll, Hpred, InstComparison, Strexp};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Terms with an instrumentation-sensitive comparison
trait ExactCompare {
    fn exact_cmp(&self, other: &Self) -> Ordering;
}

impl ExactCompare for Strexp {
    fn exact_cmp(&self, other: &Self) -> Ordering {
        self.compare_with(other, InstComparison::Include)
    }
}

impl ExactCompare for Hpred {
    fn exact_cmp(&self, other: &Self) -> Ordering {
        self.compare_with(other, InstComparison::Include)
    }
}

impl ExactCompare for Hpara {
    fn exact_cmp(&self, other: &Self) -> Ordering {
        self.compare_with(other, InstComparison::Include)
    }
}

impl ExactCompare for HparaDll {
    fn exact_cmp(&self, other: &Self) -> Ordering {
        self.compare_with(other, InstComparison::Include)
    }
}

/// Table key. Hashing ignores tags (coarser than equality, still consistent).
struct Canon<T>(Arc<T>);

impl<T: Hash> Hash for Canon<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<T: ExactCompare> PartialEq for Canon<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.exact_cmp(&other.0) == Ordering::Equal
    }
}

impl<T: ExactCompare> Eq for Canon<T> {}

/// Counters of one pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharingStats {
    pub lookups: u64,
    pub hits: u64,
    pub unique_strexps: usize,
    pub unique_hpreds: usize,
    pub unique_hparas: usize,
}

impl SharingStats {
    /// Fraction of lookups answered by an existing instance
    pub fn hit_rate(&self) -> f64 {
        if self.lookups == 0 {
            0.0
        } else {
            self.hits as f64 / self.lookups as f64
        }
    }
}

/// Canonicalization table of one compaction pass
#[derive(Default)]
pub struct SharingEnv {
    strexps: FxHashSet<Canon<Strexp>>,
    hpreds: FxHashSet<Canon<Hpred>>,
    hparas: FxHashSet<Canon<Hpara>>,
    hpara_dlls: FxHashSet<Canon<HparaDll>>,
    lookups: u64,
    hits: u64,
}

impl SharingEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size the structured-value and predicate tables
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            strexps: FxHashSet::with_capacity_and_hasher(capacity, Default::default()),
            hpreds: FxHashSet::with_capacity_and_hasher(capacity, Default::default()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.strexps.is_empty() && self.hpreds.is_empty()
    }

    pub fn stats(&self) -> SharingStats {
        SharingStats {
            lookups: self.lookups,
            hits: self.hits,
            unique_strexps: self.strexps.len(),
            unique_hpreds: self.hpreds.len(),
            unique_hparas: self.hparas.len() + self.hpara_dlls.len(),
        }
    }

    fn intern<T>(table: &mut FxHashSet<Canon<T>>, lookups: &mut u64, hits: &mut u64, candidate: Arc<T>) -> Arc<T>
    where
        T: Hash + ExactCompare,
    {
        *lookups += 1;
        let key = Canon(candidate);
        if let Some(found) = table.get(&key) {
            *hits += 1;
            return Arc::clone(&found.0);
        }
        let shared = Arc::clone(&key.0);
        table.insert(key);
        shared
    }

    fn share_strexp(&mut self, se: &Arc<Strexp>) -> Arc<Strexp> {
        let candidate = match se.as_ref() {
            Strexp::Scalar { .. } => Arc::clone(se),
            Strexp::Struct { fields, inst } => {
                let shared: Vec<_> = fields
                    .iter()
                    .map(|(name, child)| (name.clone(), self.share_strexp(child)))
                    .collect();
                if children_unchanged(fields, &shared) {
                    Arc::clone(se)
                } else {
                    Arc::new(Strexp::Struct {
                        fields: shared,
                        inst: inst.clone(),
                    })
                }
            }
            Strexp::Array { len, elems, inst } => {
                let shared: Vec<_> = elems
                    .iter()
                    .map(|(idx, child)| (idx.clone(), self.share_strexp(child)))
                    .collect();
                if children_unchanged(elems, &shared) {
                    Arc::clone(se)
                } else {
                    Arc::new(Strexp::Array {
                        len: len.clone(),
                        elems: shared,
                        inst: inst.clone(),
                    })
                }
            }
        };
        Self::intern(&mut self.strexps, &mut self.lookups, &mut self.hits, candidate)
    }

    fn share_body(&mut self, body: &[Arc<Hpred>]) -> Option<Vec<Arc<Hpred>>> {
        let shared: Vec<_> = body.iter().map(|h| self.share_hpred(h)).collect();
        let unchanged = body.iter().zip(&shared).all(|(a, b)| Arc::ptr_eq(a, b));
        (!unchanged).then_some(shared)
    }

    fn share_hpara(&mut self, para: &Arc<Hpara>) -> Arc<Hpara> {
        let candidate = match self.share_body(&para.body) {
            None => Arc::clone(para),
            Some(body) => Arc::new(Hpara {
                body,
                ..para.as_ref().clone()
            }),
        };
        Self::intern(&mut self.hparas, &mut self.lookups, &mut self.hits, candidate)
    }

    fn share_hpara_dll(&mut self, para: &Arc<HparaDll>) -> Arc<HparaDll> {
        let candidate = match self.share_body(&para.body) {
            None => Arc::clone(para),
            Some(body) => Arc::new(HparaDll {
                body,
                ..para.as_ref().clone()
            }),
        };
        Self::intern(&mut self.hpara_dlls, &mut self.lookups, &mut self.hits, candidate)
    }

    fn share_hpred(&mut self, hpred: &Arc<Hpred>) -> Arc<Hpred> {
        let candidate = match hpred.as_ref() {
            Hpred::PointsTo { addr, value, texp } => {
                let value2 = self.share_strexp(value);
                if Arc::ptr_eq(value, &value2) {
                    Arc::clone(hpred)
                } else {
                    Arc::new(Hpred::PointsTo {
                        addr: addr.clone(),
                        value: value2,
                        texp: texp.clone(),
                    })
                }
            }
            Hpred::Lseg {
                kind,
                para,
                head,
                tail,
                shared,
            } => {
                let para2 = self.share_hpara(para);
                if Arc::ptr_eq(para, &para2) {
                    Arc::clone(hpred)
                } else {
                    Arc::new(Hpred::Lseg {
                        kind: *kind,
                        para: para2,
                        head: head.clone(),
                        tail: tail.clone(),
                        shared: shared.clone(),
                    })
                }
            }
            Hpred::Dllseg {
                kind,
                para,
                first,
                back,
                forward,
                last,
                shared,
            } => {
                let para2 = self.share_hpara_dll(para);
                if Arc::ptr_eq(para, &para2) {
                    Arc::clone(hpred)
                } else {
                    Arc::new(Hpred::Dllseg {
                        kind: *kind,
                        para: para2,
                        first: first.clone(),
                        back: back.clone(),
                        forward: forward.clone(),
                        last: last.clone(),
                        shared: shared.clone(),
                    })
                }
            }
        };
        Self::intern(&mut self.hpreds, &mut self.lookups, &mut self.hits, candidate)
    }
}

fn children_unchanged<K>(before: &[(K, Arc<Strexp>)], after: &[(K, Arc<Strexp>)]) -> bool {
    before.iter().zip(after).all(|((_, a), (_, b))| Arc::ptr_eq(a, b))
}

/// Canonical shared instance of `hpred` for this pass
pub fn compact(env: &mut SharingEnv, hpred: &Hpred) -> Arc<Hpred> {
    env.share_hpred(&Arc::new(hpred.clone()))
}

/// Like [`compact`], reusing `hpred` itself as the representative when it is new
pub fn compact_arc(env: &mut SharingEnv, hpred: &Arc<Hpred>) -> Arc<Hpred> {
    env.share_hpred(hpred)
}

pub fn compact_strexp(env: &mut SharingEnv, se: &Arc<Strexp>) -> Arc<Strexp> {
    env.share_strexp(se)
}
