//! Per-collection reconciliation plans.
//!
//! A plan is computed in a read-only pass over the current and desired lists
//! and only then applied, building a fresh collection. Nothing is removed from
//! a list while it is being walked.

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

/// Anything matched by stable identity during reconciliation.
pub trait Identified {
  fn id(&self) -> Uuid;
}

/// A single reconciliation decision. Indices point into the current and
/// desired lists the plan was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanOp {
  /// Present in both: copy desired attributes onto the current item.
  Update { current: usize, desired: usize },
  /// Present only in current state.
  Remove { current: usize },
  /// Present only in desired state.
  Add { desired: usize },
}

/// Counts of what a plan changes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CollectionChanges {
  pub added: usize,
  pub updated: usize,
  pub removed: usize,
}

/// Ordered reconciliation plan for one collection.
///
/// Operations are ordered so that applying them front to back yields the
/// final collection: current items in their existing order (updated or
/// dropped), followed by additions in desired order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CollectionPlan {
  pub ops: Vec<PlanOp>,
}

impl CollectionPlan {
  /// Compute the plan that turns `current` into `desired`.
  ///
  /// # Diff Logic
  ///
  /// - ID in both → `Update`
  /// - ID only in current → `Remove`
  /// - ID only in desired → `Add`
  ///
  /// If `current` holds the same ID twice, the first occurrence is updated and
  /// later ones are removed, so the result never carries duplicates.
  pub fn compute<C: Identified, D: Identified>(current: &[C], desired: &[D]) -> Self {
    let desired_by_id: HashMap<Uuid, usize> = desired
      .iter()
      .enumerate()
      .rev()
      .map(|(index, item)| (item.id(), index))
      .collect();

    let mut ops = Vec::with_capacity(current.len() + desired.len());
    let mut matched: HashMap<Uuid, usize> = HashMap::new();

    for (index, item) in current.iter().enumerate() {
      let id = item.id();
      match desired_by_id.get(&id) {
        Some(&desired_index) if !matched.contains_key(&id) => {
          matched.insert(id, index);
          ops.push(PlanOp::Update {
            current: index,
            desired: desired_index,
          });
        }
        _ => ops.push(PlanOp::Remove { current: index }),
      }
    }

    for (index, item) in desired.iter().enumerate() {
      if !matched.contains_key(&item.id()) {
        ops.push(PlanOp::Add { desired: index });
      }
    }

    Self { ops }
  }

  pub fn changes(&self) -> CollectionChanges {
    let mut changes = CollectionChanges::default();
    for op in &self.ops {
      match op {
        PlanOp::Update { .. } => changes.updated += 1,
        PlanOp::Remove { .. } => changes.removed += 1,
        PlanOp::Add { .. } => changes.added += 1,
      }
    }
    changes
  }

  /// Apply the plan, consuming the current collection.
  ///
  /// `update` mutates a kept item in place (its identity is never touched);
  /// `create` builds a new item from a desired one. The first error aborts
  /// the whole application.
  pub fn apply<C, D, E>(
    &self,
    current: Vec<C>,
    desired: &[D],
    mut update: impl FnMut(&mut C, &D) -> Result<(), E>,
    mut create: impl FnMut(&D) -> Result<C, E>,
  ) -> Result<Vec<C>, E> {
    let mut slots: Vec<Option<C>> = current.into_iter().map(Some).collect();
    let mut result = Vec::with_capacity(self.ops.len());

    for op in &self.ops {
      match *op {
        PlanOp::Update {
          current: current_index,
          desired: desired_index,
        } => {
          if let Some(mut item) = slots.get_mut(current_index).and_then(Option::take) {
            update(&mut item, &desired[desired_index])?;
            result.push(item);
          }
        }
        PlanOp::Remove { current: current_index } => {
          if let Some(slot) = slots.get_mut(current_index) {
            slot.take();
          }
        }
        PlanOp::Add { desired: desired_index } => {
          result.push(create(&desired[desired_index])?);
        }
      }
    }

    Ok(result)
  }
}
