//! Progress tracking for the catalog's multi-step mutations.
//!
//! Adding a farmer and adding products each write to two places with no
//! transaction spanning them. A [`SagaCursor`] records which steps have been
//! applied. Every transition is logged with the saga id, so a reconciler
//! reading the logs can spot a saga that started and never finished. When a
//! step fails after earlier steps succeeded, the cursor travels with the
//! error so the caller learns exactly what is in effect.

use std::fmt;

use farmer_search_shared::{encode_id, RecordKind};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::CatalogError;

/// The multi-step mutations of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SagaKind {
    AddFarmer,
    AddProducts,
}

impl fmt::Display for SagaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddFarmer => write!(f, "add_farmer"),
            Self::AddProducts => write!(f, "add_products"),
        }
    }
}

/// One write performed by a saga.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SagaStep {
    /// Create the farmer in the record store.
    InsertFarmerRecord,
    /// Register the farmer's location in the geo index.
    RegisterGeoPoint,
    /// Insert the product batch into the record store.
    InsertProducts,
    /// Merge the batch's grocery types into the farmer's aggregate set.
    MergeGroceryTypes,
}

impl fmt::Display for SagaStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsertFarmerRecord => write!(f, "insert_farmer_record"),
            Self::RegisterGeoPoint => write!(f, "register_geo_point"),
            Self::InsertProducts => write!(f, "insert_products"),
            Self::MergeGroceryTypes => write!(f, "merge_grocery_types"),
        }
    }
}

/// Where a running saga stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SagaCursor {
    pub saga_id: Uuid,
    pub kind: SagaKind,
    /// The farmer the saga writes to, once known.
    pub farmer_key: Option<Uuid>,
    /// Steps applied so far, in order.
    pub completed: Vec<SagaStep>,
}

impl SagaCursor {
    pub fn begin(kind: SagaKind) -> Self {
        let cursor = Self {
            saga_id: Uuid::new_v4(),
            kind,
            farmer_key: None,
            completed: Vec::new(),
        };
        debug!(saga_id = %cursor.saga_id, saga = %kind, "Saga started");
        cursor
    }

    pub fn bind_farmer(&mut self, farmer_key: Uuid) {
        self.farmer_key = Some(farmer_key);
    }

    /// Record that `step` has been applied.
    pub fn complete(&mut self, step: SagaStep) {
        self.completed.push(step);
        debug!(
            saga_id = %self.saga_id,
            saga = %self.kind,
            farmer_key = ?self.farmer_key,
            step = %step,
            "Saga step completed"
        );
    }

    pub fn is_completed(&self, step: SagaStep) -> bool {
        self.completed.contains(&step)
    }

    /// Turn the failure of `step` into the error returned to the caller.
    ///
    /// If no step has been applied yet the store is untouched and the
    /// underlying error is returned as is. Otherwise the result is an
    /// `IncompleteMutation` carrying this cursor.
    pub fn fail(self, step: SagaStep, error: CatalogError) -> CatalogError {
        if self.completed.is_empty() {
            debug!(saga_id = %self.saga_id, saga = %self.kind, step = %step, "Saga aborted before any write");
            return error;
        }

        warn!(
            saga_id = %self.saga_id,
            saga = %self.kind,
            farmer_key = ?self.farmer_key,
            completed = ?self.completed,
            failed_step = %step,
            error = %error,
            "Saga stopped after a partial write; manual reconciliation required"
        );

        CatalogError::IncompleteMutation {
            cursor: self,
            failed_step: step,
            source: Box::new(error),
        }
    }

    pub fn finish(self) {
        info!(
            saga_id = %self.saga_id,
            saga = %self.kind,
            farmer_key = ?self.farmer_key,
            steps = self.completed.len(),
            "Saga finished"
        );
    }
}

impl fmt::Display for SagaCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} saga {}", self.kind, self.saga_id)?;
        if let Some(key) = &self.farmer_key {
            write!(f, " for farmer {}", encode_id(RecordKind::Farmer, key))?;
        }
        write!(f, " (completed: ")?;
        for (i, step) in self.completed.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", step)?;
        }
        write!(f, ")")
    }
}
