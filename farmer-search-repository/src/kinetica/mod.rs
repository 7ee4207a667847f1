//! Kinetica implementation of the geo-index provider.
//!
//! This module provides a concrete implementation of `GeoIndexProvider`
//! using the Kinetica REST API: radius queries go through `/execute/sql`,
//! point registration through `/insert/records/json`.

mod envelope;
mod provider;
mod statement;

pub use envelope::{ColumnarTable, ExecuteSqlResponse, ResponseEnvelope};
pub use provider::KineticaProvider;
pub use statement::{distance_statement, ExecuteSqlRequest, InsertPointRequest};
