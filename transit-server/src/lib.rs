//! City bus route finder and live arrival estimator.
//!
//! Answers: "which buses take me from this stop to that stop, and when
//! does the next one arrive?", despite stop names in the dataset being
//! inconsistently spelled, duplicated, or tagged with coordinate and
//! route suffixes.

pub mod domain;
pub mod geo;
pub mod geometry;
pub mod index;
pub mod ingest;
pub mod matcher;
pub mod predictor;
pub mod resolver;
pub mod service;
pub mod sim;
