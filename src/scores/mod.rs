//! Consistency of predicted term scores across many proteins.

use indexmap::IndexMap;
use rayon::prelude::*;

use crate::ontology::OntologyGraph;
use crate::propagate::transfer_scores;

pub mod cli;

/// Predicted scores, `{ protein: { term: score } }`.
pub type Predictions = IndexMap<String, IndexMap<String, f64>>;

/// Apply `transfer_scores` to the predictions of every protein in parallel.
///
/// Proteins whose terms are all unknown to the graph end up with an empty map.
pub fn reconcile_predictions(graph: &OntologyGraph, predictions: &Predictions) -> Predictions {
    predictions
        .par_iter()
        .map(|(protein, term_scores)| (protein.clone(), transfer_scores(graph, term_scores)))
        .collect::<Vec<_>>()
        .into_iter()
        .collect()
}
