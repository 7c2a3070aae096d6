//! Propagation along the term hierarchy following the true-path rule.
//!
//! `transfer` computes the ancestor closure of a set of terms, `transfer_scores`
//! makes predicted scores consistent with the hierarchy such that no term scores
//! lower than any of its descendants.

use indexmap::{IndexMap, IndexSet};

use crate::ontology::OntologyGraph;

/// Compute the closure of `term_ids`: the known input terms plus all their ancestors.
///
/// Term ids not present in `graph` are ignored.
pub fn transfer<I, S>(graph: &OntologyGraph, term_ids: I) -> IndexSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut ancestors = IndexSet::new();
    let mut frontier = Vec::new();
    for term_id in term_ids {
        let term_id = term_id.as_ref();
        if !graph.contains(term_id) {
            tracing::trace!("ignoring unknown term {}", term_id);
            continue;
        }
        if ancestors.insert(term_id.to_string()) {
            frontier.push(term_id.to_string());
        }
    }

    while !frontier.is_empty() {
        let mut next = Vec::new();
        for term_id in &frontier {
            if let Some(term) = graph.get(term_id) {
                for parent in &term.parents {
                    if ancestors.insert(parent.clone()) {
                        next.push(parent.clone());
                    }
                }
            }
        }
        frontier = next;
    }

    ancestors
}

/// Propagate scores upwards so that every term scores at least as high as each of its
/// descendants.
///
/// The output covers the closure of the known scored terms. Terms are visited deepest
/// first by topological level, so every term is final before it raises its parents'
/// scores and one pass suffices. The level is used rather than the shortest-path
/// `depth` because a term may share its depth with one of its parents.
pub fn transfer_scores<'a, I>(graph: &OntologyGraph, term_scores: I) -> IndexMap<String, f64>
where
    I: IntoIterator<Item = (&'a String, &'a f64)>,
{
    let term_scores = term_scores
        .into_iter()
        .map(|(term_id, score)| (term_id.as_str(), *score))
        .collect::<IndexMap<&str, f64>>();

    let mut closure = transfer(graph, term_scores.keys())
        .into_iter()
        .collect::<Vec<_>>();
    // Stable sort, deepest terms first.
    closure.sort_by_key(|term_id| std::cmp::Reverse(graph.level(term_id)));

    let mut scores: IndexMap<String, f64> = IndexMap::with_capacity(closure.len());
    for term_id in closure {
        let own = term_scores.get(term_id.as_str()).copied().unwrap_or_default();
        let score = scores.get(&term_id).map_or(own, |acc| acc.max(own));
        scores.insert(term_id.clone(), score);

        if let Some(term) = graph.get(&term_id) {
            for parent in &term.parents {
                let entry = scores.entry(parent.clone()).or_insert(score);
                *entry = entry.max(score);
            }
        }
    }

    scores
}

#[cfg(test)]
mod test {
    use float_cmp::approx_eq;
    use indexmap::{IndexMap, IndexSet};
    use pretty_assertions::assert_eq;

    use super::{transfer, transfer_scores};
    use crate::ontology::test::{chain, diamond};
    use crate::ontology::OntologyGraph;

    fn set(ids: &[&str]) -> IndexSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn scores(entries: &[(&str, f64)]) -> IndexMap<String, f64> {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn sorted(map: &IndexMap<String, f64>) -> Vec<(String, f64)> {
        let mut result = map.iter().map(|(k, v)| (k.clone(), *v)).collect::<Vec<_>>();
        result.sort_by(|a, b| a.0.cmp(&b.0));
        result
    }

    /// Check `out[parent] >= out[child]` for all pairs inside the output.
    fn assert_monotone(graph: &OntologyGraph, out: &IndexMap<String, f64>) {
        for (term_id, score) in out {
            for parent in &graph.lookup(term_id).unwrap().parents {
                let parent_score = out.get(parent).copied().expect("parent must be in output");
                assert!(
                    parent_score >= *score,
                    "{} ({}) < {} ({})",
                    parent,
                    parent_score,
                    term_id,
                    score
                );
            }
        }
    }

    #[test]
    fn transfer_chain() {
        let graph = chain();

        assert_eq!(transfer(&graph, ["B"]), set(&["B", "A", "R"]));
        assert_eq!(transfer(&graph, ["R"]), set(&["R"]));
        assert!(transfer(&graph, Vec::<String>::new()).is_empty());
    }

    #[test]
    fn transfer_ignores_unknown_ids() {
        let graph = chain();

        assert_eq!(transfer(&graph, ["A", "X:9999"]), transfer(&graph, ["A"]));
        assert!(transfer(&graph, ["X:9999"]).is_empty());
    }

    #[rstest::rstest]
    #[case(&["E"])]
    #[case(&["B", "C"])]
    #[case(&["D", "A"])]
    #[case(&["R"])]
    fn transfer_is_closed_and_idempotent(#[case] input: &[&str]) {
        let graph = diamond();

        let closure = transfer(&graph, input.iter());
        for term_id in input {
            assert!(closure.contains(*term_id));
        }
        for term_id in &closure {
            for parent in &graph.lookup(term_id).unwrap().parents {
                assert!(closure.contains(parent), "{} missing", parent);
            }
        }

        let again = transfer(&graph, closure.iter());
        assert_eq!(
            again.iter().collect::<IndexSet<_>>(),
            closure.iter().collect::<IndexSet<_>>()
        );
    }

    #[test]
    fn transfer_diamond_visits_both_branches() {
        let graph = diamond();

        let mut closure = transfer(&graph, ["E"]).into_iter().collect::<Vec<_>>();
        closure.sort();
        assert_eq!(closure, vec!["A", "B", "C", "D", "E", "R"]);
    }

    #[test]
    fn transfer_scores_single_leaf() {
        let graph = chain();

        let out = transfer_scores(&graph, &scores(&[("B", 0.9)]));

        assert_eq!(
            sorted(&out),
            vec![
                ("A".to_string(), 0.9),
                ("B".to_string(), 0.9),
                ("R".to_string(), 0.9)
            ]
        );
    }

    #[test]
    fn transfer_scores_own_score_dominates() {
        let graph = chain();

        let out = transfer_scores(&graph, &scores(&[("A", 0.9), ("B", 0.3)]));

        assert_eq!(
            sorted(&out),
            vec![
                ("A".to_string(), 0.9),
                ("B".to_string(), 0.3),
                ("R".to_string(), 0.9)
            ]
        );
    }

    #[test]
    fn transfer_scores_root_only() {
        let graph = chain();

        let out = transfer_scores(&graph, &scores(&[("R", 0.42)]));

        assert_eq!(sorted(&out), vec![("R".to_string(), 0.42)]);
    }

    #[test]
    fn transfer_scores_drops_unknown_ids() {
        let graph = chain();

        let out = transfer_scores(&graph, &scores(&[("X:9999", 1.0), ("A", 0.2)]));

        assert_eq!(
            sorted(&out),
            vec![("A".to_string(), 0.2), ("R".to_string(), 0.2)]
        );
        assert!(transfer_scores(&graph, &scores(&[("X:9999", 1.0)])).is_empty());
    }

    #[rstest::rstest]
    #[case(&[("E", 0.8), ("B", 0.5), ("C", 0.1)])]
    #[case(&[("E", 0.1), ("D", 0.7), ("A", 0.2)])]
    #[case(&[("B", 0.3), ("C", 0.6), ("R", 0.05)])]
    #[case(&[("E", 0.0), ("R", 1.0)])]
    fn transfer_scores_monotone(#[case] input: &[(&str, f64)]) {
        let graph = diamond();
        let input = scores(input);

        let out = transfer_scores(&graph, &input);

        assert_monotone(&graph, &out);
        for (term_id, score) in &input {
            assert!(out[term_id] >= *score);
        }
        assert_eq!(
            out.keys().collect::<IndexSet<_>>(),
            transfer(&graph, input.keys()).iter().collect::<IndexSet<_>>()
        );
    }

    #[test]
    fn transfer_scores_shortcut_parent_at_same_depth() {
        let graph = diamond();
        // `B` and `D` share depth 3 although `B` is a parent of `D`.
        assert_eq!(graph.depth("B"), graph.depth("D"));

        let out = transfer_scores(&graph, &scores(&[("B", 0.5), ("E", 0.8)]));

        assert_monotone(&graph, &out);
        assert!(approx_eq!(f64, out["B"], 0.8, ulps = 2));
        assert!(approx_eq!(f64, out["A"], 0.8, ulps = 2));
    }

    #[test]
    fn transfer_scores_diamond_takes_max_over_children() {
        let graph = diamond();

        let out = transfer_scores(&graph, &scores(&[("B", 0.4), ("C", 0.7), ("E", 0.2)]));

        assert!(approx_eq!(f64, out["D"], 0.2, ulps = 2));
        assert!(approx_eq!(f64, out["B"], 0.4, ulps = 2));
        assert!(approx_eq!(f64, out["A"], 0.4, ulps = 2));
        assert!(approx_eq!(f64, out["C"], 0.7, ulps = 2));
        assert!(approx_eq!(f64, out["R"], 0.7, ulps = 2));
    }
}
