use crate::error::{PuzzleError, Result};
use crate::matrix::{label, PuzzleFormat, RelationMatrix};
use crate::relation::Relation;
use ordermap::{OrderMap, OrderSet};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Serialize, Serializer};
use std::fmt;
use tracing::{debug, warn};

/// A fully resolved matrix and the order it defines, highest entity first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub matrix: RelationMatrix,
    pub order: Vec<usize>,
}

impl Solution {
    /// Entity label -> zero-based rank, iterated highest first.
    pub fn ranks(&self) -> OrderMap<char, usize> {
        self.order
            .iter()
            .enumerate()
            .map(|(rank, &entity)| (label(entity), rank))
            .collect()
    }

    /// Drop the order and keep only the resolved matrix.
    pub fn into_matrix(self) -> RelationMatrix {
        self.matrix
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.matrix, f)
    }
}

impl Serialize for Solution {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct View<'a> {
            order: Vec<char>,
            ranks: OrderMap<char, usize>,
            matrix: &'a RelationMatrix,
        }
        View {
            order: self.order.iter().map(|&e| label(e)).collect(),
            ranks: self.ranks(),
            matrix: &self.matrix,
        }
        .serialize(serializer)
    }
}

/// Parse, normalize and resolve a puzzle in the default format.
pub fn solve(raw: &str) -> Result<Solution> {
    solve_with(raw, &PuzzleFormat::default())
}

pub fn solve_with(raw: &str, format: &PuzzleFormat) -> Result<Solution> {
    let mut matrix = RelationMatrix::parse_with(raw, format)?;
    matrix.normalize();
    debug!(entities = matrix.len(), "parsed puzzle");
    resolve(matrix)
}

/// True iff `row` has no `Less` against an entity outside `solved`.
///
/// A `Less` against a solved entity is expected: that entity already ranks higher.
pub fn is_maximal(row: &[Relation], solved: &OrderSet<usize>) -> bool {
    row.iter()
        .enumerate()
        .all(|(c, &rel)| rel != Relation::Less || solved.contains(&c))
}

/// Resolve every `Unknown` in a normalized matrix by repeatedly peeling off the
/// maximal unsolved rows.
///
/// Each maximal row outranks every unsolved peer, so its unknowns become `Greater`
/// (and their mirrors `Less`). A row joins the solved set as soon as it is resolved,
/// so later rows in the same pass already see it. At most one pass per entity is
/// needed; a pass that solves nothing means the relations are cyclic.
pub fn resolve(matrix: RelationMatrix) -> Result<Solution> {
    resolve_observed(matrix, |_, _, _| {})
}

/// [`resolve`], calling `on_pass(pass, solved, matrix)` after every pass that
/// made progress.
pub fn resolve_observed<F>(mut matrix: RelationMatrix, mut on_pass: F) -> Result<Solution>
where
    F: FnMut(usize, &OrderSet<usize>, &RelationMatrix),
{
    let n = matrix.len();
    let mut solved: OrderSet<usize> = OrderSet::with_capacity(n);

    for pass in 0..n {
        if solved.len() == n {
            break;
        }
        let before = solved.len();

        for r in 0..n {
            if solved.contains(&r) || !is_maximal(matrix.row(r), &solved) {
                continue;
            }
            let mut filled = 0;
            for c in 0..n {
                if c != r && matrix.cells[r][c] == Relation::Unknown {
                    matrix.cells[r][c] = Relation::Greater;
                    matrix.cells[c][r] = Relation::Less;
                    filled += 1;
                }
            }
            debug!(pass, row = r, filled, "resolved maximal row");
            solved.insert(r);
        }

        if solved.len() == before {
            let unsolved: Vec<usize> = (0..n).filter(|r| !solved.contains(r)).collect();
            warn!(pass, ?unsolved, "pass made no progress");
            return Err(PuzzleError::Unsolvable { passes: pass + 1, unsolved });
        }
        on_pass(pass, &solved, &matrix);
    }

    Ok(Solution { matrix, order: solved.into_iter().collect() })
}

impl RelationMatrix {
    /// Entity indices from highest to lowest, read off the `Greater` cells.
    ///
    /// The matrix must be fully resolved; `Cyclic` is returned if its relations
    /// do not form an order.
    pub fn ranking(&self) -> Result<Vec<usize>> {
        if let Some((row, column)) = self.first_unknown() {
            return Err(PuzzleError::Incomplete { row, column });
        }

        // edge u -> v whenever u > v
        let mut g: DiGraph<(), ()> = DiGraph::new();
        let nodes: Vec<NodeIndex> = (0..self.len()).map(|_| g.add_node(())).collect();
        for (u, row) in self.cells.iter().enumerate() {
            for (v, &rel) in row.iter().enumerate() {
                if rel == Relation::Greater {
                    g.add_edge(nodes[u], nodes[v], ());
                }
            }
        }

        match toposort(&g, None) {
            Ok(order) => Ok(order.into_iter().map(|ix| ix.index()).collect()),
            Err(cycle) => Err(PuzzleError::Cyclic { entity: cycle.node_id().index() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Relation::*;

    fn normalized(rows: Vec<Vec<Relation>>) -> RelationMatrix {
        let mut m = RelationMatrix::from_rows(rows).unwrap();
        m.normalize();
        m
    }

    #[test]
    fn maximality_ignores_less_against_solved() {
        let row = [Less, Equal, Greater, Unknown];
        let mut solved = OrderSet::new();
        assert!(!is_maximal(&row, &solved));
        solved.insert(0);
        assert!(is_maximal(&row, &solved));
    }

    #[test]
    fn maximality_allows_unknowns() {
        assert!(is_maximal(&[Equal, Unknown, Unknown], &OrderSet::new()));
    }

    #[test]
    fn three_entity_scenario() {
        let m = normalized(vec![
            vec![Equal, Greater, Less],
            vec![Less, Equal, Unknown],
            vec![Greater, Unknown, Equal],
        ]);
        assert_eq!(m.get(2, 1), Unknown);

        let s = resolve(m).unwrap();
        assert_eq!(s.order, vec![2, 0, 1]);
        assert_eq!(s.matrix.get(2, 1), Greater);
        assert_eq!(s.matrix.get(1, 2), Less);
        assert_eq!(s.matrix.ranking().unwrap(), vec![2, 0, 1]);
    }

    #[test]
    fn cycle_is_unsolvable() {
        let m = normalized(vec![
            vec![Equal, Greater, Less],
            vec![Less, Equal, Greater],
            vec![Greater, Less, Equal],
        ]);
        let err = resolve(m).unwrap_err();
        assert_eq!(err, PuzzleError::Unsolvable { passes: 1, unsolved: vec![0, 1, 2] });
    }

    #[test]
    fn cycle_below_a_maximum_fails_on_second_pass() {
        // D beats everyone, A > B > C > A
        let m = normalized(vec![
            vec![Equal, Greater, Less, Less],
            vec![Less, Equal, Greater, Less],
            vec![Greater, Less, Equal, Less],
            vec![Greater, Greater, Greater, Equal],
        ]);
        let err = resolve(m).unwrap_err();
        assert_eq!(err, PuzzleError::Unsolvable { passes: 2, unsolved: vec![0, 1, 2] });
    }

    #[test]
    fn all_unknown_resolves_in_index_order() {
        let m = normalized(vec![vec![Unknown; 3]; 3]);
        let s = resolve(m).unwrap();
        assert_eq!(s.order, vec![0, 1, 2]);
        assert!(s.matrix.is_resolved());
        assert!(s.matrix.is_consistent());
    }

    #[test]
    fn resolving_twice_is_identity() {
        let m = normalized(vec![
            vec![Equal, Unknown, Less],
            vec![Unknown, Equal, Unknown],
            vec![Greater, Unknown, Equal],
        ]);
        let first = resolve(m).unwrap();
        let second = resolve(first.matrix.clone()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn solved_rows_never_change_in_later_passes() {
        // D > C > B > A, one entity peeled per pass
        let m = normalized(vec![
            vec![Equal, Less, Unknown, Unknown],
            vec![Unknown, Equal, Less, Unknown],
            vec![Unknown, Unknown, Equal, Less],
            vec![Unknown, Unknown, Unknown, Equal],
        ]);
        let mut snapshots: Vec<(Vec<usize>, RelationMatrix)> = Vec::new();
        let s = resolve_observed(m, |_, solved, matrix| {
            snapshots.push((solved.iter().copied().collect(), matrix.clone()))
        })
        .unwrap();

        for pair in snapshots.windows(2) {
            let (earlier, before) = &pair[0];
            let (later, after) = &pair[1];
            assert!(later.starts_with(earlier));
            for &r in earlier {
                assert_eq!(before.row(r), after.row(r));
            }
        }
        assert_eq!(snapshots.len(), 4);
        let (last, _) = snapshots.last().unwrap();
        assert_eq!(last, &s.order);
        assert_eq!(s.order, vec![3, 2, 1, 0]);
    }

    #[test]
    fn ranking_rejects_unresolved_and_cyclic() {
        let open = normalized(vec![vec![Equal, Unknown], vec![Unknown, Equal]]);
        assert_eq!(open.ranking().unwrap_err(), PuzzleError::Incomplete { row: 0, column: 1 });

        let cyclic = normalized(vec![
            vec![Equal, Greater, Less],
            vec![Less, Equal, Greater],
            vec![Greater, Less, Equal],
        ]);
        assert!(matches!(cyclic.ranking(), Err(PuzzleError::Cyclic { .. })));
    }

    #[test]
    fn ranks_are_keyed_by_label() {
        let s = resolve(normalized(vec![
            vec![Equal, Less],
            vec![Greater, Equal],
        ]))
        .unwrap();
        let ranks = s.ranks();
        assert_eq!(ranks.keys().copied().collect::<Vec<_>>(), vec!['B', 'A']);
        assert_eq!(ranks[&'A'], 1);
    }
}
