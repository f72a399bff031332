//! DBSCAN over a precomputed distance matrix.
//!
//! Points closer than or equal to `eps` are neighbours (a point is its own
//! neighbour). A point with at least `min_samples` neighbours is a core point;
//! clusters grow from core points in index order, and border points join the
//! first cluster that reaches them.

use ndarray::Array2;

/// Label every point with its cluster index, or `None` for noise.
///
/// Cluster indices are assigned in order of discovery, starting at zero.
pub fn dbscan(distances: &Array2<f64>, eps: f64, min_samples: usize) -> Vec<Option<usize>> {
    let n = distances.nrows();
    let neighborhoods: Vec<Vec<usize>> = (0..n)
        .map(|i| (0..n).filter(|&j| distances[[i, j]] <= eps).collect())
        .collect();
    let is_core: Vec<bool> = neighborhoods
        .iter()
        .map(|neighbors| neighbors.len() >= min_samples)
        .collect();

    let mut labels: Vec<Option<usize>> = vec![None; n];
    let mut next_label = 0;
    let mut stack: Vec<usize> = Vec::new();

    for seed in 0..n {
        if labels[seed].is_some() || !is_core[seed] {
            continue;
        }

        stack.push(seed);
        while let Some(point) = stack.pop() {
            if labels[point].is_some() {
                continue;
            }
            labels[point] = Some(next_label);
            if is_core[point] {
                stack.extend(
                    neighborhoods[point]
                        .iter()
                        .copied()
                        .filter(|&neighbor| labels[neighbor].is_none()),
                );
            }
        }
        next_label += 1;
    }

    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    use ndarray::array;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_two_clusters_and_noise() {
        let distances = array![
            [0.0, 0.05, 0.9, 0.9, 0.9],
            [0.05, 0.0, 0.9, 0.9, 0.9],
            [0.9, 0.9, 0.0, 0.02, 0.9],
            [0.9, 0.9, 0.02, 0.0, 0.9],
            [0.9, 0.9, 0.9, 0.9, 0.0],
        ];
        let labels = dbscan(&distances, 0.1, 2);
        assert_eq!(labels, vec![Some(0), Some(0), Some(1), Some(1), None]);
    }

    #[rstest]
    fn test_eps_is_inclusive() {
        let distances = array![[0.0, 0.1], [0.1, 0.0]];
        assert_eq!(dbscan(&distances, 0.1, 2), vec![Some(0), Some(0)]);
        assert_eq!(dbscan(&distances, 0.09, 2), vec![None, None]);
    }

    fn matrix(n: usize, close: &[(usize, usize)]) -> Array2<f64> {
        let mut distances = Array2::from_elem((n, n), 0.9);
        for i in 0..n {
            distances[[i, i]] = 0.0;
        }
        for &(i, j) in close {
            distances[[i, j]] = 0.01;
            distances[[j, i]] = 0.01;
        }
        distances
    }

    #[rstest]
    fn test_border_point_joins_first_cluster() {
        // 3 sits between the cores 0 and 4 without being dense itself
        let distances = matrix(
            7,
            &[(0, 1), (0, 2), (1, 2), (0, 3), (3, 4), (4, 5), (4, 6), (5, 6)],
        );
        let labels = dbscan(&distances, 0.1, 4);
        assert_eq!(
            labels,
            vec![Some(0), Some(0), Some(0), Some(0), Some(1), Some(1), Some(1)]
        );
    }

    #[rstest]
    fn test_chain_is_density_connected() {
        let distances = array![
            [0.0, 0.08, 0.16],
            [0.08, 0.0, 0.08],
            [0.16, 0.08, 0.0],
        ];
        assert_eq!(dbscan(&distances, 0.1, 2), vec![Some(0), Some(0), Some(0)]);
    }

    #[rstest]
    fn test_empty_matrix() {
        let distances = Array2::<f64>::zeros((0, 0));
        assert!(dbscan(&distances, 0.1, 2).is_empty());
    }
}
