//! Built-in clustering engine: deterministic k-means.
//!
//! Farthest-point seeding instead of random init, so identical inputs
//! produce identical labels. Lloyd iterations with a convergence
//! threshold on centroid movement.

use thoughtnet_common::ThoughtNetError;

use crate::traits::ClusterEngine;

const MAX_ITERATIONS: usize = 100;
const CONVERGENCE_THRESHOLD: f32 = 1e-6;

#[derive(Debug, Default)]
pub struct KMeansEngine;

impl KMeansEngine {
    pub fn new() -> Self {
        Self
    }
}

impl ClusterEngine for KMeansEngine {
    fn cluster(
        &self,
        vectors: &[Vec<f32>],
        method: &str,
        n_clusters: usize,
    ) -> Result<Vec<usize>, ThoughtNetError> {
        if method != "kmeans" {
            return Err(ThoughtNetError::Config(format!(
                "Unsupported clustering method: {method}"
            )));
        }
        if vectors.is_empty() {
            return Err(ThoughtNetError::Config("no vectors to cluster".to_string()));
        }
        if n_clusters == 0 || n_clusters > vectors.len() {
            return Err(ThoughtNetError::Config(format!(
                "n_clusters ({n_clusters}) must be in 1..={}",
                vectors.len()
            )));
        }
        let dim = vectors[0].len();
        if vectors.iter().any(|v| v.len() != dim) {
            return Err(ThoughtNetError::Config(
                "embedding vectors have inconsistent dimensions".to_string(),
            ));
        }

        let mut centroids = seed_centroids(vectors, n_clusters);
        let mut labels = vec![0usize; vectors.len()];

        for _ in 0..MAX_ITERATIONS {
            for (point, label) in vectors.iter().zip(labels.iter_mut()) {
                *label = nearest_centroid(point, &centroids);
            }

            let centroids_before = centroids.clone();
            let mut max_movement = 0.0f32;
            for (idx, centroid) in centroids.iter_mut().enumerate() {
                let members: Vec<&Vec<f32>> = vectors
                    .iter()
                    .zip(labels.iter())
                    .filter(|(_, l)| **l == idx)
                    .map(|(v, _)| v)
                    .collect();
                if members.is_empty() {
                    // Reseed an emptied cluster with the point farthest
                    // from its assigned centroid.
                    *centroid = farthest_point(vectors, &labels, &centroids_before).clone();
                    max_movement = f32::MAX;
                    continue;
                }
                let next = mean(&members, dim);
                let movement = distance_sq(centroid, &next).sqrt();
                if movement > max_movement {
                    max_movement = movement;
                }
                *centroid = next;
            }

            if max_movement < CONVERGENCE_THRESHOLD {
                break;
            }
        }

        for (point, label) in vectors.iter().zip(labels.iter_mut()) {
            *label = nearest_centroid(point, &centroids);
        }
        Ok(labels)
    }
}

/// Farthest-point seeding: first centroid is the first vector, each
/// subsequent one the vector farthest from all chosen centroids. Ties
/// break toward the lowest index.
fn seed_centroids(vectors: &[Vec<f32>], k: usize) -> Vec<Vec<f32>> {
    let mut centroids = vec![vectors[0].clone()];
    while centroids.len() < k {
        let mut best_idx = 0;
        let mut best_dist = -1.0f32;
        for (idx, point) in vectors.iter().enumerate() {
            let nearest = centroids
                .iter()
                .map(|c| distance_sq(point, c))
                .fold(f32::MAX, f32::min);
            if nearest > best_dist {
                best_dist = nearest;
                best_idx = idx;
            }
        }
        centroids.push(vectors[best_idx].clone());
    }
    centroids
}

fn nearest_centroid(point: &[f32], centroids: &[Vec<f32>]) -> usize {
    let mut best = 0;
    let mut best_dist = f32::MAX;
    for (idx, centroid) in centroids.iter().enumerate() {
        let dist = distance_sq(point, centroid);
        if dist < best_dist {
            best_dist = dist;
            best = idx;
        }
    }
    best
}

fn distance_sq(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn mean(members: &[&Vec<f32>], dim: usize) -> Vec<f32> {
    let mut out = vec![0.0f32; dim];
    for member in members {
        for (acc, value) in out.iter_mut().zip(member.iter()) {
            *acc += value;
        }
    }
    let n = members.len() as f32;
    for value in &mut out {
        *value /= n;
    }
    out
}

/// The vector farthest from its assigned centroid. Ties break toward the
/// lowest index.
fn farthest_point<'a>(
    vectors: &'a [Vec<f32>],
    labels: &[usize],
    centroids: &[Vec<f32>],
) -> &'a Vec<f32> {
    let mut best = &vectors[0];
    let mut best_dist = -1.0f32;
    for (point, label) in vectors.iter().zip(labels.iter()) {
        let dist = distance_sq(point, &centroids[*label]);
        if dist > best_dist {
            best_dist = dist;
            best = point;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ClusterEngine;

    fn blob(center: f32, n: usize) -> Vec<Vec<f32>> {
        (0..n).map(|i| vec![center + i as f32 * 0.01, center]).collect()
    }

    #[test]
    fn unsupported_method_is_a_config_error() {
        let engine = KMeansEngine::new();
        let err = engine.cluster(&[vec![0.0]], "hdbscan", 1).unwrap_err();
        assert!(matches!(err, ThoughtNetError::Config(_)));
        assert!(err.to_string().contains("hdbscan"));
    }

    #[test]
    fn two_blobs_separate_into_two_clusters() {
        let engine = KMeansEngine::new();
        let mut vectors = blob(0.0, 4);
        vectors.extend(blob(10.0, 4));
        let labels = engine.cluster(&vectors, "kmeans", 2).unwrap();
        assert_eq!(labels.len(), 8);
        assert!(labels[..4].iter().all(|&l| l == labels[0]));
        assert!(labels[4..].iter().all(|&l| l == labels[4]));
        assert_ne!(labels[0], labels[4]);
    }

    #[test]
    fn identical_inputs_produce_identical_labels() {
        let engine = KMeansEngine::new();
        let mut vectors = blob(0.0, 5);
        vectors.extend(blob(5.0, 5));
        vectors.extend(blob(20.0, 5));
        let first = engine.cluster(&vectors, "kmeans", 3).unwrap();
        let second = engine.cluster(&vectors, "kmeans", 3).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn n_clusters_must_not_exceed_points() {
        let engine = KMeansEngine::new();
        let err = engine.cluster(&[vec![0.0], vec![1.0]], "kmeans", 3).unwrap_err();
        assert!(matches!(err, ThoughtNetError::Config(_)));
    }
}
