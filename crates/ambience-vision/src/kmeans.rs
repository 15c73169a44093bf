//! k-means 색상 군집화.
//!
//! RGB 공간에서 샘플을 k개의 대표 색상으로 축약한다.
//! 초기 중심은 결정적 최원점(farthest-point) 방식으로 고르므로 같은 입력은
//! 항상 같은 결과를 낸다. 거리 동률이면 인덱스가 낮은 중심이 이긴다.

use ambience_core::error::CoreError;
use ambience_core::models::color::RgbColor;
use tracing::{debug, warn};

/// 반복 횟수 상한 (초과 시 현재 중심을 그대로 채택)
pub const DEFAULT_MAX_ITERATIONS: usize = 300;

/// k-means 군집화기
#[derive(Debug, Clone, Copy)]
pub struct KMeans {
    k: usize,
    threshold: f64,
    max_iterations: usize,
}

/// 반복 중 중심 좌표 (f64 누적 평균)
type Centroid = [f64; 3];

impl KMeans {
    /// 새 군집화기 생성
    ///
    /// `threshold`는 한 라운드에서 모든 중심이 움직인 거리 합의 상한이다.
    pub fn new(k: usize, threshold: f32) -> Result<Self, CoreError> {
        if k == 0 {
            return Err(CoreError::validation("k", "군집 수는 1 이상이어야 함"));
        }
        Ok(Self {
            k,
            threshold: threshold.max(0.0) as f64,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        })
    }

    /// 반복 횟수 상한 변경
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// 샘플을 k개 중심으로 군집화 — 중심 목록을 인덱스 순서로 반환
    ///
    /// 샘플이 비어 있으면 에러 (호출자가 최소 1개를 보장해야 함).
    pub fn cluster(&self, samples: &[RgbColor]) -> Result<Vec<RgbColor>, CoreError> {
        if samples.is_empty() {
            return Err(CoreError::validation("samples", "샘플이 비어 있음"));
        }

        let mut centroids = seed_centroids(samples, self.k);
        let mut assignments = vec![0usize; samples.len()];

        let mut converged = false;
        for iteration in 1..=self.max_iterations {
            assign(samples, &centroids, &mut assignments);
            let updated = update(samples, &assignments, &centroids);

            let movement: f64 = centroids
                .iter()
                .zip(&updated)
                .map(|(old, new)| distance(old, new))
                .sum();
            centroids = updated;

            if movement <= self.threshold {
                debug!(
                    "k-means 수렴: k={}, 샘플 {}개, {}회 반복 (이동량 {:.3})",
                    self.k,
                    samples.len(),
                    iteration,
                    movement
                );
                converged = true;
                break;
            }
        }

        if !converged {
            warn!(
                "k-means 반복 상한 {}회 도달 — 현재 중심 채택",
                self.max_iterations
            );
        }

        Ok(centroids.iter().map(to_color).collect())
    }
}

/// 최원점 초기화: 첫 샘플 → 이미 고른 중심들과 가장 먼 샘플 순
fn seed_centroids(samples: &[RgbColor], k: usize) -> Vec<Centroid> {
    let mut chosen = Vec::with_capacity(k);
    chosen.push(samples[0]);

    // 각 샘플의 가장 가까운 중심까지 제곱 거리
    let mut nearest: Vec<u32> = samples
        .iter()
        .map(|s| s.distance_squared(&samples[0]))
        .collect();

    while chosen.len() < k {
        let mut best = 0;
        for (i, d) in nearest.iter().enumerate() {
            if *d > nearest[best] {
                best = i;
            }
        }
        let next = samples[best];
        chosen.push(next);
        for (d, s) in nearest.iter_mut().zip(samples) {
            *d = (*d).min(s.distance_squared(&next));
        }
    }

    chosen.into_iter().map(to_centroid).collect()
}

/// 각 샘플을 제곱 거리가 가장 짧은 중심에 배정 (동률이면 낮은 인덱스)
fn assign(samples: &[RgbColor], centroids: &[Centroid], assignments: &mut [usize]) {
    for (sample, slot) in samples.iter().zip(assignments.iter_mut()) {
        let point = to_centroid(*sample);
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (i, centroid) in centroids.iter().enumerate() {
            let d = distance_squared(&point, centroid);
            if d < best_dist {
                best = i;
                best_dist = d;
            }
        }
        *slot = best;
    }
}

/// 배정된 샘플의 채널별 평균으로 중심 재계산 (빈 군집은 이전 값 유지)
fn update(samples: &[RgbColor], assignments: &[usize], previous: &[Centroid]) -> Vec<Centroid> {
    let mut sums = vec![[0u64; 3]; previous.len()];
    let mut counts = vec![0u64; previous.len()];

    for (sample, &cluster) in samples.iter().zip(assignments) {
        let sum = &mut sums[cluster];
        sum[0] += sample.r as u64;
        sum[1] += sample.g as u64;
        sum[2] += sample.b as u64;
        counts[cluster] += 1;
    }

    previous
        .iter()
        .zip(sums.iter().zip(&counts))
        .map(|(prev, (sum, &count))| {
            if count == 0 {
                return *prev;
            }
            let n = count as f64;
            [sum[0] as f64 / n, sum[1] as f64 / n, sum[2] as f64 / n]
        })
        .collect()
}

#[inline]
fn distance_squared(a: &Centroid, b: &Centroid) -> f64 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    dr * dr + dg * dg + db * db
}

#[inline]
fn distance(a: &Centroid, b: &Centroid) -> f64 {
    distance_squared(a, b).sqrt()
}

fn to_centroid(color: RgbColor) -> Centroid {
    [color.r as f64, color.g as f64, color.b as f64]
}

fn to_color(centroid: &Centroid) -> RgbColor {
    let channel = |v: f64| v.round().clamp(0.0, 255.0) as u8;
    RgbColor::new(channel(centroid[0]), channel(centroid[1]), channel(centroid[2]))
}
