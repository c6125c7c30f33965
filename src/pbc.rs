use crate::dump::Sample;

// Squared separation along one axis, minimum over the direct image and the
// images through either wall. Each atom brings its own [lo, hi] bounds so
// boxes may change shape from frame to frame.
pub fn axis_separation_sq(xi: f64, bi: [f64; 2], xj: f64, bj: [f64; 2]) -> f64 {
    let direct = xi - xj;
    let through_lo = xi - bi[0] - xj + bj[1];
    let through_hi = -xi + bi[1] + xj - bj[0];
    (direct * direct)
        .min(through_lo * through_lo)
        .min(through_hi * through_hi)
}

/// Minimum-image distance between two unscaled positions, orthogonal box only.
/// Valid while no separation exceeds one box length.
pub fn pbc_distance(xi: &[f64; 3], bi: &[[f64; 2]; 3], xj: &[f64; 3], bj: &[[f64; 2]; 3]) -> f64 {
    (0..3)
        .map(|l| axis_separation_sq(xi[l], bi[l], xj[l], bj[l]))
        .sum::<f64>()
        .sqrt()
}

/// Minimum-image distance between two atoms sampled at the same timestep.
pub fn minimum_image_distance(a: &Sample, b: &Sample) -> f64 {
    pbc_distance(&a.unscaled(), &a.bounds, &b.unscaled(), &b.bounds)
}

// fold a coordinate back into [lo, lo + len)
pub fn wrap(x: f64, lo: f64, len: f64) -> f64 {
    let x = (x - lo).rem_euclid(len) + lo;
    // rem_euclid of a tiny negative offset rounds up to len
    if x >= lo + len {
        lo
    } else {
        x
    }
}
