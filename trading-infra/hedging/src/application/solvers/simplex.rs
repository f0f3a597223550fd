//! Euclidean projection onto a shifted simplex
//!
//! Projects `v` onto `{x : Σx = 1, x_i >= lower}` by shifting to the
//! standard simplex of mass `1 - N·lower` and applying the sort-based
//! algorithm (Duchi et al. 2008).

/// Project `values` in place; `lower` must satisfy `N·lower <= 1`
pub fn project_onto_simplex(values: &mut [f64], lower: f64) {
    let n = values.len();
    if n == 0 {
        return;
    }
    let mass = 1.0 - n as f64 * lower;
    if mass <= 0.0 {
        values.iter_mut().for_each(|v| *v = lower);
        return;
    }

    let mut sorted: Vec<f64> = values.iter().map(|v| v - lower).collect();
    sorted.sort_by(|a, b| b.total_cmp(a));

    let mut cumulative = 0.0;
    let mut theta = 0.0;
    for (j, mu) in sorted.iter().enumerate() {
        cumulative += mu;
        let candidate = (cumulative - mass) / (j + 1) as f64;
        if mu - candidate > 0.0 {
            theta = candidate;
        }
    }

    for v in values.iter_mut() {
        *v = (*v - lower - theta).max(0.0) + lower;
    }
}
