//! Legendre polynomial evaluation.
//!
//! Legendre polynomials P_n(x) are orthogonal on [-1, 1] with weight 1:
//! ∫_{-1}^{1} P_m(x) P_n(x) dx = 2/(2n+1) δ_{mn}

/// Returns (P_{n-1}(x), P_n(x)) from the three-term recurrence
/// (k+1) P_{k+1} = (2k+1) x P_k - k P_{k-1}.
fn recurrence(n: usize, x: f64) -> (f64, f64) {
    let mut p_prev = 1.0;
    let mut p_curr = x;
    for k in 1..n {
        let p_next = ((2 * k + 1) as f64 * x * p_curr - k as f64 * p_prev) / (k + 1) as f64;
        p_prev = p_curr;
        p_curr = p_next;
    }
    (p_prev, p_curr)
}

/// Evaluate Legendre polynomial P_n(x).
pub fn legendre(n: usize, x: f64) -> f64 {
    match n {
        0 => 1.0,
        1 => x,
        _ => recurrence(n, x).1,
    }
}

/// Evaluate P_n(x) and P'_n(x) with a single recurrence pass.
///
/// The derivative uses P'_n(x) = n (x P_n - P_{n-1}) / (x² - 1) in the
/// interior and the closed forms P'_n(±1) = (±1)^{n+1} n(n+1)/2 at the ends.
pub fn legendre_and_derivative(n: usize, x: f64) -> (f64, f64) {
    if n == 0 {
        return (1.0, 0.0);
    }
    if n == 1 {
        return (x, 1.0);
    }

    let (p_n_minus_1, p_n) = recurrence(n, x);
    let end_slope = (n * (n + 1)) as f64 / 2.0;

    let dp_n = if (x - 1.0).abs() < 1e-14 {
        end_slope
    } else if (x + 1.0).abs() < 1e-14 {
        if n % 2 == 0 { -end_slope } else { end_slope }
    } else {
        n as f64 * (x * p_n - p_n_minus_1) / (x * x - 1.0)
    };

    (p_n, dp_n)
}
