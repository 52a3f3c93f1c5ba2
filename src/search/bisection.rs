/// Refined threshold crossing.
///
/// * `x` – abscissa of the crossing.
/// * `residual` – `f(x) − threshold` at the returned abscissa (the last evaluated midpoint or
///   endpoint).
/// * `bracketed` – `false` when the input endpoints did not bracket a sign change; `x` is then
///   only the endpoint closer to the threshold, a **best-effort** answer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    pub x: f64,
    pub residual: f64,
    pub bracketed: bool,
}

/// Bisection search for the instant where `f` crosses `threshold` inside `[a, b]`.
///
/// At each of the `iterations` steps the midpoint is evaluated and replaces whichever endpoint
/// has a residual of the same sign. An exact zero residual ends the search early.
///
/// When `f(a) − threshold` and `f(b) − threshold` have the same sign, no bisection is attempted
/// and the endpoint whose residual is closer to zero is returned with `bracketed == false`.
/// This keeps a scan going when coarse sampling handed over a bracket that does not actually
/// contain a crossing, but the returned instant is then not a true crossing; callers that need
/// certainty should check [`Crossing::bracketed`].
///
/// Arguments
/// -----------------
/// * `f`: objective; an `Err` aborts the search and is returned unchanged.
/// * `a`, `b`: bracket bounds.
/// * `threshold`: crossing level.
/// * `iterations`: number of halvings; the bracket ends `2^-iterations` times its initial width.
///
/// Return
/// ----------
/// * The refined [`Crossing`] (midpoint of the final bracket when bracketed).
pub fn bisect_crossing<F, E>(
    mut f: F,
    a: f64,
    b: f64,
    threshold: f64,
    iterations: u32,
) -> Result<Crossing, E>
where
    F: FnMut(f64) -> Result<f64, E>,
{
    let mut lo = a;
    let mut hi = b;
    let mut g_lo = f(lo)? - threshold;
    let g_hi = f(hi)? - threshold;

    if g_lo == 0.0 {
        return Ok(Crossing {
            x: lo,
            residual: 0.0,
            bracketed: true,
        });
    }
    if g_hi == 0.0 {
        return Ok(Crossing {
            x: hi,
            residual: 0.0,
            bracketed: true,
        });
    }

    if g_lo.signum() == g_hi.signum() {
        log::warn!(
            "crossing bracket [{a}, {b}] does not change sign (residuals {g_lo:.6e}, {g_hi:.6e}), \
             returning the closer endpoint"
        );
        let (x, residual) = if g_lo.abs() <= g_hi.abs() {
            (lo, g_lo)
        } else {
            (hi, g_hi)
        };
        return Ok(Crossing {
            x,
            residual,
            bracketed: false,
        });
    }

    let mut residual = g_lo;
    for _ in 0..iterations {
        let mid = 0.5 * (lo + hi);
        let g_mid = f(mid)? - threshold;
        residual = g_mid;
        if g_mid == 0.0 {
            return Ok(Crossing {
                x: mid,
                residual: 0.0,
                bracketed: true,
            });
        }
        if g_mid.signum() == g_lo.signum() {
            lo = mid;
            g_lo = g_mid;
        } else {
            hi = mid;
        }
    }

    Ok(Crossing {
        x: 0.5 * (lo + hi),
        residual,
        bracketed: true,
    })
}
