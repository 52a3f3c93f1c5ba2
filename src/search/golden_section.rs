/// 1/φ, the fraction of the bracket kept at each golden-section step.
const INV_PHI: f64 = 0.618_033_988_749_894_8;

/// Which extremum the search looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchDirection {
    Maximize,
    Minimize,
}

impl SearchDirection {
    /// True when `a` is strictly better than `b` in this direction.
    #[inline]
    pub fn is_better(&self, a: f64, b: f64) -> bool {
        match self {
            SearchDirection::Maximize => a > b,
            SearchDirection::Minimize => a < b,
        }
    }
}

/// Abscissa and function value of a refined extremum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extremum {
    pub x: f64,
    pub value: f64,
}

/// Golden-section search for an extremum of `f` over `[lo, hi]`.
///
/// Two interior points are kept at the golden fractions of the bracket. At each iteration their
/// values are compared, the bracket shrinks toward the better one, the worse interior point is
/// discarded and a single new one is evaluated. The loop stops after exactly `iterations`
/// steps, without any tolerance test, and the better of the two final interior points is
/// returned.
///
/// Arguments
/// -----------------
/// * `f`: objective; an `Err` aborts the search and is returned unchanged.
/// * `lo`, `hi`: bracket bounds (`lo < hi`; swapped bounds are reordered).
/// * `direction`: [`SearchDirection::Maximize`] or [`SearchDirection::Minimize`].
/// * `iterations`: number of shrinking steps; the bracket ends `0.618^iterations` times its
///   initial width.
///
/// Return
/// ----------
/// * The best final interior point, `f` is evaluated `iterations + 2` times.
pub fn golden_section_search<F, E>(
    mut f: F,
    lo: f64,
    hi: f64,
    direction: SearchDirection,
    iterations: u32,
) -> Result<Extremum, E>
where
    F: FnMut(f64) -> Result<f64, E>,
{
    let (mut a, mut b) = if lo <= hi { (lo, hi) } else { (hi, lo) };

    let mut c = b - INV_PHI * (b - a);
    let mut d = a + INV_PHI * (b - a);
    let mut fc = f(c)?;
    let mut fd = f(d)?;

    for _ in 0..iterations {
        if direction.is_better(fc, fd) {
            // Extremum lies in [a, d]
            b = d;
            d = c;
            fd = fc;
            c = b - INV_PHI * (b - a);
            fc = f(c)?;
        } else {
            // Extremum lies in [c, b]
            a = c;
            c = d;
            fc = fd;
            d = a + INV_PHI * (b - a);
            fd = f(d)?;
        }
    }

    Ok(if direction.is_better(fc, fd) {
        Extremum { x: c, value: fc }
    } else {
        Extremum { x: d, value: fd }
    })
}
