//! Optimal interpolation
//!
//! Blends a gridded background forecast with scattered point observations.
//! Each gridpoint is analysed independently: observations within the
//! structure function's localization radius form a small Bayesian
//! least-squares update
//!
//! ```text
//! analysis = background + G (P + R)^-1 (obs - background_at_obs)
//! ```
//!
//! where G holds gridpoint-to-observation correlations, P the
//! observation-observation correlations (unit diagonal), and R the diagonal
//! of observation-to-background error-variance ratios.
//!
//! Reference:
//! Gandin, L.S. (1963). Objective Analysis of Meteorological Fields.
//! Daley, R. (1991). Atmospheric Data Analysis. Cambridge University Press.

use rayon::prelude::*;
use stratus_core::{is_valid, Error, Field, Grid, Point, Points, Result, Transform};
use tracing::debug;

use crate::structure::StructureFunction;

/// Optimal interpolation of point observations onto a gridded background.
///
/// # Arguments
/// * `bgrid` - Grid describing the background field
/// * `background` - Background values, shape of `bgrid`
/// * `points` - Observation sites
/// * `pobs` - Observed values, aligned to `points`
/// * `pratios` - Ratios of observation to background error variance, >= 0
/// * `pbackground` - Background evaluated at the sites (see
///   [`background_at_points`])
/// * `structure` - Correlation model
/// * `max_points` - Retain at most this many observations per gridpoint,
///   keeping the highest-correlated ones; 0 means unlimited
///
/// # Returns
/// The analysis field, shape of `bgrid`. Gridpoints with no usable
/// observations keep their background value.
///
/// # Errors
/// Size mismatches between grid, background, and observation vectors are
/// rejected before any gridpoint is solved.
#[allow(clippy::too_many_arguments)]
pub fn optimal_interpolation(
    bgrid: &Grid,
    background: &Field,
    points: &Points,
    pobs: &[f32],
    pratios: &[f32],
    pbackground: &[f32],
    structure: &dyn StructureFunction,
    max_points: usize,
) -> Result<Field> {
    if background.shape() != bgrid.shape() {
        return Err(Error::SizeMismatch {
            what: "background",
            expected: format!("({}, {})", bgrid.ny(), bgrid.nx()),
            actual: format!("({}, {})", background.ny(), background.nx()),
        });
    }
    for (name, len) in [
        ("pobs", pobs.len()),
        ("pratios", pratios.len()),
        ("pbackground", pbackground.len()),
    ] {
        if len != points.len() {
            return Err(Error::SizeMismatch {
                what: name,
                expected: format!("{} values", points.len()),
                actual: format!("{} values", len),
            });
        }
    }

    let (ny, nx) = bgrid.shape();

    // Remove sites outside the domain, remapping the aligned vectors
    let indices = points.get_in_domain_indices(bgrid);
    let points0 = points.subset(&indices);
    let ns = points0.len();
    let mut pobs0 = Vec::with_capacity(ns);
    let mut pratios0 = Vec::with_capacity(ns);
    let mut pbackground0 = Vec::with_capacity(ns);
    for &index in &indices {
        if index >= pobs.len() {
            return Err(Error::InternalIndex(format!(
                "domain index {} outside {} sites",
                index,
                pobs.len()
            )));
        }
        pobs0.push(pobs[index]);
        pratios0.push(pratios[index]);
        pbackground0.push(pbackground[index]);
    }

    debug!(
        observations = ns,
        grid_ny = ny,
        grid_nx = nx,
        "optimal interpolation"
    );

    if ns == 0 {
        return Ok(background.clone());
    }

    let localization_radius = structure.max_localization_distance();

    let data: Vec<f32> = (0..ny)
        .into_par_iter()
        .flat_map(|y| {
            let mut row = vec![0.0f32; nx];
            for x in 0..nx {
                let bg = background.values()[(y, x)];
                row[x] = analyse_gridpoint(
                    &bgrid.point(y, x),
                    bg,
                    &points0,
                    &pobs0,
                    &pratios0,
                    &pbackground0,
                    structure,
                    max_points,
                    localization_radius,
                );
            }
            row
        })
        .collect();

    Field::from_vec(data, ny, nx)
}

/// Analysis value for a single gridpoint. Falls back to the background when
/// no observation carries weight or the local system is degenerate.
#[allow(clippy::too_many_arguments)]
fn analyse_gridpoint(
    gp: &Point,
    background: f32,
    points: &Points,
    pobs: &[f32],
    pratios: &[f32],
    pbackground: &[f32],
    structure: &dyn StructureFunction,
    max_points: usize,
    localization_radius: f32,
) -> f32 {
    let candidates = points.get_neighbours(gp.lat, gp.lon, localization_radius);
    if candidates.is_empty() {
        return background;
    }

    // Gridpoint-to-observation correlations. corr_background lets the
    // cross-validation wrapper exclude near-self observations here while
    // they still enter the observation-observation covariance below.
    let mut rhos: Vec<(f32, usize)> = Vec::with_capacity(candidates.len());
    for &index in &candidates {
        if !is_valid(pobs[index]) || !is_valid(pratios[index]) || !is_valid(pbackground[index]) {
            continue;
        }
        let rho = structure.corr_background(&points.point(index), gp);
        if rho > 0.0 {
            rhos.push((rho, index));
        }
    }

    let selected = if max_points > 0 && rhos.len() > max_points {
        // Stable ascending sort on rho; the best candidates occupy the tail
        rhos.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        rhos[rhos.len() - max_points..].iter().rev().copied().collect()
    } else {
        rhos
    };

    let n = selected.len();
    if n == 0 {
        return background;
    }

    // Local covariances, assembled and solved in double precision
    let mut a = vec![0.0f64; n * n];
    let mut g = vec![0.0f64; n];
    let mut innovation = vec![0.0f64; n];
    for i in 0..n {
        let (rho, index) = selected[i];
        g[i] = rho as f64;
        innovation[i] = (pobs[index] - pbackground[index]) as f64;
        a[i * n + i] = 1.0 + pratios[index] as f64;
        let pi = points.point(index);
        for (j, &(_, index_j)) in selected.iter().enumerate().skip(i + 1) {
            let corr = structure.corr(&pi, &points.point(index_j)) as f64;
            a[i * n + j] = corr;
            a[j * n + i] = corr;
        }
    }

    match solve_spd(n, &mut a, &g) {
        Some(weights) => {
            let increment: f64 = weights
                .iter()
                .zip(innovation.iter())
                .map(|(w, d)| w * d)
                .sum();
            background + increment as f32
        }
        // Near-singular local system (e.g. duplicate observations with zero
        // noise): keep the background rather than amplify noise
        None => background,
    }
}

/// Solve `A x = b` for symmetric positive-definite `A` via Cholesky.
///
/// `A` is row-major n x n and is overwritten with its factor. Returns `None`
/// when a pivot drops below tolerance, i.e. the matrix is not numerically
/// positive definite.
fn solve_spd(n: usize, a: &mut [f64], b: &[f64]) -> Option<Vec<f64>> {
    const TOL: f64 = 1e-10;

    for j in 0..n {
        let mut d = a[j * n + j];
        for k in 0..j {
            d -= a[j * n + k] * a[j * n + k];
        }
        if d <= TOL {
            return None;
        }
        let d = d.sqrt();
        a[j * n + j] = d;
        for i in (j + 1)..n {
            let mut s = a[i * n + j];
            for k in 0..j {
                s -= a[i * n + k] * a[j * n + k];
            }
            a[i * n + j] = s / d;
        }
    }

    // L y = b, then L^T x = y
    let mut x = b.to_vec();
    for i in 0..n {
        let mut s = x[i];
        for k in 0..i {
            s -= a[i * n + k] * x[k];
        }
        x[i] = s / a[i * n + i];
    }
    for i in (0..n).rev() {
        let mut s = x[i];
        for k in (i + 1)..n {
            s -= a[k * n + i] * x[k];
        }
        x[i] = s / a[i * n + i];
    }

    Some(x)
}

/// Optimal interpolation in a transformed space.
///
/// Applies `transform.forward` to the background and observations, derives
/// `pratios` from the observation and background error standard deviations
/// (`psigma` and `bsigma`), runs [`optimal_interpolation`], and maps the
/// analysis back with `transform.backward`. Invalid values pass through
/// untouched.
#[allow(clippy::too_many_arguments)]
pub fn optimal_interpolation_transform(
    bgrid: &Grid,
    background: &Field,
    bsigma: f32,
    points: &Points,
    pobs: &[f32],
    psigma: &[f32],
    pbackground: &[f32],
    structure: &dyn StructureFunction,
    max_points: usize,
    transform: &dyn Transform,
) -> Result<Field> {
    if !is_valid(bsigma) || bsigma <= 0.0 {
        return Err(Error::invalid_parameter(
            "bsigma",
            bsigma,
            "must be a finite value > 0",
        ));
    }
    if psigma.len() != points.len() {
        return Err(Error::SizeMismatch {
            what: "psigma",
            expected: format!("{} values", points.len()),
            actual: format!("{} values", psigma.len()),
        });
    }

    let mut background_transformed = background.clone();
    for value in background_transformed.values_mut().iter_mut() {
        if is_valid(*value) {
            *value = transform.forward(*value);
        }
    }

    let forward_all = |values: &[f32]| -> Vec<f32> {
        values
            .iter()
            .map(|&v| if is_valid(v) { transform.forward(v) } else { v })
            .collect()
    };
    let pobs_transformed = forward_all(pobs);
    let pbackground_transformed = forward_all(pbackground);
    let pratios: Vec<f32> = psigma
        .iter()
        .map(|&s| s * s / (bsigma * bsigma))
        .collect();

    let mut analysis = optimal_interpolation(
        bgrid,
        &background_transformed,
        points,
        &pobs_transformed,
        &pratios,
        &pbackground_transformed,
        structure,
        max_points,
    )?;

    for value in analysis.values_mut().iter_mut() {
        if is_valid(*value) {
            *value = transform.backward(*value);
        }
    }
    Ok(analysis)
}

/// Sample a gridded field at observation sites by nearest neighbour.
///
/// When `elev_gradient` is finite and non-zero and both the site and its
/// nearest cell carry an elevation, the sampled value is adjusted by
/// `elev_gradient * (site_elev - cell_elev)` (e.g. -0.0065 K/m for a
/// standard temperature lapse rate).
pub fn background_at_points(
    grid: &Grid,
    background: &Field,
    points: &Points,
    elev_gradient: f32,
) -> Result<Vec<f32>> {
    if background.shape() != grid.shape() {
        return Err(Error::SizeMismatch {
            what: "background",
            expected: format!("({}, {})", grid.ny(), grid.nx()),
            actual: format!("({}, {})", background.ny(), background.nx()),
        });
    }

    let mut output = Vec::with_capacity(points.len());
    for i in 0..points.len() {
        let p = points.point(i);
        let (y, x) = grid.get_nearest_neighbour(p.lat, p.lon);
        let mut value = background.values()[(y, x)];
        if is_valid(elev_gradient) && elev_gradient != 0.0 && is_valid(value) {
            let cell_elev = grid.elevs()[(y, x)];
            if is_valid(cell_elev) && is_valid(p.elev) {
                value += elev_gradient * (p.elev - cell_elev);
            }
        }
        output.push(value);
    }
    Ok(output)
}
