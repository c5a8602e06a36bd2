//! Neighbourhood search and replacement
//!
//! For each gridpoint whose search-field value lies inside a criteria range,
//! scans a square window around it and substitutes the target field's value
//! from the location of the window maximum. Used e.g. to sharpen features
//! that a smooth analysis has displaced.

use rayon::prelude::*;
use stratus_core::{is_valid, Error, Field, Result};

/// Replace values from the location of the window maximum of a search field.
///
/// Per gridpoint:
/// 1. If `search_array[y][x]` is below `criteria_min` or at/above
///    `criteria_max`, the value of `array[y][x]` is kept.
/// 2. Otherwise the square window of radius `halfwidth` (clipped to the grid)
///    is scanned in `search_array`, ignoring invalid entries.
/// 3. A window without valid entries yields 0.
/// 4. A window maximum below `target_min` keeps `array[y][x]`.
/// 5. Otherwise the output is `array` at the window-maximum location. Ties on
///    the maximum keep the first occurrence in row-major scan order.
///
/// # Errors
/// `criteria_min > criteria_max`, `target_min > target_max` (or either bound
/// NaN), and shape mismatches are rejected.
pub fn calc_neighbourhood(
    array: &Field,
    search_array: &Field,
    halfwidth: usize,
    criteria_min: f32,
    criteria_max: f32,
    target_min: f32,
    target_max: f32,
) -> Result<Field> {
    if !(criteria_min <= criteria_max) {
        return Err(Error::invalid_parameter(
            "criteria_min",
            criteria_min,
            "must not exceed criteria_max",
        ));
    }
    if !(target_min <= target_max) {
        return Err(Error::invalid_parameter(
            "target_min",
            target_min,
            "must not exceed target_max",
        ));
    }
    if array.shape() != search_array.shape() {
        return Err(Error::SizeMismatch {
            what: "search_array",
            expected: format!("({}, {})", array.ny(), array.nx()),
            actual: format!("({}, {})", search_array.ny(), search_array.nx()),
        });
    }

    let (ny, nx) = array.shape();
    let r = halfwidth;

    let data: Vec<f32> = (0..ny)
        .into_par_iter()
        .flat_map(|y| {
            let mut row = vec![0.0f32; nx];
            for x in 0..nx {
                let centre = search_array.values()[(y, x)];
                if centre < criteria_min || centre >= criteria_max {
                    row[x] = array.values()[(y, x)];
                    continue;
                }

                let mut best: Option<(f32, usize, usize)> = None;
                for yy in y.saturating_sub(r)..=(y + r).min(ny - 1) {
                    for xx in x.saturating_sub(r)..=(x + r).min(nx - 1) {
                        // In-window bounds are guaranteed by the loop ranges
                        let value = unsafe { search_array.get_unchecked(yy, xx) };
                        if !is_valid(value) {
                            continue;
                        }
                        match best {
                            Some((max, _, _)) if value <= max => {}
                            _ => best = Some((value, yy, xx)),
                        }
                    }
                }

                row[x] = match best {
                    None => 0.0,
                    Some((max, _, _)) if max < target_min => array.values()[(y, x)],
                    Some((_, yy, xx)) => array.values()[(yy, xx)],
                };
            }
            row
        })
        .collect();

    Field::from_vec(data, ny, nx)
}
