//! Binary morphology over pixel sets
//!
//! Structuring elements are Chebyshev squares (`(2r+1) × (2r+1)`), applied as
//! two separable 1D passes so cost is independent of the radius.

use std::collections::VecDeque;

use crate::spatial::Grid;

/// Dilate a 1D line: `out[i]` is set iff any member lies within `radius`
fn dilate_line(line: &[bool], radius: usize) -> Vec<bool> {
    let n = line.len();
    // prefix[i] = members in line[..i]
    let mut prefix = vec![0u32; n + 1];
    for (i, &member) in line.iter().enumerate() {
        prefix[i + 1] = prefix[i] + member as u32;
    }

    (0..n)
        .map(|i| {
            let lo = i.saturating_sub(radius);
            let hi = (i + radius + 1).min(n);
            prefix[hi] > prefix[lo]
        })
        .collect()
}

/// Dilation; pixels outside the grid are never members
pub fn dilate(set: &Grid<bool>, radius: usize) -> Grid<bool> {
    if radius == 0 {
        return set.clone();
    }
    let (width, height) = (set.width, set.height);

    let mut horizontal = Vec::with_capacity(width * height);
    for row in set.as_slice().chunks(width) {
        horizontal.extend(dilate_line(row, radius));
    }

    let mut out = vec![false; width * height];
    let mut column = vec![false; height];
    for x in 0..width {
        for (y, cell) in column.iter_mut().enumerate() {
            *cell = horizontal[y * width + x];
        }
        for (y, member) in dilate_line(&column, radius).into_iter().enumerate() {
            out[y * width + x] = member;
        }
    }

    Grid::from_vec(width, height, out).unwrap_or_else(|| set.clone())
}

/// Erosion; pixels outside the grid count as members, so a set touching the
/// border is not eaten away from outside
pub fn erode(set: &Grid<bool>, radius: usize) -> Grid<bool> {
    if radius == 0 {
        return set.clone();
    }
    let complement = invert(set);
    invert(&dilate(&complement, radius))
}

/// Closing (dilate then erode): fills gaps narrower than `2 * radius + 1`
///
/// Never removes members: every input member is a member of the output.
pub fn close(set: &Grid<bool>, radius: usize) -> Grid<bool> {
    if radius == 0 {
        return set.clone();
    }
    erode(&dilate(set, radius), radius)
}

pub fn invert(set: &Grid<bool>) -> Grid<bool> {
    let data = set.as_slice().iter().map(|&m| !m).collect();
    Grid::from_vec(set.width, set.height, data).unwrap_or_else(|| set.clone())
}

fn visit(
    passable: &Grid<bool>,
    reached: &mut Grid<bool>,
    queue: &mut VecDeque<(usize, usize)>,
    x: usize,
    y: usize,
) {
    if passable.get(x, y) == Some(&true) && reached.get(x, y) == Some(&false) {
        reached.set(x, y, true);
        queue.push_back((x, y));
    }
}

/// 4-connected flood fill over `passable` seeded from every passable border
/// pixel; returns the reached set
pub fn flood_from_border(passable: &Grid<bool>) -> Grid<bool> {
    let (width, height) = (passable.width, passable.height);
    let mut reached = Grid::new(width, height, false);
    let mut queue = VecDeque::new();

    for x in 0..width {
        visit(passable, &mut reached, &mut queue, x, 0);
        visit(passable, &mut reached, &mut queue, x, height.saturating_sub(1));
    }
    for y in 0..height {
        visit(passable, &mut reached, &mut queue, 0, y);
        visit(passable, &mut reached, &mut queue, width.saturating_sub(1), y);
    }

    while let Some((x, y)) = queue.pop_front() {
        // wrapping_sub underflow lands far out of bounds and is rejected by get()
        visit(passable, &mut reached, &mut queue, x.wrapping_sub(1), y);
        visit(passable, &mut reached, &mut queue, x + 1, y);
        visit(passable, &mut reached, &mut queue, x, y.wrapping_sub(1));
        visit(passable, &mut reached, &mut queue, x, y + 1);
    }

    reached
}
