//! Standalone four-sphere tangency solver, exported for library callers.
//!
//! The detection pipeline places probes with [`super::triple_placer`] and does
//! not call [`solve_tangent_sphere`]; its tests use it as an independent check
//! on cavity probes.

use crate::core::models::sphere::Sphere;
use nalgebra::{Point3, Vector3};
use std::cmp::Ordering;

/// Tolerance of every degeneracy check in [`solve_tangent_sphere`].
///
/// The value is part of the solver's numeric contract and must not be tuned.
pub const TANGENT_TOLERANCE: f64 = 1e-6;

/// Solves Apollonius' problem for four spheres by spherical inversion (Yeates' method).
///
/// Returns the sphere touching all four inputs from outside, so that the distance
/// from its center to `centers[i]` equals `radii[i]` plus its radius, or `None`
/// when the configuration admits no such sphere.
///
/// # Algorithm
///
/// 1. The smallest input sphere becomes the inversion center and every radius is
///    reduced by its radius `r0`, collapsing it to a point.
/// 2. The remaining three spheres are inverted through the unit sphere around that
///    point. The sought sphere passes through the inversion center, so its image
///    is a plane tangent to the three inverted spheres.
/// 3. The plane normal is constrained by two linear equations; the largest
///    component of their cross product is used as the free variable and the unit
///    length condition yields a quadratic.
/// 4. Of the two roots, the plane at the smaller positive distance is inverted
///    back (`distance -> 0.5 / distance`) and `r0` is subtracted again.
///
/// # Arguments
///
/// * `centers` - The four sphere centers.
/// * `radii` - The four sphere radii, in the same order.
///
/// # Return
///
/// The tangent sphere, or `None` for near-coincident centers, coplanar or
/// collinear degeneracies, a negative discriminant, or no root at positive distance.
pub fn solve_tangent_sphere(centers: &[Point3<f64>; 4], radii: &[f64; 4]) -> Option<Sphere> {
    let pivot = (0..4).min_by(|&a, &b| {
        radii[a]
            .partial_cmp(&radii[b])
            .unwrap_or(Ordering::Equal)
    })?;
    let r0 = radii[pivot];
    let origin = centers[pivot];

    let mut inverted = [(Vector3::zeros(), 0.0); 3];
    for (slot, i) in (0..4).filter(|&i| i != pivot).enumerate() {
        let offset = centers[i] - origin;
        let reduced_radius = radii[i] - r0;
        let s = -reduced_radius * reduced_radius + offset.norm_squared();
        if s < TANGENT_TOLERANCE {
            return None;
        }
        inverted[slot] = (offset / s, reduced_radius / s);
    }
    let [(q1, t1), (q2, t2), (q3, t3)] = inverted;

    let e1 = q1 - q3;
    let e2 = q2 - q3;
    let f1 = t3 - t1;
    let f2 = t3 - t2;

    let direction = e1.cross(&e2);
    let axis = (1..3).fold(0, |best, a| {
        if direction[a].abs() > direction[best].abs() {
            a
        } else {
            best
        }
    });
    let pivot_component = direction[axis];
    if pivot_component.abs() < TANGENT_TOLERANCE {
        return None;
    }

    // n = base + n_axis * slope, with base[axis] = 0 and slope[axis] = 1.
    let (i, j) = ((axis + 1) % 3, (axis + 2) % 3);
    let mut base = Vector3::zeros();
    base[i] = (f1 * e2[j] - f2 * e1[j]) / pivot_component;
    base[j] = (e1[i] * f2 - e2[i] * f1) / pivot_component;
    let slope = direction / pivot_component;

    let a = slope.norm_squared();
    let b = base.dot(&slope);
    let c = base.norm_squared() - 1.0;
    let discriminant = b * b - a * c;
    if discriminant < -TANGENT_TOLERANCE {
        return None;
    }
    let root = discriminant.max(0.0).sqrt();

    let plane_for = |n_axis: f64| {
        let normal = base + slope * n_axis;
        (normal.dot(&q3) + t3, normal)
    };
    let first = plane_for((-b + root) / a);
    let alternate = plane_for((-b - root) / a);

    let (distance, normal) = select_plane(first, alternate)?;
    let shifted_radius = 0.5 / distance;
    Some(Sphere::new(origin + normal * shifted_radius, shifted_radius - r0))
}

fn select_plane(
    first: (f64, Vector3<f64>),
    alternate: (f64, Vector3<f64>),
) -> Option<(f64, Vector3<f64>)> {
    let chosen = match (
        first.0 >= -TANGENT_TOLERANCE,
        alternate.0 >= -TANGENT_TOLERANCE,
    ) {
        (false, false) => return None,
        (true, false) => first,
        (false, true) => alternate,
        (true, true) => {
            if first.0 > 0.0 && (first.0 <= alternate.0 || alternate.0 <= 0.0) {
                first
            } else {
                alternate
            }
        }
    };
    (chosen.0 > 0.0).then_some(chosen)
}
