use bevy::prelude::*;
use smallvec::SmallVec;

use crate::core::layer::LayerZ;

/// Positions for `count` menu buttons evenly spaced on a circle around `center`.
///
/// Spacing is `360 / count` degrees starting at `90 - spacing`, so the
/// second button (or a lone first one) sits straight above the center. Buttons go on the
/// foreground layer, half a unit in front of it.
pub fn radial_layout(count: usize, center: Vec2, radius: f32) -> SmallVec<[Vec3; 8]> {
    if count == 0 {
        return SmallVec::new();
    }
    let interval = 360.0 / count as f32;
    let offset = 90.0 - interval;
    let z = LayerZ::Foreground.z() + 0.5;
    (0..count)
        .map(|i| {
            let (sin, cos) = (i as f32 * interval + offset).to_radians().sin_cos();
            Vec3::new(center.x + cos * radius, center.y + sin * radius, z)
        })
        .collect()
}
