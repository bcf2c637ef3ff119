/// Depth bands used for `Transform::translation.z`. Larger is closer to the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum LayerZ {
    Background = -10,
    Scenery = -9,
    StageBack = -1,
    StageCenter = 0,
    StageFront = 1,
    Foreground = 9,
}

impl LayerZ {
    #[inline]
    pub fn z(self) -> f32 {
        self as i32 as f32
    }
}
