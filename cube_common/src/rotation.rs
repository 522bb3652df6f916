use std::f32::consts::PI;
//////////////////////// Consts ///////////////////////
/// 45 degrees per second.
pub const ROTATION_SPEED_RADIANS: f32 = 45.0 * PI / 180.0;
pub const ROTATION_AXIS: [f32; 3] = [0.7, 0.2, -0.8];
//////////////////////// Structs ///////////////////////
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CubeRotation {
    angle: f32,
}
//////////////////////// Impls ///////////////////////
impl CubeRotation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Steps the angle by the fixed speed scaled with the frame time. Kept in [0, 2pi).
    pub fn advance(&mut self, delta_seconds: f32) {
        self.angle = (self.angle + ROTATION_SPEED_RADIANS * delta_seconds).rem_euclid(2.0 * PI);
    }

    pub fn axis() -> glm::Vec3 {
        glm::normalize(&glm::Vec3::new(
            ROTATION_AXIS[0],
            ROTATION_AXIS[1],
            ROTATION_AXIS[2],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn one_second_turns_by_quarter_pi() {
        let mut rotation = CubeRotation::new();
        rotation.advance(1.0);
        assert!((rotation.angle() - PI / 4.0).abs() < EPS);
    }

    #[test]
    fn frame_rate_does_not_change_the_speed() {
        let mut coarse = CubeRotation::new();
        let mut fine = CubeRotation::new();
        for _ in 0..30 {
            coarse.advance(1.0 / 30.0);
        }
        for _ in 0..144 {
            fine.advance(1.0 / 144.0);
        }
        assert!((coarse.angle() - fine.angle()).abs() < 1e-4);
    }

    #[test]
    fn angle_wraps_after_full_turn() {
        let mut rotation = CubeRotation::new();
        rotation.advance(9.0);
        assert!(rotation.angle() >= 0.0 && rotation.angle() < 2.0 * PI);
        assert!((rotation.angle() - PI / 4.0).abs() < 1e-4);
    }

    #[test]
    fn zero_delta_keeps_angle() {
        let mut rotation = CubeRotation::new();
        rotation.advance(0.5);
        let before = rotation.angle();
        rotation.advance(0.0);
        assert_eq!(before, rotation.angle());
    }

    #[test]
    fn axis_is_unit_length() {
        assert!((glm::length(&CubeRotation::axis()) - 1.0).abs() < EPS);
    }
}
