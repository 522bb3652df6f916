use glm::{Mat4, Vec3};
//////////////////////// Consts ///////////////////////
pub const FIELD_OF_VIEW_RADIANS: f32 = 45.0 * std::f32::consts::PI / 180.0;
pub const Z_NEAR: f32 = 0.01;
pub const Z_FAR: f32 = 1000.0;
//////////////////////// Enums ///////////////////////
/// Clip space conventions differ per API, and the projection has to match the one we render with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClipSpace {
    /// depth in [-1, 1], y up
    OpenGl,
    /// depth in [0, 1], y down
    Vulkan,
    /// depth in [0, 1], y up
    Direct3D,
}
//////////////////////// Structs ///////////////////////
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
}
//////////////////////// Impls ///////////////////////
impl Camera {
    pub fn new(position: Vec3, forward: Vec3, up: Vec3) -> Self {
        Self {
            position,
            forward,
            up,
        }
    }

    /// Get the camera's view matrix which describes the position and rotate (direction) of the camera.
    /// We never move the camera, instead the inverse transformation is applied to the model.
    pub fn get_view_matrix(&self) -> Mat4 {
        let look_at_point = self.position + self.forward;
        glm::look_at(&self.position, &look_at_point, &self.up)
    }

    /// Projection for an image of the given size, or `None` when the image has no area
    /// (a minimized window), in which case there is nothing to draw.
    pub fn get_projection_matrix(
        &self,
        clip_space: ClipSpace,
        image_width: u32,
        image_height: u32,
    ) -> Option<Mat4> {
        if image_width == 0 || image_height == 0 {
            return None;
        }
        let aspect_ratio = image_width as f32 / image_height as f32;
        let proj = match clip_space {
            ClipSpace::OpenGl => {
                glm::perspective_rh_no(aspect_ratio, FIELD_OF_VIEW_RADIANS, Z_NEAR, Z_FAR)
            }
            ClipSpace::Direct3D => {
                glm::perspective_rh_zo(aspect_ratio, FIELD_OF_VIEW_RADIANS, Z_NEAR, Z_FAR)
            }
            ClipSpace::Vulkan => {
                let mut proj =
                    glm::perspective_rh_zo(aspect_ratio, FIELD_OF_VIEW_RADIANS, Z_NEAR, Z_FAR);
                // the vulkan NDC plane is Y-axis pointing down
                proj.m22 *= -1.0;
                proj
            }
        };
        Some(proj)
    }
}

impl Default for Camera {
    /// At the origin looking down -z with +y up.
    fn default() -> Self {
        Self::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(0.0, 1.0, 0.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn to_ndc(proj: &Mat4, view: &Mat4, point: Vec3) -> Vec3 {
        let clip = proj * view * glm::vec4(point.x, point.y, point.z, 1.0);
        Vec3::new(clip.x / clip.w, clip.y / clip.w, clip.z / clip.w)
    }

    #[test]
    fn default_view_is_identity() {
        let view = Camera::default().get_view_matrix();
        let identity = Mat4::identity();
        assert!(view
            .iter()
            .zip(identity.iter())
            .all(|(a, b)| (a - b).abs() < EPS));
    }

    #[test]
    fn zero_sized_image_has_no_projection() {
        let camera = Camera::default();
        assert!(camera.get_projection_matrix(ClipSpace::Vulkan, 0, 900).is_none());
        assert!(camera.get_projection_matrix(ClipSpace::OpenGl, 1600, 0).is_none());
    }

    #[test]
    fn depth_range_follows_clip_space() {
        let camera = Camera::default();
        let view = camera.get_view_matrix();
        let near_point = Vec3::new(0.0, 0.0, -Z_NEAR);
        let far_point = Vec3::new(0.0, 0.0, -Z_FAR);

        let gl = camera.get_projection_matrix(ClipSpace::OpenGl, 1600, 900).unwrap();
        assert!((to_ndc(&gl, &view, near_point).z + 1.0).abs() < EPS);
        assert!((to_ndc(&gl, &view, far_point).z - 1.0).abs() < EPS);

        for clip_space in [ClipSpace::Vulkan, ClipSpace::Direct3D].iter() {
            let proj = camera.get_projection_matrix(*clip_space, 1600, 900).unwrap();
            assert!(to_ndc(&proj, &view, near_point).z.abs() < EPS);
            assert!((to_ndc(&proj, &view, far_point).z - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn vulkan_flips_y_only() {
        let camera = Camera::default();
        let view = camera.get_view_matrix();
        let above = Vec3::new(0.5, 1.0, -5.0);

        let d3d = camera.get_projection_matrix(ClipSpace::Direct3D, 1600, 900).unwrap();
        let vk = camera.get_projection_matrix(ClipSpace::Vulkan, 1600, 900).unwrap();
        let d3d_ndc = to_ndc(&d3d, &view, above);
        let vk_ndc = to_ndc(&vk, &view, above);

        assert!(d3d_ndc.y > 0.0);
        assert!((vk_ndc.y + d3d_ndc.y).abs() < EPS);
        assert!((vk_ndc.x - d3d_ndc.x).abs() < EPS);
        assert!((vk_ndc.z - d3d_ndc.z).abs() < EPS);
    }

    #[test]
    fn aspect_ratio_squeezes_x() {
        let camera = Camera::default();
        let proj = camera.get_projection_matrix(ClipSpace::OpenGl, 1600, 900).unwrap();
        assert!((proj.m22 / proj.m11 - 1600.0 / 900.0).abs() < EPS);
    }
}
