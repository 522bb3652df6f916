use glm::Mat4;

use crate::{
    camera::{Camera, ClipSpace},
    rotation::CubeRotation,
};
//////////////////////// Consts ///////////////////////
/// Distance the cube is pushed down -z so the camera at the origin sees all of it.
pub const MODEL_TRANSLATION: [f32; 3] = [0.0, 0.0, -5.0];
//////////////////////// Structs ///////////////////////
/// The per frame shader block. Three column-major mat4s, so 16 byte alignment falls out naturally
/// and the layout matches both std140 and HLSL cbuffer packing.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UniformBufferObject {
    pub model: Mat4,
    pub view: Mat4,
    pub proj: Mat4,
}
//////////////////////// Impls ///////////////////////
impl UniformBufferObject {
    /// Matrices for the current rotation. `None` while the target image has no area.
    pub fn for_frame(
        camera: &Camera,
        clip_space: ClipSpace,
        rotation: &CubeRotation,
        image_width: u32,
        image_height: u32,
    ) -> Option<Self> {
        let proj = camera.get_projection_matrix(clip_space, image_width, image_height)?;
        Some(Self {
            model: model_matrix(rotation),
            view: camera.get_view_matrix(),
            proj,
        })
    }
}
//////////////////////// Fns ///////////////////////
pub fn model_matrix(rotation: &CubeRotation) -> Mat4 {
    let translated = glm::translate(
        &Mat4::identity(),
        &glm::Vec3::new(
            MODEL_TRANSLATION[0],
            MODEL_TRANSLATION[1],
            MODEL_TRANSLATION[2],
        ),
    );
    glm::rotate(&translated, rotation.angle(), &CubeRotation::axis())
}

/// Writes `src` to mapped GPU memory.
///
/// # Safety
/// `memory_data_target_ptr` must point to at least `size_of::<T>()` writable bytes that do not overlap `src`.
pub unsafe fn copy_uniform_to_memory<T>(src: &T, memory_data_target_ptr: *mut core::ffi::c_void)
where
    T: Sized,
{
    let target_ptr = memory_data_target_ptr as *mut T;
    target_ptr.copy_from_nonoverlapping(src as *const T, 1);
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn block_is_three_packed_matrices() {
        assert_eq!(std::mem::size_of::<UniformBufferObject>(), 192);
    }

    #[test]
    fn unrotated_model_only_translates() {
        let model = model_matrix(&CubeRotation::new());
        let center = model * glm::vec4(0.0, 0.0, 0.0, 1.0);
        assert!((center.z + 5.0).abs() < EPS);
        let corner = model * glm::vec4(1.0, 1.0, 1.0, 1.0);
        assert!((corner.x - 1.0).abs() < EPS);
        assert!((corner.y - 1.0).abs() < EPS);
        assert!((corner.z + 4.0).abs() < EPS);
    }

    #[test]
    fn rotation_keeps_cube_centered_and_axis_fixed() {
        let mut rotation = CubeRotation::new();
        rotation.advance(1.3);
        let model = model_matrix(&rotation);

        let center = model * glm::vec4(0.0, 0.0, 0.0, 1.0);
        assert!(center.x.abs() < EPS && center.y.abs() < EPS);
        assert!((center.z + 5.0).abs() < EPS);

        let axis = CubeRotation::axis();
        let on_axis = model * glm::vec4(axis.x, axis.y, axis.z, 1.0);
        assert!((on_axis.x - axis.x).abs() < EPS);
        assert!((on_axis.y - axis.y).abs() < EPS);
        assert!((on_axis.z - (axis.z - 5.0)).abs() < EPS);
    }

    #[test]
    fn frame_block_skips_minimized_images() {
        let camera = Camera::default();
        let rotation = CubeRotation::new();
        assert!(UniformBufferObject::for_frame(&camera, ClipSpace::Vulkan, &rotation, 0, 0).is_none());
        let ubo =
            UniformBufferObject::for_frame(&camera, ClipSpace::Vulkan, &rotation, 1600, 900).unwrap();
        assert!(ubo.proj.m22 < 0.0);
    }

    #[test]
    fn copy_writes_whole_block() {
        let camera = Camera::default();
        let ubo = UniformBufferObject::for_frame(
            &camera,
            ClipSpace::OpenGl,
            &CubeRotation::new(),
            800,
            600,
        )
        .unwrap();
        let mut target = [0f32; 48];
        unsafe { copy_uniform_to_memory(&ubo, target.as_mut_ptr() as *mut core::ffi::c_void) };
        assert_eq!(&target[0..16], ubo.model.as_slice());
        assert_eq!(&target[32..48], ubo.proj.as_slice());
    }
}
