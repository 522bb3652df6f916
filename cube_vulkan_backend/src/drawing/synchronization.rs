use crate::util::result::Result;

use ash::version::DeviceV1_0;
use ash::vk;

use std::collections::HashMap;

pub const MAX_FRAMES_IN_FLIGHT: usize = 2;

/// Semaphores and fences for the frames in flight.
///
/// Per frame slot there is an image-available semaphore (signalled by acquire, waited on by submit),
/// a render-finished semaphore (signalled by submit, waited on by present) and an in-flight fence
/// (signalled when the frame's commands finish). Each swap chain image also remembers the fence of
/// the frame that last rendered to it, because acquire can hand out images out of order.
pub struct SynchronizationContainer {
    image_available_semaphores: [vk::Semaphore; MAX_FRAMES_IN_FLIGHT],
    render_finished_semaphores: [vk::Semaphore; MAX_FRAMES_IN_FLIGHT],
    in_flight_fences: [vk::Fence; MAX_FRAMES_IN_FLIGHT],
    images_in_flight_fences: HashMap<u32, vk::Fence>,
    current_frame_idx: usize,
}

impl SynchronizationContainer {
    pub fn create(logical_device: &ash::Device) -> Result<Self> {
        let semaphore_create_info = vk::SemaphoreCreateInfo::default();
        let fence_create_info = vk::FenceCreateInfo {
            // create fence in signalled state so the very first wait returns
            flags: vk::FenceCreateFlags::SIGNALED,
            ..Default::default()
        };

        let mut image_available_semaphores = [vk::Semaphore::null(); MAX_FRAMES_IN_FLIGHT];
        let mut render_finished_semaphores = [vk::Semaphore::null(); MAX_FRAMES_IN_FLIGHT];
        let mut in_flight_fences = [vk::Fence::null(); MAX_FRAMES_IN_FLIGHT];

        for i in 0..MAX_FRAMES_IN_FLIGHT {
            unsafe {
                image_available_semaphores[i] =
                    logical_device.create_semaphore(&semaphore_create_info, None)?;
                render_finished_semaphores[i] =
                    logical_device.create_semaphore(&semaphore_create_info, None)?;
                in_flight_fences[i] = logical_device.create_fence(&fence_create_info, None)?;
            }
        }

        Ok(Self::from_handles(
            image_available_semaphores,
            render_finished_semaphores,
            in_flight_fences,
        ))
    }

    pub fn from_handles(
        image_available_semaphores: [vk::Semaphore; MAX_FRAMES_IN_FLIGHT],
        render_finished_semaphores: [vk::Semaphore; MAX_FRAMES_IN_FLIGHT],
        in_flight_fences: [vk::Fence; MAX_FRAMES_IN_FLIGHT],
    ) -> Self {
        Self {
            image_available_semaphores,
            render_finished_semaphores,
            in_flight_fences,
            images_in_flight_fences: HashMap::new(),
            current_frame_idx: 0,
        }
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame_idx
    }

    pub fn update_frame_counter(&mut self) {
        self.current_frame_idx = (self.current_frame_idx + 1) % MAX_FRAMES_IN_FLIGHT
    }

    pub fn get_image_available_semaphore(&self) -> vk::Semaphore {
        self.image_available_semaphores[self.current_frame_idx]
    }

    pub fn get_render_finished_semaphore(&self) -> vk::Semaphore {
        self.render_finished_semaphores[self.current_frame_idx]
    }

    pub fn get_in_flight_fence(&self) -> vk::Fence {
        self.in_flight_fences[self.current_frame_idx]
    }

    /// Hands the image to the current frame. Returns the fence of another frame that is still
    /// using the image, which must be waited on before recording into it again.
    pub fn claim_image(&mut self, image_index: u32) -> Option<vk::Fence> {
        let current_fence = self.get_in_flight_fence();
        let previous = self.images_in_flight_fences.insert(image_index, current_fence);
        previous.filter(|&fence| fence != vk::Fence::null() && fence != current_fence)
    }

    /// New swap chain images have not been used by any frame.
    pub fn forget_images(&mut self) {
        self.images_in_flight_fences.clear();
    }

    /// # Safety
    ///
    /// The device must be idle, none of the semaphores or fences may still be in use.
    pub unsafe fn destroy(&self, logical_device: &ash::Device) {
        for &semaphore in self
            .image_available_semaphores
            .iter()
            .chain(self.render_finished_semaphores.iter())
        {
            logical_device.destroy_semaphore(semaphore, None);
        }
        for &fence in self.in_flight_fences.iter() {
            logical_device.destroy_fence(fence, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ash::vk::Handle;

    fn container() -> SynchronizationContainer {
        SynchronizationContainer::from_handles(
            [vk::Semaphore::from_raw(1), vk::Semaphore::from_raw(2)],
            [vk::Semaphore::from_raw(3), vk::Semaphore::from_raw(4)],
            [vk::Fence::from_raw(10), vk::Fence::from_raw(20)],
        )
    }

    #[test]
    fn frame_counter_wraps_at_two() {
        let mut sync = container();
        assert_eq!(sync.current_frame(), 0);
        sync.update_frame_counter();
        assert_eq!(sync.current_frame(), 1);
        sync.update_frame_counter();
        assert_eq!(sync.current_frame(), 0);
    }

    #[test]
    fn primitives_follow_current_frame() {
        let mut sync = container();
        assert_eq!(sync.get_image_available_semaphore().as_raw(), 1);
        assert_eq!(sync.get_render_finished_semaphore().as_raw(), 3);
        assert_eq!(sync.get_in_flight_fence().as_raw(), 10);
        sync.update_frame_counter();
        assert_eq!(sync.get_image_available_semaphore().as_raw(), 2);
        assert_eq!(sync.get_render_finished_semaphore().as_raw(), 4);
        assert_eq!(sync.get_in_flight_fence().as_raw(), 20);
    }

    #[test]
    fn image_used_by_other_frame_must_be_waited_on() {
        let mut sync = container();
        // frame 0 renders image 2
        assert_eq!(sync.claim_image(2), None);
        sync.update_frame_counter();
        // frame 1 gets image 2 handed back out of order
        assert_eq!(sync.claim_image(2), Some(vk::Fence::from_raw(10)));
        // and frame 1 now owns it
        assert_eq!(sync.claim_image(2), None);
    }

    #[test]
    fn recreated_swap_chain_images_start_free() {
        let mut sync = container();
        sync.claim_image(0);
        sync.update_frame_counter();
        sync.forget_images();
        assert_eq!(sync.claim_image(0), None);
    }
}
