use crate::util::platform::SurfaceContainer;
use crate::util::result::{Result, VulkanError};

use log::debug;

use ash::version::{DeviceV1_0, InstanceV1_0};
use ash::vk;

/// What a single queue family offers, reduced to the two things the cube needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueueFamilyCapabilities {
    pub index: u32,
    pub graphics: bool,
    pub present: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueueFamilyIndices {
    pub graphics_family: u32,
    pub present_family: u32,
}

pub struct Queues {
    pub graphics_queue: vk::Queue,
    pub present_queue: vk::Queue,
}

impl QueueFamilyIndices {
    pub fn find(
        instance: &ash::Instance,
        physical_device: vk::PhysicalDevice,
        surface: &SurfaceContainer,
    ) -> Result<Self> {
        let device_queue_families =
            unsafe { instance.get_physical_device_queue_family_properties(physical_device) };

        let mut capabilities = Vec::with_capacity(device_queue_families.len());
        for (index, queue_family) in device_queue_families.iter().enumerate() {
            if queue_family.queue_count == 0 {
                continue;
            }
            let index = index as u32;
            capabilities.push(QueueFamilyCapabilities {
                index,
                graphics: queue_family.queue_flags.contains(vk::QueueFlags::GRAPHICS),
                present: has_present_function(surface, physical_device, index)?,
            });
        }
        debug!("Queue family capabilities: {:?}", capabilities);

        Self::select(&capabilities).ok_or(VulkanError::QueueCreationFailed)
    }

    /// A family that does both is preferred since it avoids concurrent sharing of swap chain images.
    pub fn select(capabilities: &[QueueFamilyCapabilities]) -> Option<Self> {
        if let Some(both) = capabilities.iter().find(|c| c.graphics && c.present) {
            return Some(Self {
                graphics_family: both.index,
                present_family: both.index,
            });
        }
        let graphics = capabilities.iter().find(|c| c.graphics)?;
        let present = capabilities.iter().find(|c| c.present)?;
        Some(Self {
            graphics_family: graphics.index,
            present_family: present.index,
        })
    }

    pub fn unique_families(&self) -> Vec<u32> {
        if self.graphics_family == self.present_family {
            vec![self.graphics_family]
        } else {
            vec![self.graphics_family, self.present_family]
        }
    }

    pub fn get_image_sharing_details(&self) -> (vk::SharingMode, Vec<u32>) {
        let indices_needed = self.unique_families();
        if indices_needed.len() > 1 {
            (vk::SharingMode::CONCURRENT, indices_needed)
        } else {
            (vk::SharingMode::EXCLUSIVE, Vec::new())
        }
    }
}

pub fn create_queues(queue_indices: &QueueFamilyIndices, logical_device: &ash::Device) -> Queues {
    unsafe {
        Queues {
            graphics_queue: logical_device.get_device_queue(queue_indices.graphics_family, 0),
            present_queue: logical_device.get_device_queue(queue_indices.present_family, 0),
        }
    }
}

pub fn has_present_function(
    surface: &SurfaceContainer,
    physical_device: vk::PhysicalDevice,
    queue_family_index: u32,
) -> Result<bool> {
    let is_present_support = unsafe {
        surface.surface_loader.get_physical_device_surface_support(
            physical_device,
            queue_family_index,
            surface.surface,
        )
    }?;
    Ok(is_present_support)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family(index: u32, graphics: bool, present: bool) -> QueueFamilyCapabilities {
        QueueFamilyCapabilities {
            index,
            graphics,
            present,
        }
    }

    #[test]
    fn prefers_family_with_both_capabilities() {
        let families = [family(0, true, false), family(1, false, true), family(2, true, true)];
        let indices = QueueFamilyIndices::select(&families).unwrap();
        assert_eq!(indices.graphics_family, 2);
        assert_eq!(indices.present_family, 2);
        assert_eq!(
            indices.get_image_sharing_details(),
            (vk::SharingMode::EXCLUSIVE, vec![])
        );
    }

    #[test]
    fn split_families_share_concurrently() {
        let families = [family(0, true, false), family(3, false, true)];
        let indices = QueueFamilyIndices::select(&families).unwrap();
        assert_eq!(indices.graphics_family, 0);
        assert_eq!(indices.present_family, 3);
        assert_eq!(
            indices.get_image_sharing_details(),
            (vk::SharingMode::CONCURRENT, vec![0, 3])
        );
    }

    #[test]
    fn missing_capability_selects_nothing() {
        assert!(QueueFamilyIndices::select(&[family(0, true, false)]).is_none());
        assert!(QueueFamilyIndices::select(&[family(0, false, true)]).is_none());
        assert!(QueueFamilyIndices::select(&[]).is_none());
    }
}
