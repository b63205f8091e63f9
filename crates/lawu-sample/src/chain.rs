//! Next-chain readers for the structures this crate knows how to extend

use crate::sys::{vulkan_h, VkPhysicalDeviceMaintenance3Properties};
use crate::vk::{
    PhysicalDeviceMaintenance3Properties, PhysicalDeviceProperties2Next,
    PHYSICAL_DEVICE_PROPERTIES2_NEXT,
};
use lawu_runtime::{NextReader, RawError, Segment, Structure};
use linkme::distributed_slice;

impl PhysicalDeviceProperties2Next for PhysicalDeviceMaintenance3Properties {}

// Items are read without their own link; the parent's walk already covers it
fn read_maintenance3(raw: Segment<'_>) -> Result<Box<dyn PhysicalDeviceProperties2Next>, RawError> {
    Ok(Box::new(PhysicalDeviceMaintenance3Properties::of(raw)?))
}

#[distributed_slice(PHYSICAL_DEVICE_PROPERTIES2_NEXT)]
static MAINTENANCE3_PROPERTIES: NextReader<dyn PhysicalDeviceProperties2Next> = NextReader::new(
    vulkan_h::VK_STRUCTURE_TYPE_PHYSICAL_DEVICE_MAINTENANCE_3_PROPERTIES,
    VkPhysicalDeviceMaintenance3Properties::LAYOUT,
    read_maintenance3,
);
