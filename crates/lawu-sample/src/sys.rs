//! Low-level Vulkan bindings
//!
//! A trimmed, hand-written binding layer in the shape the generator reads:
//! one marker struct per native structure documented by its C declaration,
//! raw accessors over a [`Segment`], and the `vulkan_h` header module with
//! enumerators, flag bits and named element layouts.
//!
//! Offsets are those of a 64-bit target.

#![allow(non_camel_case_types, non_snake_case, non_upper_case_globals)]

use lawu_runtime::{Address, Layout, Segment};
use std::ffi::c_void;

pub type PFN_vkAllocationFunction = Option<
    unsafe extern "C" fn(
        p_user_data: *mut c_void,
        size: usize,
        alignment: usize,
        allocation_scope: i32,
    ) -> *mut c_void,
>;

pub type PFN_vkFreeFunction =
    Option<unsafe extern "C" fn(p_user_data: *mut c_void, p_memory: *mut c_void)>;

/// {@snippet :
/// typedef struct VkExtent2D {
///     uint32_t width;
///     uint32_t height;
/// } VkExtent2D;
/// }
pub struct VkExtent2D;

impl VkExtent2D {
    pub const LAYOUT: Layout = Layout::new(8, 4);

    pub fn width_get(seg: Segment<'_>) -> u32 {
        seg.get(0)
    }

    pub fn width_set(seg: Segment<'_>, value: u32) {
        seg.set(0, value)
    }

    pub fn height_get(seg: Segment<'_>) -> u32 {
        seg.get(4)
    }

    pub fn height_set(seg: Segment<'_>, value: u32) {
        seg.set(4, value)
    }
}

/// {@snippet :
/// typedef struct VkExtent3D {
///     uint32_t width;
///     uint32_t height;
///     uint32_t depth;
/// } VkExtent3D;
/// }
pub struct VkExtent3D;

impl VkExtent3D {
    pub const LAYOUT: Layout = Layout::new(12, 4);

    pub fn width_get(seg: Segment<'_>) -> u32 {
        seg.get(0)
    }

    pub fn width_set(seg: Segment<'_>, value: u32) {
        seg.set(0, value)
    }

    pub fn height_get(seg: Segment<'_>) -> u32 {
        seg.get(4)
    }

    pub fn height_set(seg: Segment<'_>, value: u32) {
        seg.set(4, value)
    }

    pub fn depth_get(seg: Segment<'_>) -> u32 {
        seg.get(8)
    }

    pub fn depth_set(seg: Segment<'_>, value: u32) {
        seg.set(8, value)
    }
}

/// {@snippet :
/// typedef struct VkOffset2D {
///     int32_t x;
///     int32_t y;
/// } VkOffset2D;
/// }
pub struct VkOffset2D;

impl VkOffset2D {
    pub const LAYOUT: Layout = Layout::new(8, 4);

    pub fn x_get(seg: Segment<'_>) -> i32 {
        seg.get(0)
    }

    pub fn x_set(seg: Segment<'_>, value: i32) {
        seg.set(0, value)
    }

    pub fn y_get(seg: Segment<'_>) -> i32 {
        seg.get(4)
    }

    pub fn y_set(seg: Segment<'_>, value: i32) {
        seg.set(4, value)
    }
}

/// {@snippet :
/// typedef struct VkRect2D {
///     VkOffset2D offset;
///     VkExtent2D extent;
/// } VkRect2D;
/// }
pub struct VkRect2D;

impl VkRect2D {
    pub const LAYOUT: Layout = Layout::new(16, 4);

    pub fn offset_slice(seg: Segment<'_>) -> Segment<'_> {
        seg.slice(0, 8)
    }

    pub fn extent_slice(seg: Segment<'_>) -> Segment<'_> {
        seg.slice(8, 8)
    }
}

/// {@snippet :
/// typedef struct VkQueueFamilyProperties {
///     VkQueueFlags queueFlags;
///     uint32_t queueCount;
///     uint32_t timestampValidBits;
///     VkExtent3D minImageTransferGranularity;
/// } VkQueueFamilyProperties;
/// }
pub struct VkQueueFamilyProperties;

impl VkQueueFamilyProperties {
    pub const LAYOUT: Layout = Layout::new(24, 4);

    pub fn queueFlags_get(seg: Segment<'_>) -> u32 {
        seg.get(0)
    }

    pub fn queueFlags_set(seg: Segment<'_>, value: u32) {
        seg.set(0, value)
    }

    pub fn queueCount_get(seg: Segment<'_>) -> u32 {
        seg.get(4)
    }

    pub fn queueCount_set(seg: Segment<'_>, value: u32) {
        seg.set(4, value)
    }

    pub fn timestampValidBits_get(seg: Segment<'_>) -> u32 {
        seg.get(8)
    }

    pub fn timestampValidBits_set(seg: Segment<'_>, value: u32) {
        seg.set(8, value)
    }

    pub fn minImageTransferGranularity_slice(seg: Segment<'_>) -> Segment<'_> {
        seg.slice(12, 12)
    }
}

/// {@snippet :
/// typedef struct VkExtensionProperties {
///     char extensionName[VK_MAX_EXTENSION_NAME_SIZE];
///     uint32_t specVersion;
/// } VkExtensionProperties;
/// }
pub struct VkExtensionProperties;

impl VkExtensionProperties {
    pub const LAYOUT: Layout = Layout::new(260, 4);

    pub fn extensionName_slice(seg: Segment<'_>) -> Segment<'_> {
        seg.slice(0, 256)
    }

    pub fn specVersion_get(seg: Segment<'_>) -> u32 {
        seg.get(256)
    }

    pub fn specVersion_set(seg: Segment<'_>, value: u32) {
        seg.set(256, value)
    }
}

/// {@snippet :
/// typedef struct VkPhysicalDeviceLimits {
///     uint32_t maxImageArrayLayers;
///     uint32_t maxComputeWorkGroupCount[3];
///     float pointSizeRange[2];
///     VkSampleCountFlags framebufferColorSampleCounts;
/// } VkPhysicalDeviceLimits;
/// }
pub struct VkPhysicalDeviceLimits;

impl VkPhysicalDeviceLimits {
    pub const LAYOUT: Layout = Layout::new(28, 4);

    pub fn maxImageArrayLayers_get(seg: Segment<'_>) -> u32 {
        seg.get(0)
    }

    pub fn maxImageArrayLayers_set(seg: Segment<'_>, value: u32) {
        seg.set(0, value)
    }

    pub fn maxComputeWorkGroupCount_slice(seg: Segment<'_>) -> Segment<'_> {
        seg.slice(4, 12)
    }

    pub fn pointSizeRange_slice(seg: Segment<'_>) -> Segment<'_> {
        seg.slice(16, 8)
    }

    pub fn framebufferColorSampleCounts_get(seg: Segment<'_>) -> u32 {
        seg.get(24)
    }

    pub fn framebufferColorSampleCounts_set(seg: Segment<'_>, value: u32) {
        seg.set(24, value)
    }
}

/// {@snippet :
/// typedef struct VkPhysicalDeviceProperties {
///     uint32_t apiVersion;
///     uint32_t driverVersion;
///     VkPhysicalDeviceType deviceType;
///     char deviceName[VK_MAX_PHYSICAL_DEVICE_NAME_SIZE];
///     uint8_t pipelineCacheUUID[VK_UUID_SIZE];
///     VkPhysicalDeviceLimits limits;
/// } VkPhysicalDeviceProperties;
/// }
pub struct VkPhysicalDeviceProperties;

impl VkPhysicalDeviceProperties {
    pub const LAYOUT: Layout = Layout::new(312, 4);

    pub fn apiVersion_get(seg: Segment<'_>) -> u32 {
        seg.get(0)
    }

    pub fn apiVersion_set(seg: Segment<'_>, value: u32) {
        seg.set(0, value)
    }

    pub fn driverVersion_get(seg: Segment<'_>) -> u32 {
        seg.get(4)
    }

    pub fn driverVersion_set(seg: Segment<'_>, value: u32) {
        seg.set(4, value)
    }

    pub fn deviceType_get(seg: Segment<'_>) -> i32 {
        seg.get(8)
    }

    pub fn deviceType_set(seg: Segment<'_>, value: i32) {
        seg.set(8, value)
    }

    pub fn deviceName_slice(seg: Segment<'_>) -> Segment<'_> {
        seg.slice(12, 256)
    }

    pub fn pipelineCacheUUID_slice(seg: Segment<'_>) -> Segment<'_> {
        seg.slice(268, 16)
    }

    pub fn limits_slice(seg: Segment<'_>) -> Segment<'_> {
        seg.slice(284, 28)
    }
}

/// {@snippet :
/// typedef struct VkPhysicalDeviceProperties2 {
///     VkStructureType sType;
///     void* pNext;
///     VkPhysicalDeviceProperties properties;
/// } VkPhysicalDeviceProperties2;
/// }
pub struct VkPhysicalDeviceProperties2;

impl VkPhysicalDeviceProperties2 {
    pub const LAYOUT: Layout = Layout::new(328, 8);

    pub fn sType_get(seg: Segment<'_>) -> i32 {
        seg.get(0)
    }

    pub fn sType_set(seg: Segment<'_>, value: i32) {
        seg.set(0, value)
    }

    pub fn pNext_get(seg: Segment<'_>) -> Address {
        seg.get_address(8)
    }

    pub fn pNext_set(seg: Segment<'_>, value: Address) {
        seg.set_address(8, value)
    }

    pub fn properties_slice(seg: Segment<'_>) -> Segment<'_> {
        seg.slice(16, 312)
    }
}

/// {@snippet :
/// typedef struct VkPhysicalDeviceMaintenance3Properties {
///     VkStructureType sType;
///     void* pNext;
///     uint32_t maxPerSetDescriptors;
///     VkDeviceSize maxMemoryAllocationSize;
/// } VkPhysicalDeviceMaintenance3Properties;
/// }
pub struct VkPhysicalDeviceMaintenance3Properties;

impl VkPhysicalDeviceMaintenance3Properties {
    pub const LAYOUT: Layout = Layout::new(32, 8);

    pub fn sType_get(seg: Segment<'_>) -> i32 {
        seg.get(0)
    }

    pub fn sType_set(seg: Segment<'_>, value: i32) {
        seg.set(0, value)
    }

    pub fn pNext_get(seg: Segment<'_>) -> Address {
        seg.get_address(8)
    }

    pub fn pNext_set(seg: Segment<'_>, value: Address) {
        seg.set_address(8, value)
    }

    pub fn maxPerSetDescriptors_get(seg: Segment<'_>) -> u32 {
        seg.get(16)
    }

    pub fn maxPerSetDescriptors_set(seg: Segment<'_>, value: u32) {
        seg.set(16, value)
    }

    pub fn maxMemoryAllocationSize_get(seg: Segment<'_>) -> u64 {
        seg.get(24)
    }

    pub fn maxMemoryAllocationSize_set(seg: Segment<'_>, value: u64) {
        seg.set(24, value)
    }
}

/// {@snippet :
/// typedef struct VkPhysicalDeviceGroupProperties {
///     VkStructureType sType;
///     void* pNext;
///     uint32_t physicalDeviceCount;
///     VkPhysicalDevice physicalDevices[VK_MAX_DEVICE_GROUP_SIZE];
///     VkBool32 subsetAllocation;
/// } VkPhysicalDeviceGroupProperties;
/// }
pub struct VkPhysicalDeviceGroupProperties;

impl VkPhysicalDeviceGroupProperties {
    pub const LAYOUT: Layout = Layout::new(288, 8);

    pub fn sType_get(seg: Segment<'_>) -> i32 {
        seg.get(0)
    }

    pub fn sType_set(seg: Segment<'_>, value: i32) {
        seg.set(0, value)
    }

    pub fn pNext_get(seg: Segment<'_>) -> Address {
        seg.get_address(8)
    }

    pub fn pNext_set(seg: Segment<'_>, value: Address) {
        seg.set_address(8, value)
    }

    pub fn physicalDeviceCount_get(seg: Segment<'_>) -> u32 {
        seg.get(16)
    }

    pub fn physicalDeviceCount_set(seg: Segment<'_>, value: u32) {
        seg.set(16, value)
    }

    pub fn physicalDevices_slice(seg: Segment<'_>) -> Segment<'_> {
        seg.slice(24, 256)
    }

    pub fn subsetAllocation_get(seg: Segment<'_>) -> u32 {
        seg.get(280)
    }

    pub fn subsetAllocation_set(seg: Segment<'_>, value: u32) {
        seg.set(280, value)
    }
}

/// {@snippet :
/// typedef struct VkMemoryType {
///     VkMemoryPropertyFlags propertyFlags;
///     uint32_t heapIndex;
/// } VkMemoryType;
/// }
pub struct VkMemoryType;

impl VkMemoryType {
    pub const LAYOUT: Layout = Layout::new(8, 4);

    pub fn propertyFlags_get(seg: Segment<'_>) -> u32 {
        seg.get(0)
    }

    pub fn propertyFlags_set(seg: Segment<'_>, value: u32) {
        seg.set(0, value)
    }

    pub fn heapIndex_get(seg: Segment<'_>) -> u32 {
        seg.get(4)
    }

    pub fn heapIndex_set(seg: Segment<'_>, value: u32) {
        seg.set(4, value)
    }
}

/// {@snippet :
/// typedef struct VkPhysicalDeviceMemoryProperties {
///     uint32_t memoryTypeCount;
///     VkMemoryType memoryTypes[VK_MAX_MEMORY_TYPES];
/// } VkPhysicalDeviceMemoryProperties;
/// }
pub struct VkPhysicalDeviceMemoryProperties;

impl VkPhysicalDeviceMemoryProperties {
    pub const LAYOUT: Layout = Layout::new(260, 4);

    pub fn memoryTypeCount_get(seg: Segment<'_>) -> u32 {
        seg.get(0)
    }

    pub fn memoryTypeCount_set(seg: Segment<'_>, value: u32) {
        seg.set(0, value)
    }

    pub fn memoryTypes_slice(seg: Segment<'_>) -> Segment<'_> {
        seg.slice(4, 256)
    }
}

/// {@snippet :
/// typedef struct VkAttachmentDescription {
///     VkFormat format;
///     VkSampleCountFlagBits samples;
/// } VkAttachmentDescription;
/// }
pub struct VkAttachmentDescription;

impl VkAttachmentDescription {
    pub const LAYOUT: Layout = Layout::new(8, 4);

    pub fn format_get(seg: Segment<'_>) -> i32 {
        seg.get(0)
    }

    pub fn format_set(seg: Segment<'_>, value: i32) {
        seg.set(0, value)
    }

    pub fn samples_get(seg: Segment<'_>) -> i32 {
        seg.get(4)
    }

    pub fn samples_set(seg: Segment<'_>, value: i32) {
        seg.set(4, value)
    }
}

/// {@snippet :
/// typedef struct VkAllocationCallbacks {
///     void* pUserData;
///     PFN_vkAllocationFunction pfnAllocation;
///     PFN_vkFreeFunction pfnFree;
/// } VkAllocationCallbacks;
/// }
pub struct VkAllocationCallbacks;

impl VkAllocationCallbacks {
    pub const LAYOUT: Layout = Layout::new(24, 8);

    pub fn pUserData_get(seg: Segment<'_>) -> Address {
        seg.get_address(0)
    }

    pub fn pUserData_set(seg: Segment<'_>, value: Address) {
        seg.set_address(0, value)
    }

    pub fn pfnAllocation_get(seg: Segment<'_>) -> Address {
        seg.get_address(8)
    }

    pub fn pfnAllocation_set(seg: Segment<'_>, value: Address) {
        seg.set_address(8, value)
    }

    pub fn pfnFree_get(seg: Segment<'_>) -> Address {
        seg.get_address(16)
    }

    pub fn pfnFree_set(seg: Segment<'_>, value: Address) {
        seg.set_address(16, value)
    }
}

/// {@snippet :
/// typedef struct VkDebugUtilsLabelEXT {
///     VkStructureType sType;
///     const void* pNext;
///     const char* pLabelName;
///     float color[4];
/// } VkDebugUtilsLabelEXT;
/// }
pub struct VkDebugUtilsLabelEXT;

impl VkDebugUtilsLabelEXT {
    pub const LAYOUT: Layout = Layout::new(40, 8);
}

pub mod vulkan_h {
    use lawu_runtime::layout;
    use lawu_runtime::{AddressLayout, ValueLayout};

    pub const uint8_t: ValueLayout<u8> = layout::U8;
    pub const uint32_t: ValueLayout<u32> = layout::U32;
    pub const VkPhysicalDevice: AddressLayout = layout::ADDRESS;

    /// {@snippet :
    /// #define VK_MAX_EXTENSION_NAME_SIZE 256U
    /// }
    pub const VK_MAX_EXTENSION_NAME_SIZE: i32 = 256;

    /// {@snippet :
    /// #define VK_UUID_SIZE 16U
    /// }
    pub const VK_UUID_SIZE: i32 = 16;

    /// {@snippet :
    /// enum VkStructureType.VK_STRUCTURE_TYPE_PHYSICAL_DEVICE_PROPERTIES_2 = 1000059001;
    /// }
    pub const VK_STRUCTURE_TYPE_PHYSICAL_DEVICE_PROPERTIES_2: i32 = 1000059001;

    /// {@snippet :
    /// enum VkStructureType.VK_STRUCTURE_TYPE_PHYSICAL_DEVICE_GROUP_PROPERTIES = 1000070000;
    /// }
    pub const VK_STRUCTURE_TYPE_PHYSICAL_DEVICE_GROUP_PROPERTIES: i32 = 1000070000;

    /// {@snippet :
    /// enum VkStructureType.VK_STRUCTURE_TYPE_PHYSICAL_DEVICE_MAINTENANCE_3_PROPERTIES = 1000168000;
    /// }
    pub const VK_STRUCTURE_TYPE_PHYSICAL_DEVICE_MAINTENANCE_3_PROPERTIES: i32 = 1000168000;

    /// {@snippet :
    /// enum VkPhysicalDeviceType.VK_PHYSICAL_DEVICE_TYPE_OTHER = 0;
    /// }
    pub const VK_PHYSICAL_DEVICE_TYPE_OTHER: i32 = 0;

    /// {@snippet :
    /// enum VkPhysicalDeviceType.VK_PHYSICAL_DEVICE_TYPE_INTEGRATED_GPU = 1;
    /// }
    pub const VK_PHYSICAL_DEVICE_TYPE_INTEGRATED_GPU: i32 = 1;

    /// {@snippet :
    /// enum VkPhysicalDeviceType.VK_PHYSICAL_DEVICE_TYPE_DISCRETE_GPU = 2;
    /// }
    pub const VK_PHYSICAL_DEVICE_TYPE_DISCRETE_GPU: i32 = 2;

    /// {@snippet :
    /// enum VkPhysicalDeviceType.VK_PHYSICAL_DEVICE_TYPE_CPU = 4;
    /// }
    pub const VK_PHYSICAL_DEVICE_TYPE_CPU: i32 = 4;

    /// {@snippet :
    /// enum VkFormat.VK_FORMAT_UNDEFINED = 0;
    /// }
    pub const VK_FORMAT_UNDEFINED: i32 = 0;

    /// {@snippet :
    /// enum VkFormat.VK_FORMAT_R8G8B8A8_UNORM = 37;
    /// }
    pub const VK_FORMAT_R8G8B8A8_UNORM: i32 = 37;

    /// {@snippet :
    /// enum VkFormat.VK_FORMAT_B8G8R8A8_SRGB = 50;
    /// }
    pub fn VK_FORMAT_B8G8R8A8_SRGB() -> i32 {
        50
    }

    /// {@snippet :
    /// enum VkQueueFlagBits.VK_QUEUE_GRAPHICS_BIT = 1;
    /// }
    pub const VK_QUEUE_GRAPHICS_BIT: i32 = 1;

    /// {@snippet :
    /// enum VkQueueFlagBits.VK_QUEUE_COMPUTE_BIT = 2;
    /// }
    pub const VK_QUEUE_COMPUTE_BIT: i32 = 2;

    /// {@snippet :
    /// enum VkQueueFlagBits.VK_QUEUE_TRANSFER_BIT = 4;
    /// }
    pub const VK_QUEUE_TRANSFER_BIT: i32 = 4;

    /// {@snippet :
    /// enum VkQueueFlagBits.VK_QUEUE_SPARSE_BINDING_BIT = 8;
    /// }
    pub const VK_QUEUE_SPARSE_BINDING_BIT: i32 = 8;

    /// {@snippet :
    /// enum VkSampleCountFlagBits.VK_SAMPLE_COUNT_1_BIT = 1;
    /// }
    pub const VK_SAMPLE_COUNT_1_BIT: i32 = 1;

    /// {@snippet :
    /// enum VkSampleCountFlagBits.VK_SAMPLE_COUNT_4_BIT = 4;
    /// }
    pub const VK_SAMPLE_COUNT_4_BIT: i32 = 4;

    /// {@snippet :
    /// enum VkSampleCountFlagBits.VK_SAMPLE_COUNT_64_BIT = 64;
    /// }
    pub const VK_SAMPLE_COUNT_64_BIT: i32 = 64;

    /// {@snippet :
    /// enum VkMemoryPropertyFlagBits.VK_MEMORY_PROPERTY_DEVICE_LOCAL_BIT = 1;
    /// }
    pub const VK_MEMORY_PROPERTY_DEVICE_LOCAL_BIT: i32 = 1;

    /// {@snippet :
    /// enum VkMemoryPropertyFlagBits.VK_MEMORY_PROPERTY_HOST_VISIBLE_BIT = 2;
    /// }
    pub const VK_MEMORY_PROPERTY_HOST_VISIBLE_BIT: i32 = 2;

    /// {@snippet :
    /// enum VkMemoryPropertyFlagBits.VK_MEMORY_PROPERTY_HOST_COHERENT_BIT = 4;
    /// }
    pub const VK_MEMORY_PROPERTY_HOST_COHERENT_BIT: i32 = 4;

    /// {@snippet :
    /// enum VkDebugUtilsMessageSeverityFlagBitsEXT.VK_DEBUG_UTILS_MESSAGE_SEVERITY_VERBOSE_BIT_EXT = 1;
    /// }
    pub const VK_DEBUG_UTILS_MESSAGE_SEVERITY_VERBOSE_BIT_EXT: i32 = 1;
}
