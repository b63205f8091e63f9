use lawu_runtime::next::HEADER;
use lawu_runtime::{
    Address, Arena, BitFlag, FlagSet, Layout, NextReader, NextStructure, RawError, Segment,
    SegmentAllocator, Structure,
};
use lawu_sample::sys::{self, vulkan_h};
use lawu_sample::vk::{self, *};
use lawu_sample::PipelineCacheUuid;
use linkme::distributed_slice;
use pretty_assertions::assert_eq;
use std::ffi::c_void;

fn limits() -> PhysicalDeviceLimits {
    PhysicalDeviceLimits {
        max_image_array_layers: 2048,
        max_compute_work_group_count: vec![65535, 65535, 65535],
        point_size_range: vec![1.0, 64.0],
        framebuffer_color_sample_counts: [SampleCountFlag::One, SampleCountFlag::Four]
            .into_iter()
            .collect(),
    }
}

fn properties() -> PhysicalDeviceProperties {
    PhysicalDeviceProperties {
        api_version: 4206592,
        driver_version: 1,
        device_type: PhysicalDeviceType::DiscreteGpu,
        device_name: "Lawu Virtual GPU".to_string(),
        pipeline_cache_uuid: PipelineCacheUuid([7; 16]),
        limits: limits(),
    }
}

#[test]
fn test_scalar_structure_round_trip() {
    let arena = Arena::new();
    let extent = Extent2d {
        width: 1920,
        height: 1080,
    };
    let raw = extent.as_raw(&arena).unwrap();

    assert_eq!(raw.len(), sys::VkExtent2D::LAYOUT.size());
    assert_eq!(sys::VkExtent2D::width_get(raw), 1920);
    assert_eq!(Extent2d::of(raw).unwrap(), extent);
}

#[test]
fn test_nested_structures() {
    let arena = Arena::new();
    let rect = Rect2d {
        offset: Offset2d { x: -16, y: 32 },
        extent: Extent2d {
            width: 800,
            height: 600,
        },
    };
    let raw = rect.as_raw(&arena).unwrap();

    let view = Rect2dNative::new(raw);
    assert_eq!(view.offset().unwrap(), Offset2d { x: -16, y: 32 });
    assert_eq!(view.extent().unwrap().height, 600);
    assert_eq!(view.to_value().unwrap(), rect);
}

#[test]
fn test_flag_set_member() {
    let arena = Arena::new();
    let family = QueueFamilyProperties {
        queue_flags: FlagSet::from(QueueFlag::Graphics).with(QueueFlag::Transfer),
        queue_count: 16,
        timestamp_valid_bits: 64,
        min_image_transfer_granularity: Extent3d {
            width: 1,
            height: 1,
            depth: 1,
        },
    };
    let raw = family.as_raw(&arena).unwrap();

    assert_eq!(sys::VkQueueFamilyProperties::queueFlags_get(raw), 0b101);
    let read = QueueFamilyProperties::of(raw).unwrap();
    assert!(read.queue_flags.contains(QueueFlag::Graphics));
    assert!(!read.queue_flags.contains(QueueFlag::Compute));
    assert_eq!(read, family);
}

#[test]
fn test_unknown_flag_bits_survive() {
    let arena = Arena::new();
    let raw = arena.allocate(sys::VkQueueFamilyProperties::LAYOUT);
    sys::VkQueueFamilyProperties::queueFlags_set(raw, 0x1 | 0x100);

    let family = QueueFamilyProperties::of(raw).unwrap();
    assert_eq!(family.queue_flags.bits(), 0x101);
    assert_eq!(family.queue_flags.unknown_bits(), 0x100);
}

#[test]
fn test_flag_enum() {
    assert_eq!(QueueFlag::ALL.len(), 4);
    assert_eq!(QueueFlag::SparseBinding.bit(), 8);
    assert_eq!(QueueFlag::of_bit(2), Ok(QueueFlag::Compute));
    assert_eq!(
        QueueFlag::of_bit(16),
        Err(RawError::UnknownValue {
            type_name: "QueueFlag",
            value: 16
        })
    );
    assert_eq!(SampleCountFlag::SixtyFour.bit(), 64);
    assert_eq!(MemoryPropertyFlag::HostCoherent.bit(), 4);
}

#[test]
fn test_value_enum() {
    assert_eq!(PhysicalDeviceType::Cpu.value(), vulkan_h::VK_PHYSICAL_DEVICE_TYPE_CPU);
    assert_eq!(PhysicalDeviceType::of(1), Ok(PhysicalDeviceType::IntegratedGpu));
    assert_eq!(Format::B8g8r8a8Srgb.value(), 50);
    assert_eq!(Format::of(37), Ok(Format::R8g8b8a8Unorm));
    assert_eq!(
        Format::ALL,
        &[Format::Undefined, Format::R8g8b8a8Unorm, Format::B8g8r8a8Srgb]
    );
    assert!(matches!(
        PhysicalDeviceType::of(3),
        Err(RawError::UnknownValue { type_name: "PhysicalDeviceType", value: 3 })
    ));
}

#[test]
fn test_enum_members() {
    let arena = Arena::new();
    let attachment = AttachmentDescription {
        format: Format::R8g8b8a8Unorm,
        samples: SampleCountFlag::Four,
    };
    let raw = attachment.as_raw(&arena).unwrap();
    assert_eq!(sys::VkAttachmentDescription::format_get(raw), 37);
    assert_eq!(sys::VkAttachmentDescription::samples_get(raw), 4);
    assert_eq!(AttachmentDescription::of(raw).unwrap(), attachment);

    sys::VkAttachmentDescription::samples_set(raw, 3);
    assert_eq!(
        AttachmentDescription::of(raw),
        Err(RawError::UnknownValue {
            type_name: "SampleCountFlag",
            value: 3
        })
    );
}

#[test]
fn test_text_member() {
    let arena = Arena::new();
    let extension = ExtensionProperties {
        extension_name: "VK_KHR_surface".to_string(),
        spec_version: 25,
    };
    let raw = extension.as_raw(&arena).unwrap();

    let view = ExtensionPropertiesNative::new(raw);
    assert_eq!(view.extension_name().unwrap(), "VK_KHR_surface");
    assert_eq!(view.spec_version(), 25);

    let too_long = ExtensionProperties {
        extension_name: "x".repeat(256),
        spec_version: 1,
    };
    assert_eq!(
        too_long.as_raw(&arena).unwrap_err(),
        RawError::TextTooLong {
            len: 256,
            capacity: 255
        }
    );
}

#[test]
fn test_primitive_arrays() {
    let arena = Arena::new();
    let raw = limits().as_raw(&arena).unwrap();

    let view = PhysicalDeviceLimitsNative::new(raw);
    assert_eq!(view.max_compute_work_group_count(), vec![65535, 65535, 65535]);
    assert_eq!(view.point_size_range(), vec![1.0, 64.0]);
    assert_eq!(view.framebuffer_color_sample_counts().bits(), 0b101);

    let short = PhysicalDeviceLimits {
        point_size_range: vec![1.0],
        ..limits()
    };
    assert_eq!(
        short.as_raw(&arena).unwrap_err(),
        RawError::LengthMismatch {
            expected: 2,
            found: 1
        }
    );
}

#[test]
fn test_mapped_member_and_nested_arrays() {
    let arena = Arena::new();
    let raw = properties().as_raw(&arena).unwrap();

    let read = PhysicalDeviceProperties::of(raw).unwrap();
    assert_eq!(read.pipeline_cache_uuid, PipelineCacheUuid([7; 16]));
    assert_eq!(read.device_name, "Lawu Virtual GPU");
    assert_eq!(read, properties());
}

#[test]
fn test_structure_arrays() {
    let arena = Arena::new();
    let mut memory_types = vec![
        MemoryType {
            property_flags: FlagSet::empty(),
            heap_index: 0,
        };
        32
    ];
    memory_types[0] = MemoryType {
        property_flags: FlagSet::from(MemoryPropertyFlag::DeviceLocal),
        heap_index: 1,
    };
    let memory = PhysicalDeviceMemoryProperties {
        memory_type_count: 1,
        memory_types,
    };
    let raw = memory.as_raw(&arena).unwrap();
    assert_eq!(PhysicalDeviceMemoryProperties::of(raw).unwrap(), memory);

    let short = PhysicalDeviceMemoryProperties {
        memory_type_count: 0,
        memory_types: Vec::new(),
    };
    assert_eq!(
        short.as_raw(&arena).unwrap_err(),
        RawError::LengthMismatch {
            expected: 32,
            found: 0
        }
    );
}

#[test]
fn test_handle_array() {
    let arena = Arena::new();
    let mut physical_devices = vec![Address::NULL; 32];
    physical_devices[0] = Address::new(0x1000);
    let group = PhysicalDeviceGroupProperties {
        s_type: StructureType::PhysicalDeviceGroupProperties,
        next: Vec::new(),
        physical_device_count: 1,
        physical_devices,
        subset_allocation: 0,
    };
    let raw = group.as_raw(&arena).unwrap();

    let view = PhysicalDeviceGroupPropertiesNative::new(raw);
    assert_eq!(view.physical_devices()[0], Address::new(0x1000));
    assert!(view.physical_devices()[1].is_null());
    assert_eq!(view.s_type().unwrap(), StructureType::PhysicalDeviceGroupProperties);
}

#[test]
fn test_next_chain_round_trip() {
    let arena = Arena::new();
    let maintenance = PhysicalDeviceMaintenance3Properties {
        s_type: StructureType::PhysicalDeviceMaintenance3Properties,
        next: Vec::new(),
        max_per_set_descriptors: 1024,
        max_memory_allocation_size: 1 << 32,
    };
    let properties2 = PhysicalDeviceProperties2 {
        s_type: StructureType::PhysicalDeviceProperties2,
        next: vec![Box::new(maintenance)],
        properties: properties(),
    };
    let raw = properties2.as_raw(&arena).unwrap();

    let head = sys::VkPhysicalDeviceProperties2::pNext_get(raw);
    assert!(!head.is_null());

    let read = unsafe { PhysicalDeviceProperties2::of_with_chain(raw) }.unwrap();
    assert_eq!(read.s_type, StructureType::PhysicalDeviceProperties2);
    assert_eq!(read.properties, properties());
    assert_eq!(read.next.len(), 1);
    assert_eq!(
        read.next[0].structure_type(),
        vulkan_h::VK_STRUCTURE_TYPE_PHYSICAL_DEVICE_MAINTENANCE_3_PROPERTIES
    );
    let debug = format!("{:?}", read.next[0]);
    assert!(debug.contains("max_per_set_descriptors: 1024"));
}

#[test]
fn test_next_chain_skips_unregistered_structures() {
    let arena = Arena::new();
    let group = PhysicalDeviceGroupProperties {
        s_type: StructureType::PhysicalDeviceGroupProperties,
        next: Vec::new(),
        physical_device_count: 0,
        physical_devices: vec![Address::NULL; 32],
        subset_allocation: 1,
    };
    let node = group.as_raw(&arena).unwrap();

    let properties2 = PhysicalDeviceProperties2 {
        s_type: StructureType::PhysicalDeviceProperties2,
        next: Vec::new(),
        properties: properties(),
    };
    let raw = properties2.as_raw(&arena).unwrap();
    sys::VkPhysicalDeviceProperties2::pNext_set(raw, node.address());

    let read = unsafe { PhysicalDeviceProperties2::of_with_chain(raw) }.unwrap();
    assert!(read.next.is_empty());
}

#[test]
fn test_next_chain_cycle() {
    let arena = Arena::new();
    let maintenance = PhysicalDeviceMaintenance3Properties {
        s_type: StructureType::PhysicalDeviceMaintenance3Properties,
        next: Vec::new(),
        max_per_set_descriptors: 1,
        max_memory_allocation_size: 1,
    };
    let node = maintenance.as_raw(&arena).unwrap();
    sys::VkPhysicalDeviceMaintenance3Properties::pNext_set(node, node.address());

    let raw = arena.allocate(sys::VkPhysicalDeviceProperties2::LAYOUT);
    properties()
        .write_raw(sys::VkPhysicalDeviceProperties2::properties_slice(raw), &arena)
        .unwrap();
    sys::VkPhysicalDeviceProperties2::sType_set(raw, StructureType::PhysicalDeviceProperties2.value());
    sys::VkPhysicalDeviceProperties2::pNext_set(raw, node.address());

    assert_eq!(
        unsafe { PhysicalDeviceProperties2::of_with_chain(raw) }.unwrap_err(),
        RawError::ChainCycle(node.address())
    );
    let view = PhysicalDeviceProperties2Native::new(raw);
    assert_eq!(
        unsafe { view.next() }.unwrap_err(),
        RawError::ChainCycle(node.address())
    );
}

const MARKER_TYPE: i32 = 0x7fff_0001;
const MARKER_LAYOUT: Layout = Layout::new(HEADER.size() + 8, 8);

/// A chainable structure only these tests know about
#[derive(Debug, PartialEq)]
struct Marker {
    value: u32,
}

impl NextStructure for Marker {
    fn structure_type(&self) -> i32 {
        MARKER_TYPE
    }

    fn allocate_raw<'a>(
        &self,
        allocator: &'a dyn SegmentAllocator,
    ) -> Result<Segment<'a>, RawError> {
        let raw = allocator.allocate(MARKER_LAYOUT);
        raw.set(0, MARKER_TYPE);
        raw.set(HEADER.size(), self.value);
        Ok(raw)
    }
}

impl PhysicalDeviceProperties2Next for Marker {}

impl PhysicalDeviceMaintenance3PropertiesNext for Marker {}

fn read_marker(raw: Segment<'_>) -> Result<Box<dyn PhysicalDeviceProperties2Next>, RawError> {
    Ok(Box::new(Marker {
        value: raw.get(HEADER.size()),
    }))
}

#[distributed_slice(PHYSICAL_DEVICE_PROPERTIES2_NEXT)]
static MARKER: NextReader<dyn PhysicalDeviceProperties2Next> =
    NextReader::new(MARKER_TYPE, MARKER_LAYOUT, read_marker);

fn maintenance3(
    next: Vec<Box<dyn PhysicalDeviceMaintenance3PropertiesNext>>,
) -> PhysicalDeviceMaintenance3Properties {
    PhysicalDeviceMaintenance3Properties {
        s_type: StructureType::PhysicalDeviceMaintenance3Properties,
        next,
        max_per_set_descriptors: 1024,
        max_memory_allocation_size: 1 << 32,
    }
}

fn structure_types(next: &[Box<dyn PhysicalDeviceProperties2Next>]) -> Vec<i32> {
    next.iter().map(|item| item.structure_type()).collect()
}

#[test]
fn test_safe_read_does_not_follow_the_link() {
    let arena = Arena::new();
    let properties2 = PhysicalDeviceProperties2 {
        s_type: StructureType::PhysicalDeviceProperties2,
        next: Vec::new(),
        properties: properties(),
    };
    let raw = properties2.as_raw(&arena).unwrap();
    sys::VkPhysicalDeviceProperties2::pNext_set(raw, Address::new(0x10));

    let read = PhysicalDeviceProperties2::of(raw).unwrap();
    assert!(read.next.is_empty());
    assert_eq!(read.properties, properties());

    let view = PhysicalDeviceProperties2Native::new(raw);
    assert!(view.to_value().unwrap().next.is_empty());
}

#[test]
fn test_chained_item_with_its_own_chain_is_refused() {
    let arena = Arena::new();
    let properties2 = PhysicalDeviceProperties2 {
        s_type: StructureType::PhysicalDeviceProperties2,
        next: vec![Box::new(maintenance3(vec![Box::new(Marker { value: 9 })]))],
        properties: properties(),
    };

    assert_eq!(
        properties2.as_raw(&arena).unwrap_err(),
        RawError::NestedChain {
            structure_type: vulkan_h::VK_STRUCTURE_TYPE_PHYSICAL_DEVICE_MAINTENANCE_3_PROPERTIES
        }
    );
}

#[test]
fn test_chained_items_do_not_read_the_rest_of_the_chain() {
    let arena = Arena::new();
    let properties2 = PhysicalDeviceProperties2 {
        s_type: StructureType::PhysicalDeviceProperties2,
        next: vec![
            Box::new(maintenance3(Vec::new())),
            Box::new(Marker { value: 7 }),
        ],
        properties: properties(),
    };
    let raw = properties2.as_raw(&arena).unwrap();

    let read = unsafe { PhysicalDeviceProperties2::of_with_chain(raw) }.unwrap();
    assert_eq!(
        structure_types(&read.next),
        vec![
            vulkan_h::VK_STRUCTURE_TYPE_PHYSICAL_DEVICE_MAINTENANCE_3_PROPERTIES,
            MARKER_TYPE
        ]
    );
    let maintenance = format!("{:?}", read.next[0]);
    assert!(maintenance.contains("next: []"));
    assert_eq!(format!("{:?}", read.next[1]), "Marker { value: 7 }");
}

#[test]
fn test_write_keeps_existing_chain_as_tail() {
    let arena = Arena::new();
    let existing = Marker { value: 3 }.allocate_raw(&arena).unwrap();
    let raw = arena.allocate(sys::VkPhysicalDeviceProperties2::LAYOUT);
    sys::VkPhysicalDeviceProperties2::pNext_set(raw, existing.address());

    let properties2 = PhysicalDeviceProperties2 {
        s_type: StructureType::PhysicalDeviceProperties2,
        next: vec![Box::new(maintenance3(Vec::new()))],
        properties: properties(),
    };
    properties2.write_raw(raw, &arena).unwrap();

    let head = sys::VkPhysicalDeviceProperties2::pNext_get(raw);
    assert_ne!(head, existing.address());
    let first = unsafe {
        Segment::from_address(head, sys::VkPhysicalDeviceMaintenance3Properties::LAYOUT.size())
    };
    assert_eq!(
        sys::VkPhysicalDeviceMaintenance3Properties::pNext_get(first),
        existing.address()
    );

    let read = unsafe { PhysicalDeviceProperties2::of_with_chain(raw) }.unwrap();
    assert_eq!(
        structure_types(&read.next),
        vec![
            vulkan_h::VK_STRUCTURE_TYPE_PHYSICAL_DEVICE_MAINTENANCE_3_PROPERTIES,
            MARKER_TYPE
        ]
    );
    assert_eq!(format!("{:?}", read.next[1]), "Marker { value: 3 }");
}

unsafe extern "C" fn free_memory(_user_data: *mut c_void, _memory: *mut c_void) {}

#[test]
fn test_function_pointer_members() {
    let arena = Arena::new();
    let callbacks = AllocationCallbacks {
        p_user_data: Address::NULL,
        pfn_allocation: Address::NULL,
        pfn_free: Address::new(free_memory as usize),
    };
    let raw = callbacks.as_raw(&arena).unwrap();
    let read = AllocationCallbacks::of(raw).unwrap();

    assert_eq!(read, callbacks);
    unsafe {
        assert!(read.allocation().is_none());
        assert!(read.free().is_some());
    }
}

#[test]
fn test_provenance() {
    assert_eq!(vk::Extent2d::GENERATED.generator, "lawu-weld");
    assert_eq!(vk::Extent2d::GENERATED.source, "VkExtent2D");
    assert_eq!(vk::QueueFlag::GENERATED.source, "VkQueueFlags");
    assert_eq!(vk::PhysicalDeviceType::GENERATED.source, "VkPhysicalDeviceType");
}
