//! Fixed-size UUID members

use lawu_runtime::layout::U8;
use lawu_runtime::{Layout, RawError, Segment, SegmentAllocator, Structure};
use lawu_weld_macro::map_structure;
use std::fmt;

/// Size of every Vulkan UUID
pub const UUID_SIZE: usize = 16;

/// The pipeline cache UUID of a physical device
///
/// Replaces the raw `uint8_t[16]` array the member would otherwise become.
#[map_structure("uint8_t pipelineCacheUUID")]
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PipelineCacheUuid(pub [u8; UUID_SIZE]);

impl fmt::Debug for PipelineCacheUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, byte) in self.0.iter().enumerate() {
            if matches!(index, 4 | 6 | 8 | 10) {
                f.write_str("-")?;
            }
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl Structure for PipelineCacheUuid {
    fn layout() -> Layout {
        Layout::new(UUID_SIZE, 1)
    }

    fn of(raw: Segment<'_>) -> Result<Self, RawError> {
        let bytes = raw.to_vec(U8);
        let found = bytes.len();
        let bytes: [u8; UUID_SIZE] = bytes.try_into().map_err(|_| RawError::LengthMismatch {
            expected: UUID_SIZE,
            found,
        })?;
        Ok(Self(bytes))
    }

    fn write_raw<'a>(
        &self,
        destination: Segment<'a>,
        _allocator: &'a dyn SegmentAllocator,
    ) -> Result<(), RawError> {
        destination.copy_from_values(U8, &self.0)
    }
}
