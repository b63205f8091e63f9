//! Native identifier to Rust identifier conversion
//!
//! Native names follow the Vulkan conventions: `VkPhysicalDeviceFeatures`
//! for types, `PFN_vkAllocationFunction` for function pointers and
//! `VK_QUEUE_GRAPHICS_BIT` for constants. Vendor extensions end in an
//! upper-case tag (`EXT`, `KHR`, ...), which is what core naming strips.

pub const NATIVE_PREFIX: &str = "Vk";
pub const FUNCTION_POINTER_PREFIX: &str = "PFN_vk";
pub const CONSTANT_PREFIX: &str = "VK_";
pub const BIT_SUFFIX: &str = "_BIT";

const BIT_FLAGS_SUFFIX: &str = "Flags";

/// Literal substitutions applied before the extension suffix is stripped
///
/// Only these spellings are normalised; nothing is inferred from them.
pub const REPLACEMENTS: &[(&str, &str)] = &[("3D", "3d"), ("2D", "2d"), ("RGBA10X6", "Rgba10x6")];

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do", "dyn",
    "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in", "let",
    "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref", "return",
    "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized", "use",
    "virtual", "where", "while", "yield",
];

const UNRAWABLE: &[&str] = &["crate", "self", "Self", "super"];

/// Whether the name ends in a vendor extension tag
///
/// The test is simply that the last two characters are both upper case.
pub fn is_extension_name(name: &str) -> bool {
    let mut chars = name.chars().rev();
    matches!(
        (chars.next(), chars.next()),
        (Some(last), Some(before)) if last.is_uppercase() && before.is_uppercase()
    )
}

/// Whether the name is a core (non-extension) native type name
pub fn is_core_name(name: &str) -> bool {
    name.starts_with(NATIVE_PREFIX) && !is_extension_name(name)
}

/// Whether the name is a core native function-pointer type name
pub fn is_core_function_pointer_name(name: &str) -> bool {
    name.starts_with(FUNCTION_POINTER_PREFIX) && !is_extension_name(name)
}

/// `VkPhysicalDeviceFeatures` -> `PhysicalDeviceFeatures`
pub fn convert_structure_name(native: &str) -> String {
    let mut result = native
        .strip_prefix(NATIVE_PREFIX)
        .unwrap_or(native)
        .to_string();

    for (value, replacement) in REPLACEMENTS {
        result = result.replace(value, replacement);
    }

    let trimmed = result.trim_end_matches(|c: char| c.is_uppercase()).len();
    result.truncate(trimmed);
    result
}

/// `VkQueueFlags` -> `QueueFlag`
pub fn convert_bit_flags_name(native: &str) -> String {
    let mut result = convert_structure_name(native);
    if let Some(stripped) = result.strip_suffix(BIT_FLAGS_SUFFIX) {
        result = stripped.to_string();
    }
    result.push_str("Flag");
    result
}

/// `VkPhysicalDeviceType` -> `PhysicalDeviceType`
pub fn convert_enum_name(native: &str) -> String {
    convert_structure_name(native)
}

/// The native constant prefix expected for members of a destination type
///
/// `QueueFlag` gives `VK_QUEUE_`, `PhysicalDeviceType` gives
/// `VK_PHYSICAL_DEVICE_TYPE_`.
pub fn constant_prefix(destination: &str, bit_flag: bool) -> String {
    let mut recased = String::with_capacity(destination.len() + 8);
    for (index, c) in destination.chars().enumerate() {
        if index > 0 && c.is_uppercase() {
            recased.push('_');
        }
        recased.extend(c.to_uppercase());
    }

    if bit_flag {
        if let Some(stripped) = recased.strip_suffix("FLAG") {
            recased = stripped.to_string();
        }
    } else {
        recased.push('_');
    }

    format!("{}{}", CONSTANT_PREFIX, recased)
}

/// Member name of a flag or enumerator constant
///
/// `VK_QUEUE_GRAPHICS_BIT` with prefix `VK_QUEUE_` gives `GRAPHICS`;
/// `VK_SAMPLE_COUNT_64_BIT` with prefix `VK_SAMPLE_COUNT_` gives `SIXTY_FOUR`.
pub fn constant_member_name(constant: &str, prefix: &str) -> String {
    let name = constant.strip_suffix(BIT_SUFFIX).unwrap_or(constant);
    let name = name.strip_prefix(prefix).unwrap_or(name);
    spell_leading_digits(name)
}

/// Spell out a leading run of digits: `64_BIT` -> `SIXTY_FOUR_BIT`
///
/// A `D` straight after the digits reads as a dimension (`2D` ->
/// `TWO_DIMENSIONAL`); any other character is separated by an underscore.
pub fn spell_leading_digits(residual: &str) -> String {
    let digits = residual.len() - residual.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return residual.to_string();
    }

    let (number, rest) = residual.split_at(digits);
    let mut result = match number.parse::<u64>() {
        Ok(value) => spell_out(value).replace([' ', '-'], "_").to_uppercase(),
        Err(_) => number.to_string(),
    };

    match rest.chars().next() {
        Some('D') => {
            result.push_str("_DIMENSIONAL");
            result.push_str(&rest[1..]);
        }
        Some('_') | None => result.push_str(rest),
        Some(_) => {
            result.push('_');
            result.push_str(rest);
        }
    }
    result
}

/// English cardinal spelling: `64` -> `sixty-four`, `101` -> `one hundred one`
pub fn spell_out(value: u64) -> String {
    const ONES: [&str; 20] = [
        "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
        "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
        "nineteen",
    ];
    const TENS: [&str; 10] = [
        "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
    ];
    const SCALES: [(u64, &str); 6] = [
        (1_000_000_000_000_000_000, "quintillion"),
        (1_000_000_000_000_000, "quadrillion"),
        (1_000_000_000_000, "trillion"),
        (1_000_000_000, "billion"),
        (1_000_000, "million"),
        (1_000, "thousand"),
    ];

    if value < 20 {
        return ONES[value as usize].to_string();
    }
    if value < 100 {
        let tens = TENS[(value / 10) as usize];
        return match value % 10 {
            0 => tens.to_string(),
            ones => format!("{}-{}", tens, ONES[ones as usize]),
        };
    }
    if value < 1_000 {
        let hundreds = format!("{} hundred", ONES[(value / 100) as usize]);
        return match value % 100 {
            0 => hundreds,
            rest => format!("{} {}", hundreds, spell_out(rest)),
        };
    }

    for (scale, word) in SCALES {
        if value >= scale {
            let head = format!("{} {}", spell_out(value / scale), word);
            return match value % scale {
                0 => head,
                rest => format!("{} {}", head, spell_out(rest)),
            };
        }
    }
    unreachable!("every value of at least 1000 has a scale")
}

/// `pipelineCacheUUID` -> `pipeline_cache_uuid`, `Extent3d` -> `extent3d`
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut result = String::with_capacity(name.len() + 4);
    for (index, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && index > 0 {
            let previous = chars[index - 1];
            let next_is_lower = chars.get(index + 1).is_some_and(|n| n.is_lowercase());
            if previous.is_lowercase()
                || ((previous.is_uppercase() || previous.is_ascii_digit()) && next_is_lower)
            {
                result.push('_');
            }
        }
        result.extend(c.to_lowercase());
    }
    result
}

/// `SIXTY_FOUR` -> `SixtyFour`
pub fn to_upper_camel_case(screaming: &str) -> String {
    screaming
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect()
}

/// `PhysicalDeviceProperties2` -> `PHYSICAL_DEVICE_PROPERTIES2`
pub fn to_screaming_snake_case(name: &str) -> String {
    to_snake_case(name).to_uppercase()
}

/// Make an identifier usable as a Rust field or method name
pub fn escape_identifier(name: &str) -> String {
    if UNRAWABLE.contains(&name) {
        format!("{}_", name)
    } else if KEYWORDS.contains(&name) {
        format!("r#{}", name)
    } else {
        name.to_string()
    }
}

/// Rust field name for a native member name
pub fn field_name(member: &str) -> String {
    escape_identifier(&to_snake_case(member))
}

/// Name of the accessor that reinterprets a function-pointer member
///
/// `pfnAllocation` -> `allocation`; members without the `pfn` prefix get a
/// `_function` suffix instead.
pub fn function_accessor_name(member: &str) -> String {
    match member.strip_prefix("pfn") {
        Some(rest) if rest.starts_with(char::is_uppercase) => field_name(rest),
        _ => format!("{}_function", to_snake_case(member)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_structure_name() {
        assert_eq!(convert_structure_name("VkPhysicalDeviceFeatures"), "PhysicalDeviceFeatures");
        assert_eq!(convert_structure_name("VkExtent3D"), "Extent3d");
        assert_eq!(convert_structure_name("VkOffset2D"), "Offset2d");
        assert_eq!(convert_structure_name("VkDebugUtilsLabelEXT"), "DebugUtilsLabel");
    }

    #[test]
    fn test_extension_names() {
        assert!(is_extension_name("VkSomethingEXT"));
        assert!(!is_extension_name("VkExtent3D"));
        assert!(!is_core_name("VkSomethingEXT"));
        assert!(is_core_name("VkPhysicalDeviceFeatures"));
        assert!(is_core_function_pointer_name("PFN_vkAllocationFunction"));
        assert!(!is_core_function_pointer_name("PFN_vkDebugUtilsMessengerCallbackEXT"));
    }

    #[test]
    fn test_bit_flags_and_enum_names() {
        assert_eq!(convert_bit_flags_name("VkQueueFlags"), "QueueFlag");
        assert_eq!(convert_bit_flags_name("VkSampleCountFlags"), "SampleCountFlag");
        assert_eq!(convert_enum_name("VkPhysicalDeviceType"), "PhysicalDeviceType");
    }

    #[test]
    fn test_constant_prefix() {
        assert_eq!(constant_prefix("QueueFlag", true), "VK_QUEUE_");
        assert_eq!(constant_prefix("SampleCountFlag", true), "VK_SAMPLE_COUNT_");
        assert_eq!(constant_prefix("PhysicalDeviceType", false), "VK_PHYSICAL_DEVICE_TYPE_");
    }

    #[test]
    fn test_constant_member_name() {
        assert_eq!(constant_member_name("VK_QUEUE_GRAPHICS_BIT", "VK_QUEUE_"), "GRAPHICS");
        assert_eq!(
            constant_member_name("VK_SAMPLE_COUNT_64_BIT", "VK_SAMPLE_COUNT_"),
            "SIXTY_FOUR"
        );
        assert_eq!(
            constant_member_name("VK_IMAGE_TYPE_2D", "VK_IMAGE_TYPE_"),
            "TWO_DIMENSIONAL"
        );
    }

    #[test]
    fn test_spell_leading_digits() {
        assert_eq!(spell_leading_digits("64_BIT"), "SIXTY_FOUR_BIT");
        assert_eq!(spell_leading_digits("3D"), "THREE_DIMENSIONAL");
        assert_eq!(spell_leading_digits("1X"), "ONE_X");
        assert_eq!(spell_leading_digits("GRAPHICS"), "GRAPHICS");
    }

    #[test]
    fn test_spell_out() {
        assert_eq!(spell_out(0), "zero");
        assert_eq!(spell_out(16), "sixteen");
        assert_eq!(spell_out(40), "forty");
        assert_eq!(spell_out(64), "sixty-four");
        assert_eq!(spell_out(101), "one hundred one");
        assert_eq!(spell_out(2048), "two thousand forty-eight");
    }

    #[test]
    fn test_snake_case() {
        assert_eq!(to_snake_case("pipelineCacheUUID"), "pipeline_cache_uuid");
        assert_eq!(to_snake_case("sType"), "s_type");
        assert_eq!(to_snake_case("Extent3d"), "extent3d");
        assert_eq!(to_snake_case("PhysicalDeviceIDProperties"), "physical_device_id_properties");
        assert_eq!(to_snake_case("maxImageDimension2D"), "max_image_dimension2d");
        assert_eq!(
            to_snake_case("PhysicalDeviceMaintenance3Properties"),
            "physical_device_maintenance3_properties"
        );
        assert_eq!(to_snake_case("PhysicalDeviceProperties2"), "physical_device_properties2");
        assert_eq!(
            to_screaming_snake_case("PhysicalDeviceMaintenance3Properties"),
            "PHYSICAL_DEVICE_MAINTENANCE3_PROPERTIES"
        );
    }

    #[test]
    fn test_case_conversions() {
        assert_eq!(to_upper_camel_case("SIXTY_FOUR"), "SixtyFour");
        assert_eq!(to_upper_camel_case("INTEGRATED_GPU"), "IntegratedGpu");
        assert_eq!(
            to_screaming_snake_case("PhysicalDeviceProperties2"),
            "PHYSICAL_DEVICE_PROPERTIES2"
        );
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(field_name("type"), "r#type");
        assert_eq!(field_name("self"), "self_");
        assert_eq!(function_accessor_name("pfnAllocation"), "allocation");
        assert_eq!(function_accessor_name("callback"), "callback_function");
    }
}
