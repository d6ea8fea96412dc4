use vulkanalia::vk::{self, Extension};

/// Layer names share the fixed-size string type of extension names.
pub type LayerName = vk::ExtensionName;

pub const VALIDATION_LAYER: LayerName = LayerName::from_bytes(b"VK_LAYER_KHRONOS_validation");

pub const DEBUG_UTILS_EXTENSION: Extension = vk::EXT_DEBUG_UTILS_EXTENSION;
