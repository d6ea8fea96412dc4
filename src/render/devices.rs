use anyhow::{bail, Context, Result};
use log::info;
use vulkanalia::vk::{self, InstanceV1_0, PhysicalDeviceType};

use super::instance::Instance;

pub fn pick_physical(instance: &Instance) -> Result<vk::PhysicalDevice> {
    let devices = unsafe { instance.enumerate_physical_devices() }
        .context("Physical devices enumeration failed")?;
    if !devices.is_empty() {
        info!("{} device(s) found", devices.len());
    }

    choose_device(&devices, |&device| is_device_suitable(instance, device))
}

/// Keep the last suitable device of `devices`.
pub fn choose_device<T: Copy>(devices: &[T], mut suitable: impl FnMut(&T) -> bool) -> Result<T> {
    if devices.is_empty() {
        bail!("No GPU was found that supports Vulkan");
    }

    let mut chosen = None;
    for device in devices {
        if suitable(device) {
            chosen = Some(*device);
        }
    }

    match chosen {
        Some(device) => Ok(device),
        None => bail!("No suitable GPU found"),
    }
}

/// Every device is accepted, this only reports what was found.
fn is_device_suitable(instance: &Instance, device: vk::PhysicalDevice) -> bool {
    let properties = unsafe { instance.get_physical_device_properties(device) };
    let _features = unsafe { instance.get_physical_device_features(device) };

    info!(
        "{}{}",
        device_type_label(properties.device_type),
        properties.device_name.to_string_lossy()
    );
    true
}

fn device_type_label(device_type: PhysicalDeviceType) -> &'static str {
    match device_type {
        PhysicalDeviceType::DISCRETE_GPU => "(discrete GPU) ",
        PhysicalDeviceType::INTEGRATED_GPU => "(integrated GPU) ",
        PhysicalDeviceType::VIRTUAL_GPU => "(virtual GPU) ",
        PhysicalDeviceType::CPU => "(CPU) ",
        _ => "",
    }
}
