use anyhow::{bail, Context, Result};
use log::{debug, warn};
use vulkanalia::{
    vk::{self, EntryV1_0},
    Entry,
};

use super::config::{LayerName, DEBUG_UTILS_EXTENSION, VALIDATION_LAYER};

/// Works out which instance extensions and layers have to be enabled.
#[derive(Debug, Clone, Copy)]
pub struct Capabilities {
    diagnostics_enabled: bool,
}

impl Capabilities {
    pub fn new(diagnostics_enabled: bool) -> Self {
        Self {
            diagnostics_enabled,
        }
    }

    /// Extensions required by the window system, followed by the debug utils extension when
    /// diagnostics are enabled. Duplicates are kept.
    pub fn required_extensions(&self, platform: &[&vk::ExtensionName]) -> Vec<vk::ExtensionName> {
        let mut extensions = platform.iter().map(|&&ext| ext).collect::<Vec<_>>();
        if self.diagnostics_enabled {
            extensions.push(DEBUG_UTILS_EXTENSION.name);
        }
        extensions
    }

    pub fn required_layers(&self) -> Vec<LayerName> {
        if self.diagnostics_enabled {
            vec![VALIDATION_LAYER]
        } else {
            Vec::new()
        }
    }

    /// Enumerate the layers the loader currently knows about and make sure every required layer
    /// is among them.
    pub fn negotiate_layers(&self, entry: &Entry) -> Result<Vec<LayerName>> {
        let required = self.required_layers();

        let available = unsafe { entry.enumerate_instance_layer_properties() }
            .context("Instance layers enumeration failed")?;
        debug!("Available layers:");
        for layer in &available {
            debug!(
                "  {} (spec version {}, impl version {}, description: {})",
                layer.layer_name.to_string_lossy(),
                layer.spec_version,
                layer.implementation_version,
                layer.description.to_string_lossy()
            );
        }
        debug!("Required layers:");
        for layer in &required {
            debug!("  {}", layer.to_string_lossy());
        }

        let available = available
            .iter()
            .map(|layer| layer.layer_name)
            .collect::<Vec<_>>();
        ensure_layers_supported(&required, &available)?;
        Ok(required)
    }
}

/// Return `true` if every name in `required` is in `available`.
///
/// Stops at the first missing layer: the names after it are not examined.
pub fn check_layer_support(required: &[LayerName], available: &[LayerName]) -> bool {
    for layer in required {
        if !available.iter().any(|name| name == layer) {
            warn!("Required layer {} not available", layer.to_string_lossy());
            return false;
        }
    }
    true
}

pub fn ensure_layers_supported(required: &[LayerName], available: &[LayerName]) -> Result<()> {
    if !check_layer_support(required, available) {
        bail!("Some requested layers were not available.");
    }
    Ok(())
}

/// Log the instance extensions offered by the loader next to the ones we ask for.
pub fn log_available_extensions(entry: &Entry, required: &[vk::ExtensionName]) -> Result<()> {
    let available = unsafe { entry.enumerate_instance_extension_properties(None) }
        .context("Instance extensions enumeration failed")?;
    debug!("Available extensions:");
    for extension in &available {
        debug!(
            "  {} (version {})",
            extension.extension_name.to_string_lossy(),
            extension.spec_version
        );
    }
    debug!("Required extensions:");
    for extension in required {
        debug!("  {}", extension.to_string_lossy());
    }
    Ok(())
}
