use std::{ffi::c_char, ops::Deref};

use anyhow::{anyhow, Context, Result};
use log::info;
use vulkanalia::{
    loader::{LibloadingLoader, LIBRARY},
    vk::{self, HasBuilder, InstanceV1_0},
    Entry,
};
use winit::window::Window;

use crate::options::AppOptions;

use super::{
    capabilities::{self, Capabilities},
    messenger::{self, DebugUtilsLoader, MessengerError, MessengerRegistry},
};

/// The Vulkan instance together with the debug messengers installed on it.
///
/// Dropping it tears the messenger down before destroying the instance.
#[derive(Debug)]
pub struct Instance {
    diagnostics_enabled: bool,
    messengers: MessengerRegistry,
    instance: vulkanalia::Instance,
    _entry: Entry,
}

impl Deref for Instance {
    type Target = vulkanalia::Instance;
    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        &self.instance
    }
}

impl Drop for Instance {
    fn drop(&mut self) {
        release_messengers(
            self.diagnostics_enabled,
            &mut self.messengers,
            &self.instance,
            self.instance.handle(),
        );
        unsafe { self.instance.destroy_instance(None) };
    }
}

impl Instance {
    pub fn new(window: &Window, options: &AppOptions) -> Result<Self> {
        let loader = unsafe { LibloadingLoader::new(LIBRARY) }
            .with_context(|| format!("{} not found", LIBRARY))?;
        let entry = unsafe { Entry::new(loader) }.map_err(|e| anyhow!("{e}"))?;

        let capabilities = Capabilities::new(options.diagnostics_enabled);

        let layers = capabilities.negotiate_layers(&entry)?;
        let layers = layers.iter().map(|l| l.as_ptr()).collect::<Vec<*const c_char>>();

        let extensions = capabilities
            .required_extensions(vulkanalia::window::get_required_instance_extensions(window));
        capabilities::log_available_extensions(&entry, &extensions)?;
        let extensions = extensions.iter().map(|e| e.as_ptr()).collect::<Vec<_>>();

        let application_name = nul_terminated(&options.application_name);
        let app_info = vk::ApplicationInfo::builder()
            .application_name(&application_name)
            .application_version(make_version(options.application_version))
            .engine_version(make_version(options.engine_version))
            .api_version(options.api_version);

        let mut debug_messenger_create_info = messenger::messenger_create_info();
        let mut instance_create_info = vk::InstanceCreateInfo::builder()
            .application_info(&app_info)
            .enabled_layer_names(&layers)
            .enabled_extension_names(&extensions);
        if options.diagnostics_enabled {
            instance_create_info = instance_create_info.push_next(&mut debug_messenger_create_info);
        }

        let instance = unsafe { entry.create_instance(&instance_create_info, None) }
            .context("Vulkan instance creation failed")?;
        info!("Vulkan instance created");

        let messengers =
            install_messengers(options.diagnostics_enabled, &instance, instance.handle())
                .context("Debug messenger setup failed")?;

        Ok(Self {
            diagnostics_enabled: options.diagnostics_enabled,
            messengers,
            instance,
            _entry: entry,
        })
    }

    pub fn messengers(&self) -> &MessengerRegistry {
        &self.messengers
    }
}

fn install_messengers(
    diagnostics_enabled: bool,
    loader: &impl DebugUtilsLoader,
    instance: vk::Instance,
) -> Result<MessengerRegistry, MessengerError> {
    let mut messengers = MessengerRegistry::new();
    if diagnostics_enabled {
        messengers.setup(loader, instance)?;
    }
    Ok(messengers)
}

/// A missing messenger is reported by the registry and does not stop the instance teardown.
fn release_messengers(
    diagnostics_enabled: bool,
    messengers: &mut MessengerRegistry,
    loader: &impl DebugUtilsLoader,
    instance: vk::Instance,
) {
    if diagnostics_enabled {
        let _ = messengers.teardown(loader, instance);
    }
}

fn make_version((major, minor, patch): (u32, u32, u32)) -> u32 {
    vk::make_version(major, minor, patch)
}

fn nul_terminated(s: &str) -> Vec<u8> {
    let mut bytes = s.bytes().filter(|&b| b != 0).collect::<Vec<_>>();
    bytes.push(0);
    bytes
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use log::Level;
    use vulkanalia::vk::Handle;

    use super::*;
    use crate::test_logger;

    #[derive(Default)]
    struct CountingLoader {
        lookups: Cell<usize>,
    }

    impl DebugUtilsLoader for CountingLoader {
        fn create_messenger_fn(
            &self,
            _instance: vk::Instance,
        ) -> Option<vk::PFN_vkCreateDebugUtilsMessengerEXT> {
            self.lookups.set(self.lookups.get() + 1);
            None
        }

        fn destroy_messenger_fn(
            &self,
            _instance: vk::Instance,
        ) -> Option<vk::PFN_vkDestroyDebugUtilsMessengerEXT> {
            self.lookups.set(self.lookups.get() + 1);
            None
        }
    }

    #[test]
    fn no_messenger_without_diagnostics() {
        let loader = CountingLoader::default();
        let messengers = install_messengers(false, &loader, vk::Instance::from_raw(1)).unwrap();
        assert!(messengers.is_empty());
        assert_eq!(loader.lookups.get(), 0);
    }

    #[test]
    fn diagnostics_look_the_messenger_up() {
        let loader = CountingLoader::default();
        let messengers = install_messengers(true, &loader, vk::Instance::from_raw(1)).unwrap();
        assert!(messengers.is_empty());
        assert_eq!(loader.lookups.get(), 1);
    }

    #[test]
    fn null_instance_fails_installation() {
        let loader = CountingLoader::default();
        assert_eq!(
            install_messengers(true, &loader, vk::Instance::null()).unwrap_err(),
            MessengerError::InvalidHandle
        );
    }

    #[test]
    fn release_without_diagnostics_does_nothing() {
        let loader = CountingLoader::default();
        let mut messengers = MessengerRegistry::new();

        test_logger::take();
        release_messengers(false, &mut messengers, &loader, vk::Instance::from_raw(1));

        assert_eq!(loader.lookups.get(), 0);
        assert!(test_logger::take_at(Level::Warn).is_empty());
    }

    #[test]
    fn release_after_degraded_setup_warns_instance_not_found() {
        let loader = CountingLoader::default();
        let instance = vk::Instance::from_raw(1);
        let mut messengers = install_messengers(true, &loader, instance).unwrap();

        test_logger::take();
        release_messengers(true, &mut messengers, &loader, instance);

        // Only the create lookup from setup: nothing to destroy.
        assert_eq!(loader.lookups.get(), 1);
        let warnings = test_logger::take_at(Level::Warn);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("instance not found"));
    }

    #[test]
    fn names_are_nul_terminated() {
        assert_eq!(nul_terminated("HelloWorld"), b"HelloWorld\0");
        assert_eq!(nul_terminated("a\0b"), b"ab\0");
        assert_eq!(nul_terminated(""), b"\0");
    }

    #[test]
    fn version_triples() {
        assert_eq!(make_version((1, 0, 0)), vk::make_version(1, 0, 0));
        assert_ne!(make_version((1, 2, 0)), make_version((1, 0, 0)));
    }
}
