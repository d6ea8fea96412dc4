use std::{
    collections::HashMap,
    ffi::{c_void, CStr},
    fmt, ptr,
};

use log::{error, info, trace, warn, Level};
use thiserror::Error;
use vulkanalia::vk::{self, Handle, HasBuilder, InstanceV1_0};

use super::config::DEBUG_UTILS_EXTENSION;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MessengerError {
    #[error("Given VkInstance is invalid (null handle)")]
    InvalidHandle,
    #[error("No debug messenger is associated with the given VkInstance: instance not found")]
    InstanceNotFound,
}

/// Looks up the debug utils entry points of an instance.
///
/// `None` means the entry point is not available, typically because `VK_EXT_debug_utils` was not
/// enabled. This is not an error.
pub trait DebugUtilsLoader {
    fn create_messenger_fn(
        &self,
        instance: vk::Instance,
    ) -> Option<vk::PFN_vkCreateDebugUtilsMessengerEXT>;
    fn destroy_messenger_fn(
        &self,
        instance: vk::Instance,
    ) -> Option<vk::PFN_vkDestroyDebugUtilsMessengerEXT>;
}

impl DebugUtilsLoader for vulkanalia::Instance {
    fn create_messenger_fn(
        &self,
        instance: vk::Instance,
    ) -> Option<vk::PFN_vkCreateDebugUtilsMessengerEXT> {
        debug_utils_loaded(self, instance)
            .then_some(self.commands().create_debug_utils_messenger_ext)
    }

    fn destroy_messenger_fn(
        &self,
        instance: vk::Instance,
    ) -> Option<vk::PFN_vkDestroyDebugUtilsMessengerEXT> {
        debug_utils_loaded(self, instance)
            .then_some(self.commands().destroy_debug_utils_messenger_ext)
    }
}

/// Extension commands are only loaded when the extension was enabled at instance creation.
fn debug_utils_loaded(loaded: &vulkanalia::Instance, instance: vk::Instance) -> bool {
    loaded.handle() == instance && loaded.extensions().contains(&DEBUG_UTILS_EXTENSION.name)
}

/// Create info shared by the instance creation chain and the standalone messenger.
pub fn messenger_create_info() -> vk::DebugUtilsMessengerCreateInfoEXT {
    vk::DebugUtilsMessengerCreateInfoEXT::builder()
        .message_severity(
            vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE
                | vk::DebugUtilsMessageSeverityFlagsEXT::INFO
                | vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
                | vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
        )
        .message_type(
            vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
        )
        .user_callback(Some(debug_callback))
        .build()
}

/// Keeps at most one debug messenger per live instance.
#[derive(Debug, Default)]
pub struct MessengerRegistry {
    messengers: HashMap<vk::Instance, vk::DebugUtilsMessengerEXT>,
}

impl MessengerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a debug messenger on `instance`.
    ///
    /// A messenger already registered for `instance` is replaced without being destroyed.
    pub fn setup(
        &mut self,
        loader: &impl DebugUtilsLoader,
        instance: vk::Instance,
    ) -> Result<(), MessengerError> {
        if instance.is_null() {
            return Err(MessengerError::InvalidHandle);
        }

        let Some(create) = loader.create_messenger_fn(instance) else {
            warn!("vkCreateDebugUtilsMessengerEXT not available, validation messages are not reported");
            return Ok(());
        };

        let create_info = messenger_create_info();
        let mut messenger = vk::DebugUtilsMessengerEXT::null();
        let result = unsafe { create(instance, &create_info, ptr::null(), &mut messenger) };
        if result != vk::Result::SUCCESS {
            warn!("Debug utils messenger creation failed: {result:?}");
            return Ok(());
        }

        self.messengers.insert(instance, messenger);
        Ok(())
    }

    /// Destroy the messenger registered for `instance` and forget it.
    pub fn teardown(
        &mut self,
        loader: &impl DebugUtilsLoader,
        instance: vk::Instance,
    ) -> Result<(), MessengerError> {
        let Some(messenger) = self.messengers.remove(&instance) else {
            warn!("Unable to tear down debug messenger: {}", MessengerError::InstanceNotFound);
            return Err(MessengerError::InstanceNotFound);
        };

        match loader.destroy_messenger_fn(instance) {
            Some(destroy) => unsafe { destroy(instance, messenger, ptr::null()) },
            None => warn!("vkDestroyDebugUtilsMessengerEXT is not available, messenger leaked"),
        }
        Ok(())
    }

    pub fn messenger(&self, instance: vk::Instance) -> Option<vk::DebugUtilsMessengerEXT> {
        self.messengers.get(&instance).copied()
    }

    #[cfg(test)]
    pub fn is_registered(&self, instance: vk::Instance) -> bool {
        self.messengers.contains_key(&instance)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.messengers.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.messengers.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Verbose,
    Info,
    Warning,
    Error,
    Unknown,
}

impl Severity {
    pub fn classify(severity: vk::DebugUtilsMessageSeverityFlagsEXT) -> Self {
        if severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::ERROR) {
            Self::Error
        } else if severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::WARNING) {
            Self::Warning
        } else if severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::INFO) {
            Self::Info
        } else if severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE) {
            Self::Verbose
        } else {
            Self::Unknown
        }
    }

    fn level(self) -> Level {
        match self {
            Self::Error => Level::Error,
            Self::Warning | Self::Unknown => Level::Warn,
            Self::Info => Level::Info,
            Self::Verbose => Level::Trace,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Verbose => "verbose",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Unknown => "unknown",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    General,
    Validation,
    Performance,
    Unclassified,
}

impl MessageKind {
    pub fn classify(type_: vk::DebugUtilsMessageTypeFlagsEXT) -> Self {
        if type_.contains(vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION) {
            Self::Validation
        } else if type_.contains(vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE) {
            Self::Performance
        } else if type_.contains(vk::DebugUtilsMessageTypeFlagsEXT::GENERAL) {
            Self::General
        } else {
            Self::Unclassified
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::General => "general",
            Self::Validation => "validation",
            Self::Performance => "performance",
            Self::Unclassified => "unclassified",
        })
    }
}

pub fn format_message(severity: Severity, kind: MessageKind, message: &str) -> String {
    format!("[{severity}] [{kind}] {message}")
}

/// Reports every message, errors included, and never aborts the call that triggered it.
pub fn report(severity: Severity, kind: MessageKind, message: &str) {
    let line = format_message(severity, kind, message);
    match severity.level() {
        Level::Error => error!("{line}"),
        Level::Warn => warn!("{line}"),
        Level::Info => info!("{line}"),
        _ => trace!("{line}"),
    }
}

extern "system" fn debug_callback(
    severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    type_: vk::DebugUtilsMessageTypeFlagsEXT,
    data: *const vk::DebugUtilsMessengerCallbackDataEXT,
    _: *mut c_void,
) -> vk::Bool32 {
    let message = if data.is_null() {
        "<no callback data>".into()
    } else {
        let data = unsafe { *data };
        if data.message.is_null() {
            "<empty message>".into()
        } else {
            unsafe { CStr::from_ptr(data.message) }.to_string_lossy()
        }
    };

    report(
        Severity::classify(severity),
        MessageKind::classify(type_),
        &message,
    );

    vk::FALSE
}
