use anyhow::{Context, Result};
use log::{debug, info};
use vulkanalia::vk::{self, InstanceV1_0};
use winit::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    platform::run_return::EventLoopExtRunReturn,
};

use crate::{
    options::AppOptions,
    render::{self, Instance, Window},
};

#[derive(Debug)]
pub struct App {
    // Field order is drop order: the instance goes before the window.
    _instance: Instance,
    physical_device: vk::PhysicalDevice,
    window: Window,
}

impl App {
    pub fn new(options: &AppOptions) -> Result<(Self, EventLoop<()>)> {
        let (window, event_loop) = Window::new(options)?;

        let instance = Instance::new(&window, options).context("Instance creation failed")?;
        let handle = instance.handle();
        debug!(
            "Debug messenger: {:?}",
            instance.messengers().messenger(handle)
        );

        let physical_device =
            render::pick_physical(&instance).context("Physical device selection failed")?;

        Ok((
            Self {
                _instance: instance,
                physical_device,
                window,
            },
            event_loop,
        ))
    }

    /// Wait for window events until the window is asked to close.
    pub fn run(&mut self, event_loop: &mut EventLoop<()>) {
        let window_id = self.window.id();
        info!("Entering main loop with device {:?}", self.physical_device);
        event_loop.run_return(|event, _, control_flow| {
            *control_flow = ControlFlow::Wait;
            if let Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                window_id: id,
            } = event
            {
                if id == window_id {
                    *control_flow = ControlFlow::Exit;
                }
            }
        });
        info!("Main loop exited");
    }
}
