use std::ops::Deref;

use anyhow::{Context, Result};
use winit::{dpi::LogicalSize, event_loop::EventLoop, window::WindowBuilder};

use crate::options::AppOptions;

/// Fixed size window. winit never binds a client rendering API to it.
#[derive(Debug)]
pub struct Window {
    window: winit::window::Window,
}

impl Deref for Window {
    type Target = winit::window::Window;
    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        &self.window
    }
}

impl Window {
    pub fn new(options: &AppOptions) -> Result<(Self, EventLoop<()>)> {
        let event_loop = EventLoop::new();
        let window = WindowBuilder::new()
            .with_title(&options.window_title)
            .with_inner_size(LogicalSize::new(
                options.window_width,
                options.window_height,
            ))
            .with_resizable(false)
            .build(&event_loop)
            .context("Window creation failed")?;
        Ok((Self { window }, event_loop))
    }
}
