mod capabilities;
mod config;
mod devices;
mod instance;
mod messenger;
mod window;

pub use devices::pick_physical;
pub use instance::Instance;
pub use window::Window;
