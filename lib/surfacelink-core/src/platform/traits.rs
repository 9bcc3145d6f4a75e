use crate::platform::{LayoutParams, PlatformResult};

/// The native runtime on the other side of the bridge.
///
/// `global_init` and the surface notifications are called from the OS UI thread, `entry_point`
/// from the worker thread. The bridge never synchronizes between the two, so implementations
/// must treat every surface notification as arriving concurrently with whatever `entry_point` is
/// doing with a previously supplied surface.
pub trait NativeRuntime
where
    Self: Send + Sync + 'static,
{
    /// Opaque OS surface handle. Owned by the OS; the runtime must stop using it once
    /// `surface_unavailable` returns.
    type Surface: Send + 'static;

    /// Process-global native setup. Called at most once per process, before the worker starts.
    fn global_init(&self);

    /// Body of the worker thread. Blocks for the lifetime of the process.
    fn entry_point(&self, name: &str);

    fn surface_available(&self, surface: Self::Surface);

    fn dimensions_updated(&self, width: i32, height: i32);

    /// The current surface is about to become invalid.
    fn surface_unavailable(&self);
}

/// The window an activity instance draws into.
///
/// Only called on the UI thread, during activity creation.
pub trait PlatformWindowImpl {
    /// Applies `View.SYSTEM_UI_FLAG_*` bits to the decor view.
    fn set_system_ui_visibility(&mut self, flags: u32) -> PlatformResult<()>;

    /// Adds `WindowManager.LayoutParams.FLAG_*` bits to the window.
    fn add_window_flags(&mut self, flags: u32) -> PlatformResult<()>;

    /// Layout of the existing content area. The surface view is attached with the same layout so
    /// it fills it.
    fn content_layout(&mut self) -> PlatformResult<LayoutParams>;

    /// Attaches a new surface view to the content hierarchy. Once attached, the OS starts
    /// delivering surface callbacks for it.
    fn add_content_view(&mut self, layout: LayoutParams) -> PlatformResult<()>;
}
