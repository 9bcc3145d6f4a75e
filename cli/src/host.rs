use crate::scenario::HostStep;
use log::{debug, info, warn};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use surfacelink_core::platform::{LayoutParams, PlatformResult, PlatformWindowImpl};
use surfacelink_core::{
    Config, DemoRuntime, LifecycleRoot, ProcessInitFlag, SavedState, SurfaceEvent,
    SurfaceLinkResult,
};

/// Stand-in for an OS surface; only carries an id for the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadlessSurface {
    pub id: u32,
}

/// The demo runtime, rendering to headless surfaces.
pub type HeadlessRuntime = DemoRuntime<HeadlessSurface>;

/// Window of the headless activity. Records what was applied so it can be logged and checked.
#[derive(Debug, Default)]
pub struct HeadlessWindow {
    pub system_ui_visibility: u32,
    pub window_flags: u32,
    pub content_views: usize,
}

impl PlatformWindowImpl for HeadlessWindow {
    fn set_system_ui_visibility(&mut self, flags: u32) -> PlatformResult<()> {
        debug!("System UI visibility {flags:#06x}");
        self.system_ui_visibility = flags;
        Ok(())
    }

    fn add_window_flags(&mut self, flags: u32) -> PlatformResult<()> {
        debug!("Window flags |= {flags:#06x}");
        self.window_flags |= flags;
        Ok(())
    }

    fn content_layout(&mut self) -> PlatformResult<LayoutParams> {
        Ok(LayoutParams::match_parent())
    }

    fn add_content_view(&mut self, layout: LayoutParams) -> PlatformResult<()> {
        debug!("Content view added ({}x{})", layout.width, layout.height);
        self.content_views += 1;
        Ok(())
    }
}

/// Plays the OS: delivers lifecycle and surface callbacks on the calling thread, which stands in
/// for the UI thread.
pub struct HeadlessHost<'p> {
    runtime: Arc<HeadlessRuntime>,
    process: &'p ProcessInitFlag,
    config: Config,
    window: HeadlessWindow,
    root: Option<LifecycleRoot<HeadlessRuntime>>,
    next_surface_id: u32,
}

impl<'p> HeadlessHost<'p> {
    pub fn new(runtime: Arc<HeadlessRuntime>, process: &'p ProcessInitFlag, config: Config) -> Self {
        Self {
            runtime,
            process,
            config,
            window: HeadlessWindow::default(),
            root: None,
            next_surface_id: 1,
        }
    }

    pub fn run_step(&mut self, step: &HostStep) -> SurfaceLinkResult<()> {
        match step {
            HostStep::Create { saved_state } => {
                info!("onCreate (saved state: {saved_state})");
                // Every activity instance gets its own window
                self.window = HeadlessWindow::default();
                let root = LifecycleRoot::create(
                    self.runtime.clone(),
                    &mut self.window,
                    SavedState::from(*saved_state),
                    self.process,
                    &self.config,
                )?;
                self.root = Some(root);
            }
            HostStep::SurfaceCreated { width, height } => {
                let surface = HeadlessSurface {
                    id: self.next_surface_id,
                };
                self.next_surface_id += 1;
                self.deliver(SurfaceEvent::Created(surface));
                self.deliver(SurfaceEvent::DimensionsChanged {
                    width: *width,
                    height: *height,
                });
            }
            HostStep::SurfaceChanged { width, height } => {
                self.deliver(SurfaceEvent::DimensionsChanged {
                    width: *width,
                    height: *height,
                });
            }
            HostStep::SurfaceDestroyed => self.deliver(SurfaceEvent::Destroyed),
            HostStep::SleepMs(ms) => thread::sleep(Duration::from_millis(*ms)),
        }
        Ok(())
    }

    fn deliver(&mut self, event: SurfaceEvent<HeadlessSurface>) {
        match self.root.as_mut() {
            Some(root) => root.handle_surface_event(event),
            None => warn!("No surface view attached yet, {} never fires", event.name()),
        }
    }

    pub fn root(&self) -> Option<&LifecycleRoot<HeadlessRuntime>> {
        self.root.as_ref()
    }

    pub fn window(&self) -> &HeadlessWindow {
        &self.window
    }
}
