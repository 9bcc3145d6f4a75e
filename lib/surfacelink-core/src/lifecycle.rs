use crate::config::Config;
use crate::platform::{NativeRuntime, PlatformWindowImpl, FLAG_KEEP_SCREEN_ON};
use crate::process::ProcessInitFlag;
use crate::surface_bridge::{SurfaceBridge, SurfaceEvent};
use crate::worker::WorkerThread;
use crate::SurfaceLinkResult;
use log::{debug, error, info, warn};
use std::fmt::Debug;
use std::sync::Arc;

/// Whether the OS handed the activity a saved instance state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavedState {
    /// Fresh start.
    Absent,
    /// Re-creation of a previous instance, e.g. after rotation.
    Present,
}

impl From<bool> for SavedState {
    fn from(has_saved_state: bool) -> Self {
        if has_saved_state {
            SavedState::Present
        } else {
            SavedState::Absent
        }
    }
}

/// One activity instance.
///
/// Created from the OS `onCreate` callback on the UI thread. Owns the surface bridge of the view it
/// attached; a later creation builds a new root and the host drops this one.
pub struct LifecycleRoot<R: NativeRuntime + ?Sized> {
    runtime: Arc<R>,
    bridge: SurfaceBridge<R>,
    initialized_process: bool,
}

impl<R: NativeRuntime + ?Sized> LifecycleRoot<R> {
    /// Runs activity creation.
    ///
    /// Without saved state, and only if `process` has not been initialized yet, calls the
    /// runtime's global init and starts the worker thread. Then, on every call, applies the display
    /// flags and keep-screen-on to `window` and attaches a new surface view filling the content
    /// area.
    ///
    /// The process is claimed before the worker is spawned. If the spawn fails the error is fatal:
    /// the process stays marked as initialized without a worker and later creations never retry.
    pub fn create<W>(
        runtime: Arc<R>,
        window: &mut W,
        saved_state: SavedState,
        process: &ProcessInitFlag,
        config: &Config,
    ) -> SurfaceLinkResult<Self>
    where
        W: PlatformWindowImpl + ?Sized,
    {
        let initialized_process = match saved_state {
            SavedState::Absent if process.try_claim() => {
                info!("Initializing native runtime");
                runtime.global_init();

                let worker = WorkerThread::spawn(runtime.clone(), config).inspect_err(|e| {
                    error!("Could not start the worker thread, native code will never run: {e}");
                })?;
                info!(
                    "Started worker thread {:?}",
                    worker.thread_name().unwrap_or("<unnamed>")
                );
                if process.set_worker(worker).is_err() {
                    warn!("A worker thread was already parked for this process");
                }
                true
            }
            SavedState::Absent => {
                warn!("Activity created without saved state in an initialized process, skipping native init");
                false
            }
            SavedState::Present => {
                if !process.is_set() {
                    // Nothing restarts the runtime here
                    warn!("Activity restored with saved state, but native init never ran in this process");
                } else {
                    debug!("Activity re-created, native runtime is assumed alive");
                }
                false
            }
        };

        window.set_system_ui_visibility(config.display.bits())?;
        window.add_window_flags(FLAG_KEEP_SCREEN_ON)?;

        let layout = window.content_layout()?;
        let bridge = SurfaceBridge::new(runtime.clone(), config.warn_on_out_of_order_events);
        window.add_content_view(layout)?;
        debug!("Attached surface view ({}x{})", layout.width, layout.height);

        Ok(Self {
            runtime,
            bridge,
            initialized_process,
        })
    }

    /// [`LifecycleRoot::create`] against a copy of the process-wide [`Config`]. The runtime may
    /// update the config from `global_init`.
    pub fn create_with_current_config<W>(
        runtime: Arc<R>,
        window: &mut W,
        saved_state: SavedState,
        process: &ProcessInitFlag,
    ) -> SurfaceLinkResult<Self>
    where
        W: PlatformWindowImpl + ?Sized,
    {
        let config = Config::snapshot();
        Self::create(runtime, window, saved_state, process, &config)
    }

    pub fn handle_surface_event(&mut self, event: SurfaceEvent<R::Surface>) {
        self.bridge.handle_event(event);
    }

    pub fn bridge(&self) -> &SurfaceBridge<R> {
        &self.bridge
    }

    pub fn bridge_mut(&mut self) -> &mut SurfaceBridge<R> {
        &mut self.bridge
    }

    pub fn runtime(&self) -> &Arc<R> {
        &self.runtime
    }

    /// Whether this creation ran global init and started the worker.
    pub fn initialized_process(&self) -> bool {
        self.initialized_process
    }
}

impl<R: NativeRuntime + ?Sized> Debug for LifecycleRoot<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleRoot")
            .field("bridge", &self.bridge)
            .field("initialized_process", &self.initialized_process)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{MockRuntime, MockSurface, MockWindow, NativeCall, WindowCall};
    use crate::platform::{LayoutParams, PlatformError};
    use crate::surface_bridge::SurfaceState;
    use crate::SurfaceLinkFatalError;
    use std::time::Duration;

    const ENTRY_WAIT: Duration = Duration::from_secs(5);

    fn create(
        runtime: &Arc<MockRuntime>,
        window: &mut MockWindow,
        saved_state: SavedState,
        process: &ProcessInitFlag,
    ) -> LifecycleRoot<MockRuntime> {
        LifecycleRoot::create(
            runtime.clone(),
            window,
            saved_state,
            process,
            &Config::default(),
        )
        .unwrap()
    }

    fn expected_window_calls(layout: LayoutParams) -> Vec<WindowCall> {
        vec![
            WindowCall::SystemUiVisibility(0x1507),
            WindowCall::AddWindowFlags(FLAG_KEEP_SCREEN_ON),
            WindowCall::AddContentView(layout),
        ]
    }

    #[test]
    fn test_fresh_start_initializes_once() {
        let runtime = Arc::new(MockRuntime::new());
        let process = ProcessInitFlag::new();
        let mut window = MockWindow::new();

        let root = create(&runtime, &mut window, SavedState::Absent, &process);

        assert!(root.initialized_process());
        assert!(process.is_set());
        assert_eq!(runtime.global_init_count(), 1);
        assert_eq!(
            runtime.wait_for_entries(1, ENTRY_WAIT),
            vec!["surfacelink".to_string()]
        );
        assert_eq!(
            process.worker().and_then(|w| w.thread_name()),
            Some("surfacelink-main")
        );
        assert_eq!(root.bridge().state(), SurfaceState::NoSurface);
    }

    #[test]
    fn test_saved_state_skips_init() {
        let runtime = Arc::new(MockRuntime::new());
        let process = ProcessInitFlag::new();
        let mut window = MockWindow::new();

        let root = create(&runtime, &mut window, SavedState::Present, &process);

        assert!(!root.initialized_process());
        assert!(!process.is_set());
        assert!(process.worker().is_none());
        assert_eq!(runtime.global_init_count(), 0);
        assert!(runtime.entries().is_empty());
    }

    #[test]
    fn test_second_fresh_start_in_same_process_skips_init() {
        let runtime = Arc::new(MockRuntime::new());
        let process = ProcessInitFlag::new();

        let first = create(&runtime, &mut MockWindow::new(), SavedState::Absent, &process);
        let second = create(&runtime, &mut MockWindow::new(), SavedState::Absent, &process);

        assert!(first.initialized_process());
        assert!(!second.initialized_process());
        assert_eq!(runtime.global_init_count(), 1);
        runtime.wait_for_entries(1, ENTRY_WAIT);
        // Give a second worker, if one had been started, time to show up.
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(runtime.entries().len(), 1);
    }

    #[test]
    fn test_window_setup_happens_on_every_create() {
        let runtime = Arc::new(MockRuntime::new());
        let process = ProcessInitFlag::new();
        let layout = LayoutParams::new(1080, 2340);

        for saved_state in [SavedState::Absent, SavedState::Present, SavedState::Present] {
            let mut window = MockWindow::new();
            window.content_layout = layout;
            create(&runtime, &mut window, saved_state, &process);
            assert_eq!(window.calls, expected_window_calls(layout));
            assert_eq!(window.attached_views(), 1);
        }
    }

    #[test]
    fn test_display_flags_come_from_config() {
        let runtime = Arc::new(MockRuntime::new());
        let mut window = MockWindow::new();
        let config = Config {
            display: crate::platform::DisplayFlags::none(),
            ..Config::default()
        };

        LifecycleRoot::create(
            runtime,
            &mut window,
            SavedState::Present,
            &ProcessInitFlag::new(),
            &config,
        )
        .unwrap();

        assert_eq!(window.calls[0], WindowCall::SystemUiVisibility(0));
        assert_eq!(window.calls[1], WindowCall::AddWindowFlags(FLAG_KEEP_SCREEN_ON));
    }

    #[test]
    fn test_window_errors_propagate() {
        let runtime = Arc::new(MockRuntime::new());
        let mut window = MockWindow::new();
        window.fail_add_content_view = true;

        let result = LifecycleRoot::create(
            runtime,
            &mut window,
            SavedState::Present,
            &ProcessInitFlag::new(),
            &Config::default(),
        );

        match result {
            Err(SurfaceLinkFatalError::PlatformError(PlatformError { .. })) => {}
            other => panic!("expected platform error, got {:?}", other),
        }
    }

    #[test]
    fn test_first_launch_then_rotate() {
        let runtime = Arc::new(MockRuntime::new());
        let process = ProcessInitFlag::new();

        let mut root = create(&runtime, &mut MockWindow::new(), SavedState::Absent, &process);
        assert_eq!(runtime.global_init_count(), 1);
        assert_eq!(runtime.wait_for_entries(1, ENTRY_WAIT).len(), 1);

        root.handle_surface_event(SurfaceEvent::Created(MockSurface(1)));
        root.handle_surface_event(SurfaceEvent::DimensionsChanged {
            width: 640,
            height: 480,
        });

        // Rotation
        root.handle_surface_event(SurfaceEvent::Destroyed);
        root.handle_surface_event(SurfaceEvent::Created(MockSurface(2)));
        root.handle_surface_event(SurfaceEvent::DimensionsChanged {
            width: 480,
            height: 640,
        });

        assert_eq!(
            runtime.calls(),
            vec![
                NativeCall::SurfaceAvailable(MockSurface(1)),
                NativeCall::DimensionsUpdated(640, 480),
                NativeCall::SurfaceUnavailable,
                NativeCall::SurfaceAvailable(MockSurface(2)),
                NativeCall::DimensionsUpdated(480, 640),
            ]
        );
        assert_eq!(runtime.global_init_count(), 1);
        assert_eq!(runtime.entries().len(), 1);
    }

    #[test]
    fn test_recreation_with_saved_state_attaches_new_bridge() {
        let runtime = Arc::new(MockRuntime::new());
        let process = ProcessInitFlag::new();

        let mut first = create(&runtime, &mut MockWindow::new(), SavedState::Absent, &process);
        first.bridge_mut().surface_created(MockSurface(1));
        first.bridge_mut().surface_changed(1, 640, 480);
        first.bridge_mut().surface_destroyed();
        drop(first);

        let mut window = MockWindow::new();
        let mut second = create(&runtime, &mut window, SavedState::Present, &process);
        assert!(!second.initialized_process());
        assert_eq!(window.calls, expected_window_calls(LayoutParams::match_parent()));
        assert_eq!(second.bridge().state(), SurfaceState::NoSurface);
        assert_eq!(second.bridge().relayed(), 0);

        second.bridge_mut().surface_created(MockSurface(2));
        assert_eq!(
            runtime.calls().last(),
            Some(&NativeCall::SurfaceAvailable(MockSurface(2)))
        );
        assert_eq!(runtime.global_init_count(), 1);
        runtime.wait_for_entries(1, ENTRY_WAIT);
        assert_eq!(runtime.entries().len(), 1);
    }

    /// Changes the process-wide config from `global_init`, the way an embedder applying its own
    /// settings would.
    struct ConfigUpdatingRuntime {
        inner: MockRuntime,
    }

    impl NativeRuntime for ConfigUpdatingRuntime {
        type Surface = MockSurface;

        fn global_init(&self) {
            Config::update(|config| config.warn_on_out_of_order_events = true);
            self.inner.global_init();
        }

        fn entry_point(&self, name: &str) {
            self.inner.entry_point(name);
        }

        fn surface_available(&self, surface: MockSurface) {
            self.inner.surface_available(surface);
        }

        fn dimensions_updated(&self, width: i32, height: i32) {
            self.inner.dimensions_updated(width, height);
        }

        fn surface_unavailable(&self) {
            self.inner.surface_unavailable();
        }
    }

    #[test]
    fn test_global_init_may_update_current_config() {
        let runtime = Arc::new(ConfigUpdatingRuntime {
            inner: MockRuntime::new(),
        });
        let (done_tx, done_rx) = std::sync::mpsc::channel();

        let creator = {
            let runtime = runtime.clone();
            std::thread::spawn(move || {
                let process = ProcessInitFlag::new();
                let root = LifecycleRoot::create_with_current_config(
                    runtime,
                    &mut MockWindow::new(),
                    SavedState::Absent,
                    &process,
                )
                .map(|root| root.initialized_process());
                let _ = done_tx.send(root.is_ok() && root.unwrap_or(false));
            })
        };

        assert_eq!(done_rx.recv_timeout(ENTRY_WAIT), Ok(true));
        creator.join().unwrap();
        assert_eq!(runtime.inner.global_init_count(), 1);
    }

    #[test]
    fn test_failed_worker_spawn_leaves_process_claimed() {
        let runtime = Arc::new(MockRuntime::new());
        let process = ProcessInitFlag::new();
        let config = Config {
            worker_thread_name: "bad\0name".into(),
            ..Config::default()
        };

        let result = LifecycleRoot::create(
            runtime.clone(),
            &mut MockWindow::new(),
            SavedState::Absent,
            &process,
            &config,
        );
        assert!(result.is_err());
        assert!(process.is_set());
        assert!(process.worker().is_none());

        // A later fresh creation does not retry
        let root = create(&runtime, &mut MockWindow::new(), SavedState::Absent, &process);
        assert!(!root.initialized_process());
        assert_eq!(runtime.global_init_count(), 1);
    }
}
