use crate::platform::{LayoutParams, NativeRuntime, PlatformResult, PlatformWindowImpl};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockSurface(pub u32);

/// Surface notifications in the order the runtime received them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeCall {
    SurfaceAvailable(MockSurface),
    DimensionsUpdated(i32, i32),
    SurfaceUnavailable,
}

/// Records every boundary call. `entry_point` returns right away so tests don't leak blocked
/// threads.
#[derive(Debug, Default)]
pub struct MockRuntime {
    global_inits: AtomicUsize,
    entries: Mutex<Vec<String>>,
    entered: Condvar,
    calls: Mutex<Vec<NativeCall>>,
}

impl MockRuntime {
    pub fn new() -> Self {
        return Self::default();
    }

    pub fn global_init_count(&self) -> usize {
        return self.global_inits.load(Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<NativeCall> {
        return self.calls.lock().unwrap().clone();
    }

    pub fn entries(&self) -> Vec<String> {
        return self.entries.lock().unwrap().clone();
    }

    /// Blocks until `count` entry point calls have been seen or `timeout` passes.
    pub fn wait_for_entries(&self, count: usize, timeout: Duration) -> Vec<String> {
        let deadline = Instant::now() + timeout;
        let mut entries = self.entries.lock().unwrap();
        while entries.len() < count {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            entries = self.entered.wait_timeout(entries, deadline - now).unwrap().0;
        }
        return entries.clone();
    }
}

impl NativeRuntime for MockRuntime {
    type Surface = MockSurface;

    fn global_init(&self) {
        self.global_inits.fetch_add(1, Ordering::SeqCst);
    }

    fn entry_point(&self, name: &str) {
        self.entries.lock().unwrap().push(name.to_string());
        self.entered.notify_all();
    }

    fn surface_available(&self, surface: MockSurface) {
        self.calls
            .lock()
            .unwrap()
            .push(NativeCall::SurfaceAvailable(surface));
    }

    fn dimensions_updated(&self, width: i32, height: i32) {
        self.calls
            .lock()
            .unwrap()
            .push(NativeCall::DimensionsUpdated(width, height));
    }

    fn surface_unavailable(&self) {
        self.calls.lock().unwrap().push(NativeCall::SurfaceUnavailable);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowCall {
    SystemUiVisibility(u32),
    AddWindowFlags(u32),
    AddContentView(LayoutParams),
}

#[derive(Debug)]
pub struct MockWindow {
    pub calls: Vec<WindowCall>,
    pub content_layout: LayoutParams,
    pub fail_add_content_view: bool,
}

impl MockWindow {
    pub fn new() -> Self {
        return Self {
            calls: Vec::new(),
            content_layout: LayoutParams::match_parent(),
            fail_add_content_view: false,
        };
    }

    pub fn attached_views(&self) -> usize {
        return self
            .calls
            .iter()
            .filter(|call| matches!(call, WindowCall::AddContentView(_)))
            .count();
    }
}

impl PlatformWindowImpl for MockWindow {
    fn set_system_ui_visibility(&mut self, flags: u32) -> PlatformResult<()> {
        self.calls.push(WindowCall::SystemUiVisibility(flags));
        return Ok(());
    }

    fn add_window_flags(&mut self, flags: u32) -> PlatformResult<()> {
        self.calls.push(WindowCall::AddWindowFlags(flags));
        return Ok(());
    }

    fn content_layout(&mut self) -> PlatformResult<LayoutParams> {
        return Ok(self.content_layout);
    }

    fn add_content_view(&mut self, layout: LayoutParams) -> PlatformResult<()> {
        if self.fail_add_content_view {
            return Err("content view rejected".into());
        }
        self.calls.push(WindowCall::AddContentView(layout));
        return Ok(());
    }
}
