use crate::platform::{NativeRuntime, Size};
use log::{trace, warn};
use std::fmt::Debug;
use std::sync::Arc;

/// A surface callback as delivered by the OS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent<S> {
    Created(S),
    DimensionsChanged { width: i32, height: i32 },
    Destroyed,
}

impl<S> SurfaceEvent<S> {
    pub fn name(&self) -> &'static str {
        match self {
            SurfaceEvent::Created(_) => "created",
            SurfaceEvent::DimensionsChanged { .. } => "dimensions changed",
            SurfaceEvent::Destroyed => "destroyed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceState {
    NoSurface,
    SurfaceLive,
}

impl SurfaceState {
    /// Whether the OS is expected to deliver `event` in this state.
    pub fn accepts<S>(&self, event: &SurfaceEvent<S>) -> bool {
        match (self, event) {
            (SurfaceState::NoSurface, SurfaceEvent::Created(_)) => true,
            (SurfaceState::SurfaceLive, SurfaceEvent::DimensionsChanged { .. }) => true,
            (SurfaceState::SurfaceLive, SurfaceEvent::Destroyed) => true,
            _ => false,
        }
    }

    fn after<S>(&self, event: &SurfaceEvent<S>) -> SurfaceState {
        match event {
            SurfaceEvent::Created(_) => SurfaceState::SurfaceLive,
            SurfaceEvent::DimensionsChanged { .. } => *self,
            SurfaceEvent::Destroyed => SurfaceState::NoSurface,
        }
    }
}

/// Relays the OS surface callbacks of one surface view to the native runtime.
///
/// Every event is forwarded synchronously, in delivery order, exactly once. Nothing is buffered,
/// dropped, or synthesized. The tracked [`SurfaceState`] is only used for diagnostics: an event the
/// OS should not have sent in the current state is still relayed, with a warning.
pub struct SurfaceBridge<R: NativeRuntime + ?Sized> {
    runtime: Arc<R>,
    state: SurfaceState,
    size: Option<Size>,
    relayed: u64,
    warn_out_of_order: bool,
}

impl<R: NativeRuntime + ?Sized> SurfaceBridge<R> {
    pub fn new(runtime: Arc<R>, warn_out_of_order: bool) -> Self {
        Self {
            runtime,
            state: SurfaceState::NoSurface,
            size: None,
            relayed: 0,
            warn_out_of_order,
        }
    }

    pub fn handle_event(&mut self, event: SurfaceEvent<R::Surface>) {
        if self.warn_out_of_order && !self.state.accepts(&event) {
            warn!(
                "Surface {} while {:?}, relaying as-is",
                event.name(),
                self.state
            );
        }

        let next_state = self.state.after(&event);

        match event {
            SurfaceEvent::Created(surface) => {
                trace!("Relaying surface available");
                self.runtime.surface_available(surface);
                self.size = None;
            }
            SurfaceEvent::DimensionsChanged { width, height } => {
                trace!("Relaying dimensions {width}x{height}");
                self.runtime.dimensions_updated(width, height);
                if next_state == SurfaceState::SurfaceLive {
                    self.size = Some(Size::new(width, height));
                }
            }
            SurfaceEvent::Destroyed => {
                trace!("Relaying surface unavailable");
                self.runtime.surface_unavailable();
                self.size = None;
            }
        }

        self.state = next_state;
        self.relayed += 1;
    }

    pub fn surface_created(&mut self, surface: R::Surface) {
        self.handle_event(SurfaceEvent::Created(surface));
    }

    /// `SurfaceHolder.Callback.surfaceChanged`. The pixel format is not forwarded.
    pub fn surface_changed(&mut self, _format: i32, width: i32, height: i32) {
        self.handle_event(SurfaceEvent::DimensionsChanged { width, height });
    }

    pub fn surface_destroyed(&mut self) {
        self.handle_event(SurfaceEvent::Destroyed);
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    /// Last dimensions relayed for the live surface, if any were.
    pub fn current_size(&self) -> Option<Size> {
        self.size
    }

    /// Number of events relayed so far.
    pub fn relayed(&self) -> u64 {
        self.relayed
    }
}

impl<R: NativeRuntime + ?Sized> Debug for SurfaceBridge<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceBridge")
            .field("state", &self.state)
            .field("size", &self.size)
            .field("relayed", &self.relayed)
            .finish()
    }
}
