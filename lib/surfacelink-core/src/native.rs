//! Helpers for the native side of the bridge.
//!
//! The bridge only relays surface notifications; it never synchronizes them with the worker
//! thread. A runtime written in Rust can use [`SurfaceSlot`] to publish and retire the surface
//! safely across the two threads.

use crate::platform::{NativeRuntime, Size};
use log::{debug, info, trace, warn};
use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

#[derive(Debug)]
struct SlotState<S> {
    surface: Option<S>,
    size: Option<Size>,
    generation: u64,
}

/// Holds the current surface handle for a native runtime.
///
/// Written from the UI thread by the surface notifications, read from the worker thread through
/// [`SurfaceSlot::with_surface`]. [`SurfaceSlot::retire`] waits for any in-progress
/// `with_surface` call, so once `surface_unavailable` has retired the slot no code is still using
/// the handle.
#[derive(Debug)]
pub struct SurfaceSlot<S> {
    state: Mutex<SlotState<S>>,
}

impl<S> SurfaceSlot<S> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SlotState {
                surface: None,
                size: None,
                generation: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SlotState<S>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes `surface` current. Returns the new generation.
    ///
    /// The size is cleared; the OS follows up with a dimensions notification.
    pub fn publish(&self, surface: S) -> u64 {
        let mut state = self.lock();
        state.surface = Some(surface);
        state.size = None;
        state.generation += 1;
        state.generation
    }

    /// Records new dimensions for the current surface. Ignored, returning `false`, when no surface
    /// is published.
    pub fn resize(&self, width: i32, height: i32) -> bool {
        let mut state = self.lock();
        if state.surface.is_none() {
            return false;
        }
        state.size = Some(Size::new(width, height));
        true
    }

    /// Takes the surface out of the slot, blocking until no `with_surface` call is using it.
    pub fn retire(&self) -> Option<S> {
        let mut state = self.lock();
        state.size = None;
        state.surface.take()
    }

    /// Runs `f` with the current surface and its last known size. Returns `None` without calling
    /// `f` when no surface is published.
    ///
    /// The slot stays locked while `f` runs, keep it short (one frame).
    pub fn with_surface<F, T>(&self, f: F) -> Option<T>
    where
        F: FnOnce(&S, Option<Size>) -> T,
    {
        let state = self.lock();
        let size = state.size;
        state.surface.as_ref().map(|surface| f(surface, size))
    }

    pub fn is_live(&self) -> bool {
        self.lock().surface.is_some()
    }

    pub fn size(&self) -> Option<Size> {
        self.lock().size
    }

    /// Number of surfaces published so far. Lets a render loop notice a swapped surface.
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }
}

impl<S> Default for SurfaceSlot<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// A minimal [`NativeRuntime`] built on [`SurfaceSlot`]: its entry point "renders" a frame to the
/// current surface every `frame_interval` and counts it. Never returns from `entry_point`.
#[derive(Debug)]
pub struct DemoRuntime<S> {
    slot: SurfaceSlot<S>,
    frame_interval: Duration,
    frames: AtomicU64,
    global_inits: AtomicUsize,
}

impl<S> DemoRuntime<S> {
    pub fn new(frame_interval: Duration) -> Self {
        Self {
            slot: SurfaceSlot::new(),
            frame_interval,
            frames: AtomicU64::new(0),
            global_inits: AtomicUsize::new(0),
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::SeqCst)
    }

    pub fn global_inits(&self) -> usize {
        self.global_inits.load(Ordering::SeqCst)
    }

    pub fn slot(&self) -> &SurfaceSlot<S> {
        &self.slot
    }
}

impl<S: Debug + Send + 'static> NativeRuntime for DemoRuntime<S> {
    type Surface = S;

    fn global_init(&self) {
        self.global_inits.fetch_add(1, Ordering::SeqCst);
        info!("Native global init");
    }

    fn entry_point(&self, name: &str) {
        info!("Native runtime \"{name}\" running");

        let mut last_generation = 0;
        loop {
            let generation = self.slot.generation();
            let rendered = self.slot.with_surface(|surface, size| {
                if generation != last_generation {
                    debug!("Rendering to {surface:?}");
                }
                match size {
                    Some(size) => trace!(
                        "Frame {} ({}x{})",
                        self.frames(),
                        size.width,
                        size.height
                    ),
                    None => trace!("Frame {} (unsized)", self.frames()),
                }
            });

            if rendered.is_some() {
                self.frames.fetch_add(1, Ordering::SeqCst);
                last_generation = generation;
            }
            thread::sleep(self.frame_interval);
        }
    }

    fn surface_available(&self, surface: S) {
        debug!("Surface available: {surface:?}");
        let generation = self.slot.publish(surface);
        trace!("Surface generation {generation}");
    }

    fn dimensions_updated(&self, width: i32, height: i32) {
        if self.slot.resize(width, height) {
            debug!("Surface resized to {width}x{height}");
        } else {
            warn!("Dimensions {width}x{height} arrived with no surface, ignoring");
        }
    }

    fn surface_unavailable(&self) {
        match self.slot.retire() {
            Some(surface) => debug!("Surface retired: {surface:?}"),
            None => warn!("Surface revoked but none was available"),
        }
    }
}
