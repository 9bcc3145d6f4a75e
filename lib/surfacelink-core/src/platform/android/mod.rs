//! JNI entry points for the Android shell.
//!
//! The Java side is two thin classes (see `android/` at the repository root):
//! `dev.surfacelink.BridgeActivity` forwards `onCreate`, and `dev.surfacelink.BridgeSurfaceView`
//! forwards its `SurfaceHolder.Callback` methods. Everything else happens here, on the UI thread
//! that delivers those callbacks.

use crate::lifecycle::{LifecycleRoot, SavedState};
use crate::platform::{NativeRuntime, PlatformError, PlatformResult};
use crate::process::ProcessInitFlag;
use crate::surface_bridge::SurfaceBridge;
use jni::objects::{GlobalRef, JObject};
use jni::sys::{jboolean, jint, JNI_FALSE};
use jni::{JNIEnv, JavaVM};
use log::{error, warn};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

pub use window::JniWindow;

mod window;

/// Class name of the surface view attached on every activity creation.
pub const SURFACE_VIEW_CLASS: &str = "dev/surfacelink/BridgeSurfaceView";

/// An `android.view.Surface`, pinned by a JNI global reference.
///
/// Only valid until the runtime's `surface_unavailable` returns.
#[derive(Debug)]
pub struct AndroidSurface {
    surface: GlobalRef,
}

impl AndroidSurface {
    pub fn as_obj(&self) -> &JObject<'static> {
        self.surface.as_obj()
    }
}

pub type AndroidRuntime = dyn NativeRuntime<Surface = AndroidSurface>;

static RUNTIME: OnceLock<Arc<AndroidRuntime>> = OnceLock::new();
static CURRENT_ROOT: Mutex<Option<LifecycleRoot<AndroidRuntime>>> = Mutex::new(None);

impl From<jni::errors::Error> for PlatformError {
    fn from(error: jni::errors::Error) -> Self {
        format!("JNI call failed: {error}").into()
    }
}

/// Registers the runtime the bridge drives. Call once, typically from `JNI_OnLoad`, before the
/// activity is created.
pub fn register_runtime<R>(runtime: R) -> PlatformResult<()>
where
    R: NativeRuntime<Surface = AndroidSurface>,
{
    RUNTIME
        .set(Arc::new(runtime))
        .map_err(|_| PlatformError::from("Native runtime already registered"))
}

/// Attaches the worker thread to the JVM before handing it to the runtime, so the entry point can
/// make JNI calls.
struct JvmAttachedRuntime {
    vm: JavaVM,
    inner: Arc<AndroidRuntime>,
}

impl NativeRuntime for JvmAttachedRuntime {
    type Surface = AndroidSurface;

    fn global_init(&self) {
        self.inner.global_init();
    }

    fn entry_point(&self, name: &str) {
        if let Err(e) = self.vm.attach_current_thread_permanently() {
            error!("Could not attach worker thread to the JVM: {e}");
        }
        self.inner.entry_point(name);
    }

    fn surface_available(&self, surface: AndroidSurface) {
        self.inner.surface_available(surface);
    }

    fn dimensions_updated(&self, width: i32, height: i32) {
        self.inner.dimensions_updated(width, height);
    }

    fn surface_unavailable(&self) {
        self.inner.surface_unavailable();
    }
}

fn clear_pending_exception(env: &mut JNIEnv) {
    if env.exception_check().unwrap_or(false) {
        let _ = env.exception_describe();
        let _ = env.exception_clear();
    }
}

fn with_bridge<F>(callback: &str, f: F)
where
    F: FnOnce(&mut SurfaceBridge<AndroidRuntime>),
{
    let mut root = CURRENT_ROOT.lock().unwrap_or_else(PoisonError::into_inner);
    match root.as_mut() {
        Some(root) => f(root.bridge_mut()),
        None => error!("Surface {callback} with no activity created, dropping it"),
    }
}

#[no_mangle]
pub extern "system" fn Java_dev_surfacelink_BridgeActivity_nativeOnCreate<'local>(
    mut env: JNIEnv<'local>,
    activity: JObject<'local>,
    has_saved_state: jboolean,
) {
    let Some(runtime) = RUNTIME.get() else {
        error!("Activity created before a native runtime was registered");
        return;
    };

    let vm = match env.get_java_vm() {
        Ok(vm) => vm,
        Err(e) => {
            error!("Could not get the JavaVM: {e}");
            clear_pending_exception(&mut env);
            return;
        }
    };

    let runtime: Arc<AndroidRuntime> = Arc::new(JvmAttachedRuntime {
        vm,
        inner: runtime.clone(),
    });
    let saved_state = SavedState::from(has_saved_state != JNI_FALSE);

    let result = {
        let mut window = JniWindow::new(&mut env, &activity, SURFACE_VIEW_CLASS);
        LifecycleRoot::create_with_current_config(
            runtime,
            &mut window,
            saved_state,
            ProcessInitFlag::global(),
        )
    };

    match result {
        Ok(root) => {
            let mut current = CURRENT_ROOT.lock().unwrap_or_else(PoisonError::into_inner);
            if current.replace(root).is_some() {
                warn!("Replacing the surface bridge of a previous activity instance");
            }
        }
        Err(e) => {
            error!("Activity creation failed: {e}");
            clear_pending_exception(&mut env);
        }
    }
}

#[no_mangle]
pub extern "system" fn Java_dev_surfacelink_BridgeSurfaceView_nativeSurfaceCreated<'local>(
    mut env: JNIEnv<'local>,
    _view: JObject<'local>,
    surface: JObject<'local>,
) {
    let surface = match env.new_global_ref(&surface) {
        Ok(surface) => AndroidSurface { surface },
        Err(e) => {
            error!("Could not pin the created surface: {e}");
            clear_pending_exception(&mut env);
            return;
        }
    };

    with_bridge("created", |bridge| bridge.surface_created(surface));
}

#[no_mangle]
pub extern "system" fn Java_dev_surfacelink_BridgeSurfaceView_nativeSurfaceChanged<'local>(
    _env: JNIEnv<'local>,
    _view: JObject<'local>,
    format: jint,
    width: jint,
    height: jint,
) {
    with_bridge("changed", |bridge| bridge.surface_changed(format, width, height));
}

#[no_mangle]
pub extern "system" fn Java_dev_surfacelink_BridgeSurfaceView_nativeSurfaceDestroyed<'local>(
    _env: JNIEnv<'local>,
    _view: JObject<'local>,
) {
    with_bridge("destroyed", |bridge| bridge.surface_destroyed());
}
