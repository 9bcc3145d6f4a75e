//! `libsurfacelink.so`, the library the Java shell loads.
//!
//! Registers the demo runtime when the JVM loads the library, so the `nativeOnCreate` and surface
//! exports in `surfacelink_core::platform::android` have something to drive. Empty on other
//! targets.

#![cfg(target_os = "android")]

use jni::sys::{jint, JNI_ERR, JNI_VERSION_1_6};
use jni::JavaVM;
use log::{error, info};
use std::ffi::c_void;
use std::time::Duration;
use surfacelink_core::platform::android::{register_runtime, AndroidSurface};
use surfacelink_core::DemoRuntime;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[no_mangle]
pub extern "system" fn JNI_OnLoad(_vm: JavaVM, _reserved: *mut c_void) -> jint {
    match register_runtime(DemoRuntime::<AndroidSurface>::new(FRAME_INTERVAL)) {
        Ok(()) => {
            info!("SurfaceLink {} loaded", surfacelink_core::version());
            JNI_VERSION_1_6
        }
        Err(e) => {
            error!("Could not register the native runtime: {e}");
            JNI_ERR
        }
    }
}
