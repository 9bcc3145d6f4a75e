pub use common::*;
pub use traits::*;

mod common;
mod traits;

#[cfg(test)]
pub mod mock;

use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(target_os = "android")] {
        pub mod android;
        pub type PlatformSurface = android::AndroidSurface;
    }
}
