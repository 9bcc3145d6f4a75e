use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::backtrace::Backtrace;
use std::fmt::Debug;

#[derive(Debug)]
pub struct PlatformError {
    pub error_type: PlatformErrorType,
    pub backtrace: Backtrace,
}

#[derive(Debug)]
pub enum PlatformErrorType {
    Unknown,
    Error(String),
}

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.error_type {
            PlatformErrorType::Unknown => write!(f, "unknown platform error"),
            PlatformErrorType::Error(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for PlatformError {}

impl From<PlatformErrorType> for PlatformError {
    fn from(error_type: PlatformErrorType) -> Self {
        Self {
            error_type,
            backtrace: Backtrace::capture(),
        }
    }
}

impl From<&str> for PlatformError {
    fn from(error: &str) -> Self {
        PlatformErrorType::Error(error.to_string()).into()
    }
}

impl From<String> for PlatformError {
    fn from(error: String) -> Self {
        PlatformErrorType::Error(error).into()
    }
}

impl From<()> for PlatformError {
    fn from(_: ()) -> Self {
        PlatformErrorType::Unknown.into()
    }
}

pub type PlatformResult<T> = Result<T, PlatformError>;

/// `WindowManager.LayoutParams.FLAG_KEEP_SCREEN_ON`
pub const FLAG_KEEP_SCREEN_ON: u32 = 0x0000_0080;

/// System UI visibility flags applied to the window's decor view on every activity creation.
///
/// Each field maps to one `View.SYSTEM_UI_FLAG_*` bit, see [`DisplayFlags::bits`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DisplayFlags {
    /// Dim the system bars
    pub low_profile: bool,
    /// Hide the navigation bar
    pub hide_navigation: bool,
    /// Hide the status bar
    pub fullscreen: bool,
    /// Keep the content layout stable while system bars come and go
    pub layout_stable: bool,
    /// Lay the content out as if the navigation bar were hidden
    pub layout_hide_navigation: bool,
    /// Lay the content out as if the status bar were hidden
    pub layout_fullscreen: bool,
    /// Stay immersive after the user interacts with the screen
    pub immersive: bool,
    /// Like `immersive`, but system bars revealed by a swipe hide again on their own
    pub immersive_sticky: bool,
}

impl DisplayFlags {
    pub const LOW_PROFILE: u32 = 0x0000_0001;
    pub const HIDE_NAVIGATION: u32 = 0x0000_0002;
    pub const FULLSCREEN: u32 = 0x0000_0004;
    pub const LAYOUT_STABLE: u32 = 0x0000_0100;
    pub const LAYOUT_HIDE_NAVIGATION: u32 = 0x0000_0200;
    pub const LAYOUT_FULLSCREEN: u32 = 0x0000_0400;
    pub const IMMERSIVE: u32 = 0x0000_0800;
    pub const IMMERSIVE_STICKY: u32 = 0x0000_1000;

    /// No flags set; the window keeps its default chrome.
    pub fn none() -> Self {
        Self {
            low_profile: false,
            hide_navigation: false,
            fullscreen: false,
            layout_stable: false,
            layout_hide_navigation: false,
            layout_fullscreen: false,
            immersive: false,
            immersive_sticky: false,
        }
    }

    pub fn bits(&self) -> u32 {
        [
            (self.low_profile, Self::LOW_PROFILE),
            (self.hide_navigation, Self::HIDE_NAVIGATION),
            (self.fullscreen, Self::FULLSCREEN),
            (self.layout_stable, Self::LAYOUT_STABLE),
            (self.layout_hide_navigation, Self::LAYOUT_HIDE_NAVIGATION),
            (self.layout_fullscreen, Self::LAYOUT_FULLSCREEN),
            (self.immersive, Self::IMMERSIVE),
            (self.immersive_sticky, Self::IMMERSIVE_STICKY),
        ]
        .iter()
        .filter(|(enabled, _)| *enabled)
        .fold(0, |bits, (_, flag)| bits | flag)
    }
}

impl Default for DisplayFlags {
    fn default() -> Self {
        Self {
            layout_fullscreen: true,
            layout_stable: true,
            low_profile: true,
            fullscreen: true,
            hide_navigation: true,
            immersive_sticky: true,
            ..Self::none()
        }
    }
}

/// Width/height pair as handed to `ViewGroup.LayoutParams`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutParams {
    pub width: i32,
    pub height: i32,
}

impl LayoutParams {
    pub const MATCH_PARENT: i32 = -1;

    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn match_parent() -> Self {
        Self::new(Self::MATCH_PARENT, Self::MATCH_PARENT)
    }
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self::match_parent()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}
