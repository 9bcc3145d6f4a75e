use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Failed to read scenario '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse scenario '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

/// One thing the OS does to the app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostStep {
    /// `onCreate`, with or without a saved instance state
    Create {
        #[serde(default)]
        saved_state: bool,
    },
    /// A new surface followed by its first dimensions, the way `SurfaceView` reports it
    SurfaceCreated { width: i32, height: i32 },
    SurfaceChanged { width: i32, height: i32 },
    SurfaceDestroyed,
    SleepMs(u64),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(with = "serde_yaml::with::singleton_map_recursive")]
    pub steps: Vec<HostStep>,
}

impl Scenario {
    /// First launch, a rotation, then an OS-driven re-creation with saved state.
    pub fn builtin() -> Self {
        Self {
            steps: vec![
                HostStep::Create { saved_state: false },
                HostStep::SurfaceCreated {
                    width: 640,
                    height: 480,
                },
                HostStep::SleepMs(100),
                HostStep::SurfaceDestroyed,
                HostStep::SurfaceCreated {
                    width: 480,
                    height: 640,
                },
                HostStep::SleepMs(100),
                HostStep::SurfaceDestroyed,
                HostStep::Create { saved_state: true },
                HostStep::SurfaceCreated {
                    width: 480,
                    height: 640,
                },
            ],
        }
    }

    pub fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(contents)
    }

    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let contents = fs::read_to_string(path).map_err(|source| ScenarioError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&contents).map_err(|source| ScenarioError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_steps() {
        let yaml = r#"
steps:
  - create:
      saved_state: false
  - surface_created:
      width: 640
      height: 480
  - surface_changed: { width: 800, height: 600 }
  - sleep_ms: 20
  - surface_destroyed
  - create: {}
"#;
        let scenario = Scenario::from_yaml(yaml).unwrap();
        assert_eq!(
            scenario.steps,
            vec![
                HostStep::Create { saved_state: false },
                HostStep::SurfaceCreated {
                    width: 640,
                    height: 480
                },
                HostStep::SurfaceChanged {
                    width: 800,
                    height: 600
                },
                HostStep::SleepMs(20),
                HostStep::SurfaceDestroyed,
                HostStep::Create { saved_state: false },
            ]
        );
    }

    #[test]
    fn test_unknown_step_is_an_error() {
        assert!(Scenario::from_yaml("steps:\n  - explode\n").is_err());
    }

    #[test]
    fn test_builtin_starts_fresh() {
        let scenario = Scenario::builtin();
        assert_eq!(
            scenario.steps.first(),
            Some(&HostStep::Create { saved_state: false })
        );
        assert_eq!(
            scenario
                .steps
                .iter()
                .filter(|step| matches!(step, HostStep::Create { .. }))
                .count(),
            2
        );
    }
}
