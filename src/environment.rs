use std::path::PathBuf;

/// Snapshot of the environment values the cleanup locations are derived from.
///
/// The engine never reads process state itself; build one of these with
/// [`Environment::from_process`] at the edge, or with
/// [`Environment::builder`] in tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    /// `%USERPROFILE%` (home directory elsewhere).
    pub user_profile: Option<PathBuf>,
    /// `%TEMP%`.
    pub temp: Option<PathBuf>,
    /// `%TMP%`.
    pub tmp: Option<PathBuf>,
    /// The Windows directory, usually `C:\Windows`. `None` off Windows.
    pub windows_dir: Option<PathBuf>,
    /// `%LOCALAPPDATA%`. Derived from the profile when unset.
    pub local_app_data: Option<PathBuf>,
}

impl Environment {
    pub fn builder() -> EnvironmentBuilder {
        EnvironmentBuilder::default()
    }

    pub fn from_process() -> Self {
        let var = |name: &str| {
            std::env::var_os(name)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };

        let windows_dir = if cfg!(windows) {
            var("SystemRoot")
                .or_else(|| var("windir"))
                .or_else(|| Some(PathBuf::from(r"C:\Windows")))
        } else {
            None
        };

        Self {
            user_profile: var("USERPROFILE").or_else(dirs::home_dir),
            temp: var("TEMP"),
            tmp: var("TMP"),
            windows_dir,
            local_app_data: var("LOCALAPPDATA"),
        }
    }

    /// `%LOCALAPPDATA%`, falling back to `%USERPROFILE%\AppData\Local`.
    pub fn local_app_data(&self) -> Option<PathBuf> {
        self.local_app_data.clone().or_else(|| {
            self.user_profile
                .as_ref()
                .map(|p| p.join("AppData").join("Local"))
        })
    }

    /// Every temp root, in lookup order: `%TEMP%`, `%TMP%`, the Windows temp
    /// directory and the profile's local temp directory.
    pub fn temp_roots(&self) -> Vec<PathBuf> {
        [
            self.temp.clone(),
            self.tmp.clone(),
            self.windows_dir.as_ref().map(|w| w.join("Temp")),
            self.local_app_data().map(|l| l.join("Temp")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    pub fn system_temp(&self) -> Option<PathBuf> {
        self.windows_dir.as_ref().map(|w| w.join("Temp"))
    }

    pub fn prefetch_dir(&self) -> Option<PathBuf> {
        self.windows_dir.as_ref().map(|w| w.join("Prefetch"))
    }

    pub fn software_distribution_dir(&self) -> Option<PathBuf> {
        self.windows_dir
            .as_ref()
            .map(|w| w.join("SoftwareDistribution"))
    }
}

/// Builds an [`Environment`] one value at a time; unset values stay `None`.
#[derive(Debug, Default)]
pub struct EnvironmentBuilder {
    env: Environment,
}

impl EnvironmentBuilder {
    pub fn user_profile(mut self, path: impl Into<PathBuf>) -> Self {
        self.env.user_profile = Some(path.into());
        self
    }

    pub fn temp(mut self, path: impl Into<PathBuf>) -> Self {
        self.env.temp = Some(path.into());
        self
    }

    pub fn tmp(mut self, path: impl Into<PathBuf>) -> Self {
        self.env.tmp = Some(path.into());
        self
    }

    pub fn windows_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.env.windows_dir = Some(path.into());
        self
    }

    pub fn local_app_data(mut self, path: impl Into<PathBuf>) -> Self {
        self.env.local_app_data = Some(path.into());
        self
    }

    pub fn build(self) -> Environment {
        self.env
    }
}
