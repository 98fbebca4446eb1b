//! Selected keys of a kext bundle's `Contents/Info.plist`.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

const LIBKERN: &str = "com.apple.kpi.libkern";
const DEFAULT_MIN_KERNEL: &str = "8.0.0";

/// The parts of a kext's Info.plist needed to build a `Kernel.Add` entry.
#[derive(Debug, Default, Deserialize)]
pub struct KextInfo {
    #[serde(rename = "CFBundleExecutable", default)]
    pub bundle_executable: String,
    #[serde(rename = "OSBundleLibraries_x86_64", default)]
    pub libraries_x86_64: Option<HashMap<String, String>>,
    #[serde(rename = "OSBundleLibraries", default)]
    pub libraries: HashMap<String, String>,
}

impl KextInfo {
    /// Reads `Info.plist` from `path`.
    pub fn load(path: &Path) -> Result<Self, plist::Error> {
        plist::from_file(path)
    }

    /// Minimum kernel version the kext declares through its libkern dependency.
    ///
    /// The x86_64 library table wins whenever it is present, even if it lacks
    /// the libkern key.
    pub fn min_kernel(&self) -> String {
        let libkern = match &self.libraries_x86_64 {
            Some(libraries) => libraries.get(LIBKERN),
            None => self.libraries.get(LIBKERN),
        };
        libkern
            .cloned()
            .unwrap_or_else(|| DEFAULT_MIN_KERNEL.to_string())
    }

    /// Executable path relative to the bundle root.
    pub fn executable_path(&self) -> String {
        if self.bundle_executable.is_empty() {
            "Contents/MacOS".to_string()
        } else {
            format!("Contents/MacOS/{}", self.bundle_executable)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn libraries(version: &str) -> HashMap<String, String> {
        HashMap::from([(LIBKERN.to_string(), version.to_string())])
    }

    #[test]
    fn test_min_kernel_defaults() {
        assert_eq!(KextInfo::default().min_kernel(), "8.0.0");
    }

    #[test]
    fn test_min_kernel_prefers_x86_64_table() {
        let info = KextInfo {
            libraries_x86_64: Some(libraries("12.0.0")),
            libraries: libraries("10.0.0"),
            ..KextInfo::default()
        };
        assert_eq!(info.min_kernel(), "12.0.0");
    }

    #[test]
    fn test_min_kernel_x86_64_table_without_libkern() {
        let info = KextInfo {
            libraries_x86_64: Some(HashMap::new()),
            libraries: libraries("10.0.0"),
            ..KextInfo::default()
        };
        assert_eq!(info.min_kernel(), "8.0.0");
    }

    #[test]
    fn test_executable_path() {
        let info = KextInfo {
            bundle_executable: "Lilu".to_string(),
            ..KextInfo::default()
        };
        assert_eq!(info.executable_path(), "Contents/MacOS/Lilu");
    }
}
