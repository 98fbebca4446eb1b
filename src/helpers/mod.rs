//! Value producers that build configuration entries from files.
//!
//! Scripts call these as `helpers.Name(args)`. The produced nodes are handed to
//! `set`/`append` like any other value; the mutation engine never looks inside
//! them.
//!
//! | Helper   | Argument          | Produces                    |
//! |----------|-------------------|-----------------------------|
//! | `Kext`   | `.kext` bundle    | a `Kernel.Add` entry        |
//! | `ACPI`   | compiled `.aml`   | an `ACPI.Add` entry         |
//! | `Tool`   | `.efi` tool       | a `Misc.Tools` entry        |
//! | `Driver` | `.efi` driver     | a `UEFI.Drivers` entry      |

pub mod entries;
pub mod kext_info;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::document::node::{Node, Scalar};
use entries::{AcpiEntry, Driver, Kext, Tool};
use kext_info::KextInfo;

/// Tools that get `FullNvramAccess`.
const FULL_NVRAM_ACCESS_TOOLS: &[&str] = &["CleanNvram.efi", "ControlMsrE2.efi", "OpenControl.efi"];

/// Drivers that get `LoadEarly`.
const LOAD_EARLY_DRIVERS: &[&str] = &["OpenVariableRuntimeDxe.efi"];

/// Errors raised by value producers.
#[derive(Debug, thiserror::Error)]
pub enum HelperError {
    #[error("unknown helper \"{0}\"")]
    Unknown(String),
    #[error("{name}: {message}")]
    BadArguments { name: String, message: String },
    #[error("{name}: cannot open \"{path}\": {source}")]
    Missing {
        name: String,
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Something that can synthesize a sub-tree on request from a script.
pub trait ValueProducer {
    /// Produces the value for helper `name` called with `args`.
    fn produce(&self, name: &str, args: &[Node]) -> Result<Node, HelperError>;
}

/// Builds OpenCore entries by inspecting files on disk.
///
/// Relative paths are resolved against `base_dir` when one is set, otherwise
/// against the working directory. Entry paths always use the file's base name.
#[derive(Debug, Clone, Default)]
pub struct FileHelpers {
    base_dir: Option<PathBuf>,
}

impl FileHelpers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves relative helper arguments against `dir`.
    pub fn rooted<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            base_dir: Some(dir.into()),
        }
    }

    fn locate(&self, name: &str, filename: &str) -> Result<PathBuf, HelperError> {
        let path = match &self.base_dir {
            Some(dir) => dir.join(filename),
            None => PathBuf::from(filename),
        };

        fs::metadata(&path).map_err(|source| HelperError::Missing {
            name: name.to_string(),
            path: path.display().to_string(),
            source,
        })?;

        Ok(path)
    }

    /// Returns a `Kernel.Add` entry for the kext bundle at `filename`.
    pub fn kext(&self, filename: &str) -> Result<Kext, HelperError> {
        let path = self.locate("Kext", filename)?;
        let plist_path = "Contents/Info.plist";

        let (executable_path, min_kernel) = match KextInfo::load(&path.join(plist_path)) {
            Ok(info) => (info.executable_path(), info.min_kernel()),
            Err(e) => {
                debug!(kext = filename, error = %e, "no readable Info.plist, using defaults");
                (String::new(), "8.0.0".to_string())
            }
        };

        Ok(Kext {
            arch: "Any".to_string(),
            bundle_path: base_name(&path),
            comment: String::new(),
            enabled: true,
            executable_path,
            max_kernel: String::new(),
            min_kernel,
            plist_path: plist_path.to_string(),
        })
    }

    /// Returns an `ACPI.Add` entry for the compiled table at `filename`.
    pub fn acpi(&self, filename: &str) -> Result<AcpiEntry, HelperError> {
        let path = self.locate("ACPI", filename)?;

        Ok(AcpiEntry {
            comment: String::new(),
            enabled: true,
            path: base_name(&path),
        })
    }

    /// Returns a `Misc.Tools` entry for the tool at `filename`.
    pub fn tool(&self, filename: &str) -> Result<Tool, HelperError> {
        let path = self.locate("Tool", filename)?;
        let name_ext = base_name(&path);
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Tool {
            arguments: String::new(),
            auxiliary: true,
            comment: String::new(),
            enabled: true,
            flavour: "Auto".to_string(),
            full_nvram_access: FULL_NVRAM_ACCESS_TOOLS.contains(&name_ext.as_str()),
            name,
            path: name_ext,
            real_path: false,
            text_mode: false,
        })
    }

    /// Returns a `UEFI.Drivers` entry for the driver at `filename`.
    pub fn driver(&self, filename: &str) -> Result<Driver, HelperError> {
        let path = self.locate("Driver", filename)?;
        let name_ext = base_name(&path);

        Ok(Driver {
            comment: String::new(),
            enabled: true,
            load_early: LOAD_EARLY_DRIVERS.contains(&name_ext.as_str()),
            path: name_ext,
            arguments: String::new(),
        })
    }
}

impl ValueProducer for FileHelpers {
    fn produce(&self, name: &str, args: &[Node]) -> Result<Node, HelperError> {
        let filename = match args {
            [Node::Scalar(Scalar::String(filename))] => filename.as_str(),
            [other] => {
                return Err(HelperError::BadArguments {
                    name: name.to_string(),
                    message: format!("expected a file name, found {}", other.kind()),
                })
            }
            _ => {
                return Err(HelperError::BadArguments {
                    name: name.to_string(),
                    message: format!("expected 1 argument, found {}", args.len()),
                })
            }
        };

        debug!(helper = name, filename, "producing entry");

        match name {
            "Kext" => self.kext(filename).map(Node::from),
            "ACPI" => self.acpi(filename).map(Node::from),
            "Tool" => self.tool(filename).map(Node::from),
            "Driver" => self.driver(filename).map(Node::from),
            _ => Err(HelperError::Unknown(name.to_string())),
        }
    }
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_helper() {
        let helpers = FileHelpers::new();
        let err = helpers.produce("Ssdt", &[Node::from("x")]).unwrap_err();
        assert!(matches!(err, HelperError::Unknown(ref n) if n == "Ssdt"));
    }

    #[test]
    fn test_bad_arguments() {
        let helpers = FileHelpers::new();
        let err = helpers.produce("Tool", &[]).unwrap_err();
        assert_eq!(err.to_string(), "Tool: expected 1 argument, found 0");

        let err = helpers.produce("Tool", &[Node::from(3)]).unwrap_err();
        assert_eq!(err.to_string(), "Tool: expected a file name, found integer");
    }

    #[test]
    fn test_missing_file() {
        let helpers = FileHelpers::new();
        let err = helpers
            .produce("Driver", &[Node::from("/nonexistent/OpenRuntime.efi")])
            .unwrap_err();
        assert!(matches!(err, HelperError::Missing { .. }));
    }
}
