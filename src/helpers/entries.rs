//! OpenCore configuration entries synthesized by the file helpers.
//!
//! Each entry converts into a `Node::Mapping` whose keys match the entry's
//! schema in OpenCore's `config.plist`, in schema order.

use crate::document::node::Node;

/// An entry in the `ACPI.Add` list.
#[derive(Debug, Clone, PartialEq)]
pub struct AcpiEntry {
    pub comment: String,
    pub enabled: bool,
    pub path: String,
}

/// A kernel extension entry in the `Kernel.Add` list.
#[derive(Debug, Clone, PartialEq)]
pub struct Kext {
    pub arch: String,
    pub bundle_path: String,
    pub comment: String,
    pub enabled: bool,
    pub executable_path: String,
    pub max_kernel: String,
    pub min_kernel: String,
    pub plist_path: String,
}

/// An entry in the `Misc.Tools` list.
#[derive(Debug, Clone, PartialEq)]
pub struct Tool {
    pub arguments: String,
    pub auxiliary: bool,
    pub comment: String,
    pub enabled: bool,
    pub flavour: String,
    pub full_nvram_access: bool,
    pub name: String,
    pub path: String,
    pub real_path: bool,
    pub text_mode: bool,
}

/// A UEFI driver entry in the `UEFI.Drivers` list.
#[derive(Debug, Clone, PartialEq)]
pub struct Driver {
    pub comment: String,
    pub enabled: bool,
    pub path: String,
    pub load_early: bool,
    pub arguments: String,
}

impl From<AcpiEntry> for Node {
    fn from(entry: AcpiEntry) -> Self {
        [
            ("Comment", Node::from(entry.comment)),
            ("Enabled", Node::from(entry.enabled)),
            ("Path", Node::from(entry.path)),
        ]
        .into_iter()
        .collect()
    }
}

impl From<Kext> for Node {
    fn from(kext: Kext) -> Self {
        [
            ("Arch", Node::from(kext.arch)),
            ("BundlePath", Node::from(kext.bundle_path)),
            ("Comment", Node::from(kext.comment)),
            ("Enabled", Node::from(kext.enabled)),
            ("ExecutablePath", Node::from(kext.executable_path)),
            ("MaxKernel", Node::from(kext.max_kernel)),
            ("MinKernel", Node::from(kext.min_kernel)),
            ("PlistPath", Node::from(kext.plist_path)),
        ]
        .into_iter()
        .collect()
    }
}

impl From<Tool> for Node {
    fn from(tool: Tool) -> Self {
        [
            ("Arguments", Node::from(tool.arguments)),
            ("Auxiliary", Node::from(tool.auxiliary)),
            ("Comment", Node::from(tool.comment)),
            ("Enabled", Node::from(tool.enabled)),
            ("Flavour", Node::from(tool.flavour)),
            ("FullNvramAccess", Node::from(tool.full_nvram_access)),
            ("Name", Node::from(tool.name)),
            ("Path", Node::from(tool.path)),
            ("RealPath", Node::from(tool.real_path)),
            ("TextMode", Node::from(tool.text_mode)),
        ]
        .into_iter()
        .collect()
    }
}

impl From<Driver> for Node {
    fn from(driver: Driver) -> Self {
        [
            ("Comment", Node::from(driver.comment)),
            ("Enabled", Node::from(driver.enabled)),
            ("Path", Node::from(driver.path)),
            ("LoadEarly", Node::from(driver.load_early)),
            ("Arguments", Node::from(driver.arguments)),
        ]
        .into_iter()
        .collect()
    }
}
