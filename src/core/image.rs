//! Boot image records produced by the resolver.

use std::fmt;

use super::fetch::Resource;

/// One bootable Linux entry.
#[derive(Debug)]
pub struct LinuxImage {
    /// Identifier from the `label` directive.
    pub label: String,
    /// Display name; `menu label` changes this, never the identifier.
    pub name: String,
    /// Kernel command line, possibly empty.
    pub cmdline: String,
    pub kernel: Option<Resource>,
    pub initrd: Option<Resource>,
}

impl LinuxImage {
    /// A fresh entry for `label` inheriting `cmdline`.
    pub fn new(label: &str, cmdline: &str) -> Self {
        Self {
            label: label.to_string(),
            name: label.to_string(),
            cmdline: cmdline.to_string(),
            kernel: None,
            initrd: None,
        }
    }
}

impl fmt::Display for LinuxImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "LinuxImage(")?;
        writeln!(f, "  Name: {}", self.name)?;
        writeln!(f, "  Kernel: {}", describe(&self.kernel))?;
        writeln!(f, "  Initrd: {}", describe(&self.initrd))?;
        writeln!(f, "  Cmdline: {}", self.cmdline)?;
        write!(f, ")")
    }
}

fn describe(resource: &Option<Resource>) -> String {
    resource
        .as_ref()
        .map_or_else(|| "<nil>".to_string(), |r| r.url().to_string())
}
