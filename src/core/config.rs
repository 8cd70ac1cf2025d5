//! Configuration module - Discovery constants and directive keywords

/// Config discovery on a local disk
pub mod probe {
    /// Directories searched, in order. The empty entry is the disk root.
    pub const DIRS: [&str; 5] = ["boot/isolinux", "isolinux", "boot/syslinux", "syslinux", ""];

    /// Config filenames tried inside each directory, in order.
    pub const CONFIGS: [&str; 2] = ["isolinux.cfg", "syslinux.cfg"];
}

/// URL schemes
pub mod schemes {
    /// Local files
    pub const FILE: &str = "file";

    /// Scheme used for references that carry none
    pub const DEFAULT: &str = FILE;
}

/// Directive keywords (matched lower-cased)
pub mod directives {
    pub const DEFAULT: &str = "default";
    pub const NERF_DEFAULT: &str = "nerfdefault";
    pub const INCLUDE: &str = "include";
    pub const MENU: &str = "menu";
    pub const LABEL: &str = "label";
    pub const KERNEL: &str = "kernel";
    pub const LINUX: &str = "linux";
    pub const INITRD: &str = "initrd";
    pub const APPEND: &str = "append";

    /// `append -` clears the entry command line
    pub const APPEND_CLEAR: &str = "-";

    /// Kernel parameter scanned by the backfill pass
    pub const INITRD_PARAM: &str = "initrd";
}

/// Include handling
pub mod includes {
    /// Deepest chain of nested includes followed; deeper ones are skipped.
    pub const MAX_DEPTH: usize = 32;
}
