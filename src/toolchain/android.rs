//! Android NDK directory layout.
//!
//! Resolves the per-architecture toolchain, sysroot, and GCC-compatibility
//! paths inside an NDK installation. The NDK root is usually left as the
//! `$ndk` substitution slot and expanded by the external writer at build
//! time, so all paths here use forward slashes and never touch the local
//! filesystem.

use crate::core::Arch;
use crate::util::paths::join_slots;

/// Default Android platform API level when preferences do not set one.
pub const DEFAULT_API_LEVEL: u32 = 21;

/// Resolved view of an NDK installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdkLayout {
    root: String,
    api_level: u32,
}

impl NdkLayout {
    /// Create a layout over an NDK root directory.
    ///
    /// `root` may be a concrete path or a substitution slot like `$ndk`.
    pub fn new(root: impl Into<String>, api_level: u32) -> Self {
        NdkLayout {
            root: root.into(),
            api_level,
        }
    }

    /// NDK root (path or substitution slot).
    pub fn root(&self) -> &str {
        &self.root
    }

    /// The NDK's name for the host OS/architecture running the build.
    pub fn host_tag() -> &'static str {
        if cfg!(target_os = "macos") {
            "darwin-x86_64"
        } else if cfg!(target_os = "windows") {
            "windows-x86_64"
        } else {
            "linux-x86_64"
        }
    }

    /// Directory holding the prebuilt LLVM toolchain binaries, with a
    /// trailing slash so it can serve directly as a tool-name prefix.
    pub fn llvm_bin_dir(&self) -> String {
        join_slots(&[
            &self.root,
            "toolchains",
            "llvm",
            "prebuilt",
            Self::host_tag(),
            "bin",
            "",
        ])
    }

    /// GCC-compatibility toolchain directory for an architecture, passed
    /// to clang via `-gcc-toolchain`.
    pub fn gcc_toolchain_dir(&self, arch: Arch) -> String {
        let name = format!("{}-4.9", gcc_toolchain_name(arch));
        join_slots(&[&self.root, "toolchains", &name, "prebuilt", Self::host_tag()])
    }

    /// Binary directory of the GCC-compatibility toolchain, with a
    /// trailing slash. Rebinds the `toolchain` prefix on archive edges.
    pub fn gcc_bin_dir(&self, arch: Arch) -> String {
        format!("{}/bin/", self.gcc_toolchain_dir(arch))
    }

    /// Platform sysroot for an architecture at the configured API level.
    pub fn sysroot(&self, arch: Arch) -> String {
        let platform = format!("android-{}", self.api_level);
        let arch_dir = format!("arch-{}", sysroot_arch_name(arch));
        join_slots(&[&self.root, "platforms", &platform, &arch_dir])
    }
}

impl Default for NdkLayout {
    fn default() -> Self {
        NdkLayout::new("$ndk", DEFAULT_API_LEVEL)
    }
}

/// Per-architecture prefix of the GCC-compatibility toolchain directory.
fn gcc_toolchain_name(arch: Arch) -> &'static str {
    match arch {
        Arch::X86 => "x86",
        Arch::X86_64 => "x86_64",
        Arch::Arm6 | Arch::Arm7 => "arm-linux-androideabi",
        Arch::Arm64 => "aarch64-linux-android",
        Arch::Mips => "mipsel-linux-android",
        Arch::Mips64 => "mips64el-linux-android",
    }
}

/// Per-architecture directory name under `platforms/android-<api>/`.
fn sysroot_arch_name(arch: Arch) -> &'static str {
    match arch {
        Arch::X86 => "x86",
        Arch::X86_64 => "x86_64",
        Arch::Arm6 | Arch::Arm7 => "arm",
        Arch::Arm64 => "arm64",
        Arch::Mips => "mips",
        Arch::Mips64 => "mips64",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llvm_bin_dir_has_trailing_slash() {
        let ndk = NdkLayout::default();
        let dir = ndk.llvm_bin_dir();
        assert!(dir.starts_with("$ndk/toolchains/llvm/prebuilt/"));
        assert!(dir.ends_with("/bin/"));
    }

    #[test]
    fn test_gcc_toolchain_dir_per_arch() {
        let ndk = NdkLayout::default();
        let host = NdkLayout::host_tag();

        assert_eq!(
            ndk.gcc_toolchain_dir(Arch::Arm7),
            format!("$ndk/toolchains/arm-linux-androideabi-4.9/prebuilt/{}", host)
        );
        assert_eq!(
            ndk.gcc_toolchain_dir(Arch::X86_64),
            format!("$ndk/toolchains/x86_64-4.9/prebuilt/{}", host)
        );
        assert_eq!(
            ndk.gcc_toolchain_dir(Arch::Mips64),
            format!("$ndk/toolchains/mips64el-linux-android-4.9/prebuilt/{}", host)
        );
    }

    #[test]
    fn test_gcc_bin_dir_extends_toolchain_dir() {
        let ndk = NdkLayout::default();
        assert_eq!(
            ndk.gcc_bin_dir(Arch::Arm64),
            format!("{}/bin/", ndk.gcc_toolchain_dir(Arch::Arm64))
        );
    }

    #[test]
    fn test_sysroot_uses_api_level() {
        let ndk = NdkLayout::new("/opt/ndk", 24);
        assert_eq!(ndk.sysroot(Arch::Arm7), "/opt/ndk/platforms/android-24/arch-arm");
        assert_eq!(ndk.sysroot(Arch::Arm6), "/opt/ndk/platforms/android-24/arch-arm");
        assert_eq!(
            ndk.sysroot(Arch::X86_64),
            "/opt/ndk/platforms/android-24/arch-x86_64"
        );
    }
}
