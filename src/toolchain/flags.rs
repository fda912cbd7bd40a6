//! Flag composition.
//!
//! One pure function per flag category, deriving an ordered flag list from
//! (architecture, configuration, target kind) under a fixed platform. Every
//! function is total and deterministic; a category that does not apply to
//! the inputs yields an empty list, never an error. Order is significant
//! end-to-end: later flags can override earlier ones at the command-line
//! level, so nothing here reorders or deduplicates.

use std::path::Path;

use crate::core::{Arch, BuildConfig, Platform, TargetKind};
use crate::toolchain::android::NdkLayout;
use crate::util::paths::escape;

/// Flag-composition strategy for one (platform, NDK layout) pair.
///
/// A cheap borrowed value constructed per call site; all state is read-only.
#[derive(Debug, Clone, Copy)]
pub struct FlagComposer<'a> {
    platform: Platform,
    ndk: Option<&'a NdkLayout>,
}

impl<'a> FlagComposer<'a> {
    pub fn new(platform: Platform, ndk: Option<&'a NdkLayout>) -> Self {
        FlagComposer { platform, ndk }
    }

    /// Target triple, tuning, and GCC-toolchain flags for an architecture.
    ///
    /// Non-empty only on Android; elsewhere the target is implied by the
    /// host toolchain. Shared between compile-time and link-time
    /// composition.
    pub fn target_arch_flags(&self, arch: Arch) -> Vec<String> {
        let mut flags: Vec<String> = Vec::new();
        if !self.platform.is_android() {
            return flags;
        }

        let tuning: &[&str] = match arch {
            Arch::X86 => &[
                "-target",
                "i686-none-linux-android",
                "-march=i686",
                "-mtune=intel",
                "-mssse3",
                "-mfpmath=sse",
                "-m32",
            ],
            Arch::X86_64 => &[
                "-target",
                "x86_64-none-linux-android",
                "-march=x86-64",
                "-msse4.2",
                "-mpopcnt",
                "-m64",
                "-mtune=intel",
            ],
            Arch::Arm6 => &[
                "-target",
                "armv5te-none-linux-androideabi",
                "-march=armv5te",
                "-mtune=xscale",
                "-msoft-float",
                "-marm",
            ],
            Arch::Arm7 => &[
                "-target",
                "armv7-none-linux-androideabi",
                "-march=armv7-a",
                "-mhard-float",
                "-mfpu=vfpv3-d16",
                "-mfpu=neon",
                "-D_NDK_MATH_NO_SOFTFP=1",
                "-marm",
            ],
            Arch::Arm64 => &["-target", "aarch64-none-linux-android"],
            Arch::Mips => &["-target", "mipsel-none-linux-android"],
            Arch::Mips64 => &["-target", "mips64el-none-linux-android"],
        };
        flags.extend(tuning.iter().map(|f| f.to_string()));

        if let Some(ndk) = self.ndk {
            flags.push("-gcc-toolchain".to_string());
            flags.push(ndk.gcc_toolchain_dir(arch));
        }

        flags
    }

    /// Compile-time architecture/target-kind flags (`carchflags`).
    pub fn compile_arch_flags(&self, arch: Arch, kind: TargetKind) -> Vec<String> {
        let mut flags = Vec::new();
        if kind == TargetKind::SharedLib {
            flags.push("-DBUILD_DYNAMIC_LINK=1".to_string());
        }
        flags.extend(self.target_arch_flags(arch));
        flags
    }

    /// Compile-time configuration flags (`cconfigflags`).
    pub fn compile_config_flags(&self, config: BuildConfig) -> Vec<String> {
        let flags: &[&str] = match config {
            BuildConfig::Debug => &["-DBUILD_DEBUG=1", "-g"],
            BuildConfig::Release => &["-DBUILD_RELEASE=1", "-O3", "-g", "-funroll-loops"],
            BuildConfig::Profile => &["-DBUILD_PROFILE=1", "-O3", "-g", "-funroll-loops"],
            BuildConfig::Deploy => &["-DBUILD_DEPLOY=1", "-O3", "-g", "-funroll-loops"],
        };
        flags.iter().map(|f| f.to_string()).collect()
    }

    /// Archiver architecture flags (`ararchflags`).
    ///
    /// The archiver step is architecture-insensitive; kept as a category so
    /// the binding layer stays uniform across operations.
    pub fn archive_arch_flags(&self, _arch: Arch) -> Vec<String> {
        Vec::new()
    }

    /// Archiver configuration flags (`arconfigflags`). Always empty, as
    /// with [`Self::archive_arch_flags`].
    pub fn archive_config_flags(&self, _config: BuildConfig) -> Vec<String> {
        Vec::new()
    }

    /// Link-time architecture flags (`linkarchflags`).
    ///
    /// Same derivation as compile-time, with arm7-specific linker fix-ups
    /// layered on top.
    pub fn link_arch_flags(&self, arch: Arch) -> Vec<String> {
        let mut flags = self.target_arch_flags(arch);
        if self.platform.is_android() && arch == Arch::Arm7 {
            flags.push("-Wl,--no-warn-mismatch".to_string());
            flags.push("-Wl,--fix-cortex-a8".to_string());
        }
        flags
    }

    /// Link-time configuration flags (`linkconfigflags`).
    pub fn link_config_flags(&self, _config: BuildConfig, kind: TargetKind) -> Vec<String> {
        let mut flags = Vec::new();
        if self.platform.is_windows() {
            match kind {
                TargetKind::SharedLib => {
                    flags.push("-Xlinker".to_string());
                    flags.push("/DLL".to_string());
                }
                TargetKind::Executable => {
                    flags.push("-Xlinker".to_string());
                    flags.push("/SUBSYSTEM:CONSOLE".to_string());
                }
                TargetKind::StaticLib => {}
            }
        }
        flags
    }

    /// Architecture-specific runtime library names (without `-l`).
    pub fn link_arch_libs(&self, arch: Arch) -> Vec<String> {
        let mut libs = Vec::new();
        if self.platform.is_android() {
            // arm7 hard-float builds need the hardware-float math variant
            if arch == Arch::Arm7 {
                libs.push("m_hard".to_string());
            } else {
                libs.push("m".to_string());
            }
            libs.push("gcc".to_string());
            libs.push("android".to_string());
        }
        libs
    }

    /// One `-I` flag per include path, order-preserving.
    pub fn include_flags(&self, paths: &[impl AsRef<Path>]) -> Vec<String> {
        paths
            .iter()
            .map(|p| format!("-I{}", escape(p.as_ref())))
            .collect()
    }

    /// One library search-path flag per path.
    ///
    /// Windows links through the MSVC-style linker, which wants its own
    /// path switch forwarded instead of `-L`.
    pub fn libpath_flags(&self, paths: &[impl AsRef<Path>]) -> Vec<String> {
        paths
            .iter()
            .map(|p| {
                if self.platform.is_windows() {
                    format!("-Xlinker /LIBPATH:{}", escape(p.as_ref()))
                } else {
                    format!("-L{}", escape(p.as_ref()))
                }
            })
            .collect()
    }

    /// One `-l` flag per library name.
    pub fn lib_flags(&self, libs: &[String]) -> Vec<String> {
        libs.iter().map(|lib| format!("-l{}", lib)).collect()
    }

    /// Configuration-specific library search paths: the library output
    /// directory, then its config and config/arch subdirectories.
    pub fn config_lib_paths(
        &self,
        lib_dir: &Path,
        config: BuildConfig,
        arch: Arch,
    ) -> Vec<String> {
        let paths = [
            lib_dir.to_path_buf(),
            lib_dir.join(config.name()),
            lib_dir.join(config.name()).join(arch.name()),
        ];
        self.libpath_flags(&paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn generic() -> FlagComposer<'static> {
        FlagComposer::new(Platform::Generic, None)
    }

    fn windows() -> FlagComposer<'static> {
        FlagComposer::new(Platform::Windows, None)
    }

    #[test]
    fn test_composition_is_deterministic() {
        let ndk = NdkLayout::default();
        let composer = FlagComposer::new(Platform::Android, Some(&ndk));

        for arch in Arch::ALL {
            assert_eq!(
                composer.target_arch_flags(arch),
                composer.target_arch_flags(arch)
            );
            for config in BuildConfig::ALL {
                assert_eq!(
                    composer.compile_config_flags(config),
                    composer.compile_config_flags(config)
                );
                assert_eq!(composer.link_arch_flags(arch), composer.link_arch_flags(arch));
            }
        }
    }

    #[test]
    fn test_arch_flags_empty_off_android() {
        for arch in Arch::ALL {
            assert!(generic().target_arch_flags(arch).is_empty());
            assert!(windows().target_arch_flags(arch).is_empty());
        }
    }

    #[test]
    fn test_android_arm7_arch_flag_order() {
        let ndk = NdkLayout::default();
        let composer = FlagComposer::new(Platform::Android, Some(&ndk));

        let flags = composer.target_arch_flags(Arch::Arm7);
        let expected_prefix = [
            "-target",
            "armv7-none-linux-androideabi",
            "-march=armv7-a",
            "-mhard-float",
            "-mfpu=vfpv3-d16",
            "-mfpu=neon",
            "-D_NDK_MATH_NO_SOFTFP=1",
            "-marm",
            "-gcc-toolchain",
        ];
        assert_eq!(&flags[..expected_prefix.len()], &expected_prefix[..]);
        assert_eq!(flags.len(), expected_prefix.len() + 1);
        assert_eq!(flags[expected_prefix.len()], ndk.gcc_toolchain_dir(Arch::Arm7));
    }

    #[test]
    fn test_sharedlib_gets_dynamic_link_define() {
        let composer = generic();
        assert_eq!(
            composer.compile_arch_flags(Arch::X86_64, TargetKind::SharedLib),
            vec!["-DBUILD_DYNAMIC_LINK=1"]
        );
        assert!(composer
            .compile_arch_flags(Arch::X86_64, TargetKind::StaticLib)
            .is_empty());
        assert!(composer
            .compile_arch_flags(Arch::X86_64, TargetKind::Executable)
            .is_empty());
    }

    #[test]
    fn test_config_flag_bundles() {
        let composer = generic();
        assert_eq!(
            composer.compile_config_flags(BuildConfig::Debug),
            vec!["-DBUILD_DEBUG=1", "-g"]
        );
        assert_eq!(
            composer.compile_config_flags(BuildConfig::Release),
            vec!["-DBUILD_RELEASE=1", "-O3", "-g", "-funroll-loops"]
        );
        assert_eq!(
            composer.compile_config_flags(BuildConfig::Profile),
            vec!["-DBUILD_PROFILE=1", "-O3", "-g", "-funroll-loops"]
        );
        assert_eq!(
            composer.compile_config_flags(BuildConfig::Deploy),
            vec!["-DBUILD_DEPLOY=1", "-O3", "-g", "-funroll-loops"]
        );
    }

    #[test]
    fn test_config_defines_pairwise_disjoint() {
        let composer = generic();
        let defines: Vec<Vec<String>> = BuildConfig::ALL
            .iter()
            .map(|c| {
                composer
                    .compile_config_flags(*c)
                    .into_iter()
                    .filter(|f| f.starts_with("-D"))
                    .collect()
            })
            .collect();

        for (i, a) in defines.iter().enumerate() {
            for b in defines.iter().skip(i + 1) {
                assert!(a.iter().all(|d| !b.contains(d)));
            }
        }
    }

    #[test]
    fn test_archive_flags_always_empty() {
        let ndk = NdkLayout::default();
        let composer = FlagComposer::new(Platform::Android, Some(&ndk));
        for arch in Arch::ALL {
            assert!(composer.archive_arch_flags(arch).is_empty());
        }
        for config in BuildConfig::ALL {
            assert!(composer.archive_config_flags(config).is_empty());
        }
    }

    #[test]
    fn test_arm7_link_fixups_only_on_arm7() {
        let ndk = NdkLayout::default();
        let composer = FlagComposer::new(Platform::Android, Some(&ndk));

        let arm7 = composer.link_arch_flags(Arch::Arm7);
        assert_eq!(
            &arm7[arm7.len() - 2..],
            &["-Wl,--no-warn-mismatch", "-Wl,--fix-cortex-a8"]
        );

        for arch in Arch::ALL.into_iter().filter(|a| *a != Arch::Arm7) {
            let flags = composer.link_arch_flags(arch);
            assert!(!flags.iter().any(|f| f == "-Wl,--fix-cortex-a8"));
        }

        // The fix-ups are Android-specific, not arm7-anywhere
        assert!(generic().link_arch_flags(Arch::Arm7).is_empty());
    }

    #[test]
    fn test_windows_link_config_flags() {
        let composer = windows();
        assert_eq!(
            composer.link_config_flags(BuildConfig::Release, TargetKind::SharedLib),
            vec!["-Xlinker", "/DLL"]
        );
        assert_eq!(
            composer.link_config_flags(BuildConfig::Release, TargetKind::Executable),
            vec!["-Xlinker", "/SUBSYSTEM:CONSOLE"]
        );
        assert!(composer
            .link_config_flags(BuildConfig::Release, TargetKind::StaticLib)
            .is_empty());

        for kind in [TargetKind::SharedLib, TargetKind::Executable] {
            assert!(generic()
                .link_config_flags(BuildConfig::Release, kind)
                .is_empty());
        }
    }

    #[test]
    fn test_android_arch_libs() {
        let ndk = NdkLayout::default();
        let composer = FlagComposer::new(Platform::Android, Some(&ndk));

        assert_eq!(
            composer.link_arch_libs(Arch::Arm7),
            vec!["m_hard", "gcc", "android"]
        );
        assert_eq!(
            composer.link_arch_libs(Arch::Arm64),
            vec!["m", "gcc", "android"]
        );
        assert!(generic().link_arch_libs(Arch::Arm7).is_empty());
    }

    #[test]
    fn test_include_and_libpath_flags() {
        let paths = [PathBuf::from("include"), PathBuf::from("third_party/include")];
        assert_eq!(
            generic().include_flags(&paths),
            vec!["-Iinclude", "-Ithird_party/include"]
        );

        let libdirs = [PathBuf::from("lib")];
        assert_eq!(generic().libpath_flags(&libdirs), vec!["-Llib"]);
        assert_eq!(
            windows().libpath_flags(&libdirs),
            vec!["-Xlinker /LIBPATH:lib"]
        );
    }

    #[test]
    fn test_config_lib_paths_order() {
        let composer = generic();
        assert_eq!(
            composer.config_lib_paths(Path::new("lib"), BuildConfig::Release, Arch::X86_64),
            vec!["-Llib", "-Llib/release", "-Llib/release/x86-64"]
        );
    }

    #[test]
    fn test_release_sharedlib_scenario_generic() {
        // (x86-64, release, sharedlib, generic): four independent outputs
        let composer = generic();

        assert_eq!(
            composer.compile_arch_flags(Arch::X86_64, TargetKind::SharedLib),
            vec!["-DBUILD_DYNAMIC_LINK=1"]
        );
        assert_eq!(
            composer.compile_config_flags(BuildConfig::Release),
            vec!["-DBUILD_RELEASE=1", "-O3", "-g", "-funroll-loops"]
        );
        assert!(composer.target_arch_flags(Arch::X86_64).is_empty());
        assert!(composer
            .link_config_flags(BuildConfig::Release, TargetKind::SharedLib)
            .is_empty());
    }
}
