//! Clang toolchain state and build-edge emission.
//!
//! A [`Toolchain`] is constructed once per (host, target) pair by
//! [`ToolchainBuilder`], which runs the ordered platform-specialization
//! pipeline and returns a read-only value. Thereafter every operation is a
//! stateless per-edge composition: callers may share one `Toolchain` across
//! worker threads freely.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::{Arch, BuildConfig, Platform, TargetKind};
use crate::graph::{BuildEdge, DepsStyle, GraphWriter, Rule, VarValue};
use crate::util::Prefs;

pub mod android;
pub mod flags;
pub mod vars;

pub use android::NdkLayout;
pub use flags::FlagComposer;
pub use vars::EdgeVars;

/// One build edge's request: the matrix cell it belongs to, caller-supplied
/// implicit dependencies, and edge-local overrides.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    pub config: BuildConfig,
    pub arch: Arch,
    pub kind: TargetKind,

    /// Implicit dependencies attached to the edge, supplied by the caller
    /// and passed through unchanged.
    pub implicit: Vec<PathBuf>,

    /// Extra include paths for this edge only (`moreincludepaths`).
    pub includepaths: Vec<PathBuf>,

    /// Extra libraries for this edge only (`libs`).
    pub libs: Vec<String>,
}

impl BuildRequest {
    pub fn new(config: BuildConfig, arch: Arch, kind: TargetKind) -> Self {
        BuildRequest {
            config,
            arch,
            kind,
            implicit: Vec::new(),
            includepaths: Vec::new(),
            libs: Vec::new(),
        }
    }
}

/// Read-only toolchain state for one build-graph generation run.
#[derive(Debug, Clone)]
pub struct Toolchain {
    platform: Platform,
    project: String,

    // Tool names substituted into command templates
    compiler: String,
    archiver: String,
    linker: String,

    // Binary path prefix ending in exactly one '/' when non-empty
    prefix: String,

    // Command templates
    compile_cmd: String,
    archive_cmd: String,
    link_cmd: String,

    // Base flag lists
    cflags: Vec<String>,
    arflags: Vec<String>,
    linkflags: Vec<String>,
    oslibs: Vec<String>,

    // Global include/library search paths
    includepaths: Vec<PathBuf>,
    libpaths: Vec<PathBuf>,

    // Library output directory used for config-specific search paths
    lib_dir: PathBuf,

    ndk: Option<NdkLayout>,
}

/// Gathers construction inputs, then runs the ordered specialization
/// pipeline exactly once in [`ToolchainBuilder::build`].
#[derive(Debug, Clone)]
pub struct ToolchainBuilder {
    platform: Platform,
    project: String,
    includepaths: Vec<PathBuf>,
    libpaths: Vec<PathBuf>,
    lib_dir: PathBuf,
    monolithic: bool,
    prefs: Prefs,
}

impl ToolchainBuilder {
    pub fn new(platform: Platform, project: impl Into<String>) -> Self {
        ToolchainBuilder {
            platform,
            project: project.into(),
            includepaths: Vec::new(),
            libpaths: Vec::new(),
            lib_dir: PathBuf::from("lib"),
            monolithic: false,
            prefs: Prefs::default(),
        }
    }

    /// Global include search paths.
    pub fn include_paths(mut self, paths: impl IntoIterator<Item = PathBuf>) -> Self {
        self.includepaths.extend(paths);
        self
    }

    /// Global library search paths.
    pub fn lib_paths(mut self, paths: impl IntoIterator<Item = PathBuf>) -> Self {
        self.libpaths.extend(paths);
        self
    }

    /// Library output directory; config/arch subdirectories of this are
    /// added as per-edge link search paths.
    pub fn lib_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.lib_dir = dir.into();
        self
    }

    /// Build all targets into one monolithic unit.
    pub fn monolithic(mut self, monolithic: bool) -> Self {
        self.monolithic = monolithic;
        self
    }

    /// Preferences loaded from the build prefs file.
    pub fn prefs(mut self, prefs: Prefs) -> Self {
        self.prefs = prefs;
        self
    }

    /// Run the specialization pipeline and return the finished state.
    ///
    /// Step order is a strict dependency chain: baseline, then platform
    /// branch, then prefix normalization (which must see the Android
    /// toolchain path when there is one).
    pub fn build(self) -> Toolchain {
        let mut tc = self.baseline();
        match tc.platform {
            Platform::Windows => Self::specialize_windows(&mut tc),
            Platform::Android => Self::specialize_android(&mut tc, &self.prefs),
            Platform::Generic => {}
        }
        Self::normalize_prefix(&mut tc);

        tracing::debug!(
            platform = tc.platform.name(),
            project = %tc.project,
            prefix = %tc.prefix,
            "toolchain specialized"
        );
        tc
    }

    fn baseline(&self) -> Toolchain {
        let mut cflags: Vec<String> = [
            "-std=c11",
            "-W",
            "-Werror",
            "-pedantic",
            "-Wall",
            "-Weverything",
            "-Wno-padded",
            "-Wno-documentation-unknown-command",
            "-funit-at-a-time",
            "-fstrict-aliasing",
            "-fno-math-errno",
            "-ffinite-math-only",
            "-funsafe-math-optimizations",
            "-fno-trapping-math",
            "-ffast-math",
        ]
        .iter()
        .map(|f| f.to_string())
        .collect();
        cflags.insert(1, format!("-D{}_COMPILE=1", self.project.to_uppercase()));

        if self.monolithic {
            cflags.push("-DBUILD_MONOLITHIC=1".to_string());
        }

        let compile_cmd = "$toolchain$cc -MMD -MT $out -MF $out.d -I. $includepaths \
                           $moreincludepaths $cflags $carchflags $cconfigflags -c $in -o $out"
            .to_string();
        let archive_cmd = format!(
            "{} && $toolchain$ar crsD $ararchflags $arflags $out $in",
            rm_command(self.platform, "$out")
        );
        let link_cmd = "$toolchain$link $libpaths $configlibpaths $linkflags $linkarchflags \
                        $linkconfigflags -o $out $in $libs $archlibs $oslibs"
            .to_string();

        Toolchain {
            platform: self.platform,
            project: self.project.clone(),
            compiler: "clang".to_string(),
            archiver: "llvm-ar".to_string(),
            linker: "clang".to_string(),
            prefix: self.prefs.clang.toolchain.clone().unwrap_or_default(),
            compile_cmd,
            archive_cmd,
            link_cmd,
            cflags,
            arflags: Vec::new(),
            linkflags: Vec::new(),
            oslibs: Vec::new(),
            includepaths: self.includepaths.clone(),
            libpaths: self.libpaths.clone(),
            lib_dir: self.lib_dir.clone(),
            ndk: None,
        }
    }

    fn specialize_windows(tc: &mut Toolchain) {
        tc.cflags.push("-U__STRICT_ANSI__".to_string());
        tc.cflags.push("-Wno-reserved-id-macro".to_string());
        tc.oslibs = ["kernel32", "user32", "shell32", "advapi32"]
            .iter()
            .map(|l| l.to_string())
            .collect();
    }

    fn specialize_android(tc: &mut Toolchain, prefs: &Prefs) {
        let ndk = NdkLayout::new(
            prefs.android.ndk.clone().unwrap_or_else(|| "$ndk".to_string()),
            prefs.android.api_level.unwrap_or(android::DEFAULT_API_LEVEL),
        );

        tc.archiver = "ar".to_string();

        tc.compile_cmd.push_str(" --sysroot=$sysroot");
        // Android binaries are loaded by the app shell as shared objects
        tc.link_cmd
            .push_str(" -shared -Wl,-soname,$liblinkname --sysroot=$sysroot");

        tc.cflags.extend(
            [
                "-fpic",
                "-ffunction-sections",
                "-funwind-tables",
                "-fstack-protector",
                "-fomit-frame-pointer",
                "-no-canonical-prefixes",
                "-Wa,--noexecstack",
            ]
            .iter()
            .map(|f| f.to_string()),
        );

        tc.linkflags.extend(
            [
                "-no-canonical-prefixes",
                "-Wl,--no-undefined",
                "-Wl,-z,noexecstack",
                "-Wl,-z,relro",
                "-Wl,-z,now",
            ]
            .iter()
            .map(|f| f.to_string()),
        );

        tc.includepaths.push(PathBuf::from(format!(
            "{}/sources/android/native_app_glue",
            ndk.root()
        )));
        tc.includepaths
            .push(PathBuf::from(format!("{}/sources/android/cpufeatures", ndk.root())));

        tc.oslibs.push("log".to_string());

        tc.prefix = ndk.llvm_bin_dir();
        tc.ndk = Some(ndk);
    }

    /// Normalize the toolchain prefix to end with exactly one separator
    /// when non-empty. Must run after Android path resolution.
    fn normalize_prefix(tc: &mut Toolchain) {
        while tc.prefix.ends_with('/') || tc.prefix.ends_with('\\') {
            tc.prefix.pop();
        }
        if !tc.prefix.is_empty() {
            tc.prefix.push('/');
        }
    }
}

impl Toolchain {
    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    /// Toolchain binary path prefix (empty, or ending in exactly one '/').
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn base_cflags(&self) -> &[String] {
        &self.cflags
    }

    pub fn include_paths(&self) -> &[PathBuf] {
        &self.includepaths
    }

    pub fn ndk(&self) -> Option<&NdkLayout> {
        self.ndk.as_ref()
    }

    fn composer(&self) -> FlagComposer<'_> {
        FlagComposer::new(self.platform, self.ndk.as_ref())
    }

    /// Declare the global variable defaults every edge inherits.
    pub fn write_defaults(&self, writer: &mut dyn GraphWriter) -> Result<()> {
        let composer = self.composer();
        let empty = VarValue::List(Vec::new());

        writer.variable("toolchain", &VarValue::from(self.prefix.as_str()))?;
        writer.variable("cc", &VarValue::from(self.compiler.as_str()))?;
        writer.variable("ar", &VarValue::from(self.archiver.as_str()))?;
        writer.variable("link", &VarValue::from(self.linker.as_str()))?;
        writer.variable(
            "includepaths",
            &VarValue::List(composer.include_flags(&self.includepaths)),
        )?;
        writer.variable("moreincludepaths", &empty)?;
        writer.variable("cflags", &VarValue::List(self.cflags.clone()))?;
        writer.variable("carchflags", &empty)?;
        writer.variable("cconfigflags", &empty)?;
        writer.variable("arflags", &VarValue::List(self.arflags.clone()))?;
        writer.variable("ararchflags", &empty)?;
        writer.variable("arconfigflags", &empty)?;
        writer.variable("linkflags", &VarValue::List(self.linkflags.clone()))?;
        writer.variable("linkarchflags", &empty)?;
        writer.variable("linkconfigflags", &empty)?;
        writer.variable("libs", &empty)?;
        writer.variable(
            "libpaths",
            &VarValue::List(composer.libpath_flags(&self.libpaths)),
        )?;
        writer.variable("configlibpaths", &empty)?;
        writer.variable("archlibs", &empty)?;
        writer.variable("oslibs", &VarValue::List(composer.lib_flags(&self.oslibs)))?;
        if self.platform.is_android() {
            writer.variable("liblinkname", &VarValue::from(""))?;
        }
        Ok(())
    }

    /// Declare the four command rules.
    pub fn register_rules(&self, writer: &mut dyn GraphWriter) -> Result<()> {
        writer.rule(
            &Rule::new("cc", self.compile_cmd.clone(), "CC $in")
                .with_depfile("$out.d", DepsStyle::Gcc),
        )?;
        writer.rule(&Rule::new("ar", self.archive_cmd.clone(), "LIB $out"))?;
        writer.rule(&Rule::new("so", self.link_cmd.clone(), "SO $out"))?;
        writer.rule(&Rule::new("link", self.link_cmd.clone(), "LINK $out"))?;
        Ok(())
    }

    /// Variable overrides for a compile edge.
    pub fn compile_vars(&self, req: &BuildRequest) -> EdgeVars {
        let composer = self.composer();
        let mut vars = EdgeVars::new();

        vars.push_list("moreincludepaths", composer.include_flags(&req.includepaths));
        vars.push_list("carchflags", composer.compile_arch_flags(req.arch, req.kind));
        vars.push_list("cconfigflags", composer.compile_config_flags(req.config));
        if let Some(ndk) = &self.ndk {
            vars.push_scalar("sysroot", ndk.sysroot(req.arch));
        }
        vars
    }

    /// Variable overrides for an archive edge.
    pub fn archive_vars(&self, req: &BuildRequest) -> EdgeVars {
        let composer = self.composer();
        let mut vars = EdgeVars::new();

        vars.push_list("ararchflags", composer.archive_arch_flags(req.arch));
        vars.push_list("arconfigflags", composer.archive_config_flags(req.config));
        if let Some(ndk) = &self.ndk {
            // The NDK's llvm-ar lives in the GCC-compatibility toolchain
            vars.push_scalar("toolchain", ndk.gcc_bin_dir(req.arch));
        }
        vars
    }

    /// Variable overrides for a link edge.
    pub fn link_vars(&self, req: &BuildRequest, output: &Path) -> EdgeVars {
        let composer = self.composer();
        let mut vars = EdgeVars::new();

        vars.push_list("linkarchflags", composer.link_arch_flags(req.arch));
        vars.push_list(
            "linkconfigflags",
            composer.link_config_flags(req.config, req.kind),
        );
        vars.push_list("libs", composer.lib_flags(&req.libs));
        vars.push_list(
            "configlibpaths",
            composer.config_lib_paths(&self.lib_dir, req.config, req.arch),
        );
        if let Some(ndk) = &self.ndk {
            vars.push_scalar("sysroot", ndk.sysroot(req.arch));
            if req.kind == TargetKind::SharedLib {
                let name = output
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                vars.push_scalar("liblinkname", name);
            }
        }
        vars.push_list("archlibs", composer.lib_flags(&composer.link_arch_libs(req.arch)));
        vars
    }

    /// Emit one compile edge: one source file to one object file.
    pub fn compile(
        &self,
        writer: &mut dyn GraphWriter,
        req: &BuildRequest,
        source: &Path,
        object: &Path,
    ) -> Result<()> {
        writer.build(&BuildEdge {
            rule: "cc".to_string(),
            inputs: vec![source.to_path_buf()],
            output: object.to_path_buf(),
            implicit: req.implicit.clone(),
            vars: self.compile_vars(req).into_vec(),
        })
    }

    /// Emit one archive edge: objects to a static library.
    pub fn archive(
        &self,
        writer: &mut dyn GraphWriter,
        req: &BuildRequest,
        objects: &[PathBuf],
        output: &Path,
    ) -> Result<()> {
        writer.build(&BuildEdge {
            rule: "ar".to_string(),
            inputs: objects.to_vec(),
            output: output.to_path_buf(),
            implicit: req.implicit.clone(),
            vars: self.archive_vars(req).into_vec(),
        })
    }

    /// Emit one shared-library link edge.
    pub fn link_shared(
        &self,
        writer: &mut dyn GraphWriter,
        req: &BuildRequest,
        objects: &[PathBuf],
        output: &Path,
    ) -> Result<()> {
        writer.build(&BuildEdge {
            rule: "so".to_string(),
            inputs: objects.to_vec(),
            output: output.to_path_buf(),
            implicit: req.implicit.clone(),
            vars: self.link_vars(req, output).into_vec(),
        })
    }

    /// Emit one executable link edge.
    pub fn link_executable(
        &self,
        writer: &mut dyn GraphWriter,
        req: &BuildRequest,
        objects: &[PathBuf],
        output: &Path,
    ) -> Result<()> {
        writer.build(&BuildEdge {
            rule: "link".to_string(),
            inputs: objects.to_vec(),
            output: output.to_path_buf(),
            implicit: req.implicit.clone(),
            vars: self.link_vars(req, output).into_vec(),
        })
    }

    /// Emit one archive edge per variant output.
    pub fn archive_multi(
        &self,
        writer: &mut dyn GraphWriter,
        req: &BuildRequest,
        objects: &[PathBuf],
        outputs: &[PathBuf],
    ) -> Result<()> {
        for output in outputs {
            self.archive(writer, req, objects, output)?;
        }
        Ok(())
    }

    /// Emit one shared-library link edge per variant output.
    pub fn link_shared_multi(
        &self,
        writer: &mut dyn GraphWriter,
        req: &BuildRequest,
        objects: &[PathBuf],
        outputs: &[PathBuf],
    ) -> Result<()> {
        for output in outputs {
            self.link_shared(writer, req, objects, output)?;
        }
        Ok(())
    }

    /// Emit one executable link edge per variant output.
    pub fn link_executable_multi(
        &self,
        writer: &mut dyn GraphWriter,
        req: &BuildRequest,
        objects: &[PathBuf],
        outputs: &[PathBuf],
    ) -> Result<()> {
        for output in outputs {
            self.link_executable(writer, req, objects, output)?;
        }
        Ok(())
    }
}

/// Shell fragment removing a file before the archiver recreates it.
fn rm_command(platform: Platform, file: &str) -> String {
    if platform.is_windows() {
        format!("cmd /c (if exist {file} del /q /f {file})")
    } else {
        format!("rm -f {file}")
    }
}
