//! Platform-agnostic packaging orchestration.
//!
//! The [`Packager`] drives one packaging run through its stages: task
//! initialization, app structure creation, resource resolution, runtime
//! bundling, platform assembly, and installer generation. Platform-specific
//! behavior lives behind the
//! [`PlatformPackager`](crate::packager::platform::PlatformPackager) trait;
//! the sequencing here is shared by all platforms.

pub mod archive;
pub mod modules;
pub mod resources;
pub mod runtime;

use crate::packager::context::BuildContext;
use crate::packager::error::{Error, Result};
use crate::packager::generator;
use crate::packager::platform::{self, PlatformPackager};
use crate::packager::task::{PackageTask, Platform};
use crate::packager::utils::{checksum, fs};
use std::path::PathBuf;

/// Hook invoked to build the runnable JAR when the task does not supply a
/// pre-built one.
pub type JarBuilder = Box<dyn Fn(&BuildContext) -> Result<PathBuf> + Send + Sync>;

/// Default organization used when the task does not name one.
const DEFAULT_ORGANIZATION_NAME: &str = "ACME";

/// Orchestrates one packaging run.
///
/// Construct one per run; state is not reusable across runs. Concurrent
/// runs are only safe with distinct output directories, since the app
/// folder is removed and recreated.
pub struct Packager {
    ctx: BuildContext,
    platform_packager: Option<Box<dyn PlatformPackager>>,
    jar_builder: Option<JarBuilder>,
    initialized: bool,
}

impl Packager {
    /// Creates a packager for the given task.
    pub fn new(task: PackageTask) -> Self {
        Self {
            ctx: BuildContext::new(task),
            platform_packager: None,
            jar_builder: None,
            initialized: false,
        }
    }

    /// Registers the hook used to build the runnable JAR when the task does
    /// not point at an existing one.
    pub fn with_jar_builder(mut self, builder: JarBuilder) -> Self {
        self.jar_builder = Some(builder);
        self
    }

    /// Read access to the accumulated build state.
    pub fn context(&self) -> &BuildContext {
        &self.ctx
    }

    /// Validates the task, applies defaults, fixes the target platform and
    /// selects the platform packager. Idempotent.
    fn init(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }

        log::info!("Initializing packager ...");
        let task = &mut self.ctx.task;

        if task.name.trim().is_empty() {
            return Err(Error::InvalidConfig("application name is required".into()));
        }
        if task.name.contains('/') || task.name.contains('\\') {
            return Err(Error::InvalidConfig(format!(
                "invalid name specified: {}",
                task.name
            )));
        }

        if task.display_name.trim().is_empty() {
            task.display_name = task.name.clone();
        }
        if task.description.trim().is_empty() {
            task.description = task.display_name.clone();
        }
        if task.organization_name.trim().is_empty() {
            task.organization_name = DEFAULT_ORGANIZATION_NAME.into();
        }

        task.platform = task.platform.resolve();

        let jdk = match task.jdk_path.take() {
            Some(path) => path,
            None => runtime::current_jdk()?,
        };
        if !jdk.exists() {
            return Err(Error::InvalidConfig(format!(
                "JDK path doesn't exist: {}",
                jdk.display()
            )));
        }
        task.jdk_path = Some(jdk);

        let packager = platform::packager_for(task.platform);
        packager.init(task)?;

        // only the target platform's settings block survives
        match task.platform {
            Platform::Linux => {
                task.mac = None;
                task.windows = None;
            }
            Platform::Mac => {
                task.linux = None;
                task.windows = None;
            }
            Platform::Windows => {
                task.linux = None;
                task.mac = None;
            }
            Platform::Auto => {}
        }

        log::debug!("Effective packager configuration: {task:?}");

        self.platform_packager = Some(packager);
        self.initialized = true;
        log::info!("Packager initialized!");
        Ok(())
    }

    fn packager(&self) -> Result<&dyn PlatformPackager> {
        self.platform_packager
            .as_deref()
            .ok_or_else(|| Error::Generic("packager is not initialized".into()))
    }

    /// Builds the application bundle: structure, resources, runnable JAR,
    /// dependency libs, bundled runtime and platform assembly. Returns the
    /// produced application container.
    pub async fn create_app(&mut self) -> Result<PathBuf> {
        log::info!("Creating app ...");

        self.init()?;
        self.create_app_structure().await?;
        resources::resolve_resources(&mut self.ctx).await?;
        self.copy_additional_resources().await?;
        self.resolve_runnable_jar()?;
        self.copy_libs().await?;
        runtime::bundle_jre(&mut self.ctx).await?;

        let Self {
            ctx,
            platform_packager,
            ..
        } = self;
        let packager = platform_packager
            .as_deref()
            .ok_or_else(|| Error::Generic("packager is not initialized".into()))?;
        let app_file = packager.assemble(ctx).await?;

        log::info!("App created in {}!", self.ctx.app_folder()?.display());
        Ok(app_file)
    }

    /// Runs the ordered artifact generator sweep for the target platform.
    ///
    /// Returns an empty list with a warning when installer generation is
    /// disabled or the execution platform does not match the target (and no
    /// force flag is set); no partial work is attempted in either case.
    pub async fn generate_installers(&mut self) -> Result<Vec<PathBuf>> {
        if !self.ctx.task.generate_installer {
            log::warn!("Installer generation is disabled by the 'generate_installer' property!");
            return Ok(Vec::new());
        }

        let platform = self.ctx.task.platform.resolve();
        if !platform.is_current() && !self.ctx.task.force_installer {
            log::warn!(
                "Installers cannot be generated: the target platform ({platform}) is different \
                 from the execution platform ({})!",
                Platform::current()
            );
            return Ok(Vec::new());
        }

        log::info!("Generating installers ...");

        self.init()?;

        let assets = self.ctx.task.output_directory.join("assets");
        fs::create_dir_all(&assets, false).await?;
        if !self.ctx.has_assets_folder() {
            self.ctx.set_assets_folder(assets);
        }

        let generators = self.packager()?.generators();
        let installers = generator::generate_all(&generators, &mut self.ctx).await?;

        for installer in &installers {
            match checksum::sha256_file(installer).await {
                Ok(digest) => log::info!("sha256 {}  {digest}", installer.display()),
                Err(e) => log::warn!("could not hash {}: {e}", installer.display()),
            }
        }

        log::info!("Installers generated! {installers:?}");
        Ok(installers)
    }

    /// Archives the app folder as tarball/zipball when requested.
    pub async fn create_bundles(&self) -> Result<Vec<PathBuf>> {
        archive::create_bundles(&self.ctx).await
    }

    async fn create_app_structure(&mut self) -> Result<()> {
        log::info!("Creating app structure ...");

        let output = self.ctx.task.output_directory.clone();
        fs::create_dir_all(&output, false).await?;

        let app_folder = output.join(&self.ctx.task.name);
        if app_folder.exists() {
            fs::remove_folder(&app_folder).await?;
            log::info!("Old app folder removed {}", app_folder.display());
        }
        fs::create_dir_all(&app_folder, false).await?;
        log::info!("App folder created: {}", app_folder.display());
        self.ctx.set_app_folder(app_folder);

        let assets_folder = fs::mkdir(&output, "assets").await?;
        log::info!("Assets folder created: {}", assets_folder.display());
        self.ctx.set_assets_folder(assets_folder);

        let Self {
            ctx,
            platform_packager,
            ..
        } = self;
        let packager = platform_packager
            .as_deref()
            .ok_or_else(|| Error::Generic("packager is not initialized".into()))?;
        packager.create_structure(ctx).await?;

        log::info!("App structure created!");
        Ok(())
    }

    async fn copy_additional_resources(&mut self) -> Result<()> {
        log::info!("Copying additional resources");

        let destination = self.ctx.resources_dest()?.to_path_buf();
        let mut resources = self.ctx.task.additional_resources.clone();
        if let Some(license) = self.ctx.license_file() {
            resources.push(license.to_path_buf());
        }
        resources.push(self.ctx.icon_file()?.to_path_buf());

        for resource in resources {
            if !resource.exists() {
                log::warn!("Additional resource {} doesn't exist", resource.display());
                continue;
            }
            if resource.is_dir() {
                fs::copy_folder_to_folder(&resource, &destination).await?;
            } else {
                fs::copy_file_to_folder(&resource, &destination).await?;
            }
        }

        log::info!("All additional resources copied!");
        Ok(())
    }

    fn resolve_runnable_jar(&mut self) -> Result<()> {
        if let Some(jar) = self.ctx.task.runnable_jar.clone()
            && jar.is_file()
        {
            log::info!("Using runnable JAR: {}", jar.display());
            self.ctx.set_jar_file(jar);
            return Ok(());
        }

        if let Some(builder) = &self.jar_builder {
            let jar = builder(&self.ctx)?;
            self.ctx.set_jar_file(jar);
            return Ok(());
        }

        Err(Error::InvalidConfig(
            "no runnable JAR available: 'runnable_jar' does not point at a file and no \
             build hook is configured"
                .into(),
        ))
    }

    async fn copy_libs(&mut self) -> Result<()> {
        let task = &self.ctx.task;
        if !task.copy_dependencies || task.libs.is_empty() {
            return Ok(());
        }

        let libs_folder = self.ctx.jar_dest()?.join("libs");
        log::info!("Copying all dependencies to {} ...", libs_folder.display());

        for lib in self.ctx.task.libs.clone() {
            fs::copy_file_to_folder(&lib, &libs_folder).await?;
        }

        log::info!("All dependencies copied!");
        Ok(())
    }
}
