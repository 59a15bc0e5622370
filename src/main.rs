//! avatarkit - Prepares generated full-body avatars for humanoid animation and rendering
//!
//! This is the command line entry point: builds skeleton descriptions from
//! skinned avatar meshes and composes body, outfit, and haircut materials.

mod export;
mod settings;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use avatarkit_assets::{load_skin, load_texture_async, AvatarFileKind, AvatarStorage};
use avatarkit_material::{MaterialCompositor, PipelineTraits, ResourceCatalog, ResourceResolver};
use avatarkit_rig::{AvatarRig, BoneRoleTable};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::settings::AvatarSettings;

#[derive(Parser, Debug)]
#[command(name = "avatarkit", version, about = "Full-body avatar rigging and material tools")]
struct Cli {
    /// Settings file (defaults to ~/.config/avatarkit/settings.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the humanoid skeleton description of an avatar mesh
    Skeleton {
        /// Skinned glTF/GLB mesh; defaults to the avatar's model in storage
        #[arg(long)]
        mesh: Option<PathBuf>,
        /// Avatar code whose model to read when --mesh is not given
        #[arg(long)]
        avatar: Option<String>,
        /// Build the on-heels variant
        #[arg(long)]
        heels: bool,
        /// Pick the variant the given outfit needs
        #[arg(long, conflicts_with = "heels")]
        outfit: Option<String>,
        /// Output JSON file; printed to stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Compose the body material of an avatar
    Body {
        #[arg(long)]
        avatar: String,
        /// Include metallic, roughness, and normal maps
        #[arg(long)]
        pbr: bool,
        #[arg(long)]
        out: PathBuf,
    },
    /// Compose an outfit material, and the body texture cut for it
    Outfit {
        #[arg(long)]
        dir: PathBuf,
        #[arg(long)]
        name: String,
        #[arg(long)]
        pbr: bool,
        /// Also write this avatar's body texture with the outfit's coverage cut out
        #[arg(long)]
        avatar: Option<String>,
        #[arg(long)]
        out: PathBuf,
    },
    /// Compose a haircut material
    Haircut {
        #[arg(long)]
        dir: PathBuf,
        #[arg(long)]
        name: String,
        #[arg(long)]
        out: PathBuf,
    },
    /// Write the default settings file
    InitConfig,
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    let cli = Cli::parse();
    let settings = AvatarSettings::load(cli.config.as_deref());
    let storage = AvatarStorage::new(&settings.paths.storage_root);

    match cli.cmd {
        Command::Skeleton {
            mesh,
            avatar,
            heels,
            outfit,
            out,
        } => {
            let mesh = match (mesh, avatar) {
                (Some(mesh), _) => mesh,
                (None, Some(code)) => storage.avatar_file(&code, AvatarFileKind::Mesh),
                (None, None) => anyhow::bail!("either --mesh or --avatar is required"),
            };
            let skin = load_skin(&mesh).with_context(|| format!("Failed to read skin from {}", mesh.display()))?;
            let table = BoneRoleTable::load(&settings.paths.bone_table)?;
            let rig = AvatarRig::build(&skin.bones, &table, &settings.rig)?;

            let description = match (heels, outfit.as_deref()) {
                (true, _) => &rig.on_heels,
                (false, outfit) => rig.description_for_outfit(outfit),
            };
            info!("Skin '{}': {} bones", skin.name, description.skeleton.len());
            export::export_description(description, out.as_deref())?;
        }
        Command::Body { avatar, pbr, out } => {
            let compositor = build_compositor(&settings)?;
            let runtime = build_runtime()?;
            let composed = runtime.block_on(compositor.prepare_body_material(&storage, &avatar, pbr))?;
            export::export_material(&composed, &out, "body")?;
        }
        Command::Outfit {
            dir,
            name,
            pbr,
            avatar,
            out,
        } => {
            let compositor = build_compositor(&settings)?;
            let runtime = build_runtime()?;
            runtime.block_on(async {
                let outfit = compositor.prepare_outfit_material(&storage, &dir, &name, pbr);
                let body = async {
                    let Some(code) = &avatar else {
                        return Ok::<_, anyhow::Error>(None);
                    };
                    let path = storage.avatar_file(code, AvatarFileKind::Texture);
                    let body = load_texture_async(&path)
                        .await
                        .with_context(|| format!("Failed to load body texture {}", path.display()))?;
                    let cut = compositor
                        .prepare_transparent_body_texture(&storage, &body, &dir, &name)
                        .await?;
                    Ok(cut)
                };
                let (outfit, body) = tokio::join!(outfit, body);

                export::export_material(&outfit?, &out, &name)?;
                if let Some(body) = body? {
                    let path = out.join("body_transparent.png");
                    body.save(&path)?;
                    info!("Wrote transparent body texture to {:?}", path);
                }
                Ok::<_, anyhow::Error>(())
            })?;
        }
        Command::Haircut { dir, name, out } => {
            let compositor = build_compositor(&settings)?;
            let runtime = build_runtime()?;
            let composed = runtime.block_on(compositor.prepare_hair_material(&storage, &dir, &name))?;
            export::export_material(&composed, &out, &name)?;
        }
        Command::InitConfig => {
            let path = match cli.config {
                Some(path) => path,
                None => AvatarSettings::settings_path().context("Could not determine config directory")?,
            };
            settings.save(&path)?;
        }
    }

    Ok(())
}

fn build_runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("Failed to create runtime")
}

fn build_compositor(settings: &AvatarSettings) -> Result<MaterialCompositor> {
    let traits = PipelineTraits::new(settings.rendering.pipeline);
    let catalog = match &settings.paths.resources {
        Some(path) => ResourceCatalog::load(path)?,
        None => ResourceCatalog::builtin(&traits),
    };
    let resources: Arc<dyn ResourceResolver> = Arc::new(catalog);
    Ok(MaterialCompositor::new(traits, resources))
}
