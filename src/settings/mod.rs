use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "propmap")]
#[command(about = "Convert between XML prop maps and an in-memory 3D scene")]
pub struct CliArgs {
    /// Directory containing the prop libraries, one subdirectory per library.
    #[arg(long, env = "PROPMAP_LIBS_DIR")]
    pub libs_dir: PathBuf,

    #[command(subcommand)]
    pub operation_mode: OperationMode,
}

#[derive(Subcommand, Debug)]
pub enum OperationMode {
    /// Import a map into an in-memory scene and report what was placed.
    Import {
        map_file: PathBuf,

        #[command(flatten)]
        options: ImportOptions,
    },
    /// Import a map and export it again, normalizing the document.
    Roundtrip {
        map_file: PathBuf,
        out_file: PathBuf,

        #[command(flatten)]
        options: ImportOptions,

        /// Scale factor applied on export (should be the reciprocal of the
        /// import scale).
        #[arg(long, default_value_t = 100.0)]
        export_scale_factor: f64,

        /// Only export instances from this collection.
        #[arg(long)]
        export_collection: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct ImportOptions {
    /// Scale factor for imported objects.
    #[arg(long, default_value_t = 0.01)]
    pub scale_factor: f64,

    #[arg(long, value_enum, default_value = "z")]
    pub axis_up: AxisUp,

    /// Unit of the rotation values in the XML.
    #[arg(long, value_enum, default_value = "radians")]
    pub angle_mode: AngleMode,

    /// Skip importing and assigning textures.
    #[arg(long)]
    pub no_textures: bool,

    /// Decode every placement instead of caching repeated props.
    #[arg(long)]
    pub no_caching: bool,

    /// Don't tag imported instances with a collection named after the map.
    #[arg(long)]
    pub no_collection: bool,

    /// Number of placed instances between progress reports.
    #[arg(long, default_value_t = 50)]
    pub batch_size: usize,
}

impl ImportOptions {
    pub fn to_settings(&self) -> ImportSettings {
        ImportSettings {
            scale_factor: self.scale_factor,
            axis_up: self.axis_up,
            angle_mode: self.angle_mode,
            import_textures: !self.no_textures,
            use_caching: !self.no_caching,
            create_collection: !self.no_collection,
            batch_size: self.batch_size,
        }
    }
}

/// Which axis of the scene points up. `Z` is the map format's native
/// convention and passes through unchanged, `Y` requires a basis change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AxisUp {
    Z,
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AngleMode {
    Radians,
    Degrees,
}

#[derive(Debug, Clone)]
pub struct ImportSettings {
    pub scale_factor: f64,
    pub axis_up: AxisUp,
    pub angle_mode: AngleMode,
    pub import_textures: bool,
    pub use_caching: bool,
    pub create_collection: bool,
    pub batch_size: usize,
}

impl Default for ImportSettings {
    fn default() -> Self {
        ImportSettings {
            scale_factor: 0.01,
            axis_up: AxisUp::Z,
            angle_mode: AngleMode::Radians,
            import_textures: true,
            use_caching: true,
            create_collection: true,
            batch_size: 50,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExportSettings {
    pub scale_factor: f64,
    pub axis_up: AxisUp,
    pub angle_mode: AngleMode,
    pub selected_only: bool,
    pub collection: Option<String>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        ExportSettings {
            scale_factor: 100.0,
            axis_up: AxisUp::Z,
            angle_mode: AngleMode::Radians,
            selected_only: false,
            collection: None,
        }
    }
}
