//! Command line entry point: load a kymograph image, extract the
//! particle trajectory and write the overlay image plus the CSV table
//! next to the input.

mod overlay;
mod params;
mod table;

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use image::DynamicImage;
use tracing::{debug, info};

use kymo_core::Kymograph;
use kymo_track::TrajectoryExtractor;

use crate::params::Params;

#[derive(Parser, Debug)]
#[command(about = "Extract a particle trajectory from a kymograph image")]
struct Cli {
    /// YAML parameter file
    #[arg(short, long)]
    params: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    run(&cli.params)
}

fn run(params_path: &Path) -> Result<()> {
    let params = Params::load(params_path)?;

    let image_path = params.image_path();
    let kymo = load_kymograph(&image_path)?;
    info!(
        rows = kymo.rows(),
        lines = kymo.lines(),
        "loaded kymograph from {}",
        image_path.display()
    );

    let extractor =
        TrajectoryExtractor::new(&params.track_config()).context("designing the line filter")?;
    let trajectory = extractor
        .extract(&kymo)
        .context("extracting the trajectory")?;
    info!(
        present = trajectory.present_count(),
        absent = trajectory.len() - trajectory.present_count(),
        "trajectory extracted"
    );

    let geometry = params.scan_geometry();
    let distances = geometry
        .distances(&trajectory)
        .context("converting rows to signed distances")?;
    let radii = geometry
        .radii(&trajectory, kymo.rows())
        .context("converting rows to folded radii")?;

    let mut png = Vec::new();
    overlay::render(&kymo, &trajectory)
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .context("encoding the overlay image")?;
    let csv = table::to_csv_bytes(&table::build_records(&trajectory, &distances, &radii))?;

    let overlay_path = params.overlay_path();
    let table_path = params.table_path();
    persist_outputs(&overlay_path, &png, &table_path, &csv)?;
    info!(
        overlay = %overlay_path.display(),
        table = %table_path.display(),
        "outputs written"
    );

    Ok(())
}

/// Loads `{data_dir}/{data_name}.tiff` as one intensity profile per
/// image column.
///
/// 8- and 16-bit grayscale keep their raw integer values so the border
/// threshold stays in native image units; other layouts degrade to a
/// [0, 1] luma conversion.
fn load_kymograph(path: &Path) -> Result<Kymograph<f32>> {
    let decoded =
        image::open(path).with_context(|| format!("failed to open image {}", path.display()))?;

    let (width, height, data) = match decoded {
        DynamicImage::ImageLuma8(img) => {
            let (w, h) = img.dimensions();
            let data = img.into_raw().into_iter().map(f32::from).collect();
            (w, h, data)
        }
        DynamicImage::ImageLuma16(img) => {
            let (w, h) = img.dimensions();
            let data = img.into_raw().into_iter().map(f32::from).collect();
            (w, h, data)
        }
        other => {
            debug!("non-grayscale image layout, converting to luma");
            let img = other.to_luma32f();
            let (w, h) = img.dimensions();
            (w, h, img.into_raw())
        }
    };

    Kymograph::from_row_major(width as usize, height as usize, &data)
        .context("assembling the kymograph")
}

/// Writes both artifacts or neither: stage next to the targets first,
/// rename into place only after both staged writes succeeded.
fn persist_outputs(
    overlay_path: &Path,
    png: &[u8],
    table_path: &Path,
    csv: &[u8],
) -> Result<()> {
    let overlay_tmp = staged_path(overlay_path);
    let table_tmp = staged_path(table_path);

    let staged =
        write_staged(&overlay_tmp, png).and_then(|()| write_staged(&table_tmp, csv));
    if let Err(e) = staged {
        let _ = fs::remove_file(&overlay_tmp);
        let _ = fs::remove_file(&table_tmp);
        return Err(e);
    }

    fs::rename(&overlay_tmp, overlay_path)
        .with_context(|| format!("moving the overlay into {}", overlay_path.display()))?;
    if let Err(e) = fs::rename(&table_tmp, table_path) {
        let _ = fs::remove_file(overlay_path);
        let _ = fs::remove_file(&table_tmp);
        return Err(e)
            .with_context(|| format!("moving the table into {}", table_path.display()));
    }

    Ok(())
}

fn staged_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(".tmp");
    PathBuf::from(os)
}

fn write_staged(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
}
