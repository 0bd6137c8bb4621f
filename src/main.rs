use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;
use rgisf::{PixelType, PngRasterizer, RGisFile, RasterOptions, Result};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rgisf")]
#[command(version, about = "Read, convert and tile RGISF raster containers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Display header and band information
    Info {
        /// Path to the RGISF file
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// The file is not zlib/gzip compressed
        #[arg(long)]
        uncompressed: bool,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Convert a GeoTIFF into an RGISF container
    Import {
        /// GeoTIFF path or URL
        #[arg(short, long, value_name = "SOURCE")]
        input: String,

        /// Output RGISF file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Store values as this pixel type (uint8, int16, float32, ...)
        #[arg(long, value_name = "TYPE")]
        pixel_type: Option<PixelType>,

        /// Multiply source values by this factor before storing
        #[arg(long, requires = "pixel_type")]
        factor: Option<f32>,

        /// JSON file with raster options (renderer, attrs, bbox, ...)
        #[arg(long, value_name = "FILE")]
        options: Option<PathBuf>,

        /// Write the container without compression
        #[arg(long)]
        uncompressed: bool,
    },
    /// Cut a geographic box out of a container
    Region {
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Box corners: x1 y1 x2 y2
        #[arg(long, required = true, num_args = 4, value_names = ["X1", "Y1", "X2", "Y2"], allow_negative_numbers = true)]
        bbox: Vec<f64>,
    },
    /// Merge the bands of containers with identical geometry
    Combine {
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Input RGISF files, bands are appended in this order
        #[arg(required = true, value_name = "FILES")]
        inputs: Vec<PathBuf>,
    },
    /// Render slippy-map PNG tiles into {dir}/{z}/{x}/{y}.png
    Tiles {
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,

        #[arg(long, default_value_t = 0)]
        min_zoom: u8,

        #[arg(long, default_value_t = 8)]
        max_zoom: u8,
    },
    /// Render the whole raster as one PNG
    Png {
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .format_timestamp(None)
        .init();

    match cli.command {
        Commands::Info {
            input,
            uncompressed,
            json,
        } => {
            let file = if uncompressed {
                RGisFile::open_uncompressed(&input, RasterOptions::default())?
            } else {
                RGisFile::open(&input, RasterOptions::default())?
            };
            print_info(&file, json)?;
        }
        Commands::Import {
            input,
            output,
            pixel_type,
            factor,
            options,
            uncompressed,
        } => {
            let mut opts = match options {
                Some(path) => RasterOptions::from_json(&fs::read_to_string(path)?)?,
                None => RasterOptions::default(),
            };
            if let Some(pixel_type) = pixel_type {
                opts = opts.with_read_as(pixel_type, factor.unwrap_or(1.0));
            }
            let file = RGisFile::from_geotiff_source(&input, opts)?;
            if uncompressed {
                file.save_to_uncompressed_file(&output)?;
            } else {
                file.save_to_file(&output)?;
            }
            log::info!("Wrote {}", output.display());
        }
        Commands::Region { input, output, bbox } => {
            let file = RGisFile::open(&input, RasterOptions::default())?;
            let cut = file.region(bbox[0], bbox[1], bbox[2], bbox[3])?;
            cut.save_to_file(&output)?;
            log::info!("Wrote {}x{} region to {}", cut.width(), cut.height(), output.display());
        }
        Commands::Combine { output, inputs } => {
            let files = inputs
                .iter()
                .map(|p| RGisFile::open(p, RasterOptions::default()))
                .collect::<Result<Vec<_>>>()?;
            let merged = RGisFile::combine(&files)?;
            merged.save_to_file(&output)?;
            log::info!("Wrote {} band(s) to {}", merged.band_count(), output.display());
        }
        Commands::Tiles {
            input,
            output,
            min_zoom,
            max_zoom,
        } => {
            let file = RGisFile::open(&input, RasterOptions::default())?;
            let count = file.generate_tiles(min_zoom, max_zoom, &output, &PngRasterizer)?;
            log::info!("Wrote {} tile(s) to {}", count, output.display());
        }
        Commands::Png { input, output } => {
            RGisFile::open(&input, RasterOptions::default())?.save_as_png(&output)?;
            log::info!("Wrote {}", output.display());
        }
    }

    Ok(())
}

fn print_info(file: &RGisFile, json: bool) -> Result<()> {
    if json {
        let bands: Vec<_> = file
            .bands()
            .iter()
            .map(|band| {
                serde_json::json!({
                    "stats": band.stats(),
                    "renderer": band.renderer(),
                    "attributes": band.attributes(),
                })
            })
            .collect();
        let output = serde_json::json!({
            "metadata": file.metadata(),
            "bands": bands,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_info_human(file);
    }

    Ok(())
}

fn print_info_human(file: &RGisFile) {
    let meta = file.metadata();
    println!("=== RGISF File Information ===\n");

    println!("Pixel Type: {}", meta.pixel_type);
    println!("Dimensions: {} x {} px", meta.width, meta.height);
    println!("Bands: {}", file.band_count());
    println!("CRS: EPSG:{}", meta.crs);
    println!(
        "Bounds: [{}, {}, {}, {}]",
        meta.bbox.x1, meta.bbox.y1, meta.bbox.x2, meta.bbox.y2
    );
    println!("Resolution: {} x {}", meta.resolution.x, meta.resolution.y);
    println!("Factor: {}", meta.factor);
    println!();

    for (i, band) in file.bands().iter().enumerate() {
        println!("=== Band {} ===", i);
        println!("Range: {} .. {}", band.stats().min, band.stats().max);
        match band.renderer() {
            rgisf::Renderer::Stretched { color_ramp } => {
                let stops: Vec<String> = color_ramp.iter().map(|c| c.as_hex()).collect();
                println!("Renderer: stretched [{}]", stops.join(", "));
            }
            rgisf::Renderer::Classified { classes } => {
                println!("Renderer: classified ({} classes)", classes.len());
                for class in classes {
                    println!("  [{}, {}) {}", class.min, class.max, class.color.as_hex());
                }
            }
        }
        if let Some(attrs) = band.attributes() {
            println!("Attributes:");
            for field in attrs.fields() {
                println!("  {}: {:?}", field.name, field.value);
            }
        }
        println!();
    }
}
