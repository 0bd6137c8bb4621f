use rgisf::{RGisFile, RasterOptions, Result};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <path-or-url-to-rgisf-file>", args[0]);
        std::process::exit(1);
    }

    let file = RGisFile::from_source(&args[1], RasterOptions::default())?;

    println!("=== RGISF File Information ===");
    println!("{:#?}", file.metadata());

    for (i, band) in file.bands().iter().enumerate() {
        println!("\n=== Band {} ===", i);
        println!("Stats: {:?}", band.stats());
        println!("Renderer: {:#?}", band.renderer());
        if let Some(attrs) = band.attributes() {
            println!("Attributes: {:#?}", attrs);
        }
    }

    Ok(())
}
