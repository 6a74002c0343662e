//! # Cave Preview
//!
//! Generates one cave and prints it as ASCII with a timing report.
//!
//! Usage: `cave_preview [cave.toml]`. Without a path the built-in defaults
//! are used with ambient randomness.

use std::collections::BTreeMap;
use std::path::Path;

use cavern::entities::ArchetypeCatalog;
use cavern::procedural::GenerationConfig;
use cavern::CaveWorld;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => GenerationConfig::from_toml_file(Path::new(&path))?,
        None => GenerationConfig::default(),
    };

    let mut world = CaveWorld::new(ArchetypeCatalog::new());
    let report = world.generate(&config)?;

    if let Some(map) = world.ascii_map() {
        print!("{map}");
    }

    let mut variants: BTreeMap<u8, usize> = BTreeMap::new();
    for variant in world.surface().tiles().iter().flatten() {
        *variants.entry(variant.index()).or_default() += 1;
    }

    let total = u64::from(report.size) * u64::from(report.size);
    println!();
    println!("╔════════════════════════════════════════╗");
    println!("║           CAVE PREVIEW REPORT          ║");
    println!("╠════════════════════════════════════════╣");
    println!("║ Seed:       {:>26} ║", report.seed.value());
    println!("║ Size:       {:>26} ║", format!("{0}x{0}", report.size));
    println!("║ Steps:      {:>26} ║", report.steps);
    println!("║ Solid:      {:>26} ║", format!("{} / {total}", report.alive_cells));
    println!("║ Variants:   {:>26} ║", variants.len());
    println!("║ Time:       {:>26} ║", format!("{:?}", report.elapsed));
    println!("╚════════════════════════════════════════╝");
    Ok(())
}
