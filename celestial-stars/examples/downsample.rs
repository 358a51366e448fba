use anyhow::Context;
use celestial_stars::Catalog;

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let catalog_path = args
        .next()
        .context("Usage: downsample <stars.dat> [starnames.dat] [count]")?;
    let names_path = args.next();
    let count: usize = args.next().map(|s| s.parse()).transpose()?.unwrap_or(1000);

    let mut catalog = Catalog::open(&catalog_path)?;
    if let Some(path) = names_path {
        catalog.read_names(&std::fs::read_to_string(path)?)?;
    }
    println!("{}\n", catalog);

    let bright = catalog.downsample(count);
    println!("Brightest {}:\n{}\n", count, bright);

    for star in bright.brightest(10) {
        println!(
            "  HIP {:>7}  {:<20} {:<6} M={:6.2}  {:8.2} ly",
            star.hip_id,
            bright.primary_name(star.hip_id).unwrap_or("-"),
            star.spectral_type(),
            star.magnitude(),
            star.distance(),
        );
    }

    Ok(())
}
