use argh::FromArgs;
use std::path::PathBuf;

use lidarview_pcd::color::Color;
use lidarview_pcd::io::pcd::read_pcd;

#[derive(FromArgs)]
/// Print a summary of a PCD point cloud file
struct Args {
    /// path to the .pcd file
    #[argh(option)]
    pcd_path: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Args = argh::from_env();

    let cloud = read_pcd(&args.pcd_path, Color::new(1.0, 1.0, 1.0))?;

    println!("{}: {} points", cloud.name(), cloud.len());
    println!("  colors:  {}", cloud.colors().is_some());
    println!("  normals: {}", cloud.normals().is_some());
    println!("  min bound: {}", cloud.get_min_bound());
    println!("  max bound: {}", cloud.get_max_bound());

    let (center, radius) = cloud.bounding_sphere();
    println!("  bounding sphere: center {center} radius {radius}");

    Ok(())
}
