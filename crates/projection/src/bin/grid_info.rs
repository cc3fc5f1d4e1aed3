//! Grid inspection tool.
//!
//! Resolves a named catalog grid or a grid specification string, prints its
//! parameters and optionally converts a point between grid and earth
//! coordinates.
//!
//! ```text
//! grid-info G212 --latlon 39.1 -94.6
//! grid-info "latlon 360 181 -90 0 1 1" --xy 10 20
//! grid-info --west-positive --json "lambert 185 129 12.19 133.459 95 40.635 6371.2 25 N"
//! ```
//!
//! A specification string is a single argument, so it must be quoted.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use projection::{find_grid_by_name, Grid, GridProjection};

#[derive(Parser, Debug)]
#[command(name = "grid-info")]
#[command(about = "Describe a verification grid and convert coordinates")]
struct Args {
    /// Catalog grid name (e.g. G212) or a quoted specification string
    grid: String,

    /// Convert grid coordinates to lat/lon
    #[arg(long, num_args = 2, value_names = ["X", "Y"], allow_negative_numbers = true)]
    xy: Option<Vec<f64>>,

    /// Convert lat/lon to grid coordinates
    #[arg(long, num_args = 2, value_names = ["LAT", "LON"], allow_negative_numbers = true)]
    latlon: Option<Vec<f64>>,

    /// Read specification longitudes as degrees west
    #[arg(long, env = "VX_WEST_LONGITUDE_POSITIVE")]
    west_positive: bool,

    /// Print the grid definition as JSON instead of the text dump
    #[arg(long)]
    json: bool,

    /// Log level used when RUST_LOG is unset
    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    log_level: String,
}

fn resolve(args: &Args) -> Result<Grid> {
    let text = args.grid.trim();
    if let Some(grid) = find_grid_by_name(text) {
        return Ok(grid);
    }
    Grid::from_spec(text, args.west_positive)
        .with_context(|| format!("'{}' is neither a catalog grid nor a valid specification", text))
}

fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level.to_lowercase()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let grid = resolve(&args)?;
    info!(grid = %grid.name(), kind = %grid.kind(), nx = grid.nx(), ny = grid.ny(), "resolved grid");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&grid.definition())?);
    } else {
        print!("{}", grid.dump());
        let bbox = grid.bounding_box();
        println!(
            "Bounds     = lat [{:.4}, {:.4}] lon [{:.4}, {:.4}]",
            bbox.min_y, bbox.max_y, bbox.min_x, bbox.max_x
        );
        println!("Global     = {}", grid.is_global());
    }

    if let Some(xy) = args.xy.as_deref() {
        let (x, y) = (xy[0], xy[1]);
        let (lat, lon) = grid.xy_to_latlon(x, y);
        let rot = grid.rot_grid_to_earth(x, y);
        println!(
            "(x, y) = ({:.4}, {:.4}) -> (lat, lon) = ({:.6}, {:.6}), rotation = {:.4} deg",
            x, y, lat, lon, rot
        );
    }

    if let Some(ll) = args.latlon.as_deref() {
        let (lat, lon) = (ll[0], ll[1]);
        let (x, y) = grid.latlon_to_xy(lat, lon);
        println!(
            "(lat, lon) = ({:.6}, {:.6}) -> (x, y) = ({:.4}, {:.4})",
            lat, lon, x, y
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_followed_by_latlon() {
        let args =
            Args::try_parse_from(["grid-info", "G212", "--latlon", "39.1", "-94.6"]).unwrap();
        assert_eq!(args.grid, "G212");
        assert_eq!(args.latlon, Some(vec![39.1, -94.6]));
        assert!(args.xy.is_none());
        assert_eq!(resolve(&args).unwrap().name(), "G212");
    }

    #[test]
    fn test_quoted_spec_followed_by_xy() {
        let args = Args::try_parse_from([
            "grid-info",
            "latlon 360 181 -90 0 1 1",
            "--xy",
            "10",
            "20",
            "--json",
        ])
        .unwrap();
        assert_eq!(args.xy, Some(vec![10.0, 20.0]));
        assert!(args.json);
        let grid = resolve(&args).unwrap();
        assert_eq!((grid.nx(), grid.ny()), (360, 181));
    }

    #[test]
    fn test_flags_before_grid() {
        let args = Args::try_parse_from(["grid-info", "--xy", "-1.5", "2", "G003"]).unwrap();
        assert_eq!(args.grid, "G003");
        assert_eq!(args.xy, Some(vec![-1.5, 2.0]));
    }

    #[test]
    fn test_unquoted_spec_is_rejected() {
        assert!(Args::try_parse_from(["grid-info", "latlon", "360", "181"]).is_err());
        assert!(Args::try_parse_from(["grid-info"]).is_err());
    }
}
