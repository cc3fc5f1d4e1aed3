//! Built-in named grids.
//!
//! The tables list longitudes in degrees west, as the NCEP grid documents
//! do; they are flipped to east-positive once, when the table is first
//! touched. Lookup is an exact, case-sensitive name match searched table by
//! table in a fixed order, and the first match wins.

use once_cell::sync::Lazy;

use crate::angles::{rescale_lon, Hemisphere};
use crate::gaussian::GaussianData;
use crate::grid::{Grid, GridDefinition};
use crate::lambert::LambertData;
use crate::latlon::LatLonData;
use crate::mercator::MercatorData;
use crate::polar::StereographicData;

/// Earth radius assumed by the NCEP grids (km).
pub const NCEP_EARTH_RADIUS_KM: f64 = 6371.20;

/// Degrees west to degrees east in [-180, 180).
fn east(lon_west: f64) -> f64 {
    rescale_lon(-lon_west)
}

// ============================================================================
// Table rows
// ============================================================================

/// (name, scale_lat_1, scale_lat_2, lat_pin, lon_pin W, x_pin, y_pin,
/// lon_orient W, d_km, nx, ny)
type LambertRow = (
    &'static str,
    f64,
    f64,
    f64,
    f64,
    f64,
    f64,
    f64,
    f64,
    usize,
    usize,
);

fn lambert(rows: &[LambertRow]) -> Vec<GridDefinition> {
    rows.iter()
        .map(|&(name, s1, s2, lat_pin, lon_pin, x_pin, y_pin, orient, d_km, nx, ny)| {
            GridDefinition::Lambert(LambertData {
                name: name.to_string(),
                hemisphere: Hemisphere::of_lat(s1),
                scale_lat_1: s1,
                scale_lat_2: s2,
                lat_pin,
                lon_pin: east(lon_pin),
                x_pin,
                y_pin,
                lon_orient: east(orient),
                d_km,
                r_km: NCEP_EARTH_RADIUS_KM,
                nx,
                ny,
            })
        })
        .collect()
}

/// (name, hemisphere, scale_lat, lat_pin, lon_pin W, x_pin, y_pin,
/// lon_orient W, d_km, nx, ny)
type StereoRow = (
    &'static str,
    Hemisphere,
    f64,
    f64,
    f64,
    f64,
    f64,
    f64,
    f64,
    usize,
    usize,
);

fn stereographic(rows: &[StereoRow]) -> Vec<GridDefinition> {
    rows.iter()
        .map(|&(name, hemisphere, scale_lat, lat_pin, lon_pin, x_pin, y_pin, orient, d_km, nx, ny)| {
            GridDefinition::Stereographic(StereographicData {
                name: name.to_string(),
                hemisphere,
                scale_lat,
                lat_pin,
                lon_pin: east(lon_pin),
                x_pin,
                y_pin,
                lon_orient: east(orient),
                d_km,
                r_km: NCEP_EARTH_RADIUS_KM,
                nx,
                ny,
            })
        })
        .collect()
}

/// NCEP stereographic grids are all northern, true at 60N, pinned at (0, 0).
/// (name, lat_pin, lon_pin W, lon_orient W, d_km, nx, ny)
type NcepStereoRow = (&'static str, f64, f64, f64, f64, usize, usize);

fn ncep_stereographic(rows: &[NcepStereoRow]) -> Vec<GridDefinition> {
    let full: Vec<StereoRow> = rows
        .iter()
        .map(|&(name, lat_pin, lon_pin, orient, d_km, nx, ny)| {
            (name, Hemisphere::North, 60.0, lat_pin, lon_pin, 0.0, 0.0, orient, d_km, nx, ny)
        })
        .collect();
    stereographic(&full)
}

/// (name, lat_ll, lon_ll W, delta_lat, delta_lon, ny, nx)
type LatLonRow = (&'static str, f64, f64, f64, f64, usize, usize);

fn latlon(rows: &[LatLonRow]) -> Vec<GridDefinition> {
    rows.iter()
        .map(|&(name, lat_ll, lon_ll, delta_lat, delta_lon, ny, nx)| {
            GridDefinition::LatLon(LatLonData {
                name: name.to_string(),
                lat_ll,
                lon_ll: east(lon_ll),
                delta_lat,
                delta_lon,
                nx,
                ny,
            })
        })
        .collect()
}

/// (name, lat_ll, lon_ll W, lat_ur, lon_ur W, nx, ny)
type MercatorRow = (&'static str, f64, f64, f64, f64, usize, usize);

fn mercator(rows: &[MercatorRow]) -> Vec<GridDefinition> {
    rows.iter()
        .map(|&(name, lat_ll, lon_ll, lat_ur, lon_ur, nx, ny)| {
            GridDefinition::Mercator(MercatorData {
                name: name.to_string(),
                lat_ll,
                lon_ll: east(lon_ll),
                lat_ur,
                lon_ur: east(lon_ur),
                nx,
                ny,
            })
        })
        .collect()
}

// ============================================================================
// Tables
// ============================================================================

static DTC_LAMBERT: Lazy<Vec<GridDefinition>> = Lazy::new(|| {
    lambert(&[
        ("DTC164", 30.0, 48.0, 20.47, 122.042, 0.0, 0.0, 98.8, 13.3, 376, 280),
        ("DTC165", 30.0, 48.0, 20.653, 121.907, 0.0, 0.0, 98.8, 13.3, 168, 280),
        ("DTC166", 30.0, 48.0, 23.114, 100.997, 0.0, 0.0, 98.8, 13.3, 208, 280),
    ])
});

static NCEP_LATLON: Lazy<Vec<GridDefinition>> = Lazy::new(|| {
    latlon(&[
        ("G002", -90.0, 0.0, 2.5, 2.5, 73, 144),
        ("G003", -90.0, 0.0, 1.0, 1.0, 181, 360),
        ("G004", -90.0, 0.0, 0.5, 0.5, 361, 720),
        ("G029", 0.0, 0.0, 2.5, 2.5, 37, 145),
        ("G030", -90.0, 0.0, 2.5, 2.5, 37, 145),
        ("G033", 0.0, 0.0, 2.0, 2.0, 46, 181),
        ("G034", -90.0, 0.0, 2.0, 2.0, 46, 181),
        ("G045", -90.0, 0.0, 1.25, 1.25, 145, 288),
        ("G085", 0.5, -0.5, 1.0, 1.0, 90, 360),
        ("G086", -89.5, -0.5, 1.0, 1.0, 90, 360),
        ("G110", 25.063, 124.938, 0.125, 0.125, 224, 464),
        ("G175", 0.0, -130.0, 0.09, 0.09, 334, 556),
        ("G228", -90.0, 0.0, 2.5, 2.5, 73, 144),
        ("G229", -90.0, 0.0, 1.0, 1.0, 181, 360),
        ("G230", -90.0, 0.0, 0.5, 0.5, 361, 720),
        ("G231", 0.0, 0.0, 0.5, 0.5, 181, 720),
        ("G232", 0.0, 0.0, 1.0, 1.0, 91, 360),
        ("G233", -78.0, 0.0, 1.0, 1.25, 157, 288),
        ("G234", -45.0, 98.0, 0.25, 0.25, 241, 133),
        ("G243", 10.0, 170.0, 0.4, 0.4, 101, 126),
        ("G248", 14.5, 71.5, 0.075, 0.075, 101, 135),
        ("G250", 16.5, 162.0, 0.075, 0.075, 101, 135),
        ("G251", 26.35, 83.05, 0.1, 0.1, 210, 332),
    ])
});

static NCEP_STEREOGRAPHIC: Lazy<Vec<GridDefinition>> = Lazy::new(|| {
    let mut grids = ncep_stereographic(&[
        ("G005", 7.647, 133.443, 105.0, 190.5, 53, 57),
        ("G006", 7.647, 133.443, 105.0, 190.5, 53, 45),
        ("G027", -20.826, 125.0, 80.0, 381.0, 65, 65),
        ("G055", -10.947, 154.289, 105.0, 254.0, 87, 71),
        ("G056", 7.647, 133.443, 105.0, 127.0, 87, 71),
        ("G087", 22.876, 120.491, 105.0, 68.153, 81, 62),
        ("G088", 10.0, 128.0, 105.0, 15.0, 580, 548),
        ("G100", 17.108, 129.296, 105.0, 91.452, 83, 83),
        ("G101", 10.528, 137.146, 105.0, 91.452, 113, 91),
        ("G103", 22.405, 121.352, 105.0, 91.452, 65, 56),
        ("G104", -0.268, 139.475, 105.0, 90.755, 147, 110),
        ("G105", 17.529, 129.296, 105.0, 90.755, 83, 83),
        ("G106", 17.533, 129.296, 105.0, 45.373, 165, 117),
        ("G107", 23.438, 120.168, 105.0, 45.373, 120, 92),
        ("G201", -20.826, 150.0, 105.0, 381.0, 65, 65),
        ("G202", 7.838, 141.028, 105.0, 190.5, 65, 43),
        ("G203", 19.132, 185.837, 150.0, 190.5, 45, 39),
        ("G205", 0.616, 84.904, 60.0, 190.5, 45, 39),
        ("G207", 42.085, 175.641, 150.0, 95.25, 49, 35),
        ("G213", 7.838, 141.028, 105.0, 95.25, 129, 85),
        ("G214", 42.085, 175.641, 150.0, 47.625, 97, 69),
        ("G216", 30.0, 173.0, 135.0, 45.0, 139, 107),
        ("G217", 30.0, 173.0, 135.0, 22.5, 277, 213),
        ("G223", -20.826, 150.0, 105.0, 190.5, 129, 129),
        ("G240", 23.098, 119.036, 105.0, 4.7625, 1121, 881),
        ("G242", 30.0, 173.0, 135.0, 11.25, 553, 425),
        ("G249", 45.4, 171.6, 150.0, 9.868, 367, 343),
    ]);
    grids.extend(stereographic(&[(
        "G224",
        Hemisphere::South,
        -60.0,
        -90.0,
        0.0,
        32.0,
        32.0,
        -75.0,
        381.0,
        65,
        65,
    )]));
    grids
});

static MISC_STEREOGRAPHIC: Lazy<Vec<GridDefinition>> = Lazy::new(|| {
    stereographic(&[
        (
            "wwmca_north",
            Hemisphere::North,
            60.0,
            90.0,
            0.0,
            511.0,
            511.0,
            80.0,
            23.79848,
            1024,
            1024,
        ),
        (
            "wwmca_south",
            Hemisphere::South,
            -60.0,
            -90.0,
            0.0,
            511.0,
            511.0,
            -100.0,
            23.79848,
            1024,
            1024,
        ),
    ])
});

static NCEP_LAMBERT: Lazy<Vec<GridDefinition>> = Lazy::new(|| {
    lambert(&[
        ("G130", 25.0, 25.0, 16.281, 126.138, 0.0, 0.0, 95.0, 13.545087, 451, 337),
        ("G145", 36.0, 46.0, 32.174, 90.159, 0.0, 0.0, 79.5, 12.0, 169, 145),
        ("G146", 36.0, 46.0, 32.353, 89.994, 0.0, 0.0, 79.5, 12.0, 166, 142),
        ("G163", 38.0, 38.0, 20.6, 118.3, 0.0, 0.0, 95.0, 5.0, 1008, 722),
        ("G206", 25.0, 25.0, 22.289, 117.991, 0.0, 0.0, 95.0, 81.271, 51, 41),
        ("G209", 45.0, 45.0, -4.85, 151.1, 0.0, 0.0, 111.0, 44.0, 275, 223),
        ("G211", 25.0, 25.0, 12.19, 133.459, 0.0, 0.0, 95.0, 81.271, 93, 65),
        ("G212", 25.0, 25.0, 12.19, 133.459, 0.0, 0.0, 95.0, 40.635, 185, 129),
        ("G215", 25.0, 25.0, 12.19, 133.459, 0.0, 0.0, 95.0, 20.318, 369, 257),
        ("G218", 25.0, 25.0, 12.19, 133.459, 0.0, 0.0, 95.0, 12.191, 614, 428),
        ("G221", 50.0, 50.0, 1.0, 145.5, 0.0, 0.0, 107.0, 32.463, 349, 277),
        ("G222", 45.0, 45.0, -4.85, 151.1, 0.0, 0.0, 111.0, 88.0, 138, 112),
        ("G226", 25.0, 25.0, 12.19, 133.459, 0.0, 0.0, 95.0, 10.159, 737, 513),
        ("G227", 25.0, 25.0, 12.19, 133.459, 0.0, 0.0, 95.0, 5.079, 1473, 1025),
        ("G236", 25.0, 25.0, 16.281, -233.862, 0.0, 0.0, 95.0, 40.635, 151, 113),
        ("G237", 50.0, 50.0, 16.201, -285.72, 0.0, 0.0, 107.0, 32.463, 54, 47),
        ("G241", 45.0, 45.0, -4.85, 151.1, 0.0, 0.0, 111.0, 22.0, 549, 445),
        ("G245", 35.0, 35.0, 22.98, 92.84, 0.0, 0.0, 80.0, 8.0, 336, 372),
        ("G246", 40.0, 40.0, 25.97, 127.973, 0.0, 0.0, 115.0, 8.0, 332, 371),
        ("G247", 35.0, 35.0, 22.98, 110.84, 0.0, 0.0, 98.0, 8.0, 336, 372),
        ("G252", 25.0, 25.0, 16.281, 126.138, 0.0, 0.0, 95.0, 20.317, 301, 225),
    ])
});

static NCEP_MERCATOR: Lazy<Vec<GridDefinition>> = Lazy::new(|| {
    mercator(&[
        ("G001", -48.09, 0.0, 48.09, 0.0, 73, 23),
        ("G053", -61.05, 0.0, 61.05, 0.0, 117, 51),
        ("G195", 16.829, 68.196, 19.747, 63.972, 177, 129),
        ("G196", 18.067, 161.626, 23.082, 153.969, 321, 225),
        ("G199", 12.35, 216.314, 16.794, 179.96, 193, 193),
        ("G204", -25.0, -110.0, 60.644, 109.129, 93, 68),
        ("G208", 9.343, 167.315, 28.092, 145.878, 29, 27),
        ("G210", 9.0, 77.0, 26.422, 58.625, 25, 25),
        ("G225", -25.0, 250.0, 60.64, 109.129, 185, 135),
        ("G254", -35.0, 250.0, 60.789, 109.129, 369, 300),
    ])
});

static NCEP_GAUSSIAN: Lazy<Vec<GridDefinition>> = Lazy::new(|| {
    [("G126", 384, 190), ("G127", 768, 384)]
        .into_iter()
        .map(|(name, nx, ny)| {
            GridDefinition::Gaussian(GaussianData {
                name: name.to_string(),
                lon_zero: 0.0,
                nx,
                ny,
            })
        })
        .collect()
});

/// Tables in search order.
fn tables() -> [&'static [GridDefinition]; 7] {
    [
        DTC_LAMBERT.as_slice(),
        NCEP_LATLON.as_slice(),
        NCEP_STEREOGRAPHIC.as_slice(),
        MISC_STEREOGRAPHIC.as_slice(),
        NCEP_LAMBERT.as_slice(),
        NCEP_MERCATOR.as_slice(),
        NCEP_GAUSSIAN.as_slice(),
    ]
}

/// Every catalog definition, in search order.
pub fn all_definitions() -> impl Iterator<Item = &'static GridDefinition> {
    tables().into_iter().flatten()
}

/// First catalog definition named `name`.
pub fn find_definition(name: &str) -> Option<&'static GridDefinition> {
    all_definitions().find(|def| def.name() == name)
}

/// Build the first catalog grid named `name`, or `None` when there is none.
pub fn find_grid_by_name(name: &str) -> Option<Grid> {
    let def = find_definition(name)?;
    match Grid::new(def.clone()) {
        Ok(grid) => Some(grid),
        Err(e) => {
            tracing::warn!(grid = %name, error = %e, "catalog grid failed to build");
            None
        }
    }
}
