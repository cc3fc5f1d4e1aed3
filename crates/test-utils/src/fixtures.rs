//! Common test fixtures for the grid verification tests.
//!
//! Grid specification strings and polygon outlines that several test suites
//! share.

/// Grid specification strings accepted by the projection parser.
pub mod grid_spec {
    /// 5x5 one-degree lat/lon grid anchored at (0, 0)
    pub const LATLON_5X5: &str = "latlon 5 5 0 0 1 1";

    /// Global one-degree lat/lon grid
    pub const LATLON_GLOBAL_1DEG: &str = "latlon 360 181 -90 0 1 1";

    /// NCEP grid 212 written as a specification (east-positive longitudes)
    pub const LAMBERT_G212: &str = "lambert 185 129 12.19 -133.459 -95 40.635 6371.2 25 N";

    /// Secant Lambert cone over the central US
    pub const LAMBERT_SECANT: &str = "lambert 100 80 20 -120 -97 12 6371.2 30 60 N";

    /// Northern polar stereographic
    pub const STEREO_NORTH: &str = "stereo 65 65 -20.826 -125 -80 381 6371.2 60 N";

    /// Mercator strip crossing the antimeridian
    pub const MERCATOR_PACIFIC: &str = "mercator 93 68 -25 110 60.644 -109.129";

    /// Rotated lat/lon domain over Europe
    pub const ROTATED_EUROPE: &str = "rotlatlon 120 80 -10 -15 0.25 0.25 -40 10 0";

    /// T62 Gaussian grid
    pub const GAUSSIAN_T62: &str = "gaussian 0 192 94";

    /// All of the above, for suites that iterate over every projection.
    pub const ALL: [&str; 8] = [
        LATLON_5X5,
        LATLON_GLOBAL_1DEG,
        LAMBERT_G212,
        LAMBERT_SECANT,
        STEREO_NORTH,
        MERCATOR_PACIFIC,
        ROTATED_EUROPE,
        GAUSSIAN_T62,
    ];
}

/// Polygon outlines as `(u, v)` vertex lists.
pub mod polygon {
    /// Axis-aligned 10x10 square with a corner at the origin
    pub const SQUARE_10: [(f64, f64); 4] = [(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)];

    /// Concave "L" shape in grid units
    pub const L_SHAPE: [(f64, f64); 6] = [
        (0.0, 0.0),
        (6.0, 0.0),
        (6.0, 2.0),
        (2.0, 2.0),
        (2.0, 6.0),
        (0.0, 6.0),
    ];

    /// Longitude/latitude box spanning 170E to 170W
    pub const DATELINE_BOX: [(f64, f64); 4] =
        [(170.0, -10.0), (-170.0, -10.0), (-170.0, 10.0), (170.0, 10.0)];
}
