//! Neighborhood processing for gridded verification fields.
//!
//! This crate operates on [`DataPlane`](vx_common::DataPlane) fields laid
//! out on a grid and provides:
//!
//! - **Templates**: square and circular neighborhoods that can slide one
//!   cell at a time, reporting only the cells entering and leaving
//! - **Smoothing**: minimum, maximum, median, mean and Gaussian filters
//! - **Fractional coverage**: the fraction of valid neighbors passing a
//!   threshold, computed incrementally down each column
//! - **Distance maps**: exact Euclidean distance to the nearest event
//! - **Polygon masks**: winding-number membership in grid or lat/lon
//!   polygons, including outlines crossing the antimeridian
//!
//! # Architecture
//!
//! ```text
//! DataPlane ──► NeighborhoodEngine ──┬─► smooth_field ──► interp_* per cell
//!                  (EngineConfig)    │                └─► apply_gaussian
//!                                    └─► fractional_coverage
//!                                           │
//!                                           └─► TemplateWindow edges
//!
//! DataPlane ──► distance_map   (column pass, then row envelope pass)
//!
//! Grid + LatLonPolygon ──► polygon_mask ──► MaskPlane
//! ```
//!
//! # Example
//!
//! ```ignore
//! use grid_processor::{EngineConfig, NeighborhoodEngine};
//!
//! let engine = NeighborhoodEngine::new(EngineConfig::from_env()?)?;
//! let smoothed = engine.smooth(&forecast)?;
//! let coverage = engine.coverage(&forecast)?;
//! ```

pub mod config;
pub mod coverage;
pub mod distance;
pub mod engine;
pub mod error;
pub mod gaussian;
pub mod interp;
pub mod mask;
pub mod smooth;
pub mod template;
pub mod types;

// Re-export commonly used types at crate root
pub use config::EngineConfig;
pub use coverage::{fractional_coverage, fractional_coverage_square};
pub use distance::distance_map;
pub use engine::NeighborhoodEngine;
pub use error::{ProcessorError, Result};
pub use gaussian::{apply_gaussian, GaussianInfo};
pub use interp::compute_horz_interp;
pub use mask::{
    parse_latlon_poly_file, parse_latlon_poly_str, parse_xy_poly_file, parse_xy_poly_str,
    polygon_mask, xy_polygon_mask, ClosedPolygon, LatLonPolygon, Polygon,
};
pub use smooth::{smooth_field, SmoothParams};
pub use template::{GridOffset, GridTemplate, GridTemplateShape, TemplateWindow};
pub use types::InterpMethod;
