//! # givre-flake
//!
//! Deterministic fractal snowflake generator: text + signature in, seeded
//! parameters and a six-branch SVG out, plus data-URL wrappers for direct
//! embedding. The whole pipeline is pure; the same inputs always produce
//! byte-identical output.

pub mod data_url;
pub mod params;
pub mod rng;
pub mod svg;

pub use data_url::{placeholder_data_url, to_data_url, to_data_url_base64};
pub use params::{derive_params, FlakeParams};
pub use rng::SeededRng;
pub use svg::{render_svg, to_svg};
