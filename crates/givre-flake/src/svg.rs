use std::f64::consts::PI;

use givre_shared::constants::FALLBACK_SEED_TEXT;

use crate::params::{derive_params, FlakeParams};
use crate::rng::SeededRng;

/// Render the snowflake for raw user text.
///
/// Trims `text` and falls back to the fixed seed string when nothing is
/// left, so blank input still yields a flake instead of an error.
pub fn to_svg(text: &str, size: u32, signature: &str) -> String {
    let trimmed = text.trim();
    let safe_text = if trimmed.is_empty() { FALLBACK_SEED_TEXT } else { trimmed };
    render_svg(&derive_params(safe_text, signature), size)
}

/// Render a snowflake as a square `size` × `size` SVG document.
///
/// Six branches radiate at 60° intervals. Each branch draws a main spoke at
/// its base station, then sprouts a side-branch pair per inner station with
/// probability 0.7, angled ±(30°–45°) off the branch axis and scaled by
/// `symmetry`. The RNG draw order is a format constant; reordering draws
/// changes every snowflake ever rendered.
pub fn render_svg(params: &FlakeParams, size: u32) -> String {
    let mut rng = SeededRng::new(params.seed);
    let center = f64::from(size) / 2.0;
    let max_radius = f64::from(size) * 0.45;

    let mut paths = String::new();
    for b in 0..params.branches {
        let angle = (f64::from(b) * 360.0 / f64::from(params.branches)) * PI / 180.0;
        paths.push_str(&branch_paths(
            &mut rng,
            center,
            angle,
            max_radius,
            params.complexity,
            params.symmetry,
        ));
    }

    format!(
        r#"<svg width="{size}" height="{size}" viewBox="0 0 {size} {size}" xmlns="http://www.w3.org/2000/svg">
      <defs>
        <filter id="glow">
          <feGaussianBlur stdDeviation="2" result="coloredBlur"/>
          <feMerge>
            <feMergeNode in="coloredBlur"/>
            <feMergeNode in="SourceGraphic"/>
          </feMerge>
        </filter>
        <linearGradient id="snowGradient" x1="0%" y1="0%" x2="100%" y2="100%">
          <stop offset="0%" style="stop-color:#38dafa;stop-opacity:1" />
          <stop offset="50%" style="stop-color:#ffffff;stop-opacity:0.9" />
          <stop offset="100%" style="stop-color:#CB73FC;stop-opacity:1" />
        </linearGradient>
      </defs>
      <g filter="url(#glow)">
        {paths}
      </g>
    </svg>"#
    )
}

fn branch_paths(
    rng: &mut SeededRng,
    center: f64,
    angle: f64,
    max_radius: f64,
    complexity: u32,
    symmetry: f64,
) -> String {
    let mut path = String::new();
    let segments = complexity;

    for i in 0..segments {
        let ratio = (i + 1) as f64 / segments as f64;
        let radius = max_radius * ratio;

        if i == 0 {
            // Main spoke, center to first station, tapering with ratio.
            let x = center + angle.cos() * radius;
            let y = center + angle.sin() * radius;
            path.push_str(&format!(
                r#"<line x1="{center}" y1="{center}" x2="{x}" y2="{y}" stroke="url(#snowGradient)" stroke-width="{}" stroke-linecap="round"/>"#,
                3.0 - ratio * 2.0
            ));
        }

        if i > 0 && rng.next() > 0.3 {
            let side_length = radius * (0.3 + rng.next() * 0.3) * symmetry;
            let side_angle1 = angle + (PI / 6.0 + rng.next() * PI / 12.0);
            let side_angle2 = angle - (PI / 6.0 + rng.next() * PI / 12.0);

            let prev_ratio = i as f64 / segments as f64;
            let prev_radius = max_radius * prev_ratio;
            let start_x = center + angle.cos() * prev_radius;
            let start_y = center + angle.sin() * prev_radius;

            let side1_x = start_x + side_angle1.cos() * side_length;
            let side1_y = start_y + side_angle1.sin() * side_length;
            let side2_x = start_x + side_angle2.cos() * side_length;
            let side2_y = start_y + side_angle2.sin() * side_length;

            let stroke_width = (2.0 - ratio * 1.5).max(0.5);
            path.push_str(&format!(
                r#"<line x1="{start_x}" y1="{start_y}" x2="{side1_x}" y2="{side1_y}" stroke="url(#snowGradient)" stroke-width="{stroke_width}" stroke-linecap="round"/>"#
            ));
            path.push_str(&format!(
                r#"<line x1="{start_x}" y1="{start_y}" x2="{side2_x}" y2="{side2_y}" stroke="url(#snowGradient)" stroke-width="{stroke_width}" stroke-linecap="round"/>"#
            ));
        }
    }

    path
}
