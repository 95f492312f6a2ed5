//! Print the connector segments for a set of distances.

use anyhow::Result;
use inset_builder::form;
use inset_overlay::path::{describe, distances_to_segments};

/// Run the path command.
///
/// A zero turning point with a vertical run picks the midpoint, the same
/// default the visual builder applies.
pub fn run(horizontal: f64, vertical: f64, turning_point: f64) -> Result<()> {
    let turning_point = form::turning_point(horizontal, vertical, turning_point);
    let segments = distances_to_segments(horizontal, vertical, turning_point);
    tracing::debug!("{}", describe(&segments));

    println!("{}", serde_json::to_string_pretty(&segments)?);
    Ok(())
}
