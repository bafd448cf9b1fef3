//! Text dump format of the pixel extractor
//!
//! One pixel per line, `x,y: (c0,c1,c2) ...` with everything after the
//! closing parenthesis ignored. Lines starting with `#` are headers.

use super::RawPixel;

/// Parse an extractor text dump into raw pixels, in file order.
///
/// Lines that do not carry three numeric channels are skipped. A dump with
/// fewer pixels than the stencil area is still usable; the sampler divides
/// by the full area regardless.
pub fn parse_pixel_dump(text: &str) -> Vec<RawPixel> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> Option<RawPixel> {
    let (_, rest) = line.split_once('(')?;
    let (channels, _) = rest.split_once(')')?;

    let mut values = channels.split(',').map(|v| v.trim().parse::<f64>());
    let c0 = values.next()?.ok()?;
    let c1 = values.next()?.ok()?;
    let c2 = values.next()?.ok()?;
    Some([c0, c1, c2])
}
