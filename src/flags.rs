use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;

pub const DEFAULT_RENDERER: &str = "jp2a";
pub const DEFAULT_FLAG_WIDTH: u32 = 40;

const VS_SEPARATOR: &str = " vs. ";
const GAP: &str = "     ";

/// Turns an image file into terminal text. Failures come back as an empty string.
pub trait FlagRenderer {
    fn render(&self, image: &Path, width: u32) -> String;
}

/// Shells out to `jp2a` (or a compatible program) with color output.
pub struct ExternalRenderer {
    pub program: String,
}

impl FlagRenderer for ExternalRenderer {
    fn render(&self, image: &Path, width: u32) -> String {
        let output = Command::new(&self.program)
            .arg(image)
            .arg("--color")
            .arg(format!("--width={width}"))
            .output();
        match output {
            Ok(out) if out.status.success() => String::from_utf8_lossy(&out.stdout).into_owned(),
            Ok(out) => {
                debug!(
                    "{} exited with {} for {}",
                    self.program,
                    out.status,
                    image.display()
                );
                String::new()
            }
            Err(err) => {
                debug!("failed to run {}: {err}", self.program);
                String::new()
            }
        }
    }
}

pub fn flag_path(images_dir: &Path, team: &str) -> PathBuf {
    images_dir.join(format!("{team}.jpg"))
}

/// Places two renderings side by side. The second-to-last home line carries
/// the " vs. " marker; every other line is joined with a plain gap.
pub fn merge_flags(home: &str, away: &str) -> String {
    let left = home.split('\n').collect::<Vec<_>>();
    let right = away.split('\n').collect::<Vec<_>>();
    let vs_row = left.len().checked_sub(2);
    left.iter()
        .enumerate()
        .map(|(idx, line)| {
            let sep = if Some(idx) == vs_row { VS_SEPARATOR } else { GAP };
            let other = right.get(idx).copied().unwrap_or_default();
            format!("{line}{sep}{other}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_matchup(
    renderer: &dyn FlagRenderer,
    images_dir: &Path,
    home: &str,
    away: &str,
    width: u32,
) -> String {
    let home_art = renderer.render(&flag_path(images_dir, home), width);
    let away_art = renderer.render(&flag_path(images_dir, away), width);
    merge_flags(&home_art, &away_art)
}
