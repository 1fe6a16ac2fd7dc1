//! Screenshot captions

use std::path::Path;

use liftoff_core::config::Preview;
use liftoff_core::text::humanize_stem;
use tracing::debug;

/// Caption of a preview, as markdown.
///
/// The explicit `caption` wins. Otherwise a markdown file next to the
/// image (`shot.png` → `shot.md`) is used, and as a last resort the image
/// file name is turned into words. Previews without an image have no
/// caption.
pub fn preview_caption(preview: &Preview, root: &Path) -> Option<String> {
    if let Some(caption) = &preview.caption {
        return Some(caption.clone());
    }

    let image = Path::new(preview.repoimage.as_deref()?);

    let sidecar = root.join(image).with_extension("md");
    if let Ok(content) = std::fs::read_to_string(&sidecar) {
        debug!(path = %sidecar.display(), "caption from sidecar file");
        return Some(content.trim().to_string());
    }

    let stem = image.file_stem()?.to_string_lossy();
    Some(humanize_stem(&stem))
}
