//! FFmpeg video filter definitions.

use stillcast_models::Resolution;

/// Filter that fits a still image into the target geometry.
///
/// Scales the image to fit inside the frame preserving aspect ratio, pads
/// to the exact geometry with the image centered, and normalizes the pixel
/// format so the result plays in common players.
pub fn still_frame_filter(resolution: Resolution) -> String {
    let w = resolution.width();
    let h = resolution.height();
    format!(
        "scale={w}:{h}:force_original_aspect_ratio=decrease,\
         pad={w}:{h}:(ow-iw)/2:(oh-ih)/2,\
         format=yuv420p"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_720p_geometry() {
        let filter = still_frame_filter(Resolution::Hd720);
        assert!(filter.starts_with("scale=1280:720:force_original_aspect_ratio=decrease"));
        assert!(filter.contains("pad=1280:720:(ow-iw)/2:(oh-ih)/2"));
        assert!(filter.ends_with("format=yuv420p"));
    }

    #[test]
    fn test_1080p_geometry() {
        let filter = still_frame_filter(Resolution::Hd1080);
        assert!(filter.contains("scale=1920:1080"));
        assert!(filter.contains("pad=1920:1080"));
    }

    #[test]
    fn test_unknown_selector_uses_720p_geometry() {
        let filter = still_frame_filter(Resolution::from_param("8k"));
        assert!(filter.contains("scale=1280:720"));
    }
}
