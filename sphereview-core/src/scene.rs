use thiserror::Error;

// ─── Errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq)]
pub enum SceneError {
    #[error("no media source: specify either an image or a video URL")]
    NoMediaSource,
    #[error("ambiguous media source: specify either an image or a video URL, not both")]
    AmbiguousMediaSource,
    #[error("invalid value {value:?} for parameter {param:?}")]
    InvalidValue { param: String, value: String },
}

// ─── Scene description ───────────────────────────────────────────────

/// What to show, parsed from the embed's query parameters.
///
/// Exactly one of `image` / `video` is set. Everything past the media URL
/// is presentation policy with a fixed default, so a bare
/// `?image=pano.jpg` embed works.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneDescription {
    pub image: Option<String>,
    pub video: Option<String>,
    /// Media is a stereo over/under layout.
    pub is_stereo: bool,
    /// Restrict camera motion to yaw.
    pub is_yaw_only: bool,
    /// Initial camera yaw in degrees.
    pub default_yaw_deg: f32,
    /// Loop video playback.
    pub loop_video: bool,
    pub muted: bool,
    /// Video volume in [0, 1].
    pub volume: f32,
}

impl SceneDescription {
    /// Build a scene description from decoded query-string pairs.
    ///
    /// Unknown parameters are ignored so the embed stays forward
    /// compatible with flags this build does not know about.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, SceneError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut scene = Self {
            image: None,
            video: None,
            is_stereo: false,
            is_yaw_only: false,
            default_yaw_deg: 0.0,
            loop_video: true,
            muted: false,
            volume: 1.0,
        };

        for (key, value) in pairs {
            let value = value.as_ref();
            match key.as_ref() {
                "image" => scene.image = Some(value.to_string()),
                "video" => scene.video = Some(value.to_string()),
                "is_stereo" => scene.is_stereo = parse_bool(value),
                "is_yaw_only" => scene.is_yaw_only = parse_bool(value),
                "default_yaw" => scene.default_yaw_deg = parse_f32("default_yaw", value)?,
                "loop" => scene.loop_video = parse_bool(value),
                "muted" => scene.muted = parse_bool(value),
                "volume" => {
                    scene.volume = parse_f32("volume", value)?.clamp(0.0, 1.0);
                }
                _ => {}
            }
        }

        match (&scene.image, &scene.video) {
            (None, None) => Err(SceneError::NoMediaSource),
            (Some(_), Some(_)) => Err(SceneError::AmbiguousMediaSource),
            _ => Ok(scene),
        }
    }

    pub fn has_video(&self) -> bool {
        self.video.is_some()
    }

    /// The single media URL of this scene.
    pub fn media_url(&self) -> &str {
        self.image
            .as_deref()
            .or(self.video.as_deref())
            .unwrap_or_default()
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value, "true" | "1")
}

fn parse_f32(param: &str, value: &str) -> Result<f32, SceneError> {
    value.parse().map_err(|_| SceneError::InvalidValue {
        param: param.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(pairs: &[(&str, &str)]) -> Result<SceneDescription, SceneError> {
        SceneDescription::from_pairs(pairs.iter().copied())
    }

    // ── media source selection ──

    #[test]
    fn test_image_only() {
        let scene = parse(&[("image", "pano.jpg")]).unwrap();
        assert_eq!(scene.image.as_deref(), Some("pano.jpg"));
        assert!(!scene.has_video());
        assert_eq!(scene.media_url(), "pano.jpg");
    }

    #[test]
    fn test_video_only() {
        let scene = parse(&[("video", "clip.mp4")]).unwrap();
        assert!(scene.has_video());
        assert_eq!(scene.media_url(), "clip.mp4");
    }

    #[test]
    fn test_no_media_is_an_error() {
        assert_eq!(parse(&[("is_stereo", "true")]), Err(SceneError::NoMediaSource));
    }

    #[test]
    fn test_both_media_is_an_error() {
        assert_eq!(
            parse(&[("image", "a.jpg"), ("video", "b.mp4")]),
            Err(SceneError::AmbiguousMediaSource)
        );
    }

    // ── presentation flags ──

    #[test]
    fn test_defaults() {
        let scene = parse(&[("image", "pano.jpg")]).unwrap();
        assert!(!scene.is_stereo);
        assert!(!scene.is_yaw_only);
        assert_eq!(scene.default_yaw_deg, 0.0);
        assert!(scene.loop_video);
        assert!(!scene.muted);
        assert_eq!(scene.volume, 1.0);
    }

    #[test]
    fn test_boolean_spellings() {
        let scene = parse(&[
            ("image", "pano.jpg"),
            ("is_stereo", "1"),
            ("muted", "true"),
            ("loop", "false"),
        ])
        .unwrap();
        assert!(scene.is_stereo);
        assert!(scene.muted);
        assert!(!scene.loop_video);
    }

    #[test]
    fn test_yaw_and_volume_parse() {
        let scene = parse(&[
            ("video", "clip.mp4"),
            ("default_yaw", "90.5"),
            ("volume", "0.25"),
        ])
        .unwrap();
        assert_eq!(scene.default_yaw_deg, 90.5);
        assert_eq!(scene.volume, 0.25);
    }

    #[test]
    fn test_volume_is_clamped() {
        let scene = parse(&[("video", "clip.mp4"), ("volume", "3")]).unwrap();
        assert_eq!(scene.volume, 1.0);
    }

    #[test]
    fn test_malformed_number_is_an_error() {
        assert_eq!(
            parse(&[("image", "pano.jpg"), ("default_yaw", "east")]),
            Err(SceneError::InvalidValue {
                param: "default_yaw".to_string(),
                value: "east".to_string(),
            })
        );
    }

    #[test]
    fn test_unknown_parameters_are_ignored() {
        assert!(parse(&[("image", "pano.jpg"), ("widget", "on")]).is_ok());
    }
}
