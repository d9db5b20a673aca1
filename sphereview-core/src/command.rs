/// Playback commands accepted from the embedding page.
///
/// The embed API recognizes exactly two message kinds; anything else on the
/// message channel is ignored by the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackCommand {
    Play,
    Pause,
}

impl PlaybackCommand {
    /// Parse the `type` field of an inbound embed message.
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "play" => Some(Self::Play),
            "pause" => Some(Self::Pause),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Play => "play",
            Self::Pause => "pause",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_commands() {
        assert_eq!(PlaybackCommand::parse("play"), Some(PlaybackCommand::Play));
        assert_eq!(PlaybackCommand::parse("pause"), Some(PlaybackCommand::Pause));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(PlaybackCommand::parse("stop"), None);
        assert_eq!(PlaybackCommand::parse("Play"), None);
        assert_eq!(PlaybackCommand::parse(""), None);
    }

    #[test]
    fn test_labels_round_trip() {
        for cmd in [PlaybackCommand::Play, PlaybackCommand::Pause] {
            assert_eq!(PlaybackCommand::parse(cmd.label()), Some(cmd));
        }
    }
}
