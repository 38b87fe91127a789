//! Spoken descriptions for action labels

use std::borrow::Cow;

/// Map a raw action label to a more descriptive spoken phrase.
///
/// Labels without a dedicated phrase are spoken verbatim.
pub fn describe_action(label: &str) -> Cow<'_, str> {
    let phrase = match label {
        "Panel activated" => "Control panel activated",
        "Volume up" => "Volume increased",
        "Volume down" => "Volume decreased",
        "Playing" => "Media playing",
        "Paused" => "Media paused",
        "Next track" => "Skipped to next track",
        "Previous track" => "Returned to previous track",
        "Lights on" => "Lights turned on",
        "Lights off" => "Lights turned off",
        "Temperature control" => "Temperature control accessed",
        "Home menu" => "Home menu opened",
        "Bluetooth on" => "Bluetooth connection enabled",
        "Bluetooth off" => "Bluetooth connection disabled",
        other => return Cow::Borrowed(other),
    };
    Cow::Borrowed(phrase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapped_labels() {
        assert_eq!(describe_action("Volume up"), "Volume increased");
        assert_eq!(describe_action("Bluetooth off"), "Bluetooth connection disabled");
    }

    #[test]
    fn test_unmapped_label_passes_through() {
        assert_eq!(describe_action("Speed+ pressed"), "Speed+ pressed");
        assert_eq!(describe_action(""), "");
    }
}
