//! Screen transfer to the external display module
//!
//! A redraw is a clear followed by one text message per non-empty row.

use almanac_protocol::{Frame, FrameError, ScreenMessage};

use crate::screen::Screen;

/// Messages that redraw `screen` on the display module
pub fn screen_messages(screen: &Screen) -> impl Iterator<Item = ScreenMessage<'_>> {
    let rows = screen
        .lines()
        .enumerate()
        .filter(|(_, text)| !text.is_empty())
        .map(|(row, text)| ScreenMessage::Text {
            row: row as u8,
            col: 0,
            text,
        });
    core::iter::once(ScreenMessage::Clear).chain(rows)
}

/// Frames that redraw `screen` on the display module
pub fn encode_screen(screen: &Screen) -> impl Iterator<Item = Result<Frame, FrameError>> + '_ {
    screen_messages(screen).map(|msg| msg.to_frame())
}

#[cfg(test)]
mod tests {
    use super::*;
    use almanac_protocol::screen::{MSG_CLEAR, MSG_TEXT};

    #[test]
    fn test_clear_then_non_empty_rows() {
        let mut screen = Screen::new();
        screen.set_line(0, "Wed 06 Mar");
        screen.set_line(2, "10:30");

        let messages: std::vec::Vec<_> = screen_messages(&screen).collect();
        assert_eq!(
            messages,
            [
                ScreenMessage::Clear,
                ScreenMessage::Text {
                    row: 0,
                    col: 0,
                    text: "Wed 06 Mar"
                },
                ScreenMessage::Text {
                    row: 2,
                    col: 0,
                    text: "10:30"
                },
            ]
        );
    }

    #[test]
    fn test_encode_screen_frames() {
        let mut screen = Screen::new();
        screen.set_line(6, "$=1.00");

        let frames: std::vec::Vec<_> = encode_screen(&screen).map(|f| f.unwrap()).collect();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].kind, MSG_CLEAR);
        assert_eq!(frames[1].kind, MSG_TEXT);
        assert_eq!(frames[1].payload.as_slice(), b"\x06\x00\x06$=1.00");
    }

    #[test]
    fn test_empty_screen_is_just_clear() {
        let frames: std::vec::Vec<_> = encode_screen(&Screen::new()).collect();
        assert_eq!(frames.len(), 1);
    }
}
