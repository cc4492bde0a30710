use ratatui::style::Color;
use term_color_support::ColorSupport;

/// A trait to extend Ratatui's Color with cross-platform consistency methods.
pub trait WTMatch {
    /// Adjusts the color to match the Windows Terminal (Campbell) visual style
    /// based on the current terminal's color capabilities.
    fn wtmatch(self) -> Color;
}

/// Campbell-sampled RGB value for the ANSI colors the board UI uses
fn campbell_rgb(c: Color) -> Option<(u8, u8, u8)> {
    match c {
        Color::Black => Some((12, 12, 12)),
        Color::Red => Some((197, 15, 31)),
        Color::Green => Some((19, 161, 14)),
        Color::Yellow => Some((193, 156, 0)),
        Color::Blue => Some((0, 55, 218)),
        Color::Gray => Some((204, 204, 204)),
        Color::DarkGray => Some((118, 118, 118)),
        Color::LightBlue => Some((59, 120, 255)),
        Color::LightYellow => Some((249, 241, 165)),
        Color::White => Some((242, 242, 242)),
        _ => None,
    }
}

/// Stable 256-palette index for the same colors
fn campbell_index(c: Color) -> Option<u8> {
    match c {
        Color::Black => Some(232),
        Color::Red => Some(160),
        Color::Green => Some(28),
        Color::Yellow => Some(178),
        Color::Blue => Some(20),
        Color::Gray => Some(250),
        Color::DarkGray => Some(243),
        Color::LightBlue => Some(63),
        Color::LightYellow => Some(229),
        Color::White => Some(255),
        _ => None,
    }
}

impl WTMatch for Color {
    fn wtmatch(self) -> Color {
        let support = ColorSupport::stdout();
        if support.has_16m {
            match campbell_rgb(self) {
                Some((r, g, b)) => Color::Rgb(r, g, b),
                None => self,
            }
        } else if support.has_256 {
            match campbell_index(self) {
                Some(i) => Color::Indexed(i),
                None => self,
            }
        } else {
            // basic 16-color terminals keep the original ANSI variant
            self
        }
    }
}
