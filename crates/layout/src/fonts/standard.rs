//! Metrics for the PDF standard fonts the engine can use without embedding.

use super::{FontMetrics, FontProgram, LoadedFont};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
}

/// Helvetica advance widths for codes 32..=126.
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, 667, 778, 722, 667,
    611, 722, 667, 944, 667, 667, 611, // A..Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333, 500,
    278, 556, 500, 722, 500, 500, 500, // a..z
    334, 260, 334, 584, // {..~
];

const HELVETICA_BOLD_ASCII: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    333, 333, 584, 584, 584, 611, 975, // :..@
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, 667, 778, 722, 667,
    611, 722, 667, 944, 667, 667, 611, // A..Z
    333, 278, 333, 584, 556, 333, // [..`
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, 611, 611, 389, 556,
    333, 611, 556, 778, 556, 556, 500, // a..z
    389, 280, 389, 584, // {..~
];

/// Widths outside ASCII shared by both Helvetica weights.
const HELVETICA_SPECIALS: [(u8, u16); 13] = [
    (0x80, 556),  // euro
    (0x85, 1000), // ellipsis
    (0x91, 222),
    (0x92, 222),
    (0x93, 333),
    (0x94, 333),
    (0x95, 350), // bullet
    (0x96, 556),
    (0x97, 1000),
    (0xA0, 278),
    (0xA9, 737),
    (0xAE, 737),
    (0xB0, 400),
];

impl StandardFont {
    /// The normal face of each standard family.
    pub const FAMILIES: [StandardFont; 2] = [StandardFont::Helvetica, StandardFont::Courier];

    pub fn postscript_name(self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
            StandardFont::HelveticaOblique => "Helvetica-Oblique",
            StandardFont::HelveticaBoldOblique => "Helvetica-BoldOblique",
            StandardFont::Courier => "Courier",
            StandardFont::CourierBold => "Courier-Bold",
            StandardFont::CourierOblique => "Courier-Oblique",
            StandardFont::CourierBoldOblique => "Courier-BoldOblique",
        }
    }

    pub fn family_name(self) -> &'static str {
        if self.is_courier() {
            "Courier"
        } else {
            "Helvetica"
        }
    }

    fn is_courier(self) -> bool {
        matches!(
            self,
            StandardFont::Courier
                | StandardFont::CourierBold
                | StandardFont::CourierOblique
                | StandardFont::CourierBoldOblique
        )
    }

    fn is_bold(self) -> bool {
        matches!(
            self,
            StandardFont::HelveticaBold
                | StandardFont::HelveticaBoldOblique
                | StandardFont::CourierBold
                | StandardFont::CourierBoldOblique
        )
    }

    fn is_oblique(self) -> bool {
        matches!(
            self,
            StandardFont::HelveticaOblique
                | StandardFont::HelveticaBoldOblique
                | StandardFont::CourierOblique
                | StandardFont::CourierBoldOblique
        )
    }

    /// The four faces of this font's family, in `FontVariant` order.
    pub(super) fn faces(self) -> [Option<Arc<LoadedFont>>; 4] {
        let variants = if self.is_courier() {
            [
                StandardFont::Courier,
                StandardFont::CourierBold,
                StandardFont::CourierOblique,
                StandardFont::CourierBoldOblique,
            ]
        } else {
            [
                StandardFont::Helvetica,
                StandardFont::HelveticaBold,
                StandardFont::HelveticaOblique,
                StandardFont::HelveticaBoldOblique,
            ]
        };
        variants.map(|face| Some(Arc::new(face.loaded())))
    }

    fn loaded(self) -> LoadedFont {
        LoadedFont {
            postscript_name: self.postscript_name().to_string(),
            program: FontProgram::Standard(self),
            metrics: self.metrics(),
        }
    }

    pub fn metrics(self) -> FontMetrics {
        let italic_angle = if self.is_oblique() { -12.0 } else { 0.0 };
        if self.is_courier() {
            return FontMetrics {
                widths: [600; 256],
                ascent: 629.0,
                descent: -157.0,
                cap_height: 562.0,
                italic_angle,
                bbox: [-23.0, -250.0, 715.0, 805.0],
                fixed_pitch: true,
            };
        }

        let (ascii, fallback) = if self.is_bold() {
            (&HELVETICA_BOLD_ASCII, 611)
        } else {
            (&HELVETICA_ASCII, 556)
        };
        let mut widths = [fallback; 256];
        widths[32..127].copy_from_slice(ascii);
        for (code, width) in HELVETICA_SPECIALS {
            widths[code as usize] = width;
        }

        FontMetrics {
            widths,
            ascent: 718.0,
            descent: -207.0,
            cap_height: 718.0,
            italic_angle,
            bbox: [-166.0, -225.0, 1000.0, 931.0],
            fixed_pitch: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helvetica_ascii_widths() {
        let metrics = StandardFont::Helvetica.metrics();
        assert_eq!(metrics.widths[b' ' as usize], 278);
        assert_eq!(metrics.widths[b'W' as usize], 944);
        assert_eq!(metrics.widths[b'i' as usize], 222);
        assert_eq!(metrics.widths[b'~' as usize], 584);
    }

    #[test]
    fn test_bold_is_wider() {
        let regular = StandardFont::Helvetica.metrics();
        let bold = StandardFont::HelveticaBold.metrics();
        assert!(bold.text_width("Invoice", 12.0) > regular.text_width("Invoice", 12.0));
    }

    #[test]
    fn test_bullet_and_copyright_widths() {
        let metrics = StandardFont::HelveticaOblique.metrics();
        assert_eq!(metrics.char_width('•'), 350.0);
        assert_eq!(metrics.char_width('©'), 737.0);
        assert_eq!(metrics.italic_angle, -12.0);
    }

    #[test]
    fn test_courier_is_monospaced() {
        let metrics = StandardFont::CourierBold.metrics();
        assert!(metrics.fixed_pitch);
        assert_eq!(metrics.text_width("iiii", 10.0), metrics.text_width("WWWW", 10.0));
    }
}
