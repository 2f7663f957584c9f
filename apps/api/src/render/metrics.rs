//! Static Helvetica width tables, used to center the title and the page footer.
//!
//! Widths are the standard base-14 AFM advance widths in thousandths of an em.
//! Tables cover ASCII 0x20..=0x7E; index = (char as usize) - 32.
//! Helvetica-Oblique shares the regular widths.

use crate::layout::TextStyle;

/// Advance-width table for one Helvetica face.
pub struct FontMetricTable {
    widths: [u16; 95],
    /// Fallback for characters outside the table.
    pub average_char_width: u16,
}

impl FontMetricTable {
    /// Width of `s` in points at `font_size_pt`.
    pub fn measure_pt(&self, s: &str, font_size_pt: f32) -> f32 {
        let units: u32 = s
            .chars()
            .map(|c| {
                let code = c as usize;
                if (32..=126).contains(&code) {
                    u32::from(self.widths[code - 32])
                } else {
                    u32::from(self.average_char_width)
                }
            })
            .sum();
        units as f32 * font_size_pt / 1000.0
    }
}

static HELVETICA: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0-9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        278, 278, 584, 584, 584, 556, 1015,
        // A-M
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
        // N-Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        278, 278, 278, 469, 556, 333,
        // a-m
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
        // n-z
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
        // {    |    }    ~
        334, 260, 334, 584,
    ],
    average_char_width: 556,
};

static HELVETICA_BOLD: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0-9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        333, 333, 584, 584, 584, 611, 975,
        // A-M
        722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
        // N-Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        333, 278, 333, 584, 556, 333,
        // a-m
        556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
        // n-z
        611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
        // {    |    }    ~
        389, 280, 389, 584,
    ],
    average_char_width: 611,
};

pub fn get_metrics(style: TextStyle) -> &'static FontMetricTable {
    match style {
        TextStyle::Bold => &HELVETICA_BOLD,
        TextStyle::Regular | TextStyle::Italic => &HELVETICA,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_empty_is_zero() {
        assert_eq!(get_metrics(TextStyle::Regular).measure_pt("", 10.0), 0.0);
    }

    #[test]
    fn test_measure_ascii() {
        // "Rust" = R(722) + u(556) + s(500) + t(278) = 2056 units
        let width = get_metrics(TextStyle::Regular).measure_pt("Rust", 10.0);
        assert!((width - 20.56).abs() < 1e-3, "got {width}");
    }

    #[test]
    fn test_bold_is_wider() {
        let text = "Jane Doe";
        assert!(
            get_metrics(TextStyle::Bold).measure_pt(text, 16.0)
                > get_metrics(TextStyle::Regular).measure_pt(text, 16.0)
        );
    }

    #[test]
    fn test_non_ascii_uses_fallback() {
        let metrics = get_metrics(TextStyle::Italic);
        assert_eq!(metrics.measure_pt("é", 1000.0), f32::from(metrics.average_char_width));
    }
}
