//! 시계 장면 페인터.
//!
//! 투명하게 지운 뒤, 표시 상태면 시각 문자열의 숫자와 콜론을
//! 7-세그먼트 글리프로 가운데 정렬해 그린다. 그 밖의 문자는 건너뛴다.
//! 배경은 칠하지 않는다 (홈 화면 위에 투명하게 합성됨).

use clockwidget_core::models::clock::ClockScene;
use clockwidget_core::models::surface::Dims;

/// 숫자 글리프 너비 (단위)
const DIGIT_UNITS: u32 = 4;
/// 콜론 글리프 너비 (단위)
const COLON_UNITS: u32 = 1;
/// 글리프 높이 (단위)
const GLYPH_HEIGHT_UNITS: u32 = 7;
/// 글리프 간격 (단위)
const GAP_UNITS: u32 = 1;

// 세그먼트 비트: a(위) b(오른쪽 위) c(오른쪽 아래) d(아래) e(왼쪽 아래) f(왼쪽 위) g(가운데)
const SEG_A: u8 = 1 << 0;
const SEG_B: u8 = 1 << 1;
const SEG_C: u8 = 1 << 2;
const SEG_D: u8 = 1 << 3;
const SEG_E: u8 = 1 << 4;
const SEG_F: u8 = 1 << 5;
const SEG_G: u8 = 1 << 6;

const DIGIT_SEGMENTS: [u8; 10] = [
    SEG_A | SEG_B | SEG_C | SEG_D | SEG_E | SEG_F,
    SEG_B | SEG_C,
    SEG_A | SEG_B | SEG_D | SEG_E | SEG_G,
    SEG_A | SEG_B | SEG_C | SEG_D | SEG_G,
    SEG_B | SEG_C | SEG_F | SEG_G,
    SEG_A | SEG_C | SEG_D | SEG_F | SEG_G,
    SEG_A | SEG_C | SEG_D | SEG_E | SEG_F | SEG_G,
    SEG_A | SEG_B | SEG_C,
    SEG_A | SEG_B | SEG_C | SEG_D | SEG_E | SEG_F | SEG_G,
    SEG_A | SEG_B | SEG_C | SEG_D | SEG_F | SEG_G,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Glyph {
    Digit(u8),
    Colon,
}

impl Glyph {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '0'..='9' => c.to_digit(10).map(|d| Glyph::Digit(d as u8)),
            ':' | '\u{2236}' => Some(Glyph::Colon),
            _ => None,
        }
    }

    fn units(self) -> u32 {
        match self {
            Glyph::Digit(_) => DIGIT_UNITS,
            Glyph::Colon => COLON_UNITS,
        }
    }
}

/// 장면을 픽셀 버퍼에 그린다 (`buffer.len()`은 `dims`의 픽셀 수)
pub fn paint(buffer: &mut [u32], dims: Dims, scene: Option<&ClockScene>) {
    buffer.fill(0);

    let Some(scene) = scene.filter(|s| s.shown) else {
        return;
    };

    let glyphs: Vec<Glyph> = scene.text.time.chars().filter_map(Glyph::from_char).collect();
    if glyphs.is_empty() {
        return;
    }

    let total_units: i64 = glyphs.iter().map(|g| i64::from(g.units())).sum::<i64>()
        + i64::from(GAP_UNITS) * (glyphs.len() as i64 - 1);
    let width = i64::from(dims.width);
    let height = i64::from(dims.height);
    let unit = ((width * 3 / 4) / total_units)
        .min((height * 3 / 4) / i64::from(GLYPH_HEIGHT_UNITS))
        .max(1);

    let color = scene.color.rgb().to_argb();
    let mut canvas = Target {
        buffer,
        dims,
        color,
    };

    let origin_x = (width - total_units * unit) / 2;
    let origin_y = (height - i64::from(GLYPH_HEIGHT_UNITS) * unit) / 2;

    let mut x = origin_x;
    for glyph in glyphs {
        match glyph {
            Glyph::Digit(d) => canvas.digit(x, origin_y, unit, DIGIT_SEGMENTS[d as usize]),
            Glyph::Colon => {
                canvas.fill_units(x, origin_y, unit, 0, 2, 1, 1);
                canvas.fill_units(x, origin_y, unit, 0, 4, 1, 1);
            }
        }
        x += i64::from(glyph.units() + GAP_UNITS) * unit;
    }
}

struct Target<'a> {
    buffer: &'a mut [u32],
    dims: Dims,
    color: u32,
}

impl Target<'_> {
    fn digit(&mut self, x: i64, y: i64, u: i64, segments: u8) {
        let last = DIGIT_UNITS as i64 - 1;
        if segments & SEG_A != 0 {
            self.fill_units(x, y, u, 0, 0, DIGIT_UNITS as i64, 1);
        }
        if segments & SEG_B != 0 {
            self.fill_units(x, y, u, last, 0, 1, 4);
        }
        if segments & SEG_C != 0 {
            self.fill_units(x, y, u, last, 3, 1, 4);
        }
        if segments & SEG_D != 0 {
            self.fill_units(x, y, u, 0, 6, DIGIT_UNITS as i64, 1);
        }
        if segments & SEG_E != 0 {
            self.fill_units(x, y, u, 0, 3, 1, 4);
        }
        if segments & SEG_F != 0 {
            self.fill_units(x, y, u, 0, 0, 1, 4);
        }
        if segments & SEG_G != 0 {
            self.fill_units(x, y, u, 0, 3, DIGIT_UNITS as i64, 1);
        }
    }

    /// 글리프 원점 기준 단위 좌표 사각형 채우기
    #[allow(clippy::too_many_arguments)]
    fn fill_units(&mut self, ox: i64, oy: i64, u: i64, col: i64, row: i64, w: i64, h: i64) {
        self.fill_rect(ox + col * u, oy + row * u, w * u, h * u);
    }

    fn fill_rect(&mut self, x: i64, y: i64, w: i64, h: i64) {
        let width = self.dims.width as i64;
        let height = self.dims.height as i64;
        let x0 = x.clamp(0, width);
        let x1 = (x + w).clamp(0, width);
        let y0 = y.clamp(0, height);
        let y1 = (y + h).clamp(0, height);

        for row in y0..y1 {
            let start = (row * width + x0) as usize;
            let end = (row * width + x1) as usize;
            if let Some(line) = self.buffer.get_mut(start..end) {
                line.fill(self.color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clockwidget_core::models::background::{BackgroundInfo, BackgroundMode};
    use clockwidget_core::models::clock::{ClockFont, ClockText, FontColor};

    fn scene(time: &str, shown: bool) -> ClockScene {
        ClockScene {
            shown,
            text: ClockText {
                time: time.to_string(),
                ..Default::default()
            },
            font: ClockFont::Default,
            color: FontColor::from_index(2),
            background: None,
        }
    }

    /// 칠해진 픽셀의 (left, top, right, bottom) 경계 (right/bottom 배타)
    fn bounds(buffer: &[u32], dims: Dims) -> Option<(u32, u32, u32, u32)> {
        let mut result: Option<(u32, u32, u32, u32)> = None;
        for (i, &p) in buffer.iter().enumerate() {
            if p == 0 {
                continue;
            }
            let (x, y) = (i as u32 % dims.width, i as u32 / dims.width);
            result = Some(match result {
                None => (x, y, x + 1, y + 1),
                Some((l, t, r, b)) => (l.min(x), t.min(y), r.max(x + 1), b.max(y + 1)),
            });
        }
        result
    }

    #[test]
    fn hidden_scene_is_transparent() {
        let dims = Dims::new(320, 320);
        let mut buffer = vec![0xDEAD_BEEF; 320 * 320];
        paint(&mut buffer, dims, Some(&scene("10:42", false)));
        assert!(buffer.iter().all(|&p| p == 0));

        buffer.fill(1);
        paint(&mut buffer, dims, None);
        assert!(buffer.iter().all(|&p| p == 0));
    }

    #[test]
    fn shown_time_is_centered_in_font_color() {
        let dims = Dims::new(320, 320);
        let mut buffer = vec![0; 320 * 320];
        paint(&mut buffer, dims, Some(&scene("88:88", true)));

        let expected = FontColor::from_index(2).rgb().to_argb();
        assert!(buffer.iter().all(|&p| p == 0 || p == expected));

        let (left, top, right, bottom) = bounds(&buffer, dims).unwrap();
        let right_margin = dims.width - right;
        let bottom_margin = dims.height - bottom;
        assert!(left.abs_diff(right_margin) <= 1);
        assert!(top.abs_diff(bottom_margin) <= 1);
    }

    #[test]
    fn non_glyph_characters_are_skipped() {
        let dims = Dims::new(64, 32);
        let mut buffer = vec![0; 64 * 32];
        paint(&mut buffer, dims, Some(&scene("AM", true)));
        assert!(buffer.iter().all(|&p| p == 0));

        paint(&mut buffer, dims, Some(&scene("1\u{2236}0", true)));
        assert!(buffer.iter().any(|&p| p != 0));
    }

    #[test]
    fn palette_background_is_left_transparent() {
        let dims = Dims::new(320, 320);
        let mut buffer = vec![0; 320 * 320];
        let mut with_palette = scene("10:42", true);
        with_palette.background = Some(BackgroundInfo {
            mode: BackgroundMode::Palette,
            palette: Some("1A2B3C".to_string()),
            ..Default::default()
        });
        paint(&mut buffer, dims, Some(&with_palette));

        assert_eq!(buffer[0], 0);
        let mut plain = vec![0; 320 * 320];
        paint(&mut plain, dims, Some(&scene("10:42", true)));
        assert_eq!(buffer, plain);
    }

    #[test]
    fn huge_width_does_not_overflow() {
        let dims = Dims::new(u32::MAX, 2);
        let mut buffer = vec![0; 16];
        paint(&mut buffer, dims, Some(&scene("88:88", true)));
        assert!(buffer.iter().all(|&p| p == 0));
    }

    #[test]
    fn tiny_canvas_does_not_panic() {
        let dims = Dims::new(3, 2);
        let mut buffer = vec![0; 6];
        paint(&mut buffer, dims, Some(&scene("12:34", true)));
    }
}
