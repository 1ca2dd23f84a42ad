//! Previous/next buttons and the position indicator.
//!
//! Stateless: everything is computed from a [`NavState`] snapshot each frame.
//! Geometry is in logical pixels, top-left origin.

use cardflip_engine::coords::{Rect, Vec2, Viewport};
use cardflip_engine::paint::Color;
use cardflip_engine::scene::{DrawList, ZIndex};

const BUTTON_DIAMETER: f32 = 48.0;
const BOTTOM_MARGIN: f32 = 32.0;
const GROUP_GAP: f32 = 16.0;
const PILL_GAP: f32 = 8.0;
const PILL_HEIGHT: f32 = 8.0;
const PILL_WIDTH: f32 = 8.0;
const PILL_WIDTH_CURRENT: f32 = 32.0;
const CHEVRON_STROKE: f32 = 2.0;

const Z_SHADOW: ZIndex = ZIndex::new(0);
const Z_BUTTON: ZIndex = ZIndex::new(1);
const Z_GLYPH: ZIndex = ZIndex::new(2);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum NavAction {
    Previous,
    Next,
}

/// What the controls show.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct NavState {
    pub total: usize,
    pub current: usize,
    /// Buttons are disabled while true.
    pub transitioning: bool,
}

impl NavState {
    fn enabled(&self) -> bool {
        !self.transitioning && self.total > 1
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavLayout {
    pub previous: Rect,
    pub next: Rect,
    pub indicators: Vec<Rect>,
}

#[derive(Debug, Copy, Clone)]
pub struct NavTheme {
    pub button: Color,
    pub button_hover: Color,
    pub glyph: Color,
    pub shadow: Color,
    pub indicator: Color,
    pub indicator_current: Color,
    /// Opacity multiplier for disabled buttons.
    pub disabled_opacity: f32,
}

impl Default for NavTheme {
    fn default() -> Self {
        Self {
            button: Color::WHITE.with_opacity(0.9),
            button_hover: Color::WHITE,
            glyph: Color::from_srgb_u8(0x1e, 0x29, 0x3b, 0xff),
            shadow: Color::BLACK.with_opacity(0.1),
            indicator: Color::from_srgb_u8(0xcb, 0xd5, 0xe1, 0xff),
            indicator_current: Color::from_srgb_u8(0x25, 0x63, 0xeb, 0xff),
            disabled_opacity: 0.5,
        }
    }
}

/// Lays out a centred row at the bottom of the viewport:
/// `[prev] gap [pills] gap [next]`.
pub fn layout(viewport: Viewport, state: &NavState) -> NavLayout {
    let n = state.total;
    let pills_width = if n == 0 {
        0.0
    } else {
        let current = if state.current < n { PILL_WIDTH_CURRENT } else { PILL_WIDTH };
        current + PILL_WIDTH * (n - 1) as f32 + PILL_GAP * (n - 1) as f32
    };

    let row_width = 2.0 * BUTTON_DIAMETER + 2.0 * GROUP_GAP + pills_width;
    let row_center_y = viewport.height - BOTTOM_MARGIN - BUTTON_DIAMETER * 0.5;
    let left = (viewport.width - row_width) * 0.5;
    let button_top = row_center_y - BUTTON_DIAMETER * 0.5;

    let previous = Rect::new(left, button_top, BUTTON_DIAMETER, BUTTON_DIAMETER);
    let next = Rect::new(left + row_width - BUTTON_DIAMETER, button_top, BUTTON_DIAMETER, BUTTON_DIAMETER);

    let mut x = left + BUTTON_DIAMETER + GROUP_GAP;
    let indicators = (0..n)
        .map(|i| {
            let w = if i == state.current { PILL_WIDTH_CURRENT } else { PILL_WIDTH };
            let r = Rect::new(x, row_center_y - PILL_HEIGHT * 0.5, w, PILL_HEIGHT);
            x += w + PILL_GAP;
            r
        })
        .collect();

    NavLayout { previous, next, indicators }
}

/// Which button `p` lands on. Nothing is hit while the buttons are disabled.
pub fn hit_test(layout: &NavLayout, state: &NavState, p: Vec2) -> Option<NavAction> {
    if !state.enabled() {
        return None;
    }
    if in_circle(layout.previous, p) {
        Some(NavAction::Previous)
    } else if in_circle(layout.next, p) {
        Some(NavAction::Next)
    } else {
        None
    }
}

/// Records the controls into `list`.
pub fn paint(
    list: &mut DrawList,
    layout: &NavLayout,
    state: &NavState,
    theme: &NavTheme,
    hovered: Option<NavAction>,
) {
    let fade = if state.enabled() { 1.0 } else { theme.disabled_opacity };

    for (action, rect) in [(NavAction::Previous, layout.previous), (NavAction::Next, layout.next)] {
        let radius = rect.size.x * 0.5;
        let shadow = rect.translate(Vec2::new(0.0, 4.0));
        list.push_rounded_rect(Z_SHADOW, shadow, radius, theme.shadow.with_opacity(fade));

        let fill = if hovered == Some(action) && state.enabled() { theme.button_hover } else { theme.button };
        list.push_rounded_rect(Z_BUTTON, rect, radius, fill.with_opacity(fade));

        paint_chevron(list, rect, action, theme.glyph.with_opacity(fade));
    }

    for (i, rect) in layout.indicators.iter().enumerate() {
        let color = if i == state.current { theme.indicator_current } else { theme.indicator };
        list.push_rounded_rect(Z_BUTTON, *rect, PILL_HEIGHT * 0.5, color);
    }
}

fn paint_chevron(list: &mut DrawList, button: Rect, action: NavAction, color: Color) {
    let c = button.center();
    // Tip points toward the direction of travel.
    let dx = match action {
        NavAction::Previous => -3.0,
        NavAction::Next => 3.0,
    };
    let tip = Vec2::new(c.x + dx, c.y);
    let top = Vec2::new(c.x - dx, c.y - 6.0);
    let bottom = Vec2::new(c.x - dx, c.y + 6.0);

    list.push_stroke(Z_GLYPH, top, tip, CHEVRON_STROKE, color);
    list.push_stroke(Z_GLYPH, tip, bottom, CHEVRON_STROKE, color);
}

fn in_circle(rect: Rect, p: Vec2) -> bool {
    let r = rect.size.x * 0.5;
    (p - rect.center()).length_squared() <= r * r
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(total: usize, current: usize, transitioning: bool) -> NavState {
        NavState { total, current, transitioning }
    }

    fn centre(r: Rect) -> Vec2 {
        r.center()
    }

    #[test]
    fn row_is_centred_at_the_bottom() {
        let vp = Viewport::new(800.0, 600.0);
        let l = layout(vp, &state(4, 1, false));

        let row_left = l.previous.origin.x;
        let row_right = l.next.origin.x + l.next.size.x;
        assert!((row_left + row_right - 800.0).abs() < 1e-3);
        assert_eq!(l.previous.origin.y + l.previous.size.y, 600.0 - BOTTOM_MARGIN);

        let widths: Vec<f32> = l.indicators.iter().map(|r| r.size.x).collect();
        assert_eq!(widths, vec![8.0, 32.0, 8.0, 8.0]);
    }

    #[test]
    fn buttons_hit_only_when_enabled() {
        let l = layout(Viewport::new(800.0, 600.0), &state(3, 0, false));

        assert_eq!(hit_test(&l, &state(3, 0, false), centre(l.previous)), Some(NavAction::Previous));
        assert_eq!(hit_test(&l, &state(3, 0, false), centre(l.next)), Some(NavAction::Next));
        assert_eq!(hit_test(&l, &state(3, 0, true), centre(l.next)), None);
        assert_eq!(hit_test(&l, &state(3, 0, false), Vec2::new(5.0, 5.0)), None);
        // Button corners are outside the round button.
        assert_eq!(hit_test(&l, &state(3, 0, false), l.next.origin), None);
    }

    #[test]
    fn paint_emits_buttons_glyphs_and_pills() {
        let s = state(3, 2, false);
        let l = layout(Viewport::new(800.0, 600.0), &s);
        let mut list = DrawList::new();
        paint(&mut list, &l, &s, &NavTheme::default(), None);

        // 2 x (shadow + button + 2 chevron strokes) + 3 pills.
        assert_eq!(list.len(), 11);
    }

    #[test]
    fn empty_deck_still_lays_out_buttons() {
        let l = layout(Viewport::new(400.0, 300.0), &state(0, 0, false));
        assert!(l.indicators.is_empty());
        assert_eq!(hit_test(&l, &state(0, 0, false), centre(l.next)), None);
    }
}
