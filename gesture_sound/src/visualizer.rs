//! Software-rendered HUD using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────┬────────────────┐
//! │                                              │  MODE          │
//! │   camera view: hand skeletons + labels       │                │
//! │                                              │  FILTER  ████  │
//! │                                              │  REVERB  ██    │
//! │                                              │  AUX     █     │
//! │                                              │  BEND   ──┼──  │
//! ├──────────────────────────────────────────────┴────────────────┤
//! │  status line                                                  │
//! │  key legend                                                   │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! The window only displays; it has no way back into the engine.  In
//! simulation mode it also feeds mouse and key input to the sim source.

use std::sync::mpsc::Sender;
use std::time::Duration;

use hand_pose::{HandPose, Handedness, PoseFrame, HAND_BONES, WRIST};
use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};

use crate::app::Hud;
use crate::sim::{SimInput, SHAPE_KEYS};

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W:      usize = 960;
pub const WIN_H:      usize = 600;
const VIEW_W:         usize = 720;
const VIEW_H:         usize = 540;
const PANEL_X:        usize = VIEW_W;
const PANEL_W:        usize = WIN_W - VIEW_W;
const STATUS_Y:       usize = VIEW_H;
const BAR_X:          usize = PANEL_X + 16;
const BAR_W:          usize = PANEL_W - 32;
const BAR_H:          usize = 18;
const BG_COLOR:       u32   = 0xFF1A1A2E;
const PANEL_BG:       u32   = 0xFF16213E;
const TEXT_BG:        u32   = 0xFF0F3460;
const BAR_BG:         u32   = 0xFF2A2A4A;
const LEFT_COLOR:     u32   = 0xFF66CCFF;
const RIGHT_COLOR:    u32   = 0xFFFF9966;
const JOINT_COLOR:    u32   = 0xFFFFFFFF;
const ACCENT:         u32   = 0xFFFFD700;  // gold

const KEYS: [Key; 7] = [Key::Key1, Key::Key2, Key::Key3, Key::Key4, Key::Key5, Key::Key6, Key::Key7];

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:  Window,
    buf:     Vec<u32>,
    sim_tx:  Sender<SimInput>,
    pointer: Option<(usize, usize)>,
}

impl Visualizer {
    pub fn new(sim_tx: Sender<SimInput>) -> Result<Self, String> {
        let mut window = Window::new(
            "Gesture Sound — hand gesture MIDI controller",
            WIN_W, WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| e.to_string())?;

        window.limit_update_rate(Some(Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; WIN_W * WIN_H],
            sim_tx,
            pointer: None,
        })
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Poll mouse and keys, forwarding them to the sim source.  Returns false
    /// when the user asked to quit.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() || self.window.is_key_down(Key::Escape) {
            return false;
        }

        let mut inputs = Vec::new();
        for (key, shape) in KEYS.into_iter().zip(SHAPE_KEYS) {
            if self.window.is_key_pressed(key, KeyRepeat::No) {
                inputs.push(SimInput::Shape(shape));
            }
        }
        if self.window.is_key_pressed(Key::Tab, KeyRepeat::No) {
            inputs.push(SimInput::SwitchHand);
        }
        if self.window.is_key_pressed(Key::H, KeyRepeat::No) {
            inputs.push(SimInput::ToggleVisible);
        }

        self.pointer = self.window.get_mouse_pos(MouseMode::Discard)
            .map(|(mx, my)| (mx.max(0.0) as usize, my.max(0.0) as usize))
            .filter(|&(mx, my)| mx < VIEW_W && my < VIEW_H);
        if let Some((mx, my)) = self.pointer {
            inputs.push(SimInput::Pointer {
                x: mx as f32 / VIEW_W as f32,
                y: my as f32 / VIEW_H as f32,
            });
        }

        for input in inputs {
            // Nobody listens unless the sim source is in use.
            let _ = self.sim_tx.send(input);
        }
        true
    }

    /// Render one frame.
    pub fn render(&mut self, frame: &PoseFrame, hud: &Hud<'_>) {
        self.buf.fill(BG_COLOR);

        // ── Hands ─────────────────────────────────────────────────────────
        let pair = frame.pair();
        for (hand, label) in [(pair.left, hud.gestures.left), (pair.right, hud.gestures.right)] {
            if let Some(hand) = hand {
                self.draw_hand(hand);
                let name = label.map(|l| l.name()).unwrap_or("");
                let (wx, wy) = to_view(hand.wrist().x, hand.wrist().y);
                let text = format!("{} {}", hand.handedness().label(), name);
                self.draw_label(&text, wx.saturating_sub(40), wy + 12, 2, hand_color(hand.handedness()));
            }
        }
        if frame.is_empty() {
            self.draw_label("no hands", VIEW_W / 2 - 32, VIEW_H / 2, 2, 0xFF666688);
        }

        // ── Side panel ────────────────────────────────────────────────────
        self.fill_rect(PANEL_X, 0, PANEL_W, VIEW_H, PANEL_BG);
        self.draw_label(hud.mode.name(), PANEL_X + 16, 16, 2, ACCENT);

        let c = hud.controls;
        self.draw_bar("filter cc74", 70,  c.filter  / 127.0, false);
        self.draw_bar("reverb cc91", 130, c.reverb  / 127.0, false);
        self.draw_bar("aux cc22",    190, c.aux_mix / 127.0, false);
        self.draw_bar("pitch bend",  250, (c.pitch_bend + 8192.0) / 16383.0, true);

        let counts = format!("frames {}", hud.frames);
        self.draw_label(&counts, PANEL_X + 16, 330, 2, 0xFFAAAAAA);
        let sent = format!("sent {}", hud.sent);
        self.draw_label(&sent, PANEL_X + 16, 350, 2, 0xFFAAAAAA);

        // ── Pointer crosshair ─────────────────────────────────────────────
        if let Some((mx, my)) = self.pointer {
            self.fill_rect(mx.saturating_sub(6), my, 13, 1, 0xFF555577);
            self.fill_rect(mx, my.saturating_sub(6), 1, 13, 0xFF555577);
        }

        // ── Status bar ────────────────────────────────────────────────────
        self.fill_rect(0, STATUS_Y, WIN_W, WIN_H - STATUS_Y, TEXT_BG);
        self.draw_label(hud.status, 10, STATUS_Y + 10, 2, 0xFFEEEEEE);

        // ── Key legend ────────────────────────────────────────────────────
        self.draw_label(hud.legend, 10, WIN_H - 16, 2, 0xFF888888);

        self.window.update_with_buffer(&self.buf, WIN_W, WIN_H).ok();
    }

    // ── Hands ─────────────────────────────────────────────────────────────

    fn draw_hand(&mut self, hand: &HandPose) {
        let color = hand_color(hand.handedness());
        let pts: Vec<(usize, usize)> = hand.landmarks().iter()
            .map(|l| to_view(l.x, l.y))
            .collect();

        for &(a, b) in HAND_BONES.iter() {
            self.draw_line(pts[a], pts[b], color);
        }
        for (i, &(x, y)) in pts.iter().enumerate() {
            let r = if i == WRIST { 4 } else { 2 };
            self.fill_rect(x.saturating_sub(r), y.saturating_sub(r), 2 * r + 1, 2 * r + 1, JOINT_COLOR);
        }
    }

    // ── Controller bars ───────────────────────────────────────────────────

    fn draw_bar(&mut self, name: &str, y: usize, fraction: f32, centred: bool) {
        self.draw_label(name, BAR_X, y, 2, 0xFFCCCCCC);
        let by = y + 16;
        self.fill_rect(BAR_X, by, BAR_W, BAR_H, BAR_BG);

        let f = fraction.clamp(0.0, 1.0);
        let fill = (BAR_W as f32 * f) as usize;
        if centred {
            let mid = BAR_W / 2;
            let (x0, w) = if fill >= mid { (mid, fill - mid) } else { (fill, mid - fill) };
            self.fill_rect(BAR_X + x0, by, w, BAR_H, ACCENT);
            self.fill_rect(BAR_X + mid, by - 2, 1, BAR_H + 4, JOINT_COLOR);
        } else {
            self.fill_rect(BAR_X, by, fill, BAR_H, blend(BAR_BG, ACCENT, 0.4 + 0.6 * f));
        }
        self.draw_border(BAR_X, by, BAR_W, BAR_H, 0xFF000000);
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(WIN_H) {
            for col in x..(x + w).min(WIN_W) {
                self.buf[row * WIN_W + col] = color;
            }
        }
    }

    fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        if w == 0 || h == 0 { return; }
        self.fill_rect(x, y, w, 1, color);
        self.fill_rect(x, y + h - 1, w, 1, color);
        self.fill_rect(x, y, 1, h, color);
        self.fill_rect(x + w - 1, y, 1, h, color);
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < WIN_W && y < WIN_H {
            self.buf[y * WIN_W + x] = color;
        }
    }

    /// Bresenham, two pixels thick.
    fn draw_line(&mut self, (x0, y0): (usize, usize), (x1, y1): (usize, usize), color: u32) {
        let (mut x, mut y) = (x0 as isize, y0 as isize);
        let (x1, y1) = (x1 as isize, y1 as isize);
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            if x >= 0 && y >= 0 {
                self.set_pixel(x as usize, y as usize, color);
                self.set_pixel(x as usize + 1, y as usize, color);
            }
            if x == x1 && y == y1 { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x += sx; }
            if e2 <= dx { err += dx; y += sy; }
        }
    }

    /// 3×5 bitmap font, magnified by `scale`.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, scale: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.fill_rect(cx + col * scale, y + row * scale, scale, scale, color);
                    }
                }
            }
            cx += 4 * scale;
            if cx + 4 * scale > WIN_W { break; }
        }
    }
}

/// Legend shown when the sim source is driving the hands.
pub fn sim_legend() -> String {
    let shapes: Vec<String> = SHAPE_KEYS.iter().enumerate()
        .map(|(i, s)| format!("{}={}", i + 1, s.name()))
        .collect();
    format!("mouse=move  {}  tab=hand  h=hide  esc=quit", shapes.join(" "))
}

fn to_view(x: f32, y: f32) -> (usize, usize) {
    let px = (x.clamp(0.0, 1.0) * (VIEW_W - 1) as f32) as usize;
    let py = (y.clamp(0.0, 1.0) * (VIEW_H - 1) as f32) as usize;
    (px, py)
}

fn hand_color(h: Handedness) -> u32 {
    match h {
        Handedness::Left  => LEFT_COLOR,
        Handedness::Right => RIGHT_COLOR,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '(' => [0b010, 0b100, 0b100, 0b100, 0b010],
        ')' => [0b010, 0b001, 0b001, 0b001, 0b010],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0 - t) + cb as f32 * t) as u32;
    let ar = (a >> 16) & 0xFF; let br = (b >> 16) & 0xFF;
    let ag = (a >>  8) & 0xFF; let bg = (b >>  8) & 0xFF;
    let ab =  a        & 0xFF; let bb =  b        & 0xFF;
    0xFF000000 | (lerp(ar, br) << 16) | (lerp(ag, bg) << 8) | lerp(ab, bb)
}
