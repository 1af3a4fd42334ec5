use tracing::debug;

/// A 24-bit marker color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Darken each channel by the given percentage, clamping at black.
    /// Used to derive a marker's trim color from its fill color.
    pub fn darken(self, percent: u8) -> Self {
        let amt = ((f64::from(percent) * 2.55).round()) as u8;
        Self {
            r: self.r.saturating_sub(amt),
            g: self.g.saturating_sub(amt),
            b: self.b.saturating_sub(amt),
        }
    }
}

const VIBRANT: [Rgb; 8] = [
    Rgb::new(0xff, 0x6b, 0x6b),
    Rgb::new(0x4e, 0xcd, 0xc4),
    Rgb::new(0x45, 0xb7, 0xd1),
    Rgb::new(0x96, 0xce, 0xb4),
    Rgb::new(0xfe, 0xca, 0x57),
    Rgb::new(0xff, 0x9f, 0xf3),
    Rgb::new(0x54, 0xa0, 0xff),
    Rgb::new(0x5f, 0x27, 0xcd),
];

const PASTEL: [Rgb; 8] = [
    Rgb::new(0xff, 0xd6, 0xe8),
    Rgb::new(0xff, 0xe5, 0xb4),
    Rgb::new(0xe8, 0xd5, 0xff),
    Rgb::new(0xc8, 0xe7, 0xff),
    Rgb::new(0xd4, 0xf1, 0xd4),
    Rgb::new(0xff, 0xda, 0xb9),
    Rgb::new(0xe0, 0xbb, 0xe4),
    Rgb::new(0xb5, 0xe7, 0xd3),
];

const SATURATED: [Rgb; 8] = [
    Rgb::new(0xff, 0x00, 0x40),
    Rgb::new(0x00, 0xff, 0x41),
    Rgb::new(0x00, 0x80, 0xff),
    Rgb::new(0xff, 0xd7, 0x00),
    Rgb::new(0xff, 0x00, 0xff),
    Rgb::new(0x00, 0xff, 0xff),
    Rgb::new(0xff, 0x45, 0x00),
    Rgb::new(0x94, 0x00, 0xd3),
];

const MONOCHROME: [Rgb; 8] = [
    Rgb::new(0x2c, 0x3e, 0x50),
    Rgb::new(0x34, 0x49, 0x5e),
    Rgb::new(0x7f, 0x8c, 0x8d),
    Rgb::new(0x95, 0xa5, 0xa6),
    Rgb::new(0xbd, 0xc3, 0xc7),
    Rgb::new(0xec, 0xf0, 0xf1),
    Rgb::new(0xab, 0xb2, 0xb9),
    Rgb::new(0x56, 0x65, 0x73),
];

/// Named color palettes with cyclic color assignment
pub struct PaletteStore {
    palettes: Vec<(&'static str, &'static [Rgb])>,
    active: usize,
}

impl PaletteStore {
    pub fn new() -> Self {
        Self {
            palettes: vec![
                ("vibrant", &VIBRANT[..]),
                ("pastel", &PASTEL[..]),
                ("saturated", &SATURATED[..]),
                ("monochrome", &MONOCHROME[..]),
            ],
            active: 0,
        }
    }

    /// Switch the active palette. Unknown names are a silent no-op;
    /// the previous palette remains active.
    ///
    /// Returns true when the palette actually changed, so the caller knows
    /// to recolor displayed markers and reset its assignment cursor.
    pub fn select(&mut self, name: &str) -> bool {
        match self.palettes.iter().position(|(n, _)| *n == name) {
            Some(idx) => {
                let changed = idx != self.active;
                self.active = idx;
                changed
            }
            None => {
                debug!(palette = name, "Unknown palette name, keeping current");
                false
            }
        }
    }

    /// Color for the given assignment index; always defined by cycling
    /// through the active palette.
    pub fn color_for(&self, index: usize) -> Rgb {
        let colors = self.palettes[self.active].1;
        colors[index % colors.len()]
    }

    pub fn active_name(&self) -> &'static str {
        self.palettes[self.active].0
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.palettes.iter().map(|(n, _)| *n)
    }
}

impl Default for PaletteStore {
    fn default() -> Self {
        Self::new()
    }
}
