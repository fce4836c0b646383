// Colour palette module
// Nine fixed swatches addressed by a small stored index.

use rand::Rng;

/// Number of swatches in the palette. Stored indices are taken modulo this.
pub const PALETTE_SIZE: i64 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RgbaColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl RgbaColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A countdown's display colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Colour {
    Black,
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Gray,
    White,
}

impl Colour {
    pub const ALL: [Colour; PALETTE_SIZE as usize] = [
        Colour::Black,
        Colour::Red,
        Colour::Orange,
        Colour::Yellow,
        Colour::Green,
        Colour::Blue,
        Colour::Purple,
        Colour::Gray,
        Colour::White,
    ];

    /// Resolve a stored index. Anything outside 0..=8 wraps around the palette.
    pub fn from_index(index: i64) -> Self {
        let wrapped = index.rem_euclid(PALETTE_SIZE);
        if wrapped != index {
            log::debug!("Colour index {} out of range, using {}", index, wrapped);
        }
        Self::ALL[wrapped as usize]
    }

    pub fn index(self) -> i64 {
        self as i64
    }

    /// Uniformly pick one of the nine swatches.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    pub const fn rgba(self) -> RgbaColor {
        match self {
            Colour::Black => RgbaColor::new(0, 0, 0, 255),
            Colour::Red => RgbaColor::new(255, 0, 0, 255),
            Colour::Orange => RgbaColor::new(255, 128, 0, 255),
            Colour::Yellow => RgbaColor::new(255, 255, 0, 255),
            Colour::Green => RgbaColor::new(0, 255, 0, 255),
            Colour::Blue => RgbaColor::new(0, 0, 255, 255),
            Colour::Purple => RgbaColor::new(128, 0, 128, 255),
            Colour::Gray => RgbaColor::new(128, 128, 128, 255),
            Colour::White => RgbaColor::new(255, 255, 255, 255),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Colour::Black => "black",
            Colour::Red => "red",
            Colour::Orange => "orange",
            Colour::Yellow => "yellow",
            Colour::Green => "green",
            Colour::Blue => "blue",
            Colour::Purple => "purple",
            Colour::Gray => "gray",
            Colour::White => "white",
        }
    }
}
