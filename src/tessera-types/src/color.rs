use std::fmt;

use tessera_utils::Endian;

use crate::{
    layout::{decode_f32s, encode_f32s},
    FixedLayout,
};

const QUANTA: f32 = 1.0 / 255.0;

/// An RGBA color with floating-point channels in `0.0..=1.0`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Color {
    /// The red channel.
    pub r: f32,
    /// The green channel.
    pub g: f32,
    /// The blue channel.
    pub b: f32,
    /// The alpha channel.
    pub a: f32,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };

    /// Creates a color, clamping every channel into `0.0..=1.0`.
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        let channels = [r, g, b, a];
        if channels.iter().any(|c| !(0.0..=1.0).contains(c)) {
            log::warn!("Clamping out of range color channels <{r}, {g}, {b}, {a}>");
        }

        let [r, g, b, a] = channels.map(clamp_channel);
        Self { r, g, b, a }
    }

    /// Creates a color from 8-bit channels in RGBA order.
    ///
    /// With `inverted`, every byte is read as `255 - byte`.
    pub fn from_rgba8(bytes: [u8; 4], inverted: bool) -> Self {
        let [r, g, b, a] = bytes.map(|v| {
            let v = if inverted { 255 - v } else { v };
            f32::from(v) * QUANTA
        });
        Self { r, g, b, a }
    }

    /// Quantizes the color into 8-bit channels in RGBA order.
    pub fn to_rgba8(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a].map(|c| (clamp_channel(c) * 255.0).round() as u8)
    }

    /// Quantizes the color into inverted 8-bit channels.
    pub fn to_inverted_rgba8(&self) -> [u8; 4] {
        self.to_rgba8().map(|v| 255 - v)
    }
}

fn clamp_channel(c: f32) -> f32 {
    if c.is_nan() {
        0.0
    } else {
        c.clamp(0.0, 1.0)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}, {}, {}, {}>", self.r, self.g, self.b, self.a)
    }
}

impl FixedLayout for Color {
    const WIDTH: usize = 16;

    fn encode_as(&self, out: &mut [u8], host: Endian) {
        encode_f32s(&[self.r, self.g, self.b, self.a], out, host);
    }

    fn decode_as(buf: &[u8], host: Endian) -> Self {
        let [r, g, b, a] = decode_f32s(buf, host);
        Self { r, g, b, a }
    }
}
