//! Colors shared by the terminal renderers
//!
//! Cluster colors cycle through a fixed 13-entry palette. Unvisited points
//! are gray, noise is black and the search radius is drawn in red.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fmt;

use serde::{Serialize, Serializer};

use clusterlab_core::{ClusterId, Point};

/// 24-bit color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const GRAY: Rgb = Rgb(0x80, 0x80, 0x80);
    pub const RED: Rgb = Rgb(0xff, 0, 0);
    pub const GREEN: Rgb = Rgb(0, 0xff, 0);
    pub const BLUE: Rgb = Rgb(0, 0, 0xff);

    /// Parses `#rrggbb` or `rrggbb`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |at: usize| u8::from_str_radix(&hex[at..at + 2], 16).ok();
        Some(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Channels scaled to `0.0..=1.0`
    pub fn to_f32(self) -> [f32; 3] {
        [
            f32::from(self.0) / 255.0,
            f32::from(self.1) / 255.0,
            f32::from(self.2) / 255.0,
        ]
    }

    /// Nearest color for channels in `0.0..=1.0`
    pub fn from_f32(rgb: [f32; 3]) -> Self {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgb(channel(rgb[0]), channel(rgb[1]), channel(rgb[2]))
    }

    /// ANSI true-color foreground escape
    pub fn ansi_fg(self) -> String {
        format!("\x1b[38;2;{};{};{}m", self.0, self.1, self.2)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// ANSI reset sequence
pub const ANSI_RESET: &str = "\x1b[0m";

const CLUSTER_COLORS: [Rgb; 13] = [
    Rgb(0xe6, 0x19, 0x4b),
    Rgb(0x3c, 0xb4, 0x4b),
    Rgb(0xff, 0xe1, 0x19),
    Rgb(0x43, 0x63, 0xd8),
    Rgb(0xf5, 0x82, 0x31),
    Rgb(0x91, 0x1e, 0xb4),
    Rgb(0x46, 0xf0, 0xf0),
    Rgb(0xf0, 0x32, 0xe6),
    Rgb(0xbc, 0xf6, 0x0c),
    Rgb(0xfa, 0xbe, 0xbe),
    Rgb(0x00, 0x80, 0x80),
    Rgb(0xe6, 0xbe, 0xff),
    Rgb(0x9a, 0x63, 0x24),
];

pub const UNVISITED: Rgb = Rgb::GRAY;
pub const NOISE: Rgb = Rgb::BLACK;
pub const SEARCH_RADIUS: Rgb = Rgb::RED;

/// Color of a cluster; ids past the palette wrap around
pub fn cluster_color(cluster: ClusterId) -> Rgb {
    if cluster.is_noise() {
        return NOISE;
    }
    CLUSTER_COLORS[(cluster.as_usize() - 1) % CLUSTER_COLORS.len()]
}

pub fn point_color(point: &Point) -> Rgb {
    point.cluster_id.map_or(UNVISITED, cluster_color)
}
