//! Built-in furniture sprites and named paint colors.

#[cfg(test)]
#[path = "catalog_test.rs"]
mod catalog_test;

use crate::scene::{Color, ImageRef};

/// A furniture sprite the user can drop into the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Asset {
    pub name: &'static str,
    pub src: &'static str,
}

impl Asset {
    #[must_use]
    pub fn image_ref(&self) -> ImageRef {
        ImageRef::new(self.src)
    }
}

/// A named wall color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaintColor {
    pub name: &'static str,
    pub color: Color,
}

pub const FURNITURE_ASSETS: &[Asset] = &[
    Asset { name: "Sofa", src: "/assets/furniture/Copilot_20250924_222920.png" },
    Asset { name: "Chair", src: "/assets/furniture/Copilot_20250924_211924.png" },
    Asset { name: "Modern TV stand", src: "/assets/furniture/Copilot_20250924_210831.png" },
    Asset { name: "Book Shelf", src: "/assets/furniture/Copilot_20250924_211018.png" },
    Asset { name: "Rug", src: "/assets/furniture/Copilot_20250924_211117.png" },
    Asset { name: "Floor Lamp", src: "/assets/furniture/Copilot_20250924_211219.png" },
    Asset { name: "Bed", src: "/assets/furniture/Copilot_20250924_211320.png" },
    Asset { name: "Night Stand", src: "/assets/furniture/Copilot_20250924_211419.png" },
    Asset { name: "Wide Dresser", src: "/assets/furniture/Copilot_20250924_211544.png" },
    Asset { name: "Tall Dresser", src: "/assets/furniture/Copilot_20250924_211647.png" },
    Asset { name: "Dining Table", src: "/assets/furniture/Copilot_20250924_211755.png" },
    Asset { name: "Mirror", src: "/assets/furniture/Copilot_20250924_212219.png" },
    Asset { name: "Frame", src: "/assets/furniture/Copilot_20250924_212345.png" },
];

pub const PAINT_COLORS: &[PaintColor] = &[
    PaintColor { name: "Red", color: Color::rgb(0xE5, 0x3E, 0x3E) },
    PaintColor { name: "Yellow", color: Color::rgb(0xEC, 0xC9, 0x4B) },
    PaintColor { name: "Blue", color: Color::rgb(0x42, 0x99, 0xE1) },
    PaintColor { name: "Green", color: Color::rgb(0x48, 0xBB, 0x78) },
    PaintColor { name: "Orange", color: Color::rgb(0xED, 0x89, 0x36) },
    PaintColor { name: "Purple", color: Color::rgb(0x80, 0x5A, 0xD5) },
    PaintColor { name: "Brown", color: Color::rgb(0x7B, 0x34, 0x1E) },
    PaintColor { name: "Alabaster", color: Color::rgb(0xF2, 0xF0, 0xE6) },
    PaintColor { name: "Revere Pewter", color: Color::rgb(0xD0, 0xCF, 0xC8) },
    PaintColor { name: "Agreeable Gray", color: Color::rgb(0xD4, 0xCE, 0xC3) },
    PaintColor { name: "Sea Salt", color: Color::rgb(0xDA, 0xE0, 0xDB) },
    PaintColor { name: "Hale Navy", color: Color::rgb(0x4F, 0x58, 0x63) },
    PaintColor { name: "Chantilly Lace", color: Color::rgb(0xF6, 0xF7, 0xF2) },
    PaintColor { name: "Accessible Beige", color: Color::rgb(0xD2, 0xC9, 0xBB) },
    PaintColor { name: "Urbane Bronze", color: Color::rgb(0x63, 0x5F, 0x5A) },
    PaintColor { name: "Iron Ore", color: Color::rgb(0x4E, 0x4D, 0x4A) },
    PaintColor { name: "Tricorn Black", color: Color::rgb(0x30, 0x31, 0x33) },
    PaintColor { name: "Aegean Teal", color: Color::rgb(0x73, 0x8F, 0x93) },
    PaintColor { name: "Kendall Charcoal", color: Color::rgb(0x69, 0x68, 0x66) },
    PaintColor { name: "Swiss Coffee", color: Color::rgb(0xDD, 0xDC, 0xD1) },
    PaintColor { name: "Pale Oak", color: Color::rgb(0xE2, 0xDC, 0xD1) },
    PaintColor { name: "October Mist", color: Color::rgb(0xB5, 0xB9, 0xA9) },
    PaintColor { name: "Classic Gray", color: Color::rgb(0xDA, 0xDA, 0xD4) },
];

/// The color selected when the app starts: the first palette entry.
#[must_use]
pub fn default_paint_color() -> Color {
    PAINT_COLORS[0].color
}

/// Palette entries whose name contains `query`, ignoring case. Blank matches all.
#[must_use]
pub fn search_colors(query: &str) -> Vec<&'static PaintColor> {
    let needle = query.trim().to_lowercase();
    PAINT_COLORS
        .iter()
        .filter(|c| c.name.to_lowercase().contains(&needle))
        .collect()
}

/// Look up a furniture asset by exact name.
#[must_use]
pub fn find_asset(name: &str) -> Option<&'static Asset> {
    FURNITURE_ASSETS.iter().find(|a| a.name == name)
}
