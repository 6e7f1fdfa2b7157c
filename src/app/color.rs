//! Color scales for circles and the legend.
//!
//! Directories are shaded by depth with an HCL interpolation between two pale
//! cyans. Leaves follow the active [`ColorMode`].

use eframe::egui::Color32;

use crate::repo::TreeNode;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorMode {
    /// Leaf color by number of authors.
    #[default]
    Authors,
    /// Leaf color by share of lines older than six months.
    Code,
}

impl ColorMode {
    pub(super) fn label(self) -> &'static str {
        match self {
            Self::Authors => "Number of authors",
            Self::Code => "Age of code",
        }
    }
}

pub(super) const MISSING_DATA_COLOR: Color32 = Color32::from_rgb(170, 170, 170);

const AUTHOR_THRESHOLDS: [u32; 2] = [2, 3];
const AUTHOR_COLORS: [Color32; 3] = [
    Color32::from_rgb(0xE1, 0x57, 0x59),
    Color32::from_rgb(0xED, 0xC9, 0x48),
    Color32::from_rgb(0x59, 0xA1, 0x4F),
];

const RD_YL_GN: [[f64; 3]; 11] = [
    [165.0, 0.0, 38.0],
    [215.0, 48.0, 39.0],
    [244.0, 109.0, 67.0],
    [253.0, 174.0, 97.0],
    [254.0, 224.0, 139.0],
    [255.0, 255.0, 191.0],
    [217.0, 239.0, 139.0],
    [166.0, 217.0, 106.0],
    [102.0, 189.0, 99.0],
    [26.0, 152.0, 80.0],
    [0.0, 104.0, 55.0],
];

const DIRECTORY_DEPTH_DOMAIN: (f64, f64) = (-1.0, 5.0);
const DIRECTORY_SHALLOW: Hsl = Hsl {
    h: 185.0,
    s: 0.6,
    l: 0.99,
};
const DIRECTORY_DEEP: Hsl = Hsl {
    h: 187.0,
    s: 0.4,
    l: 0.8,
};

pub(super) fn node_color(node: &TreeNode, mode: ColorMode) -> Color32 {
    if !node.is_leaf() {
        return directory_color(node.depth);
    }
    match mode {
        ColorMode::Authors => author_color(node.data.author_count),
        ColorMode::Code => code_age_color(node.data.fraction_old),
    }
}

pub(super) fn author_color(author_count: Option<u32>) -> Color32 {
    let count = author_count.unwrap_or(0);
    let bucket = AUTHOR_THRESHOLDS
        .iter()
        .take_while(|&&threshold| count >= threshold)
        .count();
    AUTHOR_COLORS[bucket]
}

/// Old code (fraction 1) is red, fresh code (fraction 0) is green.
pub(super) fn code_age_color(fraction_old: Option<f64>) -> Color32 {
    match fraction_old.filter(|fraction| fraction.is_finite()) {
        Some(fraction) => rgb_basis(&RD_YL_GN, 1.0 - fraction),
        None => MISSING_DATA_COLOR,
    }
}

pub(super) fn directory_color(depth: usize) -> Color32 {
    let (low, high) = DIRECTORY_DEPTH_DOMAIN;
    let t = ((depth as f64 - low) / (high - low)).clamp(0.0, 1.0);
    interpolate_hcl(DIRECTORY_SHALLOW.to_rgb(), DIRECTORY_DEEP.to_rgb(), t).to_color32()
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Rgb {
    r: f64,
    g: f64,
    b: f64,
}

impl Rgb {
    fn to_color32(self) -> Color32 {
        let channel = |value: f64| value.round().clamp(0.0, 255.0) as u8;
        Color32::from_rgb(channel(self.r), channel(self.g), channel(self.b))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Hsl {
    h: f64,
    s: f64,
    l: f64,
}

impl Hsl {
    fn to_rgb(self) -> Rgb {
        let h = self.h.rem_euclid(360.0);
        let m2 = self.l + (if self.l < 0.5 { self.l } else { 1.0 - self.l }) * self.s;
        let m1 = 2.0 * self.l - m2;
        let channel = |h: f64| {
            255.0
                * if h < 60.0 {
                    m1 + (m2 - m1) * h / 60.0
                } else if h < 180.0 {
                    m2
                } else if h < 240.0 {
                    m1 + (m2 - m1) * (240.0 - h) / 60.0
                } else {
                    m1
                }
        };
        Rgb {
            r: channel(if h >= 240.0 { h - 240.0 } else { h + 120.0 }),
            g: channel(h),
            b: channel(if h < 120.0 { h + 240.0 } else { h - 120.0 }),
        }
    }
}

// CIELAB against the D50 white point, matching the usual web color tooling.
const XN: f64 = 0.96422;
const ZN: f64 = 0.82521;
const T0: f64 = 4.0 / 29.0;
const T1: f64 = 6.0 / 29.0;
const T2: f64 = 3.0 * T1 * T1;
const T3: f64 = T1 * T1 * T1;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Hcl {
    h: f64,
    c: f64,
    l: f64,
}

impl Hcl {
    fn from_rgb(rgb: Rgb) -> Self {
        let r = srgb_to_linear(rgb.r);
        let g = srgb_to_linear(rgb.g);
        let b = srgb_to_linear(rgb.b);
        let y = xyz_to_lab(0.2225045 * r + 0.7168786 * g + 0.0606169 * b);
        let (x, z) = if r == g && g == b {
            (y, y)
        } else {
            (
                xyz_to_lab((0.4360747 * r + 0.3850649 * g + 0.1430804 * b) / XN),
                xyz_to_lab((0.0139322 * r + 0.0971045 * g + 0.7141733 * b) / ZN),
            )
        };
        let l = 116.0 * y - 16.0;
        let a = 500.0 * (x - y);
        let b = 200.0 * (y - z);

        let c = a.hypot(b);
        let h = if c < 1e-12 {
            f64::NAN
        } else {
            b.atan2(a).to_degrees().rem_euclid(360.0)
        };
        Self { h, c, l }
    }

    fn to_rgb(self) -> Rgb {
        let (a, b) = if self.h.is_nan() {
            (0.0, 0.0)
        } else {
            let h = self.h.to_radians();
            (h.cos() * self.c, h.sin() * self.c)
        };
        let y = (self.l + 16.0) / 116.0;
        let x = XN * lab_to_xyz(y + a / 500.0);
        let z = ZN * lab_to_xyz(y - b / 200.0);
        let y = lab_to_xyz(y);
        Rgb {
            r: linear_to_srgb(3.1338561 * x - 1.6168667 * y - 0.4906146 * z),
            g: linear_to_srgb(-0.9787684 * x + 1.9161415 * y + 0.0334540 * z),
            b: linear_to_srgb(0.0719453 * x - 0.2289914 * y + 1.4052427 * z),
        }
    }
}

fn srgb_to_linear(value: f64) -> f64 {
    let value = value / 255.0;
    if value <= 0.04045 {
        value / 12.92
    } else {
        ((value + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(value: f64) -> f64 {
    255.0
        * if value <= 0.0031308 {
            12.92 * value
        } else {
            1.055 * value.powf(1.0 / 2.4) - 0.055
        }
}

fn xyz_to_lab(t: f64) -> f64 {
    if t > T3 { t.cbrt() } else { t / T2 + T0 }
}

fn lab_to_xyz(t: f64) -> f64 {
    if t > T1 { t * t * t } else { T2 * (t - T0) }
}

fn interpolate_hcl(from: Rgb, to: Rgb, t: f64) -> Rgb {
    let a = Hcl::from_rgb(from);
    let b = Hcl::from_rgb(to);

    let h = match (a.h.is_nan(), b.h.is_nan()) {
        (true, true) => f64::NAN,
        (true, false) => b.h,
        (false, true) => a.h,
        (false, false) => {
            let mut delta = b.h - a.h;
            if delta.abs() > 180.0 {
                delta -= 360.0 * (delta / 360.0).round();
            }
            a.h + delta * t
        }
    };

    Hcl {
        h,
        c: a.c + (b.c - a.c) * t,
        l: a.l + (b.l - a.l) * t,
    }
    .to_rgb()
}

/// Uniform cubic B-spline through the color stops, per channel.
fn rgb_basis(stops: &[[f64; 3]], t: f64) -> Color32 {
    let n = stops.len() - 1;
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let i = if t >= 1.0 {
        n - 1
    } else {
        ((t * n as f64).floor() as usize).min(n - 1)
    };

    let mut channels = [0.0; 3];
    for (channel, out) in channels.iter_mut().enumerate() {
        let v1 = stops[i][channel];
        let v2 = stops[i + 1][channel];
        let v0 = if i > 0 { stops[i - 1][channel] } else { 2.0 * v1 - v2 };
        let v3 = if i < n - 1 { stops[i + 2][channel] } else { 2.0 * v2 - v1 };
        *out = basis((t - i as f64 / n as f64) * n as f64, v0, v1, v2, v3);
    }

    Rgb {
        r: channels[0],
        g: channels[1],
        b: channels[2],
    }
    .to_color32()
}

fn basis(t1: f64, v0: f64, v1: f64, v2: f64, v3: f64) -> f64 {
    let t2 = t1 * t1;
    let t3 = t2 * t1;
    ((1.0 - 3.0 * t1 + 3.0 * t2 - t3) * v0
        + (4.0 - 6.0 * t2 + 3.0 * t3) * v1
        + (1.0 + 3.0 * t1 + 3.0 * t2 - 3.0 * t3) * v2
        + t3 * v3)
        / 6.0
}
