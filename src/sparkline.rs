//! Renders numeric series as small inline SVG line charts.

use std::fmt::Write;

/// Space left free on every side of the chart, in SVG units.
pub const PADDING: f64 = 2.0;

/// The geometry and colour of a sparkline.
#[derive(Clone, Debug, PartialEq)]
pub struct Sparkline {
    pub width: f64,
    pub height: f64,
    pub stroke: String,
}

impl Default for Sparkline {
    fn default() -> Self {
        Sparkline {
            width: 280.0,
            height: 60.0,
            stroke: String::from("#3b6ea5"),
        }
    }
}

impl Sparkline {
    /// Returns the SVG path data (`d` attribute) for `values`: a move to the
    /// first point and a line to each of the others, with coordinates rounded
    /// to two decimals. Higher values are drawn nearer the top. An empty
    /// series yields an empty string; a series whose values are all equal is
    /// drawn as a flat line halfway up.
    pub fn path(&self, values: &[f64]) -> String {
        let (min, max) = match bounds(values) {
            Some(bounds) => bounds,
            None => return String::new(),
        };
        let step = match values.len() {
            1 => 0.0,
            n => (self.width - 2.0 * PADDING) / (n - 1) as f64,
        };
        let drawable = self.height - 2.0 * PADDING;

        let mut d = String::new();
        for (i, value) in values.iter().enumerate() {
            let x = PADDING + i as f64 * step;
            let y = match max - min {
                range if range > 0.0 => self.height - PADDING - (value - min) / range * drawable,
                _ => self.height / 2.0,
            };
            let command = if i == 0 { 'M' } else { 'L' };
            // writing to a `String` can't fail
            let _ = write!(d, "{}{}{:.2},{:.2}", if i == 0 { "" } else { " " }, command, x, y);
        }
        d
    }

    /// Returns a complete inline `<svg>` element drawing `values`, or an empty
    /// string if there are none.
    pub fn svg(&self, values: &[f64]) -> String {
        let d = self.path(values);
        if d.is_empty() {
            return d;
        }
        format!(
            concat!(
                r#"<svg class="sparkline" xmlns="http://www.w3.org/2000/svg" "#,
                r#"width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
                r#"<path d="{d}" fill="none" stroke="{stroke}" stroke-width="1.5" "#,
                r#"stroke-linejoin="round" stroke-linecap="round"/></svg>"#,
            ),
            w = self.width,
            h = self.height,
            d = d,
            stroke = self.stroke,
        )
    }

    /// Convenience for [`Sparkline::svg`] over counts.
    pub fn svg_counts(&self, counts: &[usize]) -> String {
        let values: Vec<f64> = counts.iter().map(|&c| c as f64).collect();
        self.svg(&values)
    }
}

fn bounds(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(min, max), &v| (min.min(v), max.max(v))),
    )
}

#[cfg(test)]
mod test {
    use super::*;

    fn points(d: &str) -> Vec<(f64, f64)> {
        d.split(' ')
            .map(|command| {
                let mut xy = command[1..].split(',').map(|n| n.parse::<f64>().unwrap());
                (xy.next().unwrap(), xy.next().unwrap())
            })
            .collect()
    }

    #[test]
    fn test_empty() {
        let sparkline = Sparkline::default();
        assert_eq!("", sparkline.path(&[]));
        assert_eq!("", sparkline.svg(&[]));
    }

    #[test]
    fn test_single_point() {
        assert_eq!("M2.00,30.00", Sparkline::default().path(&[7.0]));
    }

    #[test]
    fn test_constant_series_is_flat() {
        let d = Sparkline::default().path(&[5.0, 5.0, 5.0]);
        assert_eq!("M2.00,30.00 L140.00,30.00 L278.00,30.00", d);
    }

    #[test]
    fn test_scaling() {
        let sparkline = Sparkline {
            width: 100.0,
            height: 20.0,
            stroke: "red".to_owned(),
        };
        assert_eq!(
            "M2.00,18.00 L34.00,2.00 L66.00,10.00 L98.00,18.00",
            sparkline.path(&[0.0, 4.0, 2.0, 0.0])
        );
    }

    #[test]
    fn test_points_within_padding() {
        let sparkline = Sparkline::default();
        let d = sparkline.path(&[3.0, 9.0, 1.0, 0.0, 12.0, 4.0]);
        assert!(d.starts_with('M'));
        assert_eq!(5, d.matches('L').count());
        for (x, y) in points(&d) {
            assert!(x >= PADDING && x <= sparkline.width - PADDING);
            assert!(y >= PADDING && y <= sparkline.height - PADDING);
        }
    }

    #[test]
    fn test_svg_uses_stroke() {
        let sparkline = Sparkline {
            stroke: "#ff0000".to_owned(),
            ..Sparkline::default()
        };
        let svg = sparkline.svg_counts(&[1, 2]);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r##"stroke="#ff0000""##));
        assert!(svg.contains(r#"d="M2.00,58.00 L278.00,2.00""#));
    }
}
