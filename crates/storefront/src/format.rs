//! Number formatting for prices and quantities (ru locale).

/// Group separator used by the ru locale (no-break space).
pub const GROUP_SEPARATOR: char = '\u{a0}';

/// Round to whole tenge and group thousands: `1010000.4` -> `1 010 000`.
pub fn format_amount(value: f64) -> String {
    let rounded = value.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if negative {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(ch);
    }
    out
}

/// `format_amount` followed by the tenge sign.
pub fn format_tenge(value: f64) -> String {
    format!("{} ₸", format_amount(value))
}

/// Fixed decimals, e.g. tons with 1 or 2 places.
///
/// Exact ties round away from zero (`2.125` -> `2.13`), like JS `toFixed`.
/// Everything else rounds to the nearest digit of the exact binary value.
pub fn format_fixed(value: f64, decimals: usize) -> String {
    if is_exact_tie(value, decimals) {
        let scale = 10f64.powi(decimals as i32);
        let up = (value.abs() * scale).ceil().copysign(value) / scale;
        return format!("{up:.decimals$}");
    }
    format!("{value:.decimals$}")
}

/// A tie at `decimals` places is `m / 2^(decimals + 1)` with `m` odd.
fn is_exact_tie(value: f64, decimals: usize) -> bool {
    if !value.is_finite() || decimals > 15 {
        return false;
    }
    let halves = value * 2f64.powi(decimals as i32 + 1);
    halves.fract() == 0.0 && halves % 2.0 != 0.0
}

/// Meters without a trailing `.0` for whole values.
pub fn format_meters(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}
