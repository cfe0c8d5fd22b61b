//! `printf("%g")` style float rendering.
//!
//! CSV exchange and human-facing output render numbers with six
//! significant digits, trailing zeros trimmed and scientific notation
//! for very small or very large magnitudes, matching what most CPACS
//! tools emit. Stored document vectors keep full precision instead, see
//! [`crate::Document::set_float_vector`].

/// Render a float the way C's `printf("%g")` does: six significant digits,
/// trailing zeros trimmed, scientific notation when the decimal exponent is
/// below -4 or at least 6. NaN renders as `nan`.
pub fn format_g(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value.is_sign_negative() {
            "-inf"
        } else {
            "inf"
        }
        .to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // Six significant digits in scientific form, then reshaped below.
    let sci = format!("{value:.5e}");
    let Some((mantissa, exponent)) = sci.split_once('e') else {
        return sci;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return sci;
    };

    let negative = mantissa.starts_with('-');
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();

    let body = if !(-4..6).contains(&exponent) {
        scientific(&digits, exponent)
    } else if exponent < 0 {
        let mut out = String::from("0.");
        for _ in exponent + 1..0 {
            out.push('0');
        }
        out.push_str(&digits);
        trim_fraction(out)
    } else {
        let split = (exponent + 1) as usize;
        let mut out = String::from(&digits[..split]);
        if split < digits.len() {
            out.push('.');
            out.push_str(&digits[split..]);
        }
        trim_fraction(out)
    };

    if negative { format!("-{body}") } else { body }
}

fn scientific(digits: &str, exponent: i32) -> String {
    let mut mantissa = String::from(&digits[..1]);
    if digits.len() > 1 {
        mantissa.push('.');
        mantissa.push_str(&digits[1..]);
    }
    let mantissa = trim_fraction(mantissa);
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exponent.abs())
}

fn trim_fraction(mut out: String) -> String {
    if out.contains('.') {
        while out.ends_with('0') {
            out.pop();
        }
        if out.ends_with('.') {
            out.pop();
        }
    }
    out
}
