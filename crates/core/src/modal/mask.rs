//! Display masks for CPF and phone inputs.
//!
//! Both masks work on the digits of the input only, so re-applying a mask to
//! its own output is a no-op.

const CPF_DIGITS: usize = 11;
const PHONE_DIGITS: usize = 11;

/// Keep only ASCII digits.
pub fn digits_only(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Format a CPF as `###.###.###-##`, progressively for partial input.
pub fn format_cpf(input: &str) -> String {
    let digits: Vec<char> = digits_only(input).chars().take(CPF_DIGITS).collect();
    let mut out = String::with_capacity(14);

    for (i, digit) in digits.iter().enumerate() {
        match i {
            3 | 6 => out.push('.'),
            9 => out.push('-'),
            _ => {}
        }
        out.push(*digit);
    }

    out
}

/// Format a phone number as `(##) #####-####`, progressively for partial
/// input.
pub fn format_phone(input: &str) -> String {
    let digits: String = digits_only(input).chars().take(PHONE_DIGITS).collect();
    let len = digits.len();

    match len {
        0 => String::new(),
        1..=2 => format!("({}", digits),
        3..=7 => format!("({}) {}", &digits[..2], &digits[2..]),
        _ => format!("({}) {}-{}", &digits[..2], &digits[2..7], &digits[7..]),
    }
}
