//! Cooking-time parsing.
//!
//! Sites publish total time either as free text ("1 hr 35 mins", "45 min") or
//! as an ISO 8601 duration ("PT1H35M") in a `content` attribute. Both end up
//! as a whole number of minutes.

const MINUTES_PER_HOUR: u32 = 60;
const MINUTES_PER_DAY: u32 = 24 * MINUTES_PER_HOUR;

/// Parse a free-text or ISO 8601 duration into minutes.
///
/// Numbers without a unit count as minutes. Returns `None` when the text
/// holds no number at all or the total does not fit in a `u32`.
pub fn parse_minutes(text: &str) -> Option<u32> {
    let text = text.trim();
    if let Some(iso) = text.strip_prefix("PT").or_else(|| text.strip_prefix("pt")) {
        return parse_iso(iso);
    }

    let tokens = tokenize(text);
    let mut total: Option<u32> = None;
    let mut iter = tokens.iter().peekable();

    while let Some(token) = iter.next() {
        let Token::Number(value) = token else {
            continue;
        };
        let factor = match iter.peek() {
            Some(Token::Word(word)) => {
                let factor = unit_factor(word);
                if factor.is_some() {
                    iter.next();
                }
                factor.unwrap_or(1)
            }
            _ => 1,
        };
        let minutes = value.checked_mul(factor)?;
        total = Some(total.unwrap_or(0).checked_add(minutes)?);
    }

    total
}

/// Combine separate hour and minute fields. Absent when both are missing.
pub fn from_parts(hours: Option<u32>, minutes: Option<u32>) -> Option<u32> {
    match (hours, minutes) {
        (None, None) => None,
        (h, m) => MINUTES_PER_HOUR
            .checked_mul(h.unwrap_or(0))?
            .checked_add(m.unwrap_or(0)),
    }
}

#[derive(Debug, PartialEq)]
enum Token {
    Number(u32),
    Word(String),
}

fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            let mut digits = String::new();
            while let Some(&d) = chars.peek() {
                if !d.is_ascii_digit() {
                    break;
                }
                digits.push(d);
                chars.next();
            }
            if let Ok(value) = digits.parse() {
                tokens.push(Token::Number(value));
            }
        } else if c.is_alphabetic() {
            let mut word = String::new();
            while let Some(&w) = chars.peek() {
                if !w.is_alphabetic() {
                    break;
                }
                word.extend(w.to_lowercase());
                chars.next();
            }
            tokens.push(Token::Word(word));
        } else {
            chars.next();
        }
    }

    tokens
}

fn unit_factor(word: &str) -> Option<u32> {
    match word {
        "m" | "min" | "mins" | "minute" | "minutes" => Some(1),
        "h" | "hr" | "hrs" | "hour" | "hours" => Some(MINUTES_PER_HOUR),
        "d" | "day" | "days" => Some(MINUTES_PER_DAY),
        _ => None,
    }
}

fn parse_iso(duration: &str) -> Option<u32> {
    let mut total = 0u32;
    let mut number = String::new();
    let mut seen = false;

    for c in duration.chars() {
        match c.to_ascii_uppercase() {
            d if d.is_ascii_digit() || d == '.' => number.push(d),
            unit @ ('H' | 'M' | 'S') => {
                let value: f64 = number.parse().ok()?;
                number.clear();
                seen = true;
                let minutes = match unit {
                    'H' => value * f64::from(MINUTES_PER_HOUR),
                    'M' => value,
                    _ => value / 60.0,
                }
                .round();
                if minutes > f64::from(u32::MAX) {
                    return None;
                }
                total = total.checked_add(minutes as u32)?;
            }
            _ => return None,
        }
    }

    seen.then_some(total)
}
