//! Splitting of the insert page's comma-separated value field.
//!
//! Unquoted input splits on every comma. A value wrapped in double quotes
//! may contain commas; `""` inside quotes is a literal quote.

use crate::error::{DashError, Result};

/// Splits `input` into raw text values, trimming whitespace around each.
///
/// An empty string yields a single empty value, like a plain comma split.
pub fn split_values(input: &str) -> Result<Vec<String>> {
    let mut values = Vec::new();
    let mut chars = input.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        let value = if chars.next_if_eq(&'"').is_some() {
            let mut quoted = String::new();
            loop {
                match chars.next() {
                    Some('"') if chars.next_if_eq(&'"').is_some() => quoted.push('"'),
                    Some('"') => break,
                    Some(c) => quoted.push(c),
                    None => {
                        return Err(DashError::input(format!(
                            "Unterminated quote in value {}",
                            values.len() + 1
                        )))
                    }
                }
            }
            while chars.next_if(|c| c.is_whitespace()).is_some() {}
            if let Some(&c) = chars.peek() {
                if c != ',' {
                    return Err(DashError::input(format!(
                        "Unexpected '{c}' after quoted value {}",
                        values.len() + 1
                    )));
                }
            }
            quoted
        } else {
            let mut raw = String::new();
            while let Some(c) = chars.next_if(|c| *c != ',') {
                raw.push(c);
            }
            raw.trim_end().to_string()
        };

        values.push(value);

        if chars.next_if_eq(&',').is_none() {
            break;
        }
    }

    Ok(values)
}
