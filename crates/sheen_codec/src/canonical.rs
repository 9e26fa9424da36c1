//! Canonical forms for change detection
//!
//! Two values that differ only in formatting must compare equal, otherwise
//! the controller would re-write an unchanged property.

use crate::kind::EffectKind;
use crate::shadow::expand_layers;

/// Textual canonicalization.
///
/// - runs of whitespace collapse to one space
/// - `<number> px` becomes `<number>px`
/// - commas are written `, `
/// - no padding just inside parentheses
pub fn canonicalize(value: &str) -> String {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    let chars: Vec<char> = collapsed.chars().collect();
    let mut out = String::with_capacity(collapsed.len());

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            ',' => {
                trim_trailing_space(&mut out);
                out.push_str(", ");
                i += 1;
                while chars.get(i) == Some(&' ') {
                    i += 1;
                }
                continue;
            }
            ')' => {
                trim_trailing_space(&mut out);
                out.push(c);
            }
            '(' => {
                out.push(c);
                i += 1;
                while chars.get(i) == Some(&' ') {
                    i += 1;
                }
                continue;
            }
            ' ' if is_detached_unit(&chars, i) => {}
            _ => out.push(c),
        }
        i += 1;
    }

    trim_trailing_space(&mut out);
    out
}

fn trim_trailing_space(out: &mut String) {
    while out.ends_with(' ') {
        out.pop();
    }
}

/// A space between a number and a following `px` unit.
fn is_detached_unit(chars: &[char], i: usize) -> bool {
    let after_number = i > 0 && (chars[i - 1].is_ascii_digit() || chars[i - 1] == '.');
    let unit = chars.get(i + 1) == Some(&'p') && chars.get(i + 2) == Some(&'x');
    let unit_ends = chars
        .get(i + 3)
        .map_or(true, |c| !(c.is_ascii_alphanumeric() || *c == '-'));
    after_number && unit && unit_ends
}

/// Canonical form used to compare a pending value with the last applied one.
///
/// Shadow values additionally have every understood layer expanded to the
/// serializer's full positional form, so `0 4px 8px rgba(0,0,0,.25)` and
/// `0px 4px 8px 0px rgba(0, 0, 0, 0.25)` are the same value.
pub fn canonical_for(kind: EffectKind, value: &str) -> String {
    match kind {
        EffectKind::BoxShadow => canonicalize(&expand_layers(value, true)),
        EffectKind::TextShadow => canonicalize(&expand_layers(value, false)),
        EffectKind::Gradient => canonicalize(value),
    }
}
