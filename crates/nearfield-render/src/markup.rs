//! Typesetting for the TeX-like label markup used in figure text.
//!
//! Supported subset:
//! - `$…$` toggles math mode: letters are set in italic, `-` becomes a
//!   proper minus sign.
//! - `\name` for Greek letters and a few operators (`\zeta`, `\pi`, `\cdot`).
//!   Unicode Greek letters work in and out of math mode.
//! - `_x`, `^x`, `_{…}`, `^{…}` for sub- and superscripts in math mode.
//!
//! Text is split into [`Run`]s that share a face, scale and baseline rise.
//! Widths come from the Adobe metrics of the standard PostScript fonts so
//! that layout and anchoring match what a PostScript interpreter draws.

/// Standard PostScript font families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFamily {
    Times,
    Helvetica,
    Courier,
}

impl FontFamily {
    /// Resolve a family name ("Times New Roman", "serif", "Arial", …).
    pub fn from_name(name: &str) -> Self {
        let name = name.to_ascii_lowercase();
        if name.contains("courier") || name.contains("mono") {
            FontFamily::Courier
        } else if name.contains("helvetica") || name.contains("arial") || name.contains("sans") {
            FontFamily::Helvetica
        } else {
            FontFamily::Times
        }
    }
}

/// Face within a family. `Symbol` is the PostScript Symbol font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Roman,
    Italic,
    Symbol,
}

/// A stretch of text set in one face, size and baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub face: Face,
    /// Characters in the encoding of `face` (Symbol letters are Latin
    /// stand-ins, e.g. `z` for ζ).
    pub text: String,
    /// Size relative to the nominal font size.
    pub scale: f64,
    /// Baseline offset in em; positive is up.
    pub rise: f64,
}

/// Ascender height in em (Times).
pub const ASCENT: f64 = 0.683;
/// Descender depth in em (Times).
pub const DESCENT: f64 = 0.217;

const SCRIPT_SCALE: f64 = 0.7;
const SUBSCRIPT_RISE: f64 = -0.15;
const SUPERSCRIPT_RISE: f64 = 0.35;

/// `(command, Symbol-font character, Unicode character)`
const SYMBOLS: &[(&str, char, char)] = &[
    ("alpha", 'a', 'α'),
    ("beta", 'b', 'β'),
    ("gamma", 'g', 'γ'),
    ("delta", 'd', 'δ'),
    ("epsilon", 'e', 'ε'),
    ("zeta", 'z', 'ζ'),
    ("eta", 'h', 'η'),
    ("theta", 'q', 'θ'),
    ("iota", 'i', 'ι'),
    ("kappa", 'k', 'κ'),
    ("lambda", 'l', 'λ'),
    ("mu", 'm', 'μ'),
    ("nu", 'n', 'ν'),
    ("xi", 'x', 'ξ'),
    ("pi", 'p', 'π'),
    ("rho", 'r', 'ρ'),
    ("sigma", 's', 'σ'),
    ("tau", 't', 'τ'),
    ("upsilon", 'u', 'υ'),
    ("phi", 'f', 'φ'),
    ("chi", 'c', 'χ'),
    ("psi", 'y', 'ψ'),
    ("omega", 'w', 'ω'),
    ("Gamma", 'G', 'Γ'),
    ("Delta", 'D', 'Δ'),
    ("Theta", 'Q', 'Θ'),
    ("Lambda", 'L', 'Λ'),
    ("Xi", 'X', 'Ξ'),
    ("Pi", 'P', 'Π'),
    ("Sigma", 'S', 'Σ'),
    ("Phi", 'F', 'Φ'),
    ("Psi", 'Y', 'Ψ'),
    ("Omega", 'W', 'Ω'),
    ("cdot", '\u{d7}', '·'),
    ("times", '\u{b4}', '×'),
    ("pm", '\u{b1}', '±'),
    ("infty", '\u{a5}', '∞'),
];

fn symbol_for_command(name: &str) -> Option<(char, char)> {
    SYMBOLS
        .iter()
        .find(|(cmd, _, _)| *cmd == name)
        .map(|&(_, sym, uni)| (sym, uni))
}

fn symbol_for_unicode(c: char) -> Option<char> {
    if c == '−' {
        return Some('-');
    }
    SYMBOLS.iter().find(|(_, _, uni)| *uni == c).map(|&(_, sym, _)| sym)
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

struct Parser<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    runs: Vec<Run>,
    math: bool,
}

impl<'a> Parser<'a> {
    fn push(&mut self, face: Face, c: char, scale: f64, rise: f64) {
        if let Some(last) = self.runs.last_mut() {
            if last.face == face && last.scale == scale && last.rise == rise {
                last.text.push(c);
                return;
            }
        }
        self.runs.push(Run {
            face,
            text: c.to_string(),
            scale,
            rise,
        });
    }

    fn command_name(&mut self) -> String {
        let mut name = String::new();
        while let Some(&c) = self.chars.peek() {
            if !c.is_ascii_alphabetic() {
                break;
            }
            name.push(c);
            self.chars.next();
        }
        name
    }

    /// Set one source character (or command introduced by it).
    fn token(&mut self, c: char, scale: f64, rise: f64) {
        match c {
            '\\' => {
                let name = self.command_name();
                if name.is_empty() {
                    // `\$`, `\{`, `\\`: literal next character
                    if let Some(next) = self.chars.next() {
                        self.push(Face::Roman, next, scale, rise);
                    }
                } else if let Some((sym, _)) = symbol_for_command(&name) {
                    self.push(Face::Symbol, sym, scale, rise);
                } else {
                    for ch in name.chars() {
                        self.push(Face::Roman, ch, scale, rise);
                    }
                }
            }
            '-' if self.math => self.push(Face::Symbol, '-', scale, rise),
            c if c.is_ascii_alphabetic() && self.math => self.push(Face::Italic, c, scale, rise),
            c => match symbol_for_unicode(c) {
                Some(sym) => self.push(Face::Symbol, sym, scale, rise),
                None => self.push(Face::Roman, c, scale, rise),
            },
        }
    }

    fn script(&mut self, rise: f64) {
        let scale = SCRIPT_SCALE;
        match self.chars.next() {
            Some('{') => {
                let mut depth = 1;
                while let Some(c) = self.chars.next() {
                    match c {
                        '{' => depth += 1,
                        '}' => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                        }
                        c => self.token(c, scale, rise),
                    }
                }
            }
            Some(c) => self.token(c, scale, rise),
            None => {}
        }
    }

    fn run(mut self) -> Vec<Run> {
        while let Some(c) = self.chars.next() {
            match c {
                '$' => self.math = !self.math,
                '_' if self.math => self.script(SUBSCRIPT_RISE),
                '^' if self.math => self.script(SUPERSCRIPT_RISE),
                '{' | '}' if self.math => {}
                c => self.token(c, 1.0, 0.0),
            }
        }
        self.runs
    }
}

/// Split `markup` into typeset runs.
pub fn parse(markup: &str) -> Vec<Run> {
    Parser {
        chars: markup.chars().peekable(),
        runs: Vec::new(),
        math: false,
    }
    .run()
}

/// Readable Unicode rendering of `markup` for widgets that cannot typeset
/// (`$|F_l(\zeta)|$` → `|F_l(ζ)|`).
pub fn to_plain(markup: &str) -> String {
    let mut out = String::new();
    let mut chars = markup.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '$' | '{' | '}' => {}
            '\\' => {
                let mut name = String::new();
                while let Some(&n) = chars.peek() {
                    if !n.is_ascii_alphabetic() {
                        break;
                    }
                    name.push(n);
                    chars.next();
                }
                match symbol_for_command(&name) {
                    Some((_, uni)) => out.push(uni),
                    None if name.is_empty() => out.extend(chars.next()),
                    None => out.push_str(&name),
                }
            }
            c => out.push(c),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Total advance width of `runs` in em.
pub fn width_em(runs: &[Run], family: FontFamily) -> f64 {
    runs.iter()
        .map(|run| {
            let units: u32 = run
                .text
                .chars()
                .map(|c| char_width(family, run.face, c) as u32)
                .sum();
            units as f64 / 1000.0 * run.scale
        })
        .sum()
}

/// Advance width of `c` in 1/1000 em.
pub fn char_width(family: FontFamily, face: Face, c: char) -> u16 {
    match (family, face) {
        (_, Face::Symbol) => symbol_width(c),
        (FontFamily::Courier, _) => 600,
        (FontFamily::Helvetica, _) => helvetica_width(c),
        (FontFamily::Times, Face::Italic) => times_italic_width(c),
        (FontFamily::Times, Face::Roman) => times_roman_width(c),
    }
}

fn times_roman_width(c: char) -> u16 {
    match c {
        ' ' => 250,
        '!' | '\'' | '(' | ')' | '-' | '[' | ']' | '`' | 'I' | 'f' | 'r' => 333,
        '"' => 408,
        '%' => 833,
        '&' | 'm' => 778,
        '+' | '<' | '=' | '>' => 564,
        ',' | '.' => 250,
        '/' | ':' | ';' | '\\' | 'i' | 'j' | 'l' | 't' => 278,
        '0'..='9' | '#' | '$' | '*' | '_' => 500,
        '?' | 'a' | 'c' | 'e' | 'z' => 444,
        '@' => 921,
        'A' | 'D' | 'G' | 'H' | 'K' | 'N' | 'O' | 'Q' | 'U' | 'V' | 'X' | 'Y' | 'w' => 722,
        'B' | 'C' | 'R' => 667,
        'E' | 'L' | 'T' | 'Z' => 611,
        'F' | 'P' | 'S' => 556,
        'J' => 389,
        'M' => 889,
        'W' => 944,
        '^' => 469,
        's' => 389,
        '{' | '}' => 480,
        '|' => 200,
        '~' => 541,
        _ => 500,
    }
}

fn times_italic_width(c: char) -> u16 {
    match c {
        'a' | 'b' | 'd' | 'g' | 'h' | 'n' | 'o' | 'p' | 'q' | 'u' => 500,
        'c' | 'e' | 'k' | 'x' | 'y' | 'v' => 444,
        'f' | 'i' | 'j' | 'l' | 't' => 278,
        'm' => 722,
        'r' | 's' | 'z' => 389,
        'w' => 667,
        'A' | 'B' | 'E' | 'F' | 'P' | 'R' | 'V' | 'X' => 611,
        'C' | 'K' | 'N' => 667,
        'D' | 'G' | 'H' | 'O' | 'Q' | 'U' => 722,
        'I' => 333,
        'J' => 444,
        'L' | 'T' | 'Y' | 'Z' => 556,
        'M' | 'W' => 833,
        'S' => 500,
        '+' | '=' => 675,
        '|' => 275,
        c => times_roman_width(c),
    }
}

fn helvetica_width(c: char) -> u16 {
    match c {
        ' ' | '.' | ',' | '/' | ':' | ';' | 'f' | 't' | 'I' => 278,
        'i' | 'j' | 'l' => 222,
        '(' | ')' | '-' | 'r' => 333,
        '=' | '+' => 584,
        '|' => 260,
        'm' => 833,
        'w' | 'C' | 'D' | 'H' | 'N' | 'R' | 'U' => 722,
        'M' => 833,
        'W' => 944,
        'O' | 'Q' | 'G' => 778,
        'c' | 'k' | 's' | 'v' | 'x' | 'y' | 'z' => 500,
        'A'..='Z' => 667,
        _ => 556,
    }
}

fn symbol_width(c: char) -> u16 {
    match c {
        'a' => 631,
        'b' | 'k' | 'l' | 'p' | 'r' | 'c' => 549,
        'g' => 411,
        'd' | 'z' => 494,
        'e' | 't' => 439,
        'h' | 's' => 603,
        'q' | 'n' | 'f' => 521,
        'i' => 329,
        'm' | 'u' => 576,
        'x' => 493,
        'y' | 'w' => 686,
        '-' | '\u{d7}' | '\u{b4}' | '\u{b1}' => 549,
        '\u{a5}' => 713,
        'G' => 603,
        'D' | 'Q' | 'W' | 'P' => 768,
        'L' | 'F' => 686,
        'X' => 645,
        'S' => 592,
        'Y' => 795,
        _ => 600,
    }
}
