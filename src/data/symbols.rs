//! LaTeX math command to Unicode mappings
//!
//! Keys carry their leading backslash, so a lookup is done with the full
//! command token as it appears in the source (`\alpha`, `\pm`, `\|`).

use lazy_static::lazy_static;
use phf::{phf_map, phf_set};
use regex::{Captures, Regex};

/// Greek letters, lower and upper case
pub static GREEK_LETTERS: phf::Map<&'static str, &'static str> = phf_map! {
    "\\alpha" => "α",
    "\\beta" => "β",
    "\\gamma" => "γ",
    "\\delta" => "δ",
    "\\epsilon" => "ϵ",
    "\\varepsilon" => "ε",
    "\\zeta" => "ζ",
    "\\eta" => "η",
    "\\theta" => "θ",
    "\\vartheta" => "ϑ",
    "\\iota" => "ι",
    "\\kappa" => "κ",
    "\\lambda" => "λ",
    "\\mu" => "μ",
    "\\nu" => "ν",
    "\\xi" => "ξ",
    "\\pi" => "π",
    "\\varpi" => "ϖ",
    "\\rho" => "ρ",
    "\\varrho" => "ϱ",
    "\\sigma" => "σ",
    "\\varsigma" => "ς",
    "\\tau" => "τ",
    "\\upsilon" => "υ",
    "\\phi" => "ϕ",
    "\\varphi" => "φ",
    "\\chi" => "χ",
    "\\psi" => "ψ",
    "\\omega" => "ω",
    "\\Gamma" => "Γ",
    "\\Delta" => "Δ",
    "\\Theta" => "Θ",
    "\\Lambda" => "Λ",
    "\\Xi" => "Ξ",
    "\\Pi" => "Π",
    "\\Sigma" => "Σ",
    "\\Upsilon" => "Υ",
    "\\Phi" => "Φ",
    "\\Psi" => "Ψ",
    "\\Omega" => "Ω",
};

/// Operators, relations, arrows and other math glyphs
pub static MATH_SYMBOLS: phf::Map<&'static str, &'static str> = phf_map! {
    // Calculus
    "\\nabla" => "∇",
    "\\partial" => "∂",
    "\\infty" => "∞",
    "\\sum" => "∑",
    "\\prod" => "∏",
    "\\int" => "∫",
    "\\iint" => "∬",
    "\\oint" => "∮",

    // Binary operators
    "\\pm" => "±",
    "\\mp" => "∓",
    "\\times" => "×",
    "\\div" => "÷",
    "\\cdot" => "⋅",
    "\\ast" => "∗",
    "\\star" => "⋆",
    "\\circ" => "∘",
    "\\bullet" => "∙",
    "\\oplus" => "⊕",
    "\\otimes" => "⊗",
    "\\setminus" => "∖",
    "\\cup" => "∪",
    "\\cap" => "∩",
    "\\land" => "∧",
    "\\wedge" => "∧",
    "\\lor" => "∨",
    "\\vee" => "∨",
    "\\dagger" => "†",

    // Relations
    "\\leq" => "≤",
    "\\le" => "≤",
    "\\geq" => "≥",
    "\\ge" => "≥",
    "\\neq" => "≠",
    "\\ne" => "≠",
    "\\approx" => "≈",
    "\\equiv" => "≡",
    "\\sim" => "∼",
    "\\simeq" => "≃",
    "\\cong" => "≅",
    "\\propto" => "∝",
    "\\ll" => "≪",
    "\\gg" => "≫",
    "\\in" => "∈",
    "\\notin" => "∉",
    "\\ni" => "∋",
    "\\subset" => "⊂",
    "\\supset" => "⊃",
    "\\subseteq" => "⊆",
    "\\supseteq" => "⊇",
    "\\perp" => "⊥",
    "\\parallel" => "∥",
    "\\mid" => "∣",

    // Arrows
    "\\to" => "→",
    "\\rightarrow" => "→",
    "\\leftarrow" => "←",
    "\\gets" => "←",
    "\\leftrightarrow" => "↔",
    "\\Rightarrow" => "⇒",
    "\\Leftarrow" => "⇐",
    "\\Leftrightarrow" => "⇔",
    "\\implies" => "⟹",
    "\\iff" => "⟺",
    "\\mapsto" => "↦",

    // Logic and sets
    "\\forall" => "∀",
    "\\exists" => "∃",
    "\\neg" => "¬",
    "\\lnot" => "¬",
    "\\emptyset" => "∅",
    "\\varnothing" => "∅",

    // Delimiters and norm bars
    "\\langle" => "⟨",
    "\\rangle" => "⟩",
    "\\lfloor" => "⌊",
    "\\rfloor" => "⌋",
    "\\lceil" => "⌈",
    "\\rceil" => "⌉",
    "\\vert" => "|",
    "\\lvert" => "|",
    "\\rvert" => "|",
    "\\Vert" => "‖",
    "\\lVert" => "‖",
    "\\rVert" => "‖",
    "\\|" => "||",

    // Dots
    "\\ldots" => "…",
    "\\dots" => "…",
    "\\cdots" => "⋯",
    "\\vdots" => "⋮",
    "\\ddots" => "⋱",

    // Letter-like
    "\\hbar" => "ℏ",
    "\\ell" => "ℓ",
    "\\Re" => "ℜ",
    "\\Im" => "ℑ",
    "\\aleph" => "ℵ",
    "\\angle" => "∠",
    "\\prime" => "′",
    "\\degree" => "°",

    // Escaped characters
    "\\{" => "{",
    "\\}" => "}",
    "\\%" => "%",
    "\\$" => "$",
    "\\&" => "&",
    "\\#" => "#",
    "\\_" => "_",

    // Spacing
    "\\," => " ",
    "\\:" => " ",
    "\\;" => " ",
    "\\ " => " ",
    "\\!" => "",
    "\\quad" => " ",
    "\\qquad" => "  ",
    "\\\\" => " ",
};

/// Named functions typeset upright (`\sin x`, `\log n`)
pub static FUNCTION_NAMES: phf::Set<&'static str> = phf_set! {
    "sin", "cos", "tan", "cot", "sec", "csc",
    "arcsin", "arccos", "arctan",
    "sinh", "cosh", "tanh",
    "log", "ln", "lg", "exp",
    "lim", "liminf", "limsup",
    "max", "min", "sup", "inf",
    "det", "dim", "ker", "arg", "deg", "gcd", "Pr", "mod",
};

lazy_static! {
    /// A command token: backslash followed by a letter run or one other character
    static ref COMMAND_TOKEN: Regex = Regex::new(r"\\(?:[A-Za-z]+|[^A-Za-z])").unwrap();
}

/// Look up the glyph for a command token such as `\alpha` or `\|`
pub fn lookup_symbol(command: &str) -> Option<&'static str> {
    GREEK_LETTERS
        .get(command)
        .or_else(|| MATH_SYMBOLS.get(command))
        .copied()
}

/// The static name of an upright function (`sin`, `log`), given without backslash
pub fn function_name(name: &str) -> Option<&'static str> {
    FUNCTION_NAMES.get_key(name).copied()
}

/// Replace every known command token in `expr` with its glyph.
///
/// Command tokens are matched whole, so `\partial` never collides with a
/// shorter key such as `\pi`. Unknown commands are left untouched.
pub fn substitute_symbols(expr: &str) -> String {
    COMMAND_TOKEN
        .replace_all(expr, |caps: &Captures| {
            let token = &caps[0];
            lookup_symbol(token).unwrap_or(token).to_string()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greek_lookup() {
        assert_eq!(lookup_symbol("\\alpha"), Some("α"));
        assert_eq!(lookup_symbol("\\Delta"), Some("Δ"));
        assert_eq!(lookup_symbol("\\alphax"), None);
    }

    #[test]
    fn test_substitute_alpha_beta() {
        assert_eq!(substitute_symbols(r"\alpha + \beta"), "α + β");
    }

    #[test]
    fn test_substitute_matches_whole_tokens() {
        assert_eq!(substitute_symbols(r"\partial f / \pi"), "∂ f / π");
        assert_eq!(substitute_symbols(r"\pix"), r"\pix");
    }

    #[test]
    fn test_substitute_keeps_unknown_commands() {
        assert_eq!(substitute_symbols(r"\frac{\alpha}{2}"), r"\frac{α}{2}");
        assert_eq!(substitute_symbols(r"\|x\|"), "||x||");
    }

    #[test]
    fn test_function_names() {
        assert_eq!(function_name("sin"), Some("sin"));
        assert_eq!(function_name("lim"), Some("lim"));
        assert_eq!(function_name("alpha"), None);
    }
}
