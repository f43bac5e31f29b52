//! Character reference decoding.
//!
//! Numeric references and the HTML 4 named references are decoded. Entities
//! declared by the DocBook sources (`&version;`, `&majorversion;`, ...) are
//! left exactly as written since their values live in files pgdoc does not
//! read.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static CHAR_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[A-Za-z][A-Za-z0-9]*);")
        .expect("Invalid character reference regex")
});

/// Decode character references in `text`.
///
/// Returns the input unchanged (borrowed) when it contains no `&`.
///
/// # Example
///
/// ```rust
/// use pgdoc_content::sgml::decode_entities;
///
/// assert_eq!(decode_entities("a &lt; b &amp;&amp; c"), "a < b && c");
/// assert_eq!(decode_entities("&#65;&#x42;"), "AB");
/// assert_eq!(decode_entities("PostgreSQL &version;"), "PostgreSQL &version;");
/// ```
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    CHAR_REF.replace_all(text, |caps: &Captures<'_>| {
        let reference = &caps[1];
        match decode_reference(reference) {
            Some(c) => c.to_string(),
            None => caps[0].to_string(),
        }
    })
}

fn decode_reference(reference: &str) -> Option<char> {
    if let Some(numeric) = reference.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => numeric.parse::<u32>().ok(),
        };
        // Out-of-range and NUL references decode to the replacement character.
        return Some(
            code.filter(|&c| c != 0)
                .and_then(char::from_u32)
                .unwrap_or(char::REPLACEMENT_CHARACTER),
        );
    }

    NAMED_ENTITIES
        .binary_search_by_key(&reference, |&(name, _)| name)
        .ok()
        .map(|i| NAMED_ENTITIES[i].1)
}

/// The HTML 4 named character references plus `apos`, sorted by name.
#[rustfmt::skip]
static NAMED_ENTITIES: &[(&str, char)] = &[
    ("AElig", 'Æ'), ("Aacute", 'Á'), ("Acirc", 'Â'), ("Agrave", 'À'),
    ("Alpha", 'Α'), ("Aring", 'Å'), ("Atilde", 'Ã'), ("Auml", 'Ä'),
    ("Beta", 'Β'), ("Ccedil", 'Ç'), ("Chi", 'Χ'), ("Dagger", '\u{2021}'),
    ("Delta", 'Δ'), ("ETH", 'Ð'), ("Eacute", 'É'), ("Ecirc", 'Ê'),
    ("Egrave", 'È'), ("Epsilon", 'Ε'), ("Eta", 'Η'), ("Euml", 'Ë'),
    ("Gamma", 'Γ'), ("Iacute", 'Í'), ("Icirc", 'Î'), ("Igrave", 'Ì'),
    ("Iota", 'Ι'), ("Iuml", 'Ï'), ("Kappa", 'Κ'), ("Lambda", 'Λ'),
    ("Mu", 'Μ'), ("Ntilde", 'Ñ'), ("Nu", 'Ν'), ("OElig", 'Œ'),
    ("Oacute", 'Ó'), ("Ocirc", 'Ô'), ("Ograve", 'Ò'), ("Omega", 'Ω'),
    ("Omicron", 'Ο'), ("Oslash", 'Ø'), ("Otilde", 'Õ'), ("Ouml", 'Ö'),
    ("Phi", 'Φ'), ("Pi", 'Π'), ("Prime", '\u{2033}'), ("Psi", 'Ψ'),
    ("Rho", 'Ρ'), ("Scaron", 'Š'), ("Sigma", 'Σ'), ("THORN", 'Þ'),
    ("Tau", 'Τ'), ("Theta", 'Θ'), ("Uacute", 'Ú'), ("Ucirc", 'Û'),
    ("Ugrave", 'Ù'), ("Upsilon", 'Υ'), ("Uuml", 'Ü'), ("Xi", 'Ξ'),
    ("Yacute", 'Ý'), ("Yuml", 'Ÿ'), ("Zeta", 'Ζ'), ("aacute", 'á'),
    ("acirc", 'â'), ("acute", '´'), ("aelig", 'æ'), ("agrave", 'à'),
    ("alefsym", '\u{2135}'), ("alpha", 'α'), ("amp", '&'), ("and", '\u{2227}'),
    ("ang", '\u{2220}'), ("apos", '\''), ("aring", 'å'), ("asymp", '\u{2248}'),
    ("atilde", 'ã'), ("auml", 'ä'), ("bdquo", '\u{201e}'), ("beta", 'β'),
    ("brvbar", '¦'), ("bull", '\u{2022}'), ("cap", '\u{2229}'), ("ccedil", 'ç'),
    ("cedil", '¸'), ("cent", '¢'), ("chi", 'χ'), ("circ", 'ˆ'),
    ("clubs", '\u{2663}'), ("cong", '\u{2245}'), ("copy", '©'), ("crarr", '\u{21b5}'),
    ("cup", '\u{222a}'), ("curren", '¤'), ("dArr", '\u{21d3}'), ("dagger", '\u{2020}'),
    ("darr", '\u{2193}'), ("deg", '°'), ("delta", 'δ'), ("diams", '\u{2666}'),
    ("divide", '÷'), ("eacute", 'é'), ("ecirc", 'ê'), ("egrave", 'è'),
    ("empty", '\u{2205}'), ("emsp", '\u{2003}'), ("ensp", '\u{2002}'), ("epsilon", 'ε'),
    ("equiv", '\u{2261}'), ("eta", 'η'), ("eth", 'ð'), ("euml", 'ë'),
    ("euro", '\u{20ac}'), ("exist", '\u{2203}'), ("fnof", 'ƒ'), ("forall", '\u{2200}'),
    ("frac12", '½'), ("frac14", '¼'), ("frac34", '¾'), ("frasl", '\u{2044}'),
    ("gamma", 'γ'), ("ge", '\u{2265}'), ("gt", '>'), ("hArr", '\u{21d4}'),
    ("harr", '\u{2194}'), ("hearts", '\u{2665}'), ("hellip", '\u{2026}'), ("iacute", 'í'),
    ("icirc", 'î'), ("iexcl", '¡'), ("igrave", 'ì'), ("image", '\u{2111}'),
    ("infin", '\u{221e}'), ("int", '\u{222b}'), ("iota", 'ι'), ("iquest", '¿'),
    ("isin", '\u{2208}'), ("iuml", 'ï'), ("kappa", 'κ'), ("lArr", '\u{21d0}'),
    ("lambda", 'λ'), ("lang", '\u{2329}'), ("laquo", '«'), ("larr", '\u{2190}'),
    ("lceil", '\u{2308}'), ("ldquo", '\u{201c}'), ("le", '\u{2264}'), ("lfloor", '\u{230a}'),
    ("lowast", '\u{2217}'), ("loz", '\u{25ca}'), ("lrm", '\u{200e}'), ("lsaquo", '\u{2039}'),
    ("lsquo", '\u{2018}'), ("lt", '<'), ("macr", '¯'), ("mdash", '\u{2014}'),
    ("micro", 'µ'), ("middot", '·'), ("minus", '\u{2212}'), ("mu", 'μ'),
    ("nabla", '\u{2207}'), ("nbsp", '\u{a0}'), ("ndash", '\u{2013}'), ("ne", '\u{2260}'),
    ("ni", '\u{220b}'), ("not", '¬'), ("notin", '\u{2209}'), ("nsub", '\u{2284}'),
    ("ntilde", 'ñ'), ("nu", 'ν'), ("oacute", 'ó'), ("ocirc", 'ô'),
    ("oelig", 'œ'), ("ograve", 'ò'), ("oline", '\u{203e}'), ("omega", 'ω'),
    ("omicron", 'ο'), ("oplus", '\u{2295}'), ("or", '\u{2228}'), ("ordf", 'ª'),
    ("ordm", 'º'), ("oslash", 'ø'), ("otilde", 'õ'), ("otimes", '\u{2297}'),
    ("ouml", 'ö'), ("para", '¶'), ("part", '\u{2202}'), ("permil", '\u{2030}'),
    ("perp", '\u{22a5}'), ("phi", 'φ'), ("pi", 'π'), ("piv", 'ϖ'),
    ("plusmn", '±'), ("pound", '£'), ("prime", '\u{2032}'), ("prod", '\u{220f}'),
    ("prop", '\u{221d}'), ("psi", 'ψ'), ("quot", '"'), ("rArr", '\u{21d2}'),
    ("radic", '\u{221a}'), ("rang", '\u{232a}'), ("raquo", '»'), ("rarr", '\u{2192}'),
    ("rceil", '\u{2309}'), ("rdquo", '\u{201d}'), ("real", '\u{211c}'), ("reg", '®'),
    ("rfloor", '\u{230b}'), ("rho", 'ρ'), ("rlm", '\u{200f}'), ("rsaquo", '\u{203a}'),
    ("rsquo", '\u{2019}'), ("sbquo", '\u{201a}'), ("scaron", 'š'), ("sdot", '\u{22c5}'),
    ("sect", '§'), ("shy", '\u{ad}'), ("sigma", 'σ'), ("sigmaf", 'ς'),
    ("sim", '\u{223c}'), ("spades", '\u{2660}'), ("sub", '\u{2282}'), ("sube", '\u{2286}'),
    ("sum", '\u{2211}'), ("sup", '\u{2283}'), ("sup1", '¹'), ("sup2", '²'),
    ("sup3", '³'), ("supe", '\u{2287}'), ("szlig", 'ß'), ("tau", 'τ'),
    ("there4", '\u{2234}'), ("theta", 'θ'), ("thetasym", 'ϑ'), ("thinsp", '\u{2009}'),
    ("thorn", 'þ'), ("tilde", '˜'), ("times", '×'), ("trade", '\u{2122}'),
    ("uArr", '\u{21d1}'), ("uacute", 'ú'), ("uarr", '\u{2191}'), ("ucirc", 'û'),
    ("ugrave", 'ù'), ("uml", '¨'), ("upsih", 'ϒ'), ("upsilon", 'υ'),
    ("uuml", 'ü'), ("weierp", '\u{2118}'), ("xi", 'ξ'), ("yacute", 'ý'),
    ("yen", '¥'), ("yuml", 'ÿ'), ("zeta", 'ζ'), ("zwj", '\u{200d}'),
    ("zwnj", '\u{200c}'),
];
