//! PAM (protospacer adjacent motif) patterns written in IUPAC nucleotide codes.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PamError {
    #[error("PAM pattern is empty")]
    Empty,

    #[error("Invalid IUPAC code '{code}' at position {position} in PAM pattern")]
    InvalidCode { code: char, position: usize },
}

/// Bases matched by an IUPAC code, or `None` for an unknown code
fn iupac_bases(code: u8) -> Option<&'static [u8]> {
    let bases: &'static [u8] = match code {
        b'A' => b"A",
        b'C' => b"C",
        b'G' => b"G",
        b'T' => b"T",
        b'R' => b"AG",
        b'Y' => b"CT",
        b'S' => b"CG",
        b'W' => b"AT",
        b'K' => b"GT",
        b'M' => b"AC",
        b'B' => b"CGT",
        b'D' => b"AGT",
        b'H' => b"ACT",
        b'V' => b"ACG",
        b'N' => b"ACGT",
        _ => return None,
    };
    Some(bases)
}

/// A compiled PAM pattern such as `NGG` or `TTTV`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PamPattern {
    codes: Vec<u8>,
}

impl PamPattern {
    /// Compile a PAM pattern. Codes are case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns `PamError::Empty` for an empty pattern or `PamError::InvalidCode`
    /// for a character that is not an IUPAC nucleotide code.
    pub fn parse(pattern: &str) -> Result<Self, PamError> {
        if pattern.is_empty() {
            return Err(PamError::Empty);
        }

        let mut codes = Vec::with_capacity(pattern.len());
        for (position, c) in pattern.chars().enumerate() {
            let code = u8::try_from(c.to_ascii_uppercase())
                .ok()
                .filter(|b| iupac_bases(*b).is_some())
                .ok_or(PamError::InvalidCode { code: c, position })?;
            codes.push(code);
        }

        Ok(Self { codes })
    }

    /// Number of bases covered by the pattern
    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Check whether an upper-case window matches the pattern exactly.
    ///
    /// An `N` in the window never matches, since it is not a concrete base.
    #[must_use]
    pub fn matches(&self, window: &[u8]) -> bool {
        window.len() == self.codes.len()
            && self
                .codes
                .iter()
                .zip(window)
                .all(|(code, base)| iupac_bases(*code).is_some_and(|bases| bases.contains(base)))
    }
}

impl std::fmt::Display for PamPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.codes))
    }
}
