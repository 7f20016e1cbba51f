//! Local structural-entity extraction over parsed full text
//!
//! Network-free regex pass that finds LaTeX equations, named equations,
//! theorems, conjectures, and physical constants. The pipeline merges
//! display-equation content into the parsed document; all other hits
//! stay in the [`ExtractedEntities`] report for callers.

use regex::Regex;

/// Minimum inline-equation length; shorter matches are mostly currency
/// amounts and stray dollar signs.
const DEFAULT_MIN_INLINE_LEN: usize = 4;

/// Named equations recognized in running text
const NAMED_EQUATIONS: &[(&str, &str)] = &[
    (r"Schr[öo]dinger\s+equation", "Schrödinger equation"),
    (r"Heisenberg\s+uncertainty", "Heisenberg uncertainty principle"),
    (r"Einstein\s+field\s+equation", "Einstein field equations"),
    (r"Maxwell'?s?\s+equations?", "Maxwell's equations"),
    (r"Dirac\s+equation", "Dirac equation"),
    (r"Klein-Gordon\s+equation", "Klein-Gordon equation"),
    (r"Navier-Stokes\s+equation", "Navier-Stokes equations"),
    (r"Euler'?s?\s+equation", "Euler's equation"),
    (r"Fourier\s+transform", "Fourier transform"),
    (r"Laplace\s+equation", "Laplace equation"),
    (r"Poisson\s+equation", "Poisson equation"),
    (r"Wave\s+equation", "Wave equation"),
    (r"Heat\s+equation", "Heat equation"),
    (r"Boltzmann\s+equation", "Boltzmann equation"),
    (r"Fermi-Dirac\s+distribution", "Fermi-Dirac distribution"),
    (r"Bose-Einstein\s+distribution", "Bose-Einstein distribution"),
];

/// Physical constants common in physics papers
const PHYSICAL_CONSTANTS: &[(&str, &str)] = &[
    (r"\\hbar", "reduced Planck constant"),
    (r"\\pi", "pi"),
    (r"speed\s+of\s+light", "speed of light (c)"),
    (r"Planck'?s?\s+constant", "Planck constant"),
    (r"gravitational\s+constant", "gravitational constant (G)"),
    (r"Boltzmann\s+constant", "Boltzmann constant"),
    (r"fine[\s-]structure\s+constant", "fine-structure constant"),
];

/// Kind of a structural entity found in text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathEntityKind {
    Equation,
    Theorem,
    Lemma,
    Proposition,
    Corollary,
    Conjecture,
    Constant,
}

/// A mathematical entity extracted from document text
#[derive(Debug, Clone)]
pub struct MathEntity {
    /// What was found
    pub kind: MathEntityKind,
    /// LaTeX source or statement text
    pub content: String,
    /// Well-known name, when recognized (e.g. "Dirac equation")
    pub name: Option<String>,
    /// Equation/theorem number, when present near the hit
    pub number: Option<String>,
    /// Surrounding text window
    pub context: String,
}

/// All entities found by one [`EntityExtractor::extract_all`] pass
#[derive(Debug, Clone, Default)]
pub struct ExtractedEntities {
    pub display_equations: Vec<MathEntity>,
    pub inline_equations: Vec<MathEntity>,
    pub named_equations: Vec<MathEntity>,
    pub theorems: Vec<MathEntity>,
    pub conjectures: Vec<MathEntity>,
    pub constants: Vec<MathEntity>,
}

impl ExtractedEntities {
    /// Total hits across all categories
    pub fn total(&self) -> usize {
        self.display_equations.len()
            + self.inline_equations.len()
            + self.named_equations.len()
            + self.theorems.len()
            + self.conjectures.len()
            + self.constants.len()
    }
}

/// Regex-based extractor for LaTeX and mathematical entities
pub struct EntityExtractor {
    display_patterns: Vec<Regex>,
    inline_pattern: Regex,
    named_equations: Vec<(Regex, &'static str)>,
    theorem_envs: Vec<(Regex, MathEntityKind)>,
    theorem_numbered: Vec<(Regex, MathEntityKind)>,
    conjecture_patterns: Vec<Regex>,
    conjecture_numbered: Regex,
    constants: Vec<(Regex, &'static str)>,
    number_pattern: Regex,
    min_inline_len: usize,
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityExtractor {
    /// Compile the fixed pattern tables
    pub fn new() -> Self {
        let display = [
            r"(?s)\$\$(.+?)\$\$",
            r"(?s)\\\[(.+?)\\\]",
            r"(?s)\\begin\{equation\}(.+?)\\end\{equation\}",
            r"(?s)\\begin\{equation\*\}(.+?)\\end\{equation\*\}",
            r"(?s)\\begin\{align\}(.+?)\\end\{align\}",
            r"(?s)\\begin\{align\*\}(.+?)\\end\{align\*\}",
            r"(?s)\\begin\{eqnarray\}(.+?)\\end\{eqnarray\}",
            r"(?s)\\begin\{gather\}(.+?)\\end\{gather\}",
        ];

        let theorem_envs = [
            (r"(?si)\\begin\{theorem\}(.+?)\\end\{theorem\}", MathEntityKind::Theorem),
            (r"(?si)\\begin\{lemma\}(.+?)\\end\{lemma\}", MathEntityKind::Lemma),
            (
                r"(?si)\\begin\{proposition\}(.+?)\\end\{proposition\}",
                MathEntityKind::Proposition,
            ),
            (
                r"(?si)\\begin\{corollary\}(.+?)\\end\{corollary\}",
                MathEntityKind::Corollary,
            ),
        ];

        let theorem_numbered = [
            (
                r"(?s)Theorem\s+(\d+(?:\.\d+)?)[:.]\s*(.+?)(?:\n\n|$)",
                MathEntityKind::Theorem,
            ),
            (
                r"(?s)Lemma\s+(\d+(?:\.\d+)?)[:.]\s*(.+?)(?:\n\n|$)",
                MathEntityKind::Lemma,
            ),
        ];

        Self {
            display_patterns: display
                .iter()
                .map(|p| Regex::new(p).expect("Invalid regex"))
                .collect(),
            inline_pattern: Regex::new(r"\$([^$]+?)\$").expect("Invalid regex"),
            named_equations: NAMED_EQUATIONS
                .iter()
                .map(|&(p, name)| {
                    (
                        Regex::new(&format!("(?i){p}")).expect("Invalid regex"),
                        name,
                    )
                })
                .collect(),
            theorem_envs: theorem_envs
                .iter()
                .map(|&(p, kind)| (Regex::new(p).expect("Invalid regex"), kind))
                .collect(),
            theorem_numbered: theorem_numbered
                .iter()
                .map(|&(p, kind)| (Regex::new(p).expect("Invalid regex"), kind))
                .collect(),
            conjecture_patterns: vec![
                Regex::new(r"(?si)\\begin\{conjecture\}(.+?)\\end\{conjecture\}")
                    .expect("Invalid regex"),
            ],
            conjecture_numbered: Regex::new(
                r"(?s)Conjecture\s+(\d+(?:\.\d+)?)[:.]\s*(.+?)(?:\n\n|$)",
            )
            .expect("Invalid regex"),
            constants: PHYSICAL_CONSTANTS
                .iter()
                .map(|&(p, name)| {
                    (
                        Regex::new(&format!("(?i){p}")).expect("Invalid regex"),
                        name,
                    )
                })
                .collect(),
            number_pattern: Regex::new(r"\((\d+(?:\.\d+)?)\)").expect("Invalid regex"),
            min_inline_len: DEFAULT_MIN_INLINE_LEN,
        }
    }

    /// Extract display (block) equations, deduplicated on content
    pub fn extract_display_equations(&self, text: &str) -> Vec<MathEntity> {
        let mut equations = Vec::new();
        let mut seen = std::collections::HashSet::new();

        for pattern in &self.display_patterns {
            for caps in pattern.captures_iter(text) {
                let content = caps[1].trim();
                if content.is_empty() || !seen.insert(content.to_string()) {
                    continue;
                }

                let whole = caps.get(0).unwrap();
                let context = context_window(text, whole.start(), whole.end(), 100);
                let number = self.equation_number(&context);

                equations.push(MathEntity {
                    kind: MathEntityKind::Equation,
                    content: content.to_string(),
                    name: None,
                    number,
                    context,
                });
            }
        }

        tracing::debug!("extracted {} display equations", equations.len());
        equations
    }

    /// Extract inline `$...$` equations, filtering short and numeric-only
    /// matches
    pub fn extract_inline_equations(&self, text: &str) -> Vec<MathEntity> {
        let mut equations = Vec::new();
        let mut seen = std::collections::HashSet::new();

        for caps in self.inline_pattern.captures_iter(text) {
            let content = caps[1].trim();
            if content.chars().count() < self.min_inline_len
                || content.chars().all(|c| c.is_ascii_digit())
            {
                continue;
            }
            if !seen.insert(content.to_string()) {
                continue;
            }

            let whole = caps.get(0).unwrap();
            equations.push(MathEntity {
                kind: MathEntityKind::Equation,
                content: content.to_string(),
                name: None,
                number: None,
                context: context_window(text, whole.start(), whole.end(), 100),
            });
        }

        tracing::debug!("extracted {} inline equations", equations.len());
        equations
    }

    /// Find mentions of well-known named equations
    pub fn extract_named_equations(&self, text: &str) -> Vec<MathEntity> {
        let mut entities = Vec::new();

        for (pattern, name) in &self.named_equations {
            for m in pattern.find_iter(text) {
                entities.push(MathEntity {
                    kind: MathEntityKind::Equation,
                    content: m.as_str().to_string(),
                    name: Some((*name).to_string()),
                    number: None,
                    context: context_window(text, m.start(), m.end(), 200),
                });
            }
        }

        entities
    }

    /// Extract theorems, lemmas, propositions, and corollaries
    pub fn extract_theorems(&self, text: &str) -> Vec<MathEntity> {
        let mut theorems = Vec::new();

        for (pattern, kind) in &self.theorem_envs {
            for caps in pattern.captures_iter(text) {
                let whole = caps.get(0).unwrap();
                theorems.push(MathEntity {
                    kind: *kind,
                    content: caps[1].trim().to_string(),
                    name: None,
                    number: None,
                    context: context_window(text, whole.start(), whole.end(), 100),
                });
            }
        }

        for (pattern, kind) in &self.theorem_numbered {
            for caps in pattern.captures_iter(text) {
                let whole = caps.get(0).unwrap();
                theorems.push(MathEntity {
                    kind: *kind,
                    content: caps[2].trim().to_string(),
                    name: None,
                    number: Some(caps[1].to_string()),
                    context: context_window(text, whole.start(), whole.end(), 100),
                });
            }
        }

        theorems
    }

    /// Extract conjectures
    pub fn extract_conjectures(&self, text: &str) -> Vec<MathEntity> {
        let mut conjectures = Vec::new();

        for pattern in &self.conjecture_patterns {
            for caps in pattern.captures_iter(text) {
                let whole = caps.get(0).unwrap();
                conjectures.push(MathEntity {
                    kind: MathEntityKind::Conjecture,
                    content: caps[1].trim().to_string(),
                    name: None,
                    number: None,
                    context: context_window(text, whole.start(), whole.end(), 100),
                });
            }
        }

        for caps in self.conjecture_numbered.captures_iter(text) {
            let whole = caps.get(0).unwrap();
            conjectures.push(MathEntity {
                kind: MathEntityKind::Conjecture,
                content: caps[2].trim().to_string(),
                name: None,
                number: Some(caps[1].to_string()),
                context: context_window(text, whole.start(), whole.end(), 100),
            });
        }

        conjectures
    }

    /// Find references to physical constants
    pub fn extract_constants(&self, text: &str) -> Vec<MathEntity> {
        let mut constants = Vec::new();

        for (pattern, name) in &self.constants {
            for m in pattern.find_iter(text) {
                constants.push(MathEntity {
                    kind: MathEntityKind::Constant,
                    content: m.as_str().to_string(),
                    name: Some((*name).to_string()),
                    number: None,
                    context: context_window(text, m.start(), m.end(), 150),
                });
            }
        }

        constants
    }

    /// Run every extraction pass over one text
    pub fn extract_all(&self, text: &str) -> ExtractedEntities {
        let entities = ExtractedEntities {
            display_equations: self.extract_display_equations(text),
            inline_equations: self.extract_inline_equations(text),
            named_equations: self.extract_named_equations(text),
            theorems: self.extract_theorems(text),
            conjectures: self.extract_conjectures(text),
            constants: self.extract_constants(text),
        };

        tracing::debug!(
            "entity pass found {} hits ({} display equations)",
            entities.total(),
            entities.display_equations.len()
        );

        entities
    }

    fn equation_number(&self, context: &str) -> Option<String> {
        self.number_pattern
            .captures(context)
            .map(|caps| caps[1].to_string())
    }
}

/// Window of `pad` bytes around a match, clamped to char boundaries,
/// with newlines flattened.
fn context_window(text: &str, start: usize, end: usize, pad: usize) -> String {
    let mut lo = start.saturating_sub(pad);
    while lo > 0 && !text.is_char_boundary(lo) {
        lo -= 1;
    }
    let mut hi = (end + pad).min(text.len());
    while hi < text.len() && !text.is_char_boundary(hi) {
        hi += 1;
    }
    text[lo..hi].replace('\n', " ").trim().to_string()
}
