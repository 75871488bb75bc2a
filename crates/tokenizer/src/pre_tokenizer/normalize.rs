//! Unicode normalization for pre-tokenization.
//!
//! Normalization is a pluggable pre-step applied to text before splitting;
//! the same form must be used when training and when encoding, so the form
//! is part of the persisted model configuration.

use unicode_normalization::UnicodeNormalization;

/// Normalization form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalizationForm {
    /// Canonical composition
    #[default]
    Nfc,
    /// Canonical decomposition
    Nfd,
    /// Compatibility composition
    Nfkc,
    /// Compatibility decomposition
    Nfkd,
    /// No normalization
    None,
}

impl NormalizationForm {
    /// Stable identifier used in the serialized model.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Nfc => "nfc",
            Self::Nfd => "nfd",
            Self::Nfkc => "nfkc",
            Self::Nfkd => "nfkd",
            Self::None => "none",
        }
    }

    /// Parse a stable identifier back into a form.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "nfc" => Some(Self::Nfc),
            "nfd" => Some(Self::Nfd),
            "nfkc" => Some(Self::Nfkc),
            "nfkd" => Some(Self::Nfkd),
            "none" => Some(Self::None),
            _ => None,
        }
    }
}

/// Unicode normalizer.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    /// Normalization form to apply
    form: NormalizationForm,
}

impl Normalizer {
    /// Create a new normalizer.
    pub fn new(form: NormalizationForm) -> Self {
        Self { form }
    }

    /// Create an NFC normalizer (default).
    pub fn nfc() -> Self {
        Self::new(NormalizationForm::Nfc)
    }

    /// The configured form.
    pub fn form(&self) -> NormalizationForm {
        self.form
    }

    /// Normalize text.
    pub fn normalize(&self, text: &str) -> String {
        match self.form {
            NormalizationForm::Nfc => text.nfc().collect(),
            NormalizationForm::Nfd => text.nfd().collect(),
            NormalizationForm::Nfkc => text.nfkc().collect(),
            NormalizationForm::Nfkd => text.nfkd().collect(),
            NormalizationForm::None => text.to_string(),
        }
    }

    /// Check if normalization is enabled.
    pub fn is_enabled(&self) -> bool {
        self.form != NormalizationForm::None
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::nfc()
    }
}
