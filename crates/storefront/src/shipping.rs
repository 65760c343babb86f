//! Shipping estimate types: CEP validation and quote assembly.
//!
//! A quote is advisory only - it never feeds back into cart state. The fee
//! and lead time are flat; the only variable part is the address resolved
//! from the customer's CEP.

use lojinha_core::{CurrencyCode, Price};
use thiserror::Error;

use crate::services::viacep::Endereco;

/// Flat shipping fee, in centavos.
const FRETE_CENTAVOS: i64 = 1990;

/// Flat delivery lead time, in business days.
const PRAZO_DIAS_UTEIS: u32 = 5;

/// CEP parsing errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CepError {
    #[error("CEP must have exactly 8 digits (got {0})")]
    InvalidLength(usize),
}

/// A validated postal code: exactly 8 digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cep(String);

impl Cep {
    /// Parse user input into a CEP.
    ///
    /// All non-digit characters are stripped first; the remainder must be
    /// exactly 8 digits.
    ///
    /// # Errors
    ///
    /// Returns `CepError::InvalidLength` otherwise.
    pub fn parse(input: &str) -> Result<Self, CepError> {
        let digits: String = input.chars().filter(char::is_ascii_digit).collect();
        if digits.len() == 8 {
            Ok(Self(digits))
        } else {
            Err(CepError::InvalidLength(digits.len()))
        }
    }

    /// The normalized digit-only form, e.g. `"01001000"`.
    #[must_use]
    pub fn digits(&self) -> &str {
        &self.0
    }

    /// Display form, e.g. `"01001-000"`.
    #[must_use]
    pub fn formatted(&self) -> String {
        Self::format_partial(&self.0)
    }

    /// Progressive input mask: once more than 5 digits are present, the
    /// value becomes `NNNNN-NNN` (first 5 digits, dash, remainder capped
    /// at 3). Mirrored client-side for as-you-type formatting.
    #[must_use]
    pub fn format_partial(input: &str) -> String {
        let digits: Vec<char> = input.chars().filter(char::is_ascii_digit).collect();
        let head: String = digits.iter().take(5).collect();
        if digits.len() > 5 {
            let tail: String = digits.iter().skip(5).take(3).collect();
            format!("{head}-{tail}")
        } else {
            head
        }
    }
}

impl std::fmt::Display for Cep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.formatted())
    }
}

/// The transient result of a shipping-estimate lookup, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingQuote {
    /// Assembled address line, e.g. `"Praça da Sé, Sé, São Paulo - SP"`.
    pub endereco: String,
    /// Flat shipping fee, e.g. `"R$ 19.90"`.
    pub frete: String,
    /// Flat lead time, e.g. `"5 dias úteis"`.
    pub prazo: String,
}

impl ShippingQuote {
    /// Assemble a quote from a resolved address.
    #[must_use]
    pub fn for_endereco(endereco: &Endereco) -> Self {
        Self {
            endereco: format!(
                "{}, {}, {} - {}",
                endereco.logradouro, endereco.bairro, endereco.localidade, endereco.uf
            ),
            frete: Price::from_cents(FRETE_CENTAVOS, CurrencyCode::BRL).display(),
            prazo: format!("{PRAZO_DIAS_UTEIS} dias úteis"),
        }
    }
}
