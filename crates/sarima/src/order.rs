//! Seasonal ARIMA order `(p, d, q) x (P, D, Q, s)`.

use std::fmt;

use serde::Serialize;

use crate::error::SarimaError;

/// A seasonal ARIMA order.
///
/// ```
/// use kairos_sarima::ModelOrder;
///
/// let order = ModelOrder::new(1, 1, 1).with_seasonal(0, 1, 1, 12);
/// assert_eq!(order.to_string(), "SARIMA(1,1,1)(0,1,1)[12]");
/// assert_eq!(order.n_arma_params(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ModelOrder {
    p: usize,
    d: usize,
    q: usize,
    #[serde(rename = "P")]
    seasonal_p: usize,
    #[serde(rename = "D")]
    seasonal_d: usize,
    #[serde(rename = "Q")]
    seasonal_q: usize,
    s: usize,
}

impl ModelOrder {
    /// Non-seasonal order with no seasonal part.
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self {
            p,
            d,
            q,
            seasonal_p: 0,
            seasonal_d: 0,
            seasonal_q: 0,
            s: 0,
        }
    }

    /// Sets the seasonal part `(P, D, Q)` with period `s`.
    pub fn with_seasonal(
        mut self,
        seasonal_p: usize,
        seasonal_d: usize,
        seasonal_q: usize,
        s: usize,
    ) -> Self {
        self.seasonal_p = seasonal_p;
        self.seasonal_d = seasonal_d;
        self.seasonal_q = seasonal_q;
        self.s = s;
        self
    }

    pub fn p(&self) -> usize {
        self.p
    }

    pub fn d(&self) -> usize {
        self.d
    }

    pub fn q(&self) -> usize {
        self.q
    }

    pub fn seasonal_p(&self) -> usize {
        self.seasonal_p
    }

    pub fn seasonal_d(&self) -> usize {
        self.seasonal_d
    }

    pub fn seasonal_q(&self) -> usize {
        self.seasonal_q
    }

    /// Seasonal period.
    pub fn s(&self) -> usize {
        self.s
    }

    /// Whether any seasonal term is present.
    pub fn is_seasonal(&self) -> bool {
        self.seasonal_p + self.seasonal_d + self.seasonal_q > 0
    }

    /// Number of AR and MA coefficients to estimate: `p + q + P + Q`.
    pub fn n_arma_params(&self) -> usize {
        self.p + self.q + self.seasonal_p + self.seasonal_q
    }

    /// Observations lost to differencing: `d + s * D`.
    pub fn n_differenced(&self) -> usize {
        self.d + self.s * self.seasonal_d
    }

    /// Degree of the expanded AR polynomial `φ(B)Φ(B^s)`.
    pub fn ar_degree(&self) -> usize {
        self.p + self.s * self.seasonal_p
    }

    /// Degree of the expanded MA polynomial `θ(B)Θ(B^s)`.
    pub fn ma_degree(&self) -> usize {
        self.q + self.s * self.seasonal_q
    }

    /// Checks that seasonal terms come with a usable period.
    pub fn validate(&self) -> Result<(), SarimaError> {
        if self.is_seasonal() && self.s < 2 {
            return Err(SarimaError::InvalidOrder {
                reason: format!(
                    "seasonal terms ({}, {}, {}) need a period of at least 2, got {}",
                    self.seasonal_p, self.seasonal_d, self.seasonal_q, self.s
                ),
            });
        }
        if self.seasonal_p > 0 && self.p >= self.s {
            return Err(SarimaError::InvalidOrder {
                reason: format!(
                    "autoregressive lags overlap: p={} reaches the seasonal lag {}",
                    self.p, self.s
                ),
            });
        }
        if self.seasonal_q > 0 && self.q >= self.s {
            return Err(SarimaError::InvalidOrder {
                reason: format!(
                    "moving-average lags overlap: q={} reaches the seasonal lag {}",
                    self.q, self.s
                ),
            });
        }
        Ok(())
    }
}

impl fmt::Display for ModelOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SARIMA({},{},{})({},{},{})[{}]",
            self.p, self.d, self.q, self.seasonal_p, self.seasonal_d, self.seasonal_q, self.s
        )
    }
}
