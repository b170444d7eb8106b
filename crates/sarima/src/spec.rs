//! SARIMA model specification (unfitted).

use crate::error::SarimaError;
use crate::exog::Exog;
use crate::fit::FittedModel;
use crate::options::FitOptions;
use crate::order::ModelOrder;

/// An unfitted SARIMA `(p, d, q) x (P, D, Q, s)` specification.
///
/// This is the entry point of the typestate workflow. Create a spec with
/// [`SarimaSpec::new()`], then call [`SarimaSpec::fit()`] to obtain a
/// [`FittedModel`].
///
/// # Typestate Workflow
///
/// ```mermaid
/// graph LR
///     A["SarimaSpec::new(order)"] -->|".with_options(opts)"| A
///     A -->|".fit(&data, exog)?"| B["FittedModel"]
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SarimaSpec {
    order: ModelOrder,
    options: FitOptions,
}

impl SarimaSpec {
    /// Creates a specification with default [`FitOptions`].
    ///
    /// # Example
    ///
    /// ```
    /// use kairos_sarima::{ModelOrder, SarimaSpec};
    ///
    /// let spec = SarimaSpec::new(ModelOrder::new(1, 1, 0).with_seasonal(0, 1, 1, 12));
    /// assert_eq!(spec.order().s(), 12);
    /// ```
    pub fn new(order: ModelOrder) -> Self {
        Self {
            order,
            options: FitOptions::default(),
        }
    }

    /// Replaces the estimation options.
    pub fn with_options(mut self, options: FitOptions) -> Self {
        self.options = options;
        self
    }

    pub fn order(&self) -> ModelOrder {
        self.order
    }

    pub fn options(&self) -> &FitOptions {
        &self.options
    }

    /// Fits this specification to `data` (on the scale the model should
    /// live on, before differencing) via exact maximum likelihood.
    ///
    /// `exog`, when given, must have one row per observation.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`SarimaError::InvalidOrder`] | seasonal terms without a period of at least 2, or overlapping lags |
    /// | [`SarimaError::InvalidConfig`] | invalid [`FitOptions`] |
    /// | [`SarimaError::EmptyData`] | `data` is empty |
    /// | [`SarimaError::NonFiniteData`] | NaN or infinity in `data` or `exog` |
    /// | [`SarimaError::ExogShape`] | `exog` rows differ from `data.len()` |
    /// | [`SarimaError::InsufficientData`] | too few observations after differencing |
    /// | [`SarimaError::ConstantData`] | zero variance after differencing and regression |
    /// | [`SarimaError::SingularMatrix`] | the likelihood cannot be evaluated at the optimum |
    /// | [`SarimaError::Timeout`] | the optimizer exceeded the configured time limit |
    #[tracing::instrument(skip(self, data, exog), fields(order = %self.order))]
    pub fn fit(&self, data: &[f64], exog: Option<&Exog>) -> Result<FittedModel, SarimaError> {
        crate::optimizer::fit_sarima(self.order, data, exog, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kalman::Initialization;

    #[test]
    fn spec_round_trip() {
        let order = ModelOrder::new(2, 1, 1);
        let spec = SarimaSpec::new(order);
        assert_eq!(spec.order(), order);
        assert_eq!(spec.options(), &FitOptions::default());
    }

    #[test]
    fn spec_is_copy() {
        let a = SarimaSpec::new(ModelOrder::new(1, 0, 1));
        let b = a;
        assert_eq!(a, b);
    }

    #[test]
    fn with_options_replaces_defaults() {
        let options = FitOptions::new().with_initialization(Initialization::ApproximateDiffuse);
        let spec = SarimaSpec::new(ModelOrder::new(1, 0, 0)).with_options(options);
        assert_eq!(
            spec.options().initialization(),
            Initialization::ApproximateDiffuse
        );
    }

    #[test]
    fn fit_empty_data() {
        let err = SarimaSpec::new(ModelOrder::new(1, 0, 0))
            .fit(&[], None)
            .unwrap_err();
        assert_eq!(err, SarimaError::EmptyData);
    }

    #[test]
    fn fit_constant_data() {
        let err = SarimaSpec::new(ModelOrder::new(1, 0, 0))
            .fit(&[5.0; 10], None)
            .unwrap_err();
        assert_eq!(err, SarimaError::ConstantData);
    }

    #[test]
    fn fit_valid_data() {
        use rand::SeedableRng;
        use rand_distr::{Distribution, Normal};

        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let normal = Normal::new(0.0, 1.0).unwrap();
        let data: Vec<f64> = (0..150).map(|_| normal.sample(&mut rng)).collect();

        let fit = SarimaSpec::new(ModelOrder::new(1, 0, 0))
            .fit(&data, None)
            .unwrap();
        assert_eq!(fit.order(), ModelOrder::new(1, 0, 0));
        assert!(fit.sigma2() > 0.0);
        assert!(fit.log_likelihood().is_finite());
    }
}
